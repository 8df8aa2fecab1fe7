/// Determinism tests - ensure reconciliation is deterministic and reproducible
///
/// These tests validate that:
/// - Same input produces byte-identical output across repeated runs
/// - No HashMap iteration order leaks into the serialized markup
/// - Reconciling an already reconciled payload is a no-op
use gbn_common::Conventions;
use gbn_markup::parse;
use gbn_reconciler::{reconcile_markup, ConfigEntry, ConfigMap, Reconciler};

const PAGE: &str = r#"<body>
<main data-gbn-root>
  <section data-gbn-fragment="hero">
    <h1 data-gbn-fragment="heading">Welcome</h1>
    <p data-gbn-fragment="text">Intro</p>
  </section>
  <gbn-layout>
    <div data-gb-block="columns">
      <div data-gbn-fragment="column">One</div>
      <div data-gbn-fragment="column">Two</div>
      <div data-gbn-fragment="column">Three</div>
    </div>
  </gbn-layout>
  <footer data-builder-block="footer"><span>©</span></footer>
</main>
</body>"#;

/// Configure every fragment whose path appears in `orders`
fn config_for(orders: &[(&str, Option<i64>)]) -> ConfigMap {
    let conventions = Conventions::default();
    let doc = parse(PAGE);
    let reconciler = Reconciler::new(&conventions);
    let fragments = reconciler
        .inspect(&doc, reconciler.scope_root(&doc))
        .expect("inspect");

    fragments
        .into_iter()
        .filter_map(|info| {
            orders
                .iter()
                .find(|(path, _)| *path == info.path)
                .map(|(_, order)| {
                    (
                        info.computed.to_string(),
                        ConfigEntry {
                            order: *order,
                            ..Default::default()
                        },
                    )
                })
        })
        .collect()
}

fn sample_config() -> ConfigMap {
    config_for(&[
        ("main:0>section:0", Some(1)),
        ("main:0>section:0>h1:0", Some(0)),
        ("main:0>div:0", Some(0)),
        ("main:0>div:0>div:0", Some(3)),
        ("main:0>div:0>div:1", None),
        ("main:0>div:0>div:2", Some(1)),
    ])
}

#[test]
fn test_reconcile_determinism() {
    let conventions = Conventions::default();
    let config = sample_config();

    let results: Vec<String> = (0..10)
        .map(|_| {
            reconcile_markup(PAGE, &config, &conventions)
                .expect("reconcile")
                .markup
        })
        .collect();

    for i in 1..results.len() {
        assert_eq!(
            results[0], results[i],
            "Reconciliation {} differs from reconciliation 0",
            i
        );
    }
}

#[test]
fn test_reconcile_idempotence() {
    let conventions = Conventions::default();
    let config = sample_config();

    let first = reconcile_markup(PAGE, &config, &conventions).expect("first pass");
    let second = reconcile_markup(&first.markup, &config, &conventions).expect("second pass");
    let third = reconcile_markup(&second.markup, &config, &conventions).expect("third pass");

    assert!(!first.report.is_noop());
    assert!(
        second.report.is_noop(),
        "second pass changed the tree: {:?}",
        second.report
    );
    assert_eq!(first.markup, second.markup);
    assert_eq!(second.markup, third.markup);
}

#[test]
fn test_identities_stable_across_sessions() {
    let conventions = Conventions::default();
    let reconciler = Reconciler::new(&conventions);

    let first = parse(PAGE);
    let second = parse(PAGE);

    let a = reconciler.inspect(&first, reconciler.scope_root(&first)).unwrap();
    let b = reconciler.inspect(&second, reconciler.scope_root(&second)).unwrap();

    let a: Vec<_> = a.into_iter().map(|info| info.computed).collect();
    let b: Vec<_> = b.into_iter().map(|info| info.computed).collect();
    assert_eq!(a, b);
}

use serde_json::Value;

pub const DEFAULT_UNIT: &str = "px";

/// Recognized units, longest first so `rem` is tried before `em`
const UNITS: &[&str] = &[
    "vmin", "vmax", "rem", "dvh", "svh", "lvh", "em", "ex", "ch", "px", "pt", "pc", "cm", "mm",
    "in", "vh", "vw", "fr", "ms", "s", "%",
];

/// Properties that are unitless by nature even though they take numbers
const UNITLESS_PROPERTIES: &[&str] = &[
    "line-height",
    "font-weight",
    "opacity",
    "z-index",
    "order",
    "flex",
    "flex-grow",
    "flex-shrink",
    "aspect-ratio",
];

const LENGTH_FRAGMENTS: &[&str] = &[
    "padding", "margin", "gap", "width", "height", "radius", "spacing", "size", "indent", "inset",
    "offset", "basis",
];

const EDGE_PROPERTIES: &[&str] = &["top", "right", "bottom", "left"];

/// Whether bare numbers given for `property` should receive a unit
pub fn is_length_property(property: &str) -> bool {
    let property = property.trim().to_ascii_lowercase();
    if UNITLESS_PROPERTIES.contains(&property.as_str()) {
        return false;
    }

    EDGE_PROPERTIES.contains(&property.as_str())
        || LENGTH_FRAGMENTS
            .iter()
            .any(|fragment| property.contains(fragment))
}

/// Optional sign, digits, at most one decimal point
pub fn is_plain_number(value: &str) -> bool {
    let digits = value
        .strip_prefix('-')
        .or_else(|| value.strip_prefix('+'))
        .unwrap_or(value);

    let mut seen_digit = false;
    let mut seen_point = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_point => seen_point = true,
            _ => return false,
        }
    }
    seen_digit
}

/// Normalize a length value
///
/// - `""` → `None`
/// - `"120"` → `"120px"` (with `unit = "px"`)
/// - `"120pxpx"` → `"120px"`
/// - `"50%"`, `"auto"`, `"calc(1rem + 2px)"` pass through
pub fn normalize_length(value: &str, unit: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if is_plain_number(value) {
        return Some(format!("{}{}", value, unit));
    }

    for candidate in UNITS {
        let Some(once) = value.strip_suffix(candidate) else {
            continue;
        };
        if let Some(number) = once.strip_suffix(candidate) {
            if is_plain_number(number) {
                return Some(once.to_string());
            }
        }
        // The longest matching unit decides; `rem` must not fall through to `em`
        break;
    }

    Some(value.to_string())
}

/// Text of a scalar settings value, `None` for null, empty, or nested values
pub fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Publishable text for `value` under `property`, normalized if it is a length
pub fn normalize_value(property: &str, value: &Value, unit: &str) -> Option<String> {
    let text = scalar_text(value)?;
    if is_length_property(property) {
        normalize_length(&text, unit)
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_number_gets_default_unit() {
        assert_eq!(normalize_length("120", "px").as_deref(), Some("120px"));
        assert_eq!(normalize_length("-1.5", "rem").as_deref(), Some("-1.5rem"));
        assert_eq!(normalize_length("0", "px").as_deref(), Some("0px"));
    }

    #[test]
    fn test_unit_values_pass_through() {
        assert_eq!(normalize_length("50%", "px").as_deref(), Some("50%"));
        assert_eq!(normalize_length("2rem", "px").as_deref(), Some("2rem"));
        assert_eq!(normalize_length("auto", "px").as_deref(), Some("auto"));
        assert_eq!(
            normalize_length("calc(100% - 2px)", "px").as_deref(),
            Some("calc(100% - 2px)")
        );
    }

    #[test]
    fn test_doubled_unit_collapsed() {
        assert_eq!(normalize_length("120pxpx", "px").as_deref(), Some("120px"));
        assert_eq!(normalize_length("1.5emem", "px").as_deref(), Some("1.5em"));
        assert_eq!(normalize_length("2remrem", "px").as_deref(), Some("2rem"));
        assert_eq!(normalize_length("10%%", "px").as_deref(), Some("10%"));
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(normalize_length("", "px"), None);
        assert_eq!(normalize_length("   ", "px"), None);
    }

    #[test]
    fn test_plain_number() {
        assert!(is_plain_number("12"));
        assert!(is_plain_number("+0.5"));
        assert!(is_plain_number(".5"));
        assert!(!is_plain_number("."));
        assert!(!is_plain_number("1.2.3"));
        assert!(!is_plain_number("1e3"));
        assert!(!is_plain_number(""));
    }

    #[test]
    fn test_length_properties() {
        assert!(is_length_property("gap"));
        assert!(is_length_property("padding-top"));
        assert!(is_length_property("border-radius"));
        assert!(is_length_property("letter-spacing"));
        assert!(is_length_property("font-size"));
        assert!(!is_length_property("line-height"));
        assert!(!is_length_property("font-weight"));
        assert!(!is_length_property("color"));
    }

    #[test]
    fn test_normalize_value() {
        assert_eq!(
            normalize_value("gap", &json!(16), "px").as_deref(),
            Some("16px")
        );
        assert_eq!(
            normalize_value("line-height", &json!(1.4), "px").as_deref(),
            Some("1.4")
        );
        assert_eq!(normalize_value("gap", &json!(""), "px"), None);
        assert_eq!(normalize_value("gap", &json!(null), "px"), None);
        assert_eq!(normalize_value("gap", &json!({"top": 1}), "px"), None);
    }
}

use crate::declaration::StyleDeclaration;
use gbn_markup::NodeId;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Host capability that renders published cascade declarations
pub trait StyleApplicator {
    fn publish(&mut self, root: NodeId, declarations: &StyleDeclaration);
}

/// Yields the applicator once the host has initialized it
pub trait ApplicatorSource {
    type Applicator: StyleApplicator;

    fn try_acquire(&mut self) -> Option<Self::Applicator>;
}

impl<F, A> ApplicatorSource for F
where
    F: FnMut() -> Option<A>,
    A: StyleApplicator,
{
    type Applicator = A;

    fn try_acquire(&mut self) -> Option<A> {
        self()
    }
}

/// Waits between acquisition attempts
pub trait Scheduler {
    fn wait(&mut self, delay: Duration);
}

/// Blocks the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadScheduler;

impl Scheduler for ThreadScheduler {
    fn wait(&mut self, delay: Duration) {
        std::thread::sleep(delay);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    pub delay_ms: u64,
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            delay_ms: 50,
            max_attempts: 20,
        }
    }
}

impl RetryPolicy {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// The first attempt is always made, even with a zero cap
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

/// Acquisition state; `Pending` carries the attempt about to be made
#[derive(Debug)]
pub enum Acquisition<A> {
    Pending { attempt: u32 },
    Ready { applicator: A, attempts: u32 },
    Degraded { attempts: u32 },
}

impl<A> Acquisition<A> {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Acquisition::Pending { .. })
    }

    /// Advance one attempt
    pub fn step<S>(self, source: &mut S, scheduler: &mut dyn Scheduler, policy: &RetryPolicy) -> Self
    where
        S: ApplicatorSource<Applicator = A>,
    {
        let attempt = match self {
            Acquisition::Pending { attempt } => attempt,
            settled => return settled,
        };

        match source.try_acquire() {
            Some(applicator) => Acquisition::Ready {
                applicator,
                attempts: attempt,
            },
            None if attempt >= policy.attempts() => Acquisition::Degraded { attempts: attempt },
            None => {
                debug!("Applicator unavailable on attempt {}, retrying", attempt);
                scheduler.wait(policy.delay());
                Acquisition::Pending {
                    attempt: attempt + 1,
                }
            }
        }
    }
}

/// Try the source immediately, then on a fixed delay up to the attempt cap
pub fn acquire<S: ApplicatorSource>(
    source: &mut S,
    scheduler: &mut dyn Scheduler,
    policy: &RetryPolicy,
) -> Acquisition<S::Applicator> {
    let mut state = Acquisition::Pending { attempt: 1 };
    while !state.is_settled() {
        state = state.step(source, scheduler, policy);
    }

    if let Acquisition::Degraded { attempts } = state {
        warn!(
            "Style applicator unavailable after {} attempts, publishing without it",
            attempts
        );
    }
    state
}

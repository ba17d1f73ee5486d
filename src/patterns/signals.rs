//! Confidence signals.
//!
//! Each function inspects one property of a file's facts and returns a
//! bounded contribution. Rules add contributions together and cap the sum
//! with [`combine`].

use crate::core::{ChannelFact, ConcurrencyFacts, SyncKind};

/// `weight` when `count >= min`.
pub fn at_least(count: usize, min: usize, weight: f64) -> f64 {
    if count >= min {
        weight
    } else {
        0.0
    }
}

pub fn present(flag: bool, weight: f64) -> f64 {
    if flag {
        weight
    } else {
        0.0
    }
}

/// `weight` when more than `threshold` of the file's channels are unbuffered.
pub fn unbuffered_share(facts: &ConcurrencyFacts, threshold: f64, weight: f64) -> f64 {
    present(facts.unbuffered_ratio() > threshold, weight)
}

pub fn has_wait_group(facts: &ConcurrencyFacts) -> bool {
    facts.has_sync(SyncKind::WaitGroup)
}

/// Launches per channel: three or more scores 0.4, two or more 0.2.
pub fn launch_channel_ratio(launches: usize, channels: usize) -> f64 {
    if channels == 0 {
        return 0.0;
    }
    let ratio = launches as f64 / channels as f64;
    if ratio >= 3.0 {
        0.4
    } else if ratio >= 2.0 {
        0.2
    } else {
        0.0
    }
}

/// Small capacities look like a concurrency limit; large ones like a queue.
pub fn semaphore_capacity(size: usize) -> f64 {
    match size {
        2..=10 => 0.3,
        s if s > 10 => 0.1,
        _ => 0.0,
    }
}

pub fn unit_element(channel: &ChannelFact) -> f64 {
    present(channel.unit_element, 0.4)
}

/// Decimal places kept when summing contributions.
const PRECISION: f64 = 1e9;

/// Sum of contributions, capped at 1.0.
///
/// The sum is rounded so that weights adding up to exactly an acceptance
/// threshold compare equal to it (`0.4 + 0.2` is `0.6`, not just above).
pub fn combine(signals: &[f64]) -> f64 {
    let sum: f64 = signals.iter().sum();
    ((sum * PRECISION).round() / PRECISION).min(1.0)
}

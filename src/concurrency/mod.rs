//! Concurrency fact collection.
//!
//! [`collect_facts`] walks one file and records every task launch, channel
//! construction and synchronization primitive it can see syntactically, plus
//! advisory [`LeakRisk`](crate::core::LeakRisk)s for launched tasks that look
//! like they can never stop.

pub mod collector;
pub mod leaks;

pub use collector::{collect_facts, parse_int_literal, FactCollector};
pub use leaks::{assess_task_body, LeakAssessment, LoopExit};

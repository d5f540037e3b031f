//! Benchmark driver, correctness checker, and orchestrator helpers shared
//! between `stride`'s integration tests and its benchmark binary.

pub mod checker;
pub mod driver;

pub use checker::{ Checker, ChecksFailed, MessageSlot, TaggedMessage };
pub use driver::{ DriverConfig, HeavyConfig, HeavySummary, RunStatus, SharedStatus, ThroughputReport };

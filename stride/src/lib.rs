//! A multi-producer/multi-consumer unbounded lock-free FIFO queue for
//! fixed-size value types, built around three cooperating ideas:
//!
//! - a [`queue::StripedQueue`] that splits one logical FIFO across `N`
//!   independent [`micro_queue::MicroQueue`]s to cut false sharing on the
//!   hot sequence counters,
//! - a [`ring::Ring`] chain per micro-queue that grows geometrically and
//!   reclaims half-rings once every cell in them has been read, and
//! - a two-phase pop reservation protocol that lets a consumer detect
//!   emptiness without a CAS loop.
//!
//! A [`bounded::BoundedQueue`] variant shares the same claim/publish
//! discipline over a single fixed-capacity ring for callers who know their
//! bound up front.

pub mod backoff;
pub mod bounded;
pub mod cell;
pub mod config;
pub mod constants;
pub mod error;
mod insights;
pub mod metrics;
mod micro_queue;
pub mod queue;
pub mod ring;

pub use bounded::BoundedQueue;
pub use config::QueueConfig;
pub use error::{ Result, StrideError };
pub use metrics::{ Metrics, MetricsSnapshot };
pub use queue::StripedQueue;

//! Job-description analysis.
//!
//! A request flows through `service::analyze_job`: hash, cache lookup,
//! provider call on a miss, enrichment, matching against skill cards,
//! recommendations, then per-user gaps which are never cached.

pub mod cache;
pub mod enrich;
pub mod gaps;
pub mod handlers;
pub mod hashing;
pub mod history;
pub mod matching;
pub mod metrics;
pub mod recommendations;
pub mod service;
pub mod types;

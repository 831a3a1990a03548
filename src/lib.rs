//! Epidemic spread with vaccination on a random contact network.
//!
//! The [`engine::Engine`] owns the contact graph, the agents and the random number generator,
//! and records a [`metrics::Record`] at the start of every tick.

pub mod analysis;
pub mod config;
pub mod engine;
pub mod graph;
pub mod manager;
pub mod metrics;
pub mod model;

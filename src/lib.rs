//! Market bottom signal engine.
//!
//! Derives a full indicator bundle from a handful of observed market values
//! (or a randomized fallback when the upstream source fails) and scores it into
//! a single 0-100 bottom signal strength.

pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;

pub use error::{ConfigError, DataError};

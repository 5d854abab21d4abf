//! Bottom signal scoring.

pub mod aggregation;
pub mod categories;
pub mod engine;
pub mod scoring;

pub use aggregation::*;
pub use categories::*;
pub use engine::*;
pub use scoring::*;

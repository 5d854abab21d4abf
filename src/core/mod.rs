//! Core application primitives (pipeline, scheduler, HTTP surface)

pub mod http;
pub mod pipeline;
pub mod scheduler;

pub use http::*;
pub use pipeline::*;
pub use scheduler::*;

pub mod client;
pub mod parser;
pub mod provider;

pub use client::AlphaVantageClient;
pub use provider::AlphaVantageProvider;

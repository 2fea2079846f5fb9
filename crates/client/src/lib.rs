pub mod client;

pub use client::HttpMetricsSource;

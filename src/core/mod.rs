pub mod blocking;
pub mod client;
pub mod endpoints;
pub mod integration;
pub mod telemetry;

pub use crate::domain::ports::{ConfigProvider, TelemetrySink};
pub use crate::utils::error::Result;
pub use blocking::BlockingClient;
pub use client::{Endpoint, GalileoClient, Parsed, Response};

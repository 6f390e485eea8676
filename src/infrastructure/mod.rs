//! Infrastructure layer - caching, transport, pipeline and service wiring

pub mod cache;
pub mod http;
pub mod logging;
pub mod pipeline;
pub mod services;

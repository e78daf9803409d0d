//! Utility functions for the gateway

pub mod http;

pub use http::*;

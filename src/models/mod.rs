use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

// One record per forwarded call, emitted to the transaction log once the
// backend response head has been relayed (or the forward has failed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForwardRecord {
    // Basic HTTP information
    pub method: String,
    pub service: String,
    pub backend_url: String,

    // Client information
    pub client_ip: IpAddr,
    pub principal: Option<String>,
    pub bearer_attached: bool,

    // Timing
    pub timestamp: DateTime<Utc>,
    pub duration_ms: Option<u64>,

    // Outcome: backend status when the head was relayed, error otherwise
    pub status: Option<u16>,
    pub error: Option<String>,
}

impl ForwardRecord {
    // Create a new record at dispatch time; outcome fields are filled in
    // once the backend responds.
    pub fn new(method: String, service: String, backend_url: String, client_ip: IpAddr) -> Self {
        Self {
            method,
            service,
            backend_url,
            client_ip,
            principal: None,
            bearer_attached: false,
            timestamp: Utc::now(),
            duration_ms: None,
            status: None,
            error: None,
        }
    }

    pub fn completed(mut self, status: u16, duration_ms: u64) -> Self {
        self.status = Some(status);
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn failed(mut self, error: &crate::error::Error, duration_ms: u64) -> Self {
        self.error = Some(error.to_string());
        self.duration_ms = Some(duration_ms);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_captures_outcome() {
        let record = ForwardRecord::new(
            "GET".into(),
            "service1".into(),
            "http://localhost:9081/hello".into(),
            "127.0.0.1".parse().unwrap(),
        )
        .completed(200, 12);

        assert_eq!(record.status, Some(200));
        assert_eq!(record.duration_ms, Some(12));
        assert!(record.error.is_none());
    }
}

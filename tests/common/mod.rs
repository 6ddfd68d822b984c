//! Shared helpers for integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use intasend::http::{PreparedRequest, RawResponse, Transport};
use intasend::{ClientConfig, IntaSendClient, IntaSendError, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const PUBLISHABLE_KEY: &str = "ISPubKey_test_4a3b2c1d";
pub const TOKEN: &str = "ISSecretKey_test_9f8e7d6c5b4a";

/// Transport double that records every request and replays canned responses
#[derive(Debug, Default)]
pub struct StubTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<PreparedRequest>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_response(status: u16, body: &str) -> Arc<Self> {
        let stub = Self::new();
        stub.push_response(status, body);
        stub
    }

    pub fn push_response(&self, status: u16, body: &str) {
        let status = http::StatusCode::from_u16(status).unwrap();
        self.responses
            .lock()
            .unwrap()
            .push_back(RawResponse::new(status, body));
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> PreparedRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }

    pub fn last_body(&self) -> serde_json::Value {
        serde_json::from_slice(&self.last_request().body.unwrap()).unwrap()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| IntaSendError::transport("no canned response"))
    }
}

pub fn sandbox_config() -> ClientConfig {
    ClientConfig::new(PUBLISHABLE_KEY, TOKEN).with_sandbox()
}

pub fn stub_client(config: ClientConfig, stub: &Arc<StubTransport>) -> IntaSendClient {
    IntaSendClient::with_transport(config, stub.clone())
}

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use streams_core::{Config, ResetCodeSink, Streams};
use streams_types::api::AuthResponse;
use streams_types::models::UserId;

/// Engine with argon2 turned down so registration is cheap in tests.
pub fn streams() -> Streams {
    Streams::new(Config {
        jwt_secret: "test-secret".into(),
        hash_memory_kib: 64,
        hash_iterations: 1,
        ..Config::default()
    })
    .unwrap()
}

/// Reset sink that keeps every issued code for the test to read back.
#[derive(Default)]
pub struct CapturedCodes(Mutex<Vec<(String, String)>>);

impl CapturedCodes {
    pub fn last_for(&self, email: &str) -> Option<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(to, _)| to == email)
            .map(|(_, code)| code.clone())
    }

    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

impl ResetCodeSink for CapturedCodes {
    fn deliver(&self, _user_id: UserId, email: &str, code: &str) -> streams_core::Result<()> {
        self.0.lock().unwrap().push((email.to_string(), code.to_string()));
        Ok(())
    }
}

pub fn streams_with_codes() -> (Streams, Arc<CapturedCodes>) {
    let codes = Arc::new(CapturedCodes::default());
    (streams().with_reset_sink(codes.clone()), codes)
}

pub fn register(streams: &Streams, first: &str, last: &str) -> AuthResponse {
    let email = format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase());
    streams.register(&email, "password123", first, last).unwrap()
}

/// Register three users: the first becomes global owner.
pub fn trio(streams: &Streams) -> (AuthResponse, AuthResponse, AuthResponse) {
    (
        register(streams, "Alice", "Smith"),
        register(streams, "Bob", "Jones"),
        register(streams, "Carol", "White"),
    )
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

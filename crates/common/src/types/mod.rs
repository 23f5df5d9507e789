use serde::{Deserialize, Serialize};

/// Liveness body, `{"status": "ok"}`.
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub status: &'static str,
}

impl Health {
    pub const OK: Health = Health { status: "ok" };
}

/// Plain acknowledgement body, e.g. `{"message": "review submitted"}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

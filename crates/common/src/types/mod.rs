use serde::Serialize;
use serde_json::{Map, Value};

/// `GET /health` payload. `database` is only reported by the detailed check.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
    /// Seconds since the process started serving.
    pub uptime: f64,
    pub environment: String,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,
}

/// Uniform response envelope: `{ is_success, data?, error?, ...extra }`.
///
/// Operation-specific top-level fields (`limit`, `offset`, `total_contributed`, ...)
/// go into `extra` and are flattened next to `data`.
#[derive(Serialize, Debug)]
pub struct ApiResponse<T> {
    pub is_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { is_success: true, data: Some(data), error: None, extra: Map::new() }
    }

    /// Attach an extra top-level field.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }
}

impl ApiResponse<()> {
    /// Success without a `data` payload (e.g. `{ is_success, message }`).
    pub fn done() -> Self {
        Self { is_success: true, data: None, error: None, extra: Map::new() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { is_success: false, data: None, error: Some(message.into()), extra: Map::new() }
    }
}

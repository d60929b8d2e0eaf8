use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// Body the prediction service attaches to non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
    #[serde(default)]
    pub status: Option<ResponseStatus>,
}

impl ServiceErrorBody {
    /// Extracts the service's `error` text from a raw response body, if it has one.
    pub fn detail_from_slice(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ServiceErrorBody>(body)
            .ok()
            .map(|parsed| parsed.error.trim().to_string())
            .filter(|detail| !detail.is_empty())
    }
}

use serde::{Serialize, Deserialize};

// Error responses arrive with HTTP status 200,
// so the body shape is the only way to tell them apart

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorInfo
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: u8,

    // The API duplicates the message under an "error" field.
    // We resolve messages from our own table instead
    #[serde(default, rename = "error")]
    pub message: Option<String>
}

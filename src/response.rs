use serde::Serialize;
use utoipa::ToSchema;

/// Envelope returned by mutation endpoints. Read endpoints answer the raw
/// store rows instead.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub success: bool,
    pub msg: String,
}

impl ActionResponse {
    pub fn ok(msg: impl Into<String>) -> Self {
        Self {
            success: true,
            msg: msg.into(),
        }
    }
}

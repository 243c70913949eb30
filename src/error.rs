//! Error types for the game's external boundaries.
//!
//! The simulation and session never fail; only the narrative service and
//! settings parsing can.

/// Failure to obtain a level intro from the text service.
///
/// Never reaches the session: `narrative::fetch_intro` swaps it for the
/// static fallback.
#[derive(thiserror::Error, Debug)]
pub enum NarrativeError {
    #[error("Narrative service not configured")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Service returned an empty intro")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

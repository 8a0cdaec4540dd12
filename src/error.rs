use thiserror::Error;

pub type Result<T> = std::result::Result<T, RelayError>;

/// Every way a relayed request can fail, from inbound auth to the
/// upstream envelope. Nothing is downgraded to a default value silently;
/// the only fallbacks are the documented reshaping chains.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error("invalid or missing api key")]
    Unauthorized,

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Upstream 403. Handled inside the fetch loop by rotating to a fresh
    /// identity; callers only ever see `RetryExhausted`.
    #[error("upstream anti-bot block (status {status})")]
    AntiBotBlocked { status: u16 },

    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    #[error("upstream transport error: {0}")]
    Transport(#[from] rquest::Error),

    #[error("upstream body is not valid json: {0}")]
    Decode(#[from] serde_json::Error),

    /// Upstream answered 2xx but the JSON is missing an expected envelope
    /// key. Kept distinct from status errors so callers can tell
    /// "upstream down" from "upstream changed shape".
    #[error("malformed upstream response: missing {0}")]
    MalformedResponse(&'static str),

    #[error("upstream kept blocking after {attempts} attempts")]
    RetryExhausted { attempts: u32 },

    #[error("configuration error: {0}")]
    Config(String),
}

use reqwest::StatusCode;

/// Failure of a single call to the EchoMind backend.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Non-2xx response. Displays the server-supplied detail verbatim.
    #[error("{detail}")]
    Backend { status: StatusCode, detail: String },
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Backend { status, .. } => Some(*status),
            Self::Transport { source, .. } | Self::Decode { source, .. } => source.status(),
        }
    }

    /// The backend's `detail` string, when the server answered at all.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Backend { detail, .. } => Some(detail),
            _ => None,
        }
    }
}

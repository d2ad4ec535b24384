use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DashboardError {
    /// Network failure or non-2xx reply.
    #[error("{message}")]
    Transport { status: Option<u16>, message: String },

    /// `status: error` inside an otherwise successful reply.
    #[error("{message}")]
    Application { message: String },

    #[error("Failed to parse JSON: {0}")]
    Decode(String),

    #[error("Push channel failed: {0}")]
    Channel(String),

    #[error("Missing element: {0}")]
    Dom(String),
}

impl DashboardError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    /// Text shown in the transient alert banner.
    pub fn alert_message(&self) -> String {
        match self {
            Self::Transport { message, .. } if message.trim().is_empty() => {
                "AN ERROR OCCURRED WHILE PROCESSING YOUR REQUEST...".to_string()
            }
            Self::Application { message } if message.trim().is_empty() => {
                "THE SERVER REPORTED AN ERROR...".to_string()
            }
            other => other.to_string(),
        }
    }
}

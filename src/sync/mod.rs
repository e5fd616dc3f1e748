pub mod client;
pub mod command;
pub mod filter;
pub mod keyring;
pub mod resources;
pub mod store;
pub mod tasks;
pub mod transport;

#[cfg(test)]
pub(crate) mod fake;

pub use client::TodoistClient;
pub use store::{Mutation, RowSink, TaskStore};
pub use transport::{Api, ApiRequest, Body, HttpTransport, Params, Transport};

/// Failure of a single API operation. Nothing here is retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Non-2xx response: status line plus the body the server sent.
    #[error("{status}: {body}")]
    Status { status: String, body: String },
    /// The request could not be sent or its response could not be read.
    #[error("{0}")]
    Connection(String),
    /// The response body did not match the expected JSON shape.
    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),
    /// Filter text names no known project.
    #[error("Invalid filter: {0}")]
    Resolution(String),
    #[error("{0}")]
    Validation(String),
}

impl SyncError {
    /// Status and connection failures are both transport errors.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_classification() {
        let status = SyncError::Status {
            status: "403 Forbidden".into(),
            body: "Forbidden".into(),
        };
        assert!(status.is_transport());
        assert_eq!(status.to_string(), "403 Forbidden: Forbidden");
        assert!(SyncError::Connection("timed out".into()).is_transport());
        assert!(!SyncError::Resolution("nope".into()).is_transport());
        assert_eq!(
            SyncError::Resolution("nope".into()).to_string(),
            "Invalid filter: nope"
        );
    }
}

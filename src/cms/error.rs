//! CMS error types

use thiserror::Error;

/// Errors raised while talking to the CMS or validating its documents
#[derive(Error, Debug)]
pub enum CmsError {
    /// No document of the requested type carries this uid
    #[error("{document_type} document {uid:?} not found")]
    NotFound { document_type: String, uid: String },

    /// The HTTP request itself failed (DNS, connect, TLS, timeout)
    #[error("CMS request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The CMS answered with a non-2xx status
    #[error("CMS API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// A document is missing a field the view models cannot do without
    #[error("Malformed document {id}: {reason}")]
    Malformed { id: String, reason: String },

    #[error("Invalid CMS URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to decode CMS response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("CMS API exposes no master ref")]
    NoMasterRef,
}

impl CmsError {
    pub fn not_found(document_type: &str, uid: &str) -> Self {
        CmsError::NotFound {
            document_type: document_type.to_string(),
            uid: uid.to_string(),
        }
    }

    pub fn malformed(id: &str, reason: impl Into<String>) -> Self {
        CmsError::Malformed {
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CmsError::NotFound { .. })
    }

    /// Transport failures and server-side errors may succeed on a later attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            CmsError::Network(_) => true,
            CmsError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

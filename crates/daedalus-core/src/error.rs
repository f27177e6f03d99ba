//! Error types for Daedalus.
//!
//! This module provides [`DaedalusError`], the standard error taxonomy
//! used throughout the service, together with its HTTP status mapping
//! and the serializable `{"errors": [...]}` envelope rendered at the
//! boundary.
//!
//! Two retrieval-time variants deserve a note on their asymmetry:
//!
//! - [`DaedalusError::ProjectNotFound`] maps to `404 Not Found` — the
//!   caller asked for a project that was never uploaded, a client error.
//! - [`DaedalusError::ParsedComponentNotFound`] maps to
//!   `500 Internal Server Error` — the project *exists* but its parsed
//!   representation does not (never parsed, or deleted since). That is
//!   an internal inconsistency from the caller's point of view, even
//!   when triggered by a legitimate prior deletion.

use crate::ProjectId;
use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using [`DaedalusError`].
pub type DaedalusResult<T> = Result<T, DaedalusError>;

/// Standard error type for the Daedalus service.
#[derive(Error, Debug)]
pub enum DaedalusError {
    /// An archive entry's resolved path escapes the destination root.
    /// Always fatal to the extraction, never retried.
    #[error("archive entry escapes the destination directory: {entry}")]
    PathTraversal {
        /// The offending entry name as stored in the archive.
        entry: String,
    },

    /// Directory or file creation/write failure during extraction.
    #[error("I/O failure during ingestion: {context}")]
    Io {
        /// What was being attempted when the failure occurred.
        context: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The uploaded bytes are not a valid archive container.
    #[error("invalid archive: {reason}")]
    InvalidArchive {
        /// Why the container was rejected.
        reason: String,
    },

    /// The archive exceeds the configured entry or size caps.
    #[error("archive exceeds configured limits: {reason}")]
    ArchiveLimit {
        /// Which cap was exceeded.
        reason: String,
    },

    /// The parsing service rejected or could not process the extracted tree.
    #[error("parsing failed: {reason}")]
    ParsingFailure {
        /// Why parsing did not complete.
        reason: String,
    },

    /// Retrieval against an unknown project identifier.
    #[error("ProjectInfo not found with id: {id}")]
    ProjectNotFound {
        /// The identifier that did not resolve.
        id: ProjectId,
    },

    /// Retrieval against a known project whose parsed representation is
    /// absent (never parsed, or deleted since).
    #[error("Unable to find requested ParsedComponent.")]
    ParsedComponentNotFound,

    /// A lifecycle transition was requested from an incompatible state.
    #[error("invalid project state transition: {from} -> {to}")]
    InvalidTransition {
        /// The state the record was actually in.
        from: &'static str,
        /// The transition that was requested.
        to: &'static str,
    },

    /// The request itself was malformed (bad identifier, missing body).
    #[error("invalid request: {message}")]
    InvalidRequest {
        /// Human-readable description of the problem.
        message: String,
    },
}

impl DaedalusError {
    /// Convenience constructor for I/O failures with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Returns the HTTP status code this error maps to at the boundary.
    ///
    /// Ingestion-time failures (`PathTraversal`, `Io`, `InvalidArchive`,
    /// `ArchiveLimit`, `ParsingFailure`) are acknowledged as
    /// `422 Unprocessable Entity`: the request was readable but the
    /// archive could not be ingested, and the project is queryable in
    /// its `FAILED` state.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PathTraversal { .. }
            | Self::Io { .. }
            | Self::InvalidArchive { .. }
            | Self::ArchiveLimit { .. }
            | Self::ParsingFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ProjectNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ParsedComponentNotFound | Self::InvalidTransition { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Builds the serializable error envelope for this error.
    #[must_use]
    pub fn to_envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope::new(self.status_code(), vec![self.to_string()])
    }
}

/// The JSON error body rendered at the HTTP boundary.
///
/// # Example
///
/// ```
/// use daedalus_core::{DaedalusError, ProjectId};
///
/// let err = DaedalusError::ProjectNotFound { id: ProjectId::new() };
/// let envelope = err.to_envelope();
/// assert_eq!(envelope.status, 404);
/// assert!(envelope.errors[0].starts_with("ProjectInfo not found"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// Human-readable error messages, most specific first.
    pub errors: Vec<String>,

    /// Numeric HTTP status, duplicated in the body for log scraping.
    pub status: u16,

    /// When the error was rendered.
    pub timestamp: DateTime<Utc>,
}

impl ErrorEnvelope {
    /// Creates an envelope from a status and message list.
    #[must_use]
    pub fn new(status: StatusCode, errors: Vec<String>) -> Self {
        Self {
            errors,
            status: status.as_u16(),
            timestamp: Utc::now(),
        }
    }
}

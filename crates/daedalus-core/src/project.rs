//! Project identity and lifecycle types.
//!
//! A [`ProjectRecord`] tracks one uploaded archive from the moment its
//! bytes are accepted until its diagram artifacts are served (or the
//! project fails or is deleted). The lifecycle is an explicit tagged
//! state rather than a set of nullable fields, so every transition is
//! auditable in one place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// A unique identifier for each uploaded project, using UUID v7.
///
/// UUID v7 is time-ordered, which keeps project listings and log lines
/// naturally sorted by upload time.
///
/// # Example
///
/// ```
/// use daedalus_core::ProjectId;
///
/// let id = ProjectId::new();
/// let parsed: ProjectId = id.to_string().parse().unwrap();
/// assert_eq!(id, parsed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Creates a new unique project ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `ProjectId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProjectId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<Uuid> for ProjectId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

/// A non-owning reference to a parsed-project handle held by the
/// parsing service.
///
/// The handle's *existence* on a record does not guarantee its
/// *validity*: the parsing service may discard its side independently,
/// so consumers must re-resolve the handle at the moment of use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandleId(Uuid);

impl HandleId {
    /// Creates a new unique handle ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for HandleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HandleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The recorded cause of a failed ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailureCause(String);

impl FailureCause {
    /// Creates a failure cause from any displayable error.
    #[must_use]
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self(cause.to_string())
    }

    /// Returns the cause message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FailureCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle state of an uploaded project.
///
/// The happy path is `Uploaded → Extracted → Parsed → ArtifactsReady`.
/// `Failed` is reachable from any non-terminal state when an ingestion
/// step fails; `Deleted` is reachable from any state via explicit
/// deletion of the parsed representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectState {
    /// Archive bytes accepted; no filesystem footprint yet.
    Uploaded,
    /// Archive extracted to disk.
    Extracted,
    /// Extracted tree parsed; a handle is held by the parsing service.
    Parsed,
    /// At least one artifact has been generated and served.
    ArtifactsReady,
    /// An ingestion step failed; the cause is recorded for inspection.
    Failed {
        /// Why ingestion did not complete.
        cause: FailureCause,
    },
    /// The parsed representation was explicitly discarded. The record
    /// stays queryable, but artifact retrieval now fails server-side.
    Deleted,
}

impl ProjectState {
    /// Returns `true` if an extracted tree exists on disk for this state.
    #[must_use]
    pub const fn has_extracted_tree(&self) -> bool {
        matches!(self, Self::Extracted | Self::Parsed | Self::ArtifactsReady)
    }

    /// Returns `true` if the state admits no further ingestion steps.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed { .. } | Self::Deleted)
    }

    /// Short state name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Uploaded => "UPLOADED",
            Self::Extracted => "EXTRACTED",
            Self::Parsed => "PARSED",
            Self::ArtifactsReady => "ARTIFACTS_READY",
            Self::Failed { .. } => "FAILED",
            Self::Deleted => "DELETED",
        }
    }
}

/// Durable record of one uploaded project.
///
/// Invariant: `extracted_path` is `Some` if and only if the state is
/// `Extracted`, `Parsed`, or `ArtifactsReady`. `parsed_handle` is set
/// once the state reaches `Parsed`, but its validity against the
/// parsing service is re-checked at use time, never assumed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Unique identifier, assigned at creation, immutable.
    pub id: ProjectId,

    /// Original archive filename.
    pub name: String,

    /// When the archive bytes were accepted.
    pub created_at: DateTime<Utc>,

    /// Current lifecycle state.
    #[serde(flatten)]
    pub state: ProjectState,

    /// Location of the extracted tree, present once `Extracted` or later.
    pub extracted_path: Option<PathBuf>,

    /// Back-reference to the parsing service's handle; may be stale.
    pub parsed_handle: Option<HandleId>,
}

impl ProjectRecord {
    /// Creates a fresh record in the `Uploaded` state.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::new(),
            name: name.into(),
            created_at: Utc::now(),
            state: ProjectState::Uploaded,
            extracted_path: None,
            parsed_handle: None,
        }
    }
}

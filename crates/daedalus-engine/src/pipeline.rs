//! The ingestion pipeline state machine.

use bytes::Bytes;
use daedalus_archive::{extract, ExtractError, ExtractLimits};
use daedalus_core::{
    DaedalusError, DaedalusResult, FailureCause, ProjectId, ProjectRecord, ProjectStore,
};
use daedalus_parser::{ParseError, ParsingService};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;

/// Orchestrates `UPLOADED → EXTRACTED → PARSED` for each uploaded
/// archive, and the explicit `DELETED` transition.
///
/// Every failure along the way is handled locally: the project record
/// transitions to `FAILED` with its cause recorded for later
/// inspection, and the same error is returned so the upload response
/// can acknowledge that ingestion did not complete. Partially extracted
/// trees are left on disk under the per-project destination directory;
/// their cleanup is an operational concern.
#[derive(Debug, Clone)]
pub struct IngestionPipeline {
    store: Arc<ProjectStore>,
    parser: Arc<ParsingService>,
    workspace_dir: PathBuf,
    limits: ExtractLimits,
}

impl IngestionPipeline {
    /// Creates a pipeline extracting under `workspace_dir`.
    ///
    /// Each project gets a fresh destination directory
    /// `workspace_dir/<project-id>/`; destinations are never reused
    /// across projects, so extraction needs no cross-request locking.
    #[must_use]
    pub fn new(
        store: Arc<ProjectStore>,
        parser: Arc<ParsingService>,
        workspace_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            parser,
            workspace_dir,
            limits: ExtractLimits::default(),
        }
    }

    /// Overrides the archive resource caps.
    #[must_use]
    pub fn with_limits(mut self, limits: ExtractLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Ingests one uploaded archive: create the record, extract, parse.
    ///
    /// Returns the record in the `Parsed` state on success. On failure
    /// the record is transitioned to `Failed` (still queryable by id)
    /// and the causing error is returned.
    ///
    /// Extraction and parsing are blocking filesystem work and run on
    /// the blocking thread pool; the ingestion task does not proceed
    /// until each step completes in full.
    pub async fn ingest(&self, name: &str, archive: Bytes) -> DaedalusResult<ProjectRecord> {
        let record = self.store.create(name);
        let id = record.id;
        tracing::info!(project_id = %id, name, bytes = archive.len(), "ingestion started");

        let dest = self.workspace_dir.join(id.to_string());
        let extracted = self.run_extraction(archive, dest).await;
        let extracted_path = match extracted {
            Ok(path) => path,
            Err(err) => return Err(self.fail(id, err)),
        };
        self.store.mark_extracted(id, extracted_path.clone())?;

        let parsed = self.run_parse(id, extracted_path).await;
        let handle = match parsed {
            Ok(handle) => handle,
            Err(err) => return Err(self.fail(id, err)),
        };
        let record = self.store.mark_parsed(id, handle)?;

        tracing::info!(project_id = %id, "ingestion complete");
        Ok(record)
    }

    /// Explicitly discards a project's parsed representation.
    ///
    /// The parsing service drops its handle and the record transitions
    /// to `Deleted`. The record remains queryable by identifier, but
    /// artifact retrieval now fails with the "parsed component not
    /// found" error — the *project* still exists, only its parsed
    /// representation does not.
    pub fn delete_parsed(&self, id: ProjectId) -> DaedalusResult<ProjectRecord> {
        let record = self
            .store
            .get(id)
            .ok_or(DaedalusError::ProjectNotFound { id })?;

        if let Some(handle) = record.parsed_handle {
            self.parser.discard(handle);
        }
        self.store.mark_deleted(id)
    }

    async fn run_extraction(&self, archive: Bytes, dest: PathBuf) -> DaedalusResult<PathBuf> {
        let limits = self.limits.clone();
        tokio::task::spawn_blocking(move || {
            extract(Cursor::new(archive), &dest, &limits).map_err(extract_error)
        })
        .await
        .map_err(|e| DaedalusError::io("extraction task", std::io::Error::other(e)))?
    }

    async fn run_parse(
        &self,
        id: ProjectId,
        root: PathBuf,
    ) -> DaedalusResult<daedalus_core::HandleId> {
        let parser = Arc::clone(&self.parser);
        tokio::task::spawn_blocking(move || parser.parse(id, &root).map_err(parse_error))
            .await
            .map_err(|e| DaedalusError::io("parsing task", std::io::Error::other(e)))?
    }

    /// Records the failure cause on the project and passes the error on.
    fn fail(&self, id: ProjectId, err: DaedalusError) -> DaedalusError {
        tracing::warn!(project_id = %id, error = %err, "ingestion failed");
        if let Err(transition_err) = self.store.mark_failed(id, FailureCause::new(&err)) {
            tracing::error!(project_id = %id, error = %transition_err, "could not record failure");
        }
        err
    }
}

/// Maps extraction failures into the service taxonomy.
fn extract_error(err: ExtractError) -> DaedalusError {
    match err {
        ExtractError::PathTraversal { entry } => DaedalusError::PathTraversal { entry },
        ExtractError::Io(source) => DaedalusError::io("extracting archive", source),
        ExtractError::Zip(zip_err) => DaedalusError::InvalidArchive {
            reason: zip_err.to_string(),
        },
        ExtractError::TooManyEntries { count, max } => DaedalusError::ArchiveLimit {
            reason: format!("{count} entries, limit is {max}"),
        },
        ExtractError::SizeLimitExceeded { max } => DaedalusError::ArchiveLimit {
            reason: format!("uncompressed size over {max} bytes"),
        },
    }
}

/// Maps parsing failures into the service taxonomy.
fn parse_error(err: ParseError) -> DaedalusError {
    DaedalusError::ParsingFailure {
        reason: err.to_string(),
    }
}

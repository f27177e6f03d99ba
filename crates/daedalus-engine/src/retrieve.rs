//! Artifact retrieval with the typed failure taxonomy.

use daedalus_core::{DaedalusError, DaedalusResult, ProjectId, ProjectState, ProjectStore};
use daedalus_parser::ParsingService;
use std::sync::Arc;

/// Resolves a project's lifecycle state and serves its diagram
/// artifacts, or a typed failure.
///
/// Retrieval distinguishes two misses deliberately:
///
/// - unknown identifier → [`DaedalusError::ProjectNotFound`] (the
///   caller's error, a 404 at the boundary);
/// - known project whose parsed representation is unset or no longer
///   resolvable → [`DaedalusError::ParsedComponentNotFound`] (an
///   internal inconsistency, a 500 at the boundary) — even when the
///   representation was legitimately deleted earlier.
///
/// Handle validity is re-checked against the parsing service at the
/// moment of use, never trusted from the record: a concurrent deletion
/// may race with retrieval, and the race resolves to a clean typed
/// failure rather than a stale dereference.
#[derive(Debug, Clone)]
pub struct ArtifactRetriever {
    store: Arc<ProjectStore>,
    parser: Arc<ParsingService>,
}

impl ArtifactRetriever {
    /// Creates a retriever over the shared store and parsing service.
    #[must_use]
    pub fn new(store: Arc<ProjectStore>, parser: Arc<ParsingService>) -> Self {
        Self { store, parser }
    }

    /// Returns the PlantUML text artifact for `id`.
    ///
    /// The returned string begins with `@startuml` and ends with
    /// `@enduml`. Repeated calls return byte-identical results.
    pub fn uml_text(&self, id: ProjectId) -> DaedalusResult<String> {
        let handle = self.resolve_handle(id)?;
        let text = self
            .parser
            .uml_text(handle)
            .ok_or(DaedalusError::ParsedComponentNotFound)?;
        self.promote(id);
        Ok(text)
    }

    /// Returns the SVG image artifact for `id` with its content type.
    ///
    /// The bytes, interpreted as text, still contain the
    /// `@startuml`/`@enduml` markers, since the renderer operates on
    /// the same textual description.
    pub fn uml_svg(&self, id: ProjectId) -> DaedalusResult<(Vec<u8>, &'static str)> {
        let handle = self.resolve_handle(id)?;
        let artifact = self
            .parser
            .uml_svg(handle)
            .ok_or(DaedalusError::ParsedComponentNotFound)?;
        self.promote(id);
        Ok(artifact)
    }

    /// Looks up the record and its handle reference.
    fn resolve_handle(&self, id: ProjectId) -> DaedalusResult<daedalus_core::HandleId> {
        let record = self
            .store
            .get(id)
            .ok_or(DaedalusError::ProjectNotFound { id })?;
        record
            .parsed_handle
            .ok_or(DaedalusError::ParsedComponentNotFound)
    }

    /// One-time `Parsed → ArtifactsReady` promotion on first successful
    /// artifact fetch. The project may transition out from under us
    /// concurrently; losing that race is fine and must not fail the
    /// retrieval that already has its artifact in hand.
    fn promote(&self, id: ProjectId) {
        let promotable = self
            .store
            .get(id)
            .is_some_and(|record| record.state == ProjectState::Parsed);
        if promotable {
            if let Err(err) = self.store.mark_artifacts_ready(id) {
                tracing::debug!(project_id = %id, error = %err, "artifacts-ready promotion lost a race");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IngestionPipeline;
    use bytes::Bytes;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    struct Fixture {
        store: Arc<ProjectStore>,
        parser: Arc<ParsingService>,
        pipeline: IngestionPipeline,
        retriever: ArtifactRetriever,
        _workspace: tempfile::TempDir,
    }

    fn fixture() -> Fixture {
        let workspace = tempfile::tempdir().unwrap();
        let store = Arc::new(ProjectStore::new());
        let parser = Arc::new(ParsingService::new());
        Fixture {
            pipeline: IngestionPipeline::new(
                Arc::clone(&store),
                Arc::clone(&parser),
                workspace.path().to_path_buf(),
            ),
            retriever: ArtifactRetriever::new(Arc::clone(&store), Arc::clone(&parser)),
            store,
            parser,
            _workspace: workspace,
        }
    }

    fn sample_archive() -> Bytes {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("Main.java", SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(b"public class Main implements Runnable {}")
            .unwrap();
        Bytes::from(writer.finish().unwrap().into_inner())
    }

    #[tokio::test]
    async fn both_artifacts_after_successful_ingestion() {
        let f = fixture();
        let record = f.pipeline.ingest("demo.zip", sample_archive()).await.unwrap();

        let text = f.retriever.uml_text(record.id).unwrap();
        assert!(text.starts_with("@startuml"));
        assert!(text.ends_with("@enduml"));

        let (bytes, content_type) = f.retriever.uml_svg(record.id).unwrap();
        assert_eq!(content_type, "image/svg+xml");
        let body = String::from_utf8(bytes).unwrap();
        assert!(body.contains("@startuml") && body.contains("@enduml"));
    }

    #[tokio::test]
    async fn first_fetch_promotes_to_artifacts_ready() {
        let f = fixture();
        let record = f.pipeline.ingest("demo.zip", sample_archive()).await.unwrap();
        assert_eq!(record.state, ProjectState::Parsed);

        f.retriever.uml_text(record.id).unwrap();
        assert_eq!(
            f.store.get(record.id).unwrap().state,
            ProjectState::ArtifactsReady
        );

        // Further fetches are pure reads.
        let a = f.retriever.uml_svg(record.id).unwrap();
        let b = f.retriever.uml_svg(record.id).unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn unknown_project_is_not_found_for_both_artifacts() {
        let f = fixture();
        let id = ProjectId::new();

        assert!(matches!(
            f.retriever.uml_text(id).unwrap_err(),
            DaedalusError::ProjectNotFound { .. }
        ));
        assert!(matches!(
            f.retriever.uml_svg(id).unwrap_err(),
            DaedalusError::ProjectNotFound { .. }
        ));
    }

    #[tokio::test]
    async fn deleted_parsed_component_is_a_server_side_failure() {
        let f = fixture();
        let record = f.pipeline.ingest("demo.zip", sample_archive()).await.unwrap();
        f.pipeline.delete_parsed(record.id).unwrap();

        assert!(matches!(
            f.retriever.uml_text(record.id).unwrap_err(),
            DaedalusError::ParsedComponentNotFound
        ));
        assert!(matches!(
            f.retriever.uml_svg(record.id).unwrap_err(),
            DaedalusError::ParsedComponentNotFound
        ));
    }

    #[tokio::test]
    async fn stale_handle_is_detected_at_use_time() {
        let f = fixture();
        let record = f.pipeline.ingest("demo.zip", sample_archive()).await.unwrap();

        // The parsing service drops its side without notifying the
        // store — the record still carries the handle reference.
        assert!(f.parser.discard(record.parsed_handle.unwrap()));
        assert_eq!(f.store.get(record.id).unwrap().state, ProjectState::Parsed);

        assert!(matches!(
            f.retriever.uml_text(record.id).unwrap_err(),
            DaedalusError::ParsedComponentNotFound
        ));
    }

    #[tokio::test]
    async fn never_parsed_project_is_a_server_side_failure() {
        let f = fixture();
        let record = f.store.create("stuck.zip");

        assert!(matches!(
            f.retriever.uml_text(record.id).unwrap_err(),
            DaedalusError::ParsedComponentNotFound
        ));
    }
}

//! The parsing service and its handle registry.

use crate::model::ParsedProject;
use crate::scanner::scan_tree;
use crate::{plantuml, svg};
use daedalus_core::{HandleId, ProjectId};
use dashmap::DashMap;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised while parsing an extracted tree.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The extracted tree contains no `.java` sources at all.
    #[error("no Java source files found in the extracted project")]
    NoSources,

    /// The tree could not be walked or a source file could not be read.
    #[error("failed to read extracted sources")]
    Io(#[from] io::Error),
}

/// Parses extracted project trees and serves diagram artifacts from the
/// resulting handles.
///
/// The service owns every [`ParsedProject`]; callers hold only a
/// [`HandleId`]. Handles can be [`discard`](Self::discard)ed at any
/// time, independently of whoever still references them — consumers are
/// expected to re-[`resolve`](Self::resolve) at the moment of use
/// rather than trust a cached reference.
///
/// Internally synchronized; share via `Arc`.
#[derive(Debug, Default)]
pub struct ParsingService {
    registry: DashMap<HandleId, ParsedProject>,
}

impl ParsingService {
    /// Creates an empty service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the extracted tree at `root` and registers the result.
    ///
    /// # Errors
    ///
    /// [`ParseError::NoSources`] when the tree holds no `.java` files;
    /// [`ParseError::Io`] when it cannot be read.
    pub fn parse(&self, project_id: ProjectId, root: &Path) -> Result<HandleId, ParseError> {
        let parsed = scan_tree(project_id, root)?;
        if parsed.source_files == 0 {
            return Err(ParseError::NoSources);
        }

        let handle = HandleId::new();
        tracing::info!(
            project_id = %project_id,
            handle = %handle,
            types = parsed.types.len(),
            relations = parsed.relations.len(),
            "project parsed"
        );
        self.registry.insert(handle, parsed);
        Ok(handle)
    }

    /// Returns `true` if `handle` still resolves to a parsed project.
    #[must_use]
    pub fn resolve(&self, handle: HandleId) -> bool {
        self.registry.contains_key(&handle)
    }

    /// Discards the parsed project behind `handle`, if present.
    ///
    /// Returns `true` if something was removed. Records elsewhere that
    /// still reference the handle become stale by design; their next
    /// resolution attempt fails cleanly.
    pub fn discard(&self, handle: HandleId) -> bool {
        let removed = self.registry.remove(&handle).is_some();
        if removed {
            tracing::info!(handle = %handle, "parsed project discarded");
        }
        removed
    }

    /// Number of live handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Returns `true` if no handles are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Generates the PlantUML text artifact for `handle`.
    ///
    /// Returns `None` when the handle no longer resolves.
    #[must_use]
    pub fn uml_text(&self, handle: HandleId) -> Option<String> {
        self.registry
            .get(&handle)
            .map(|parsed| plantuml::render(&parsed))
    }

    /// Generates the SVG image artifact for `handle`, with its content type.
    ///
    /// Returns `None` when the handle no longer resolves.
    #[must_use]
    pub fn uml_svg(&self, handle: HandleId) -> Option<(Vec<u8>, &'static str)> {
        self.registry
            .get(&handle)
            .map(|parsed| (svg::render(&parsed).into_bytes(), svg::CONTENT_TYPE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn extracted_tree(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, source) in files {
            let path = dir.path().join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, source).unwrap();
        }
        dir
    }

    #[test]
    fn parse_then_fetch_both_artifacts() {
        let tree = extracted_tree(&[
            ("Main.java", "public class Main extends Base {}"),
            ("Base.java", "public class Base {}"),
        ]);
        let service = ParsingService::new();

        let handle = service.parse(ProjectId::new(), tree.path()).unwrap();
        assert!(service.resolve(handle));

        let text = service.uml_text(handle).unwrap();
        assert!(text.starts_with("@startuml"));
        assert!(text.ends_with("@enduml"));
        assert!(text.contains("Main --|> Base"));

        let (bytes, content_type) = service.uml_svg(handle).unwrap();
        assert_eq!(content_type, "image/svg+xml");
        let body = String::from_utf8(bytes).unwrap();
        assert!(body.contains("@startuml"));
        assert!(body.contains("@enduml"));
    }

    #[test]
    fn artifacts_are_idempotent_across_calls() {
        let tree = extracted_tree(&[("A.java", "class A {}")]);
        let service = ParsingService::new();
        let handle = service.parse(ProjectId::new(), tree.path()).unwrap();

        assert_eq!(service.uml_text(handle), service.uml_text(handle));
        assert_eq!(service.uml_svg(handle), service.uml_svg(handle));
    }

    #[test]
    fn empty_tree_is_rejected() {
        let tree = extracted_tree(&[("notes.txt", "nothing here")]);
        let service = ParsingService::new();

        let err = service.parse(ProjectId::new(), tree.path()).unwrap_err();
        assert!(matches!(err, ParseError::NoSources));
        assert!(service.is_empty());
    }

    #[test]
    fn discarded_handle_stops_resolving() {
        let tree = extracted_tree(&[("A.java", "class A {}")]);
        let service = ParsingService::new();
        let handle = service.parse(ProjectId::new(), tree.path()).unwrap();

        assert!(service.discard(handle));
        assert!(!service.resolve(handle));
        assert!(service.uml_text(handle).is_none());
        assert!(service.uml_svg(handle).is_none());
        // A second discard is a clean no-op.
        assert!(!service.discard(handle));
    }
}

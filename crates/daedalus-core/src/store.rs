//! In-memory project store.
//!
//! [`ProjectStore`] is the single durable record of project metadata and
//! lifecycle state, addressable by [`ProjectId`]. It owns every
//! [`ProjectRecord`] exclusively; callers receive clones.
//!
//! Each mutation is one atomic state transition under the write lock —
//! no lock is ever held across I/O, and transitions validate the source
//! state so that lifecycle bugs surface as
//! [`DaedalusError::InvalidTransition`] instead of silent corruption.

use crate::{DaedalusError, DaedalusResult, FailureCause, HandleId, ProjectId, ProjectRecord, ProjectState};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;

/// Thread-safe registry of project records.
///
/// # Example
///
/// ```
/// use daedalus_core::{ProjectStore, ProjectState};
///
/// let store = ProjectStore::new();
/// let record = store.create("demo.zip");
/// assert_eq!(store.get(record.id).unwrap().state, ProjectState::Uploaded);
/// ```
#[derive(Debug, Default)]
pub struct ProjectStore {
    records: RwLock<HashMap<ProjectId, ProjectRecord>>,
}

impl ProjectStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a record in the `Uploaded` state and returns a clone of it.
    pub fn create(&self, name: impl Into<String>) -> ProjectRecord {
        let record = ProjectRecord::new(name);
        let clone = record.clone();
        self.records.write().insert(record.id, record);
        tracing::debug!(project_id = %clone.id, name = %clone.name, "project record created");
        clone
    }

    /// Returns a clone of the record for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProjectId) -> Option<ProjectRecord> {
        self.records.read().get(&id).cloned()
    }

    /// Returns the number of records in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Returns all known project identifiers.
    #[must_use]
    pub fn project_ids(&self) -> Vec<ProjectId> {
        self.records.read().keys().copied().collect()
    }

    /// Removes the record for `id` entirely, returning it if present.
    pub fn remove(&self, id: ProjectId) -> Option<ProjectRecord> {
        self.records.write().remove(&id)
    }

    /// Transition `Uploaded -> Extracted`, persisting the extracted path.
    pub fn mark_extracted(&self, id: ProjectId, path: PathBuf) -> DaedalusResult<ProjectRecord> {
        self.transition(id, "EXTRACTED", |record| {
            if record.state != ProjectState::Uploaded {
                return Err(record.state.name());
            }
            record.state = ProjectState::Extracted;
            record.extracted_path = Some(path.clone());
            Ok(())
        })
    }

    /// Transition `Extracted -> Parsed`, persisting the handle reference.
    pub fn mark_parsed(&self, id: ProjectId, handle: HandleId) -> DaedalusResult<ProjectRecord> {
        self.transition(id, "PARSED", |record| {
            if record.state != ProjectState::Extracted {
                return Err(record.state.name());
            }
            record.state = ProjectState::Parsed;
            record.parsed_handle = Some(handle);
            Ok(())
        })
    }

    /// Transition `Parsed -> ArtifactsReady`.
    ///
    /// A no-op when the record is already `ArtifactsReady`, so repeated
    /// artifact retrieval stays side-effect free after the first promotion.
    pub fn mark_artifacts_ready(&self, id: ProjectId) -> DaedalusResult<ProjectRecord> {
        self.transition(id, "ARTIFACTS_READY", |record| {
            match record.state {
                ProjectState::Parsed => {
                    record.state = ProjectState::ArtifactsReady;
                    Ok(())
                }
                ProjectState::ArtifactsReady => Ok(()),
                _ => Err(record.state.name()),
            }
        })
    }

    /// Transition any non-terminal state to `Failed`, recording the cause.
    pub fn mark_failed(
        &self,
        id: ProjectId,
        cause: FailureCause,
    ) -> DaedalusResult<ProjectRecord> {
        self.transition(id, "FAILED", |record| {
            if record.state.is_terminal() {
                return Err(record.state.name());
            }
            record.state = ProjectState::Failed { cause };
            record.extracted_path = None;
            record.parsed_handle = None;
            Ok(())
        })
    }

    /// Transition any state to `Deleted`, clearing the filesystem and
    /// parser back-references. The record itself stays queryable.
    pub fn mark_deleted(&self, id: ProjectId) -> DaedalusResult<ProjectRecord> {
        self.transition(id, "DELETED", |record| {
            record.state = ProjectState::Deleted;
            record.extracted_path = None;
            record.parsed_handle = None;
            Ok(())
        })
    }

    /// Applies `f` to the record under the write lock as one atomic
    /// transition. `f` returns the current state name on refusal.
    fn transition(
        &self,
        id: ProjectId,
        to: &'static str,
        f: impl FnOnce(&mut ProjectRecord) -> Result<(), &'static str>,
    ) -> DaedalusResult<ProjectRecord> {
        let mut records = self.records.write();
        let record = records
            .get_mut(&id)
            .ok_or(DaedalusError::ProjectNotFound { id })?;

        match f(record) {
            Ok(()) => {
                tracing::debug!(project_id = %id, state = to, "project state transition");
                Ok(record.clone())
            }
            Err(from) => Err(DaedalusError::InvalidTransition { from, to }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let store = ProjectStore::new();
        let record = store.create("demo.zip");
        let id = record.id;

        let record = store.mark_extracted(id, PathBuf::from("/tmp/demo")).unwrap();
        assert_eq!(record.state, ProjectState::Extracted);
        assert_eq!(record.extracted_path, Some(PathBuf::from("/tmp/demo")));

        let handle = HandleId::new();
        let record = store.mark_parsed(id, handle).unwrap();
        assert_eq!(record.state, ProjectState::Parsed);
        assert_eq!(record.parsed_handle, Some(handle));

        let record = store.mark_artifacts_ready(id).unwrap();
        assert_eq!(record.state, ProjectState::ArtifactsReady);
        assert!(record.extracted_path.is_some());
    }

    #[test]
    fn artifacts_ready_is_idempotent() {
        let store = ProjectStore::new();
        let id = store.create("demo.zip").id;
        store.mark_extracted(id, PathBuf::from("/tmp/x")).unwrap();
        store.mark_parsed(id, HandleId::new()).unwrap();
        store.mark_artifacts_ready(id).unwrap();
        let record = store.mark_artifacts_ready(id).unwrap();
        assert_eq!(record.state, ProjectState::ArtifactsReady);
    }

    #[test]
    fn cannot_parse_before_extract() {
        let store = ProjectStore::new();
        let id = store.create("demo.zip").id;
        let err = store.mark_parsed(id, HandleId::new()).unwrap_err();
        assert!(matches!(
            err,
            DaedalusError::InvalidTransition { from: "UPLOADED", to: "PARSED" }
        ));
    }

    #[test]
    fn failed_records_cause_and_clears_footprint() {
        let store = ProjectStore::new();
        let id = store.create("demo.zip").id;
        store.mark_extracted(id, PathBuf::from("/tmp/x")).unwrap();
        let record = store
            .mark_failed(id, FailureCause::new("parse exploded"))
            .unwrap();
        assert!(record.state.is_terminal());
        assert!(record.extracted_path.is_none());
        match record.state {
            ProjectState::Failed { cause } => assert_eq!(cause.message(), "parse exploded"),
            other => panic!("expected FAILED, got {other:?}"),
        }
    }

    #[test]
    fn deleted_record_stays_queryable() {
        let store = ProjectStore::new();
        let id = store.create("demo.zip").id;
        store.mark_extracted(id, PathBuf::from("/tmp/x")).unwrap();
        store.mark_parsed(id, HandleId::new()).unwrap();

        let record = store.mark_deleted(id).unwrap();
        assert_eq!(record.state, ProjectState::Deleted);
        assert!(record.parsed_handle.is_none());
        assert!(record.extracted_path.is_none());
        assert!(store.get(id).is_some());
    }

    #[test]
    fn unknown_id_is_project_not_found() {
        let store = ProjectStore::new();
        let err = store.mark_deleted(ProjectId::new()).unwrap_err();
        assert!(matches!(err, DaedalusError::ProjectNotFound { .. }));
    }
}

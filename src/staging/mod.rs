//! Temporary and permanent store lifecycle.
//!
//! Exactly one store is active at a time:
//!
//! - **Temporary**: a scratch store in a process-scoped directory, used
//!   before the user has named a project.
//! - **Working copy**: while a project is bound, the active store is a
//!   copy of its `project-store` file in the same scratch directory.
//!
//! The permanent `project-store` file only ever changes through
//! [`StagingManager::promote`], which snapshots the active store into a
//! sibling temp file and renames it into place.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::project::PLACEHOLDER_NAME;
use crate::model::Project;
use crate::storage::SqliteStorage;
use crate::sync::file::{commit_temp, temp_path_for};

/// Lifecycle state of the active store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreState {
    NoActiveStore,
    TemporaryActive,
    PermanentActive,
}

impl StoreState {
    /// Human-readable description, used in transition errors.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::NoActiveStore => "no store is active",
            Self::TemporaryActive => "a temporary store is active",
            Self::PermanentActive => "a project is open",
        }
    }
}

/// Result of a successful promotion.
#[derive(Debug, Clone, Serialize)]
pub struct PromoteReport {
    pub store_path: PathBuf,
    pub project: String,
    pub entries: usize,
    pub promoted_at: DateTime<Utc>,
}

#[derive(Debug)]
enum StoreKind {
    Temporary,
    Working { permanent: PathBuf },
}

#[derive(Debug)]
struct ActiveStore {
    storage: SqliteStorage,
    kind: StoreKind,
    file: PathBuf,
}

/// Owns the active store and the scratch directory it lives in.
#[derive(Debug)]
pub struct StagingManager {
    temp_root: PathBuf,
    workdir: Option<PathBuf>,
    active: Option<ActiveStore>,
    /// Abort promotion after this many backup steps (fault injection).
    fail_promote_after: Option<usize>,
}

impl StagingManager {
    /// Create a manager whose scratch directory will live under `temp_root`.
    #[must_use]
    pub fn new(temp_root: PathBuf) -> Self {
        Self {
            temp_root,
            workdir: None,
            active: None,
            fail_promote_after: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> StoreState {
        match &self.active {
            None => StoreState::NoActiveStore,
            Some(ActiveStore { kind: StoreKind::Temporary, .. }) => StoreState::TemporaryActive,
            Some(ActiveStore { kind: StoreKind::Working { .. }, .. }) => StoreState::PermanentActive,
        }
    }

    /// The active store.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActiveStore` if nothing is active.
    pub fn storage(&self) -> Result<&SqliteStorage> {
        self.active
            .as_ref()
            .map(|a| &a.storage)
            .ok_or(Error::NoActiveStore)
    }

    /// The active store, mutably.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActiveStore` if nothing is active.
    pub fn storage_mut(&mut self) -> Result<&mut SqliteStorage> {
        self.active
            .as_mut()
            .map(|a| &mut a.storage)
            .ok_or(Error::NoActiveStore)
    }

    /// The project row of the active store (a placeholder for temporary stores).
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActiveStore` if nothing is active.
    pub fn project(&self) -> Result<Project> {
        let storage = self.storage()?;
        storage.first_project()?.ok_or_else(|| Error::InvalidProjectStore {
            path: storage.path().map(Path::to_path_buf).unwrap_or_default(),
            reason: "no project row".to_string(),
        })
    }

    /// Permanent store the working copy promotes into, if a project is bound.
    #[must_use]
    pub fn permanent_path(&self) -> Option<&Path> {
        match &self.active {
            Some(ActiveStore { kind: StoreKind::Working { permanent }, .. }) => Some(permanent.as_path()),
            _ => None,
        }
    }

    /// Scratch directory, once created.
    #[must_use]
    pub fn workdir(&self) -> Option<&Path> {
        self.workdir.as_deref()
    }

    /// Whether the active store has changes that were not promoted.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.storage.is_dirty())
    }

    /// Create an empty temporary store holding a placeholder project.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTransition` unless no store is active.
    pub fn start_temporary(&mut self) -> Result<()> {
        let state = self.state();
        if state != StoreState::NoActiveStore {
            return Err(Error::InvalidTransition {
                op: "start a temporary store",
                state: state.describe(),
            });
        }

        let file = self.new_store_file("staging")?;
        let mut storage = SqliteStorage::open(&file)?;
        storage.create_project(PLACEHOLDER_NAME, "")?;
        storage.mark_clean();

        tracing::info!(path = %file.display(), "Started temporary store");
        self.active = Some(ActiveStore {
            storage,
            kind: StoreKind::Temporary,
            file,
        });
        Ok(())
    }

    /// Create a project in `folder` and bind the active store to it.
    ///
    /// The folder is created if needed and must not already hold a
    /// `project-store`. A temporary store keeps all its entries: it is
    /// renamed to the project and promoted whole. With no active store an
    /// empty project is created.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidTransition` if a project is already open,
    /// `Error::ProjectExists` if the folder already has a store, or the
    /// promotion error if the first promotion fails.
    pub fn create_project(&mut self, folder: &Path) -> Result<Project> {
        let state = self.state();
        if state == StoreState::PermanentActive {
            return Err(Error::InvalidTransition {
                op: "create a project",
                state: state.describe(),
            });
        }

        let store_path = Project::store_path_for(folder);
        if store_path.exists() {
            return Err(Error::ProjectExists { path: store_path });
        }
        fs::create_dir_all(folder)?;

        let started_here = state == StoreState::NoActiveStore;
        if started_here {
            self.start_temporary()?;
        }

        let name = folder
            .file_name()
            .map_or_else(|| folder.display().to_string(), |n| n.to_string_lossy().into_owned());
        let folder_path = folder.to_string_lossy().into_owned();

        let result = self.bind_temporary(&name, &folder_path, &store_path);
        if result.is_err() && started_here {
            self.discard_temporary();
        }
        result
    }

    fn bind_temporary(&mut self, name: &str, folder_path: &str, store_path: &Path) -> Result<Project> {
        let fail_after = self.fail_promote_after;
        let active = self.active.as_mut().ok_or(Error::NoActiveStore)?;

        let placeholder = active.storage.first_project()?.ok_or_else(|| Error::InvalidProjectStore {
            path: active.file.clone(),
            reason: "no project row".to_string(),
        })?;
        active.storage.rename_project(placeholder.id, name, folder_path)?;

        if let Err(e) = promote_into(&active.storage, store_path, fail_after) {
            if let Err(revert) =
                active
                    .storage
                    .rename_project(placeholder.id, &placeholder.name, &placeholder.folder_path)
            {
                tracing::warn!(error = %revert, "Could not restore placeholder project");
            }
            return Err(e);
        }

        active.storage.mark_clean();
        active.kind = StoreKind::Working {
            permanent: store_path.to_path_buf(),
        };
        tracing::info!(project = name, store = %store_path.display(), "Created project");

        active.storage.first_project()?.ok_or(Error::NoProjectBound)
    }

    /// Open an existing project store and make a working copy of it active.
    ///
    /// The store is validated before anything changes. On failure the
    /// current state is left as it was. On success any previous store
    /// (temporary or working copy) is discarded.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreUnavailable` if the file is missing, unreadable
    /// or lacks a table, and `Error::InvalidProjectStore` if it has no project.
    pub fn open_project(&mut self, store_path: &Path) -> Result<Project> {
        let source = SqliteStorage::open_existing(store_path)?;
        let project = source.first_project()?.ok_or_else(|| Error::InvalidProjectStore {
            path: store_path.to_path_buf(),
            reason: "no project row".to_string(),
        })?;

        let file = self.new_store_file("working")?;
        if let Err(e) = source.backup_to(&file) {
            let _ = fs::remove_file(&file);
            return Err(Error::StoreUnavailable {
                path: store_path.to_path_buf(),
                reason: e.to_string(),
            });
        }
        drop(source);

        let storage = SqliteStorage::open(&file)?;
        let previous = self.active.replace(ActiveStore {
            storage,
            kind: StoreKind::Working {
                permanent: store_path.to_path_buf(),
            },
            file,
        });
        if let Some(previous) = previous {
            dispose(previous);
        }

        tracing::info!(project = %project.name, store = %store_path.display(), "Opened project");
        Ok(project)
    }

    /// Write the active store over the bound project's permanent store.
    ///
    /// The store is copied with the SQLite online-backup API into
    /// `project-store.tmp`, synced, and renamed over `project-store`.
    /// If anything fails the permanent file is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoProjectBound` if no project is bound, or the
    /// copy/rename error.
    pub fn promote(&mut self) -> Result<PromoteReport> {
        let fail_after = self.fail_promote_after;
        let Some(active) = self.active.as_mut() else {
            return Err(Error::NoProjectBound);
        };
        let StoreKind::Working { permanent } = &active.kind else {
            return Err(Error::NoProjectBound);
        };
        let permanent = permanent.clone();

        promote_into(&active.storage, &permanent, fail_after)?;
        active.storage.mark_clean();

        let project = active.storage.first_project()?.ok_or(Error::NoProjectBound)?;
        let entries = active.storage.get_project_counts(project.id)?.entries;

        tracing::info!(project = %project.name, entries, store = %permanent.display(), "Promoted store");
        Ok(PromoteReport {
            store_path: permanent,
            project: project.name,
            entries,
            promoted_at: Utc::now(),
        })
    }

    /// Drop the active store and delete the scratch directory.
    ///
    /// Unpromoted changes are lost. Called on clean shutdown and on drop.
    pub fn discard_temporary(&mut self) {
        if let Some(active) = self.active.take() {
            dispose(active);
        }
        if let Some(dir) = self.workdir.take() {
            if let Err(e) = fs::remove_dir_all(&dir) {
                tracing::debug!(dir = %dir.display(), error = %e, "Could not remove scratch directory");
            }
        }
    }

    /// Make the next promotion fail after `steps` backup steps.
    #[cfg(test)]
    pub(crate) fn fail_promote_after_steps(&mut self, steps: usize) {
        self.fail_promote_after = Some(steps);
    }

    /// A fresh store file path in the scratch directory.
    fn new_store_file(&mut self, prefix: &str) -> Result<PathBuf> {
        let dir = match &self.workdir {
            Some(dir) => dir.clone(),
            None => {
                let dir = self.temp_root.join(format!(
                    "itx-{}-{}",
                    std::process::id(),
                    &uuid::Uuid::new_v4().simple().to_string()[..8]
                ));
                fs::create_dir_all(&dir).map_err(|e| Error::StoreUnavailable {
                    path: dir.clone(),
                    reason: e.to_string(),
                })?;
                tracing::debug!(dir = %dir.display(), "Created scratch directory");
                self.workdir = Some(dir.clone());
                dir
            }
        };
        let id = uuid::Uuid::new_v4().simple().to_string();
        Ok(dir.join(format!("{prefix}-{}.db", &id[..8])))
    }
}

impl Drop for StagingManager {
    fn drop(&mut self) {
        self.discard_temporary();
    }
}

fn dispose(active: ActiveStore) {
    if active.storage.is_dirty() {
        tracing::warn!(path = %active.file.display(), "Discarding store with unpromoted changes");
    }
    let ActiveStore { storage, file, .. } = active;
    drop(storage);
    if let Err(e) = fs::remove_file(&file) {
        tracing::debug!(path = %file.display(), error = %e, "Could not remove store file");
    }
}

/// Snapshot `storage` into `dest` via a sibling temp file.
fn promote_into(storage: &SqliteStorage, dest: &Path, fail_after: Option<usize>) -> Result<()> {
    let tmp = temp_path_for(dest);
    if tmp.exists() {
        fs::remove_file(&tmp)?;
    }

    let copied = storage.backup_to_with(&tmp, |progress| {
        if fail_after.is_some_and(|n| progress.step >= n) {
            return Err(Error::Other(format!(
                "promotion interrupted after {} backup steps",
                progress.step
            )));
        }
        Ok(())
    });

    if let Err(e) = copied {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }

    commit_temp(&tmp, dest)
}

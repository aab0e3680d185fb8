//! Storage layer for the ttg time tracker.
//!
//! Persists the project registry, pending entries and the history log as
//! plain JSON files.
//!
//! # Layout
//!
//! - `<data_dir>/projects.json`: JSON array of registered project names
//! - `<data_dir>/history.json`: JSON array of completed entries, append-only
//! - `<state_dir>/<project>.json`: one pending entry per running project
//! - `<state_dir>/.lock`: advisory lock file held by mutating commands
//!
//! # Consistency
//!
//! Every write goes to a sibling `.tmp` file that is then renamed over the
//! target, so readers never observe a partially written file. Stopping a
//! session writes history before deleting the pending entry: a crash between
//! the two leaves the entry both archived and pending, never lost.
//!
//! Missing files read as empty. Corrupt files are reported as
//! [`StoreError::Serialization`].

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use ttg_core::session::{self, OngoingSession, StopMode};
use ttg_core::{
    ProjectListing, ProjectRegistry, SessionError, TimeEntry, ValidationError, build_listing,
    validate_project_name,
};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A user-supplied value was rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// A session transition was not allowed.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// A filesystem operation failed.
    #[error("failed to {action} {}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A file held invalid JSON, or a value could not be encoded.
    #[error("invalid JSON in {}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The advisory lock could not be taken.
    #[error("failed to lock {}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }
}

type Result<T, E = StoreError> = std::result::Result<T, E>;

const REGISTRY_FILE: &str = "projects.json";
const HISTORY_FILE: &str = "history.json";
const LOCK_FILE: &str = ".lock";
const PENDING_EXTENSION: &str = "json";

/// Directory layout of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Holds the registry and the history log.
    pub data_dir: PathBuf,
    /// Holds one file per pending entry.
    pub state_dir: PathBuf,
}

impl Layout {
    pub fn new(data_dir: impl Into<PathBuf>, state_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            state_dir: state_dir.into(),
        }
    }

    pub fn registry_path(&self) -> PathBuf {
        self.data_dir.join(REGISTRY_FILE)
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.state_dir.join(LOCK_FILE)
    }

    /// Path of the pending entry file for `project`.
    pub fn pending_path(&self, project: &str) -> Result<PathBuf, ValidationError> {
        validate_project_name(project)?;
        Ok(self
            .state_dir
            .join(format!("{project}.{PENDING_EXTENSION}")))
    }
}

/// Exclusive advisory lock on the store.
///
/// Released when dropped.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(error = %e, "failed to release store lock");
        }
    }
}

/// Result of starting a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    /// The new pending entry.
    pub entry: TimeEntry,
    /// A pending entry for the same project that was overwritten.
    pub replaced: Option<TimeEntry>,
}

/// JSON file store.
///
/// Holds no cached state: every call reads the files it needs.
#[derive(Debug, Clone)]
pub struct Store {
    layout: Layout,
}

impl Store {
    pub const fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Takes the exclusive store lock, blocking until it is available.
    pub fn lock(&self) -> Result<StoreLock> {
        let path = self.layout.lock_path();
        create_parent(&path)?;
        let file = File::create(&path).map_err(|e| StoreError::io("create", &path, e))?;
        file.lock_exclusive()
            .map_err(|source| StoreError::Lock {
                path: path.clone(),
                source,
            })?;
        tracing::debug!(path = %path.display(), "acquired store lock");
        Ok(StoreLock { file })
    }

    // ========== Registry ==========

    /// Loads the registry. A missing file is an empty registry.
    pub fn registry(&self) -> Result<ProjectRegistry> {
        Ok(read_json(&self.layout.registry_path())?.unwrap_or_default())
    }

    pub fn save_registry(&self, registry: &ProjectRegistry) -> Result<()> {
        write_json_atomic(&self.layout.registry_path(), registry)
    }

    /// Registers a new project and persists the registry.
    pub fn add_project(&self, name: &str) -> Result<ProjectRegistry> {
        let mut registry = self.registry()?;
        registry.add(name)?;
        self.save_registry(&registry)?;
        tracing::debug!(project = name, "registered project");
        Ok(registry)
    }

    /// Removes a project and persists the registry.
    ///
    /// History and pending entries for the project are left untouched.
    pub fn remove_project(&self, name: &str) -> Result<ProjectRegistry> {
        let mut registry = self.registry()?;
        registry.remove(name)?;
        self.save_registry(&registry)?;
        tracing::debug!(project = name, "removed project");
        Ok(registry)
    }

    // ========== Pending Entries ==========

    /// Reads the pending entry for `project`, if any.
    pub fn pending(&self, project: &str) -> Result<Option<TimeEntry>> {
        let path = self.layout.pending_path(project)?;
        read_json(&path)
    }

    /// Lists the pending entry files in the state directory as
    /// `(project, path)` pairs, sorted by project.
    ///
    /// The project is taken from the file name. Dotfiles, foreign extensions
    /// and leftover `.tmp` files are ignored.
    fn pending_files(&self) -> Result<Vec<(String, PathBuf)>> {
        let dir = &self.layout.state_dir;
        let read_dir = match fs::read_dir(dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io("read directory", dir, e)),
        };

        let mut files = Vec::new();
        for dir_entry in read_dir {
            let dir_entry = dir_entry.map_err(|e| StoreError::io("read directory", dir, e))?;
            let path = dir_entry.path();
            if path.extension().is_some_and(|ext| ext == "tmp") {
                tracing::warn!(file = %path.display(), "ignoring stale temp file");
                continue;
            }
            if !path.is_file() || path.extension().is_none_or(|ext| ext != PENDING_EXTENSION) {
                continue;
            }
            let Some(project) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if project.starts_with('.') {
                continue;
            }
            files.push((project.to_string(), path));
        }

        files.sort();
        Ok(files)
    }

    /// Names of every project with a pending entry file, readable or not.
    pub fn pending_projects(&self) -> Result<Vec<String>> {
        Ok(self
            .pending_files()?
            .into_iter()
            .map(|(project, _)| project)
            .collect())
    }

    /// Reads every pending entry in the state directory.
    ///
    /// Unreadable or corrupt files are skipped with a warning so one bad file
    /// does not hide the others.
    pub fn pending_entries(&self) -> Result<Vec<TimeEntry>> {
        let mut entries = Vec::new();
        for (project, path) in self.pending_files()? {
            match read_json::<TimeEntry>(&path) {
                Ok(Some(mut entry)) => {
                    if entry.project != project {
                        tracing::warn!(
                            file = %path.display(),
                            recorded = %entry.project,
                            "pending entry project differs from file name"
                        );
                        entry.project = project;
                    }
                    entries.push(entry);
                }
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "skipping unreadable pending entry"),
            }
        }
        Ok(entries)
    }

    fn put_pending(&self, entry: &TimeEntry) -> Result<()> {
        let path = self.layout.pending_path(&entry.project)?;
        write_json_atomic(&path, entry)
    }

    fn remove_pending(&self, project: &str) -> Result<()> {
        let path = self.layout.pending_path(project)?;
        fs::remove_file(&path).map_err(|e| StoreError::io("remove", &path, e))?;
        tracing::debug!(path = %path.display(), "removed pending entry");
        Ok(())
    }

    // ========== History ==========

    /// Reads the full history log. A missing file is an empty history.
    pub fn history(&self) -> Result<Vec<TimeEntry>> {
        Ok(read_json(&self.layout.history_path())?.unwrap_or_default())
    }

    fn append_history(&self, entry: &TimeEntry) -> Result<()> {
        let path = self.layout.history_path();
        let mut history: Vec<TimeEntry> = read_json(&path)?.unwrap_or_default();
        history.push(entry.clone());
        write_json_atomic(&path, &history)?;
        tracing::debug!(entries = history.len(), "appended to history");
        Ok(())
    }

    // ========== Session Lifecycle ==========

    /// Starts tracking `project` at `now`.
    ///
    /// The project must be registered or be the catch-all. A pending entry
    /// already running for the project is overwritten and returned in
    /// [`StartOutcome::replaced`].
    pub fn start(&self, project: &str, now: DateTime<Utc>) -> Result<StartOutcome> {
        validate_project_name(project)?;
        self.registry()?.validate(project)?;

        let replaced = self.pending(project)?;
        if let Some(previous) = &replaced {
            tracing::warn!(
                project,
                started = %previous.start_time,
                "overwriting running session"
            );
        }

        let entry = session::begin(project, now);
        self.put_pending(&entry)?;
        tracing::debug!(project, start = %now, "started session");

        Ok(StartOutcome { entry, replaced })
    }

    /// Stops the pending session for `project` at `now`.
    ///
    /// In [`StopMode::Archive`] the completed entry is appended to history
    /// before the pending file is removed. In [`StopMode::Discard`] the
    /// pending file is removed and history is not touched.
    pub fn stop(&self, project: &str, mode: StopMode, now: DateTime<Utc>) -> Result<TimeEntry> {
        let Some(pending) = self.pending(project)? else {
            return Err(SessionError::NoOngoingSession {
                project: project.to_string(),
            }
            .into());
        };

        match mode {
            StopMode::Discard => {
                self.remove_pending(project)?;
                tracing::debug!(project, "discarded session");
                Ok(TimeEntry {
                    end_time: Some(now.max(pending.start_time)),
                    ..pending
                })
            }
            StopMode::Archive => {
                let completed = session::finish(pending, now)?;
                self.append_history(&completed)?;
                self.remove_pending(project)?;
                tracing::debug!(project, end = %now, "archived session");
                Ok(completed)
            }
        }
    }

    /// Lists pending sessions with elapsed time measured at `now`.
    pub fn status(&self, now: DateTime<Utc>) -> Result<Vec<OngoingSession>> {
        let pending = self.pending_entries()?;
        Ok(session::ongoing_sessions(&pending, now))
    }

    /// Builds the project listing from history, pending files and registry.
    ///
    /// A pending file counts as a running session even when its body does
    /// not parse.
    pub fn listing(&self) -> Result<Vec<ProjectListing>> {
        let history = self.history()?;
        let pending = self.pending_projects()?;
        let registry = self.registry()?;
        Ok(build_listing(&history, &pending, &registry))
    }
}

// ========== File Helpers ==========

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StoreError::io("create directory", parent, e))?;
    }
    Ok(())
}

/// Reads and parses a JSON file. Missing or blank files read as `None`.
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StoreError::io("read", path, e)),
    };
    if content.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StoreError::Serialization {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes `value` as JSON via a temp file and rename.
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    create_parent(path)?;

    let content = serde_json::to_string_pretty(value).map_err(|source| StoreError::Serialization {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, content).map_err(|e| StoreError::io("write", &tmp_path, e))?;

    if let Err(e) = fs::rename(&tmp_path, path) {
        // Clean up temp file
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::io("rename", &tmp_path, e));
    }

    tracing::debug!(path = %path.display(), "wrote file");
    Ok(())
}

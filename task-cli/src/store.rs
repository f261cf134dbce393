use crate::error::{Result, StoreError};
use crate::task::{Status, Task};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub const DEFAULT_TASK_FILE: &str = "tasks.json";

/// How [`TaskStore::add`] picks the id of a new task.
#[derive(Debug, Default, Eq, PartialEq, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Number of tasks plus one. After a deletion this can hand out an id
    /// that is still in use; files written by earlier versions rely on it.
    #[default]
    Count,
    /// Largest existing id plus one. Never collides with a live task.
    Max,
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct StoreOptions {
    pub id_strategy: IdStrategy,
    /// Indent the file with four spaces instead of writing it on one line.
    pub pretty: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::default(),
            pretty: true,
        }
    }
}

/// Owns the JSON task file and the tasks loaded from it.
///
/// Every mutation rewrites the whole file before returning. Nothing guards
/// against another process writing the same file; the last save wins.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    options: StoreOptions,
}

impl TaskStore {
    /// Opens the store at `path` with default options, creating an empty
    /// task file first if none exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open_with(path, StoreOptions::default())
    }

    pub fn open_with(path: impl Into<PathBuf>, options: StoreOptions) -> Result<Self> {
        let mut store = Self {
            path: path.into(),
            tasks: Vec::new(),
            options,
        };
        let exists = store
            .path
            .try_exists()
            .map_err(|e| StoreError::io(&store.path, e))?;
        if !exists {
            info!(path = %store.path.display(), "creating empty task file");
            store.create_empty_file()?;
        }
        store.load()?;
        Ok(store)
    }

    /// Replaces the in-memory tasks with the contents of the file.
    ///
    /// On failure the previously loaded tasks are left untouched.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&mut self) -> Result<()> {
        let contents = fs::read(&self.path).map_err(|e| StoreError::io(&self.path, e))?;
        self.tasks = parse_tasks(&contents).map_err(|e| StoreError::corrupt(&self.path, e))?;
        debug!(count = self.tasks.len(), "loaded tasks");
        Ok(())
    }

    /// Writes every task back to the file.
    ///
    /// The collection is written to a temporary file next to the target
    /// and renamed over it, so a failed save leaves the old file intact.
    #[tracing::instrument(skip(self), fields(path = %self.path.display()))]
    pub fn save(&self) -> Result<()> {
        let mut buffer = Vec::new();
        self.write_json(&mut buffer)
            .map_err(|e| StoreError::io(&self.path, e.into()))?;
        self.replace_file(&buffer)?;
        debug!(count = self.tasks.len(), "saved tasks");
        Ok(())
    }

    /// Serializes the tasks as a JSON array.
    pub fn write_json(&self, writer: impl Write) -> serde_json::Result<()> {
        if self.options.pretty {
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
            self.tasks.serialize(&mut serializer)
        } else {
            serde_json::to_writer(writer, &self.tasks)
        }
    }

    /// Adds a `todo` task and returns its id.
    #[tracing::instrument(skip(self))]
    pub fn add(&mut self, description: &str) -> Result<u32> {
        let description = validate_description(description)?;
        let id = self.next_id()?;
        self.tasks.push(Task::new(id, description, Utc::now()));
        self.save()?;
        info!(id, "added task");
        Ok(id)
    }

    /// Replaces the description of task `id`. Returns `None` if there is
    /// no such task, in which case nothing is written.
    #[tracing::instrument(skip(self))]
    pub fn update(&mut self, id: u32, description: &str) -> Result<Option<&Task>> {
        let description = validate_description(description)?;
        let Some(index) = self.position(id) else {
            debug!(id, "task not found");
            return Ok(None);
        };
        self.tasks[index].set_description(description, Utc::now());
        self.save()?;
        info!(id, "updated task");
        Ok(self.tasks.get(index))
    }

    /// Removes task `id` and returns it, or `None` if there is no such task.
    #[tracing::instrument(skip(self))]
    pub fn delete(&mut self, id: u32) -> Result<Option<Task>> {
        let Some(index) = self.position(id) else {
            debug!(id, "task not found");
            return Ok(None);
        };
        let removed = self.tasks.remove(index);
        self.save()?;
        info!(id, "deleted task");
        Ok(Some(removed))
    }

    /// Moves task `id` to `status`. Any status can follow any other.
    #[tracing::instrument(skip(self))]
    pub fn mark_status(&mut self, id: u32, status: Status) -> Result<Option<&Task>> {
        let Some(index) = self.position(id) else {
            debug!(id, "task not found");
            return Ok(None);
        };
        self.tasks[index].set_status(status, Utc::now());
        self.save()?;
        info!(id, %status, "marked task");
        Ok(self.tasks.get(index))
    }

    /// Tasks in insertion order, optionally only those with `filter` status.
    ///
    /// Reads the loaded tasks only; the file is not touched. Clone the
    /// iterator to walk the same selection again.
    pub fn list(&self, filter: Option<Status>) -> impl Iterator<Item = &Task> + Clone + '_ {
        self.tasks
            .iter()
            .filter(move |task| filter.is_none_or(|status| task.status() == status))
    }

    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // First match wins when ids repeat.
    fn position(&self, id: u32) -> Option<usize> {
        self.tasks.iter().position(|task| task.id() == id)
    }

    fn next_id(&self) -> Result<u32> {
        let base = match self.options.id_strategy {
            IdStrategy::Count => u32::try_from(self.tasks.len()).ok(),
            IdStrategy::Max => Some(self.tasks.iter().map(Task::id).max().unwrap_or(0)),
        };
        base.and_then(|n| n.checked_add(1))
            .ok_or_else(|| StoreError::Validation("no task ids left to assign".to_string()))
    }

    // A plain create so the new file gets the usual umask permissions;
    // later saves copy them onto the staged file.
    fn create_empty_file(&self) -> Result<()> {
        let io_err = |e: std::io::Error| StoreError::io(&self.path, e);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(io_err)?;
        file.write_all(b"[]").map_err(io_err)?;
        file.sync_all().map_err(io_err)
    }

    fn replace_file(&self, contents: &[u8]) -> Result<()> {
        let io_err = |e: std::io::Error| StoreError::io(&self.path, e);
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut staged = NamedTempFile::new_in(dir).map_err(io_err)?;
        if let Ok(metadata) = fs::metadata(&self.path) {
            staged
                .as_file()
                .set_permissions(metadata.permissions())
                .map_err(io_err)?;
        }
        staged.write_all(contents).map_err(io_err)?;
        staged.as_file().sync_all().map_err(io_err)?;
        staged
            .persist(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.error))?;
        Ok(())
    }
}

fn parse_tasks(json: &[u8]) -> serde_json::Result<Vec<Task>> {
    serde_json::from_slice(json)
}

fn validate_description(description: &str) -> Result<String> {
    if description.trim().is_empty() {
        return Err(StoreError::Validation(
            "task description must not be empty".to_string(),
        ));
    }
    Ok(description.to_string())
}

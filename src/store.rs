use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::TodoError;
use crate::task::Task;

/// On-disk shape of the store: the task rows plus the id high-water mark.
/// `next_id` only ever moves forward, so deleted ids are never handed out
/// again.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    next_id: i64,
    tasks: Vec<Task>,
}

/// Comparison applied to a task's deadline against a reference date.
#[derive(Debug, Clone, Copy)]
pub enum DeadlineFilter {
    Equals,
    After,
    Before,
}

#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    next_id: i64,
    tasks: Vec<Task>,
}

impl TaskStore {
    /// Open the store at `path`, creating the backing file if absent.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, TodoError> {
        let path = path.as_ref().to_path_buf();
        let store = if path.exists() {
            let data = fs::read_to_string(&path)
                .map_err(|err| TodoError::StorageUnavailable(err.to_string()))?;
            let file: StoreFile = serde_json::from_str(&data)
                .map_err(|err| TodoError::StorageUnavailable(err.to_string()))?;
            Self {
                path,
                next_id: file.next_id,
                tasks: file.tasks,
            }
        } else {
            let store = Self {
                path,
                next_id: 1,
                tasks: Vec::new(),
            };
            // Create the file up front so an unwritable path fails here
            // instead of on the first insert.
            store.save()?;
            store
        };
        debug!(
            "opened task store at {} ({} tasks)",
            store.path.display(),
            store.tasks.len()
        );
        Ok(store)
    }

    fn save(&self) -> Result<(), TodoError> {
        let file = StoreFile {
            next_id: self.next_id,
            tasks: self.tasks.clone(),
        };
        let data = serde_json::to_string_pretty(&file)
            .map_err(|err| TodoError::StorageUnavailable(err.to_string()))?;
        fs::write(&self.path, data).map_err(|err| TodoError::StorageUnavailable(err.to_string()))
    }

    /// Append a new task and return its assigned id.
    pub fn insert(&mut self, description: &str, deadline: NaiveDate) -> Result<i64, TodoError> {
        let id = self.next_id;
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            description: description.to_string(),
            deadline,
        });
        self.save()?;
        debug!("inserted task {} due {}", id, deadline);
        Ok(id)
    }

    /// Remove the task with the given id. Removing an unknown id is a no-op.
    pub fn delete_by_id(&mut self, id: i64) -> Result<(), TodoError> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        if self.tasks.len() == before {
            debug!("delete of task {} matched nothing", id);
            return Ok(());
        }
        self.save()
    }

    /// Every task, sorted by deadline ascending when asked. Equal deadlines
    /// keep insertion order (the sort is stable).
    pub fn query_all(&self, order_by_deadline: bool) -> Vec<Task> {
        let mut tasks = self.tasks.clone();
        if order_by_deadline {
            tasks.sort_by_key(|task| task.deadline);
        }
        tasks
    }

    /// Tasks whose deadline satisfies `filter` against `reference`, in
    /// insertion order.
    pub fn query_by_deadline(&self, filter: DeadlineFilter, reference: NaiveDate) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| match filter {
                DeadlineFilter::Equals => task.deadline == reference,
                DeadlineFilter::After => task.deadline > reference,
                DeadlineFilter::Before => task.deadline < reference,
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("todo.json")).unwrap();
        let a = store.insert("a", date("2024-06-15")).unwrap();
        let b = store.insert("b", date("2024-06-16")).unwrap();
        assert!(b > a);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("todo.json");
        let mut store = TaskStore::open(&path).unwrap();
        let a = store.insert("a", date("2024-06-15")).unwrap();
        store.delete_by_id(a).unwrap();
        let b = store.insert("b", date("2024-06-16")).unwrap();
        assert!(b > a);

        drop(store);
        let mut store = TaskStore::open(&path).unwrap();
        let c = store.insert("c", date("2024-06-17")).unwrap();
        assert!(c > b);
    }

    #[test]
    fn delete_of_unknown_id_is_a_no_op() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("todo.json")).unwrap();
        store.insert("a", date("2024-06-15")).unwrap();
        store.delete_by_id(999).unwrap();
        assert_eq!(store.query_all(false).len(), 1);
    }

    #[test]
    fn query_all_sorts_stably_by_deadline() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("todo.json")).unwrap();
        store.insert("late", date("2024-07-01")).unwrap();
        store.insert("early first", date("2024-06-15")).unwrap();
        store.insert("early second", date("2024-06-15")).unwrap();

        let unsorted: Vec<_> = store
            .query_all(false)
            .into_iter()
            .map(|t| t.description)
            .collect();
        assert_eq!(unsorted, ["late", "early first", "early second"]);

        let sorted: Vec<_> = store
            .query_all(true)
            .into_iter()
            .map(|t| t.description)
            .collect();
        assert_eq!(sorted, ["early first", "early second", "late"]);
    }

    #[test]
    fn query_by_deadline_applies_the_filter() {
        let dir = tempdir().unwrap();
        let mut store = TaskStore::open(dir.path().join("todo.json")).unwrap();
        store.insert("before", date("2024-06-14")).unwrap();
        store.insert("on", date("2024-06-15")).unwrap();
        store.insert("after", date("2024-06-16")).unwrap();
        let reference = date("2024-06-15");

        let names = |filter| {
            store
                .query_by_deadline(filter, reference)
                .into_iter()
                .map(|t| t.description)
                .collect::<Vec<_>>()
        };
        assert_eq!(names(DeadlineFilter::Equals), ["on"]);
        assert_eq!(names(DeadlineFilter::After), ["after"]);
        assert_eq!(names(DeadlineFilter::Before), ["before"]);
    }

    #[test]
    fn rows_survive_a_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("todo.json");
        let mut store = TaskStore::open(&path).unwrap();
        let id = store.insert("Buy milk", date("2024-06-15")).unwrap();
        drop(store);

        let store = TaskStore::open(&path).unwrap();
        let tasks = store.query_all(false);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, id);
        assert_eq!(tasks[0].description, "Buy milk");
        assert_eq!(tasks[0].deadline, date("2024-06-15"));
    }

    #[test]
    fn open_fails_on_an_inaccessible_path() {
        let err = TaskStore::open("/nonexistent-dir/todo.json").unwrap_err();
        assert!(matches!(err, TodoError::StorageUnavailable(_)));
    }
}

use chrono::{Days, Local, NaiveDate};
use log::debug;

use crate::error::TodoError;
use crate::store::{DeadlineFilter, TaskStore};
use crate::task::Task;

/// Domain operations over the task store.
pub struct Todo {
    store: TaskStore,
}

impl Todo {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// The process's local calendar date, the reference for every view.
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Add a task. Without an explicit deadline it is due today.
    pub fn add_task(
        &mut self,
        description: &str,
        deadline: Option<NaiveDate>,
    ) -> Result<(), TodoError> {
        let deadline = deadline.unwrap_or_else(|| self.today());
        let id = self.store.insert(description, deadline)?;
        debug!("added task {}", id);
        Ok(())
    }

    pub fn delete_task(&mut self, id: i64) -> Result<(), TodoError> {
        self.store.delete_by_id(id)
    }

    pub fn get_all_tasks(&self) -> Vec<Task> {
        self.store.query_all(true)
    }

    pub fn get_today_tasks(&self) -> Vec<Task> {
        self.store.query_by_deadline(DeadlineFilter::Equals, self.today())
    }

    /// Tasks due after `today - 7 days`, earliest deadline first. The window
    /// is only bounded below, so every future task qualifies too.
    pub fn get_week_tasks(&self) -> Vec<Task> {
        let cutoff = self.today() - Days::new(7);
        let mut tasks = self.store.query_by_deadline(DeadlineFilter::After, cutoff);
        tasks.sort_by_key(|task| task.deadline);
        tasks
    }

    pub fn get_missed_tasks(&self) -> Vec<Task> {
        self.store.query_by_deadline(DeadlineFilter::Before, self.today())
    }
}

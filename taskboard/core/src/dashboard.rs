//! Client-side view-model for the weekly dashboard.
//!
//! Holds the session's task cache and derives the week strip, the selected
//! day's list, the weekly statistics and the search results from it. User
//! mutations go through [`apply_optimistically`]: the cache changes at once and
//! is restored wholesale if the server rejects the change.

use crate::api::{ApiError, TaskApi};
use crate::form::{FormError, TaskForm};
use crate::optimistic::apply_optimistically;
use crate::overlay::{Overlay, OverlayError};
use crate::scroll::{ScrollControl, ScrollLock};
use crate::search::{SearchResults, matches_needle, normalize_query};
use crate::stats::WeekStats;
use crate::task::{Priority, Task, TaskDraft, TaskPatch, TaskQuery};
use crate::week::{WeekWindow, local_date};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("Failed to save changes: {0}")]
    Api(#[from] ApiError),
    #[error("No task form is open")]
    NotOpen,
}

/// One cell of the week strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub is_selected: bool,
    pub is_today: bool,
}

pub struct Dashboard<A, Tz: TimeZone> {
    api: A,
    tz: Tz,
    now: DateTime<Utc>,
    today: NaiveDate,
    week: WeekWindow<Tz>,
    selected_day: NaiveDate,
    tasks: Vec<Task>,
    /// Ids of records the server has never acknowledged.
    unsynced: HashSet<String>,
    search: String,
    overlay: Overlay,
    loading: bool,
    scroll: Arc<dyn ScrollControl>,
}

impl<A: TaskApi, Tz: TimeZone> Dashboard<A, Tz> {
    /// Starts a session at `now`. The week window and "today" are fixed for
    /// the lifetime of the session.
    pub fn new(api: A, now: DateTime<Tz>, scroll: Arc<dyn ScrollControl>) -> Self {
        let today = now.date_naive();
        Self {
            api,
            tz: now.timezone(),
            now: now.with_timezone(&Utc),
            today,
            week: WeekWindow::containing(&now),
            selected_day: today,
            tasks: Vec::new(),
            unsynced: HashSet::new(),
            search: String::new(),
            overlay: Overlay::Closed,
            loading: true,
            scroll,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn week(&self) -> &WeekWindow<Tz> {
        &self.week
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn selected_day(&self) -> NaiveDate {
        self.selected_day
    }

    pub fn select_day(&mut self, day: NaiveDate) {
        self.selected_day = day;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Draft values of the open add/edit form.
    pub fn form_mut(&mut self) -> Option<&mut TaskForm> {
        self.overlay.form_mut()
    }

    /// Whether `id` names a record that only exists locally.
    pub fn is_unsynced(&self, id: &str) -> bool {
        self.unsynced.contains(id)
    }

    /// Fetches the tasks of the current week.
    ///
    /// A failed request is logged and replaced by a fixed set of example
    /// tasks so the dashboard never stays in its loading state.
    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self) {
        self.loading = true;
        let query = TaskQuery::between(self.week.start_utc(), self.week.end_utc());
        match self.api.list_tasks(&query).await {
            Ok(tasks) => {
                self.unsynced.clear();
                self.tasks = tasks;
            }
            Err(err) => {
                tracing::error!("Failed to load tasks, falling back to example tasks: {}", err);
                self.tasks = example_tasks(self.now);
                self.unsynced = self.tasks.iter().map(|task| task.id.clone()).collect();
            }
        }
        self.loading = false;
    }

    pub fn week_days(&self) -> [WeekDay; 7] {
        self.week.days().map(|date| WeekDay {
            date,
            is_selected: date == self.selected_day,
            is_today: date == self.today,
        })
    }

    /// Tasks on the selected day that match the search string, earliest first.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let needle = normalize_query(&self.search);
        let mut visible: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| local_date(&task.datetime, &self.tz) == self.selected_day)
            .filter(|task| needle.as_deref().is_none_or(|needle| matches_needle(task, needle)))
            .collect();
        visible.sort_by_key(|task| task.datetime);
        visible
    }

    /// Completion statistics over the whole week window.
    pub fn week_stats(&self) -> WeekStats {
        WeekStats::from_tasks(
            self.tasks
                .iter()
                .filter(|task| self.week.contains(&task.datetime)),
        )
    }

    /// Search over the entire cache, not limited to the week or selected day.
    pub fn search_results(&self) -> SearchResults {
        SearchResults::find(&self.tasks, &self.search)
    }

    pub fn open_search(&mut self) -> Result<(), OverlayError> {
        let scroll = self.scroll.clone();
        self.overlay.open_search(move || ScrollLock::acquire(scroll))
    }

    /// Leaves the search view, clearing the query and releasing the scroll lock.
    pub fn close_search(&mut self) {
        if self.overlay.is_searching() {
            self.overlay.close();
            self.search.clear();
        }
    }

    pub fn open_add(&mut self) -> Result<(), OverlayError> {
        self.overlay.open_add(TaskForm::new(self.today))
    }

    pub fn open_edit(&mut self, id: &str) -> Result<(), OverlayError> {
        let task = self
            .find(id)
            .ok_or_else(|| OverlayError::TaskNotFound(id.to_string()))?;
        let form = TaskForm::from_task(task, &self.tz);
        self.overlay.open_edit(id.to_string(), form)
    }

    /// Dismisses the add/edit form without saving.
    pub fn cancel(&mut self) {
        if self.overlay.form().is_some() {
            self.overlay.close();
        }
    }

    /// Saves the open form: creates when adding, replaces when editing.
    ///
    /// Validation failures never reach the server. A failed update keeps the
    /// form open so the user can retry.
    pub async fn submit(&mut self) -> Result<Task, SubmitError> {
        match &self.overlay {
            Overlay::Adding(form) => {
                let draft = form.to_draft(&self.tz)?;
                let created = self.create_task(draft).await;
                self.overlay.close();
                Ok(created)
            }
            Overlay::Editing { task_id, form } => {
                let draft = form.to_draft(&self.tz)?;
                let task_id = task_id.clone();
                let updated = self.update_task(&task_id, draft).await?;
                self.overlay.close();
                Ok(updated)
            }
            _ => Err(SubmitError::NotOpen),
        }
    }

    /// Creates a task and puts it at the front of the cache.
    ///
    /// When the server call fails the input is kept as a local-only record
    /// flagged as unsynced.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&mut self, draft: TaskDraft) -> Task {
        let task = match self.api.create_task(&draft).await {
            Ok(created) => created,
            Err(err) => {
                tracing::error!("Failed to create task, keeping it locally: {}", err);
                let local = Task::local(draft);
                self.unsynced.insert(local.id.clone());
                local
            }
        };
        self.tasks.insert(0, task.clone());
        task
    }

    /// Flips the completion flag. Failures are logged and rolled back.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_complete(&mut self, id: &str) {
        let Some(completed) = self.find(id).map(|task| !task.completed) else {
            tracing::warn!("Cannot toggle unknown task {}", id);
            return;
        };
        if self.unsynced.contains(id) {
            update_in(&mut self.tasks, id, |task| task.completed = completed);
            return;
        }
        let patch = TaskPatch::completed(completed);
        let result = apply_optimistically(
            &mut self.tasks,
            |tasks| {
                update_in(tasks, id, |task| task.completed = completed);
            },
            self.api.patch_task(id, &patch),
        )
        .await;
        if let Err(err) = result {
            tracing::error!("Failed to toggle task {}: {}", id, err);
        }
    }

    /// Removes a task. Failures are logged and rolled back.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&mut self, id: &str) {
        if self.unsynced.remove(id) {
            self.tasks.retain(|task| task.id != id);
            return;
        }
        let result = apply_optimistically(
            &mut self.tasks,
            |tasks| tasks.retain(|task| task.id != id),
            self.api.delete_task(id),
        )
        .await;
        if let Err(err) = result {
            tracing::error!("Failed to delete task {}: {}", id, err);
        }
    }

    /// Replaces the editable fields of a task and adopts the server's record.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(&mut self, id: &str, draft: TaskDraft) -> Result<Task, ApiError> {
        if self.unsynced.contains(id) {
            return update_in(&mut self.tasks, id, |task| task.apply_draft(&draft))
                .ok_or(ApiError::NotFound);
        }
        let updated = apply_optimistically(
            &mut self.tasks,
            |tasks| {
                update_in(tasks, id, |task| task.apply_draft(&draft));
            },
            self.api.replace_task(id, &draft),
        )
        .await
        .inspect_err(|err| tracing::error!("Failed to update task {}: {}", id, err))?;
        self.reconcile(id, updated.clone());
        Ok(updated)
    }

    /// Merges the given fields into a task and adopts the server's record.
    #[tracing::instrument(skip(self))]
    pub async fn patch_task(&mut self, id: &str, patch: TaskPatch) -> Result<Task, ApiError> {
        if self.unsynced.contains(id) {
            return update_in(&mut self.tasks, id, |task| patch.apply_to(task))
                .ok_or(ApiError::NotFound);
        }
        let updated = apply_optimistically(
            &mut self.tasks,
            |tasks| {
                update_in(tasks, id, |task| patch.apply_to(task));
            },
            self.api.patch_task(id, &patch),
        )
        .await
        .inspect_err(|err| tracing::error!("Failed to patch task {}: {}", id, err))?;
        self.reconcile(id, updated.clone());
        Ok(updated)
    }

    fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    fn reconcile(&mut self, id: &str, canonical: Task) {
        if let Some(slot) = self.tasks.iter_mut().find(|task| task.id == id) {
            *slot = canonical;
        }
    }
}

/// Applies `change` to the task with `id` and returns the result, if present.
fn update_in(tasks: &mut [Task], id: &str, change: impl FnOnce(&mut Task)) -> Option<Task> {
    let task = tasks.iter_mut().find(|task| task.id == id)?;
    change(task);
    Some(task.clone())
}

fn example_tasks(now: DateTime<Utc>) -> Vec<Task> {
    [
        ("Finishing Wireframe", Priority::Medium, false),
        ("Meeting with team", Priority::Low, false),
        ("Buy & eat food", Priority::Low, true),
        ("Finishing daily commission", Priority::High, true),
    ]
    .into_iter()
    .map(|(title, priority, completed)| Task {
        completed,
        ..Task::local(TaskDraft {
            title: title.to_string(),
            description: String::new(),
            datetime: now,
            priority,
        })
    })
    .collect()
}

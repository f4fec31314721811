use crate::form::TaskForm;
use crate::scroll::ScrollLock;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// Another modal already owns the screen.
    #[error("Another dialog is already open")]
    Busy,
    #[error("Task {0} not found")]
    TaskNotFound(String),
}

/// Which modal or full-screen view is on top of the dashboard.
///
/// The draft form only exists while adding or editing, and the scroll lock
/// only while searching.
#[derive(Debug, Default)]
pub enum Overlay {
    #[default]
    Closed,
    Adding(TaskForm),
    Editing { task_id: String, form: TaskForm },
    Searching(ScrollLock),
}

impl Overlay {
    pub fn is_closed(&self) -> bool {
        matches!(self, Overlay::Closed)
    }

    pub fn is_searching(&self) -> bool {
        matches!(self, Overlay::Searching(_))
    }

    pub fn form(&self) -> Option<&TaskForm> {
        match self {
            Overlay::Adding(form) | Overlay::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut TaskForm> {
        match self {
            Overlay::Adding(form) | Overlay::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    /// `closed -> adding`.
    pub fn open_add(&mut self, form: TaskForm) -> Result<(), OverlayError> {
        if !self.is_closed() {
            return Err(OverlayError::Busy);
        }
        *self = Overlay::Adding(form);
        Ok(())
    }

    /// `closed -> editing`. Editing a search result closes the search view first.
    pub fn open_edit(&mut self, task_id: String, form: TaskForm) -> Result<(), OverlayError> {
        match self {
            Overlay::Closed | Overlay::Searching(_) => {
                *self = Overlay::Editing { task_id, form };
                Ok(())
            }
            _ => Err(OverlayError::Busy),
        }
    }

    /// `closed -> searching`. Reopening an open search keeps the same lock.
    pub fn open_search(&mut self, lock: impl FnOnce() -> ScrollLock) -> Result<(), OverlayError> {
        match self {
            Overlay::Searching(_) => Ok(()),
            Overlay::Closed => {
                *self = Overlay::Searching(lock());
                Ok(())
            }
            _ => Err(OverlayError::Busy),
        }
    }

    /// Back to `closed` from any state, dropping the draft or the scroll lock.
    pub fn close(&mut self) {
        *self = Overlay::Closed;
    }
}

use crate::task::{Priority, Task, TaskDraft};
use chrono::{NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Title is required")]
    EmptyTitle,
    /// The date and start time name a local time that does not exist (DST gap).
    #[error("{date} {time} does not exist in the local time zone")]
    InvalidLocalTime { date: NaiveDate, time: NaiveTime },
}

/// Values captured by the add/edit form.
///
/// `end_time` is collected but never sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub priority: Priority,
}

impl TaskForm {
    /// Blank form for a new task on `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            date: today,
            start_time: hour(9),
            end_time: hour(10),
            priority: Priority::Medium,
        }
    }

    /// Form pre-populated from an existing task, using its local date and time.
    pub fn from_task<Tz: TimeZone>(task: &Task, tz: &Tz) -> Self {
        let local = task.datetime.with_timezone(tz).naive_local();
        let time = local.time();
        let start_time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            date: local.date(),
            start_time,
            end_time: start_time,
            priority: task.priority,
        }
    }

    /// Validates the form and combines date and start time, read in `tz`,
    /// into the payload sent to the server.
    pub fn to_draft<Tz: TimeZone>(&self, tz: &Tz) -> Result<TaskDraft, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::EmptyTitle);
        }
        let datetime = tz
            .from_local_datetime(&self.date.and_time(self.start_time))
            .earliest()
            .ok_or(FormError::InvalidLocalTime {
                date: self.date,
                time: self.start_time,
            })?
            .with_timezone(&Utc);
        Ok(TaskDraft {
            title: title.to_string(),
            description: self.description.clone(),
            datetime,
            priority: self.priority,
        })
    }
}

fn hour(h: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN)
}

pub mod api;
pub mod dashboard;
pub mod form;
pub mod optimistic;
pub mod overlay;
pub mod scroll;
pub mod search;
pub mod stats;
pub mod task;
pub mod week;

pub use api::{ApiError, TaskApi};
pub use dashboard::{Dashboard, SubmitError, WeekDay};
pub use task::{Priority, Task, TaskDraft, TaskPatch, TaskQuery};

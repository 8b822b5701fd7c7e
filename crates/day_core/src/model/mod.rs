mod task;

pub use task::{DayContext, InsertPosition, Location, Task, TaskDraft, TaskStatus};

use crate::clock::{Clock, SystemClock, format_hour_minute};
use crate::error::AppError;
use crate::model::{InsertPosition, Task, TaskDraft, TaskStatus};
use crate::seed::seed_tasks;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const DEFAULT_REACH_THRESHOLD_METERS: u32 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub pending: usize,
    pub reached: usize,
    pub skipped: usize,
}

/// The first pending task in list order.
pub fn current_task_id(tasks: &[Task]) -> Option<String> {
    tasks
        .iter()
        .find(|task| task.is_pending())
        .map(|task| task.id.clone())
}

/// One day's ordered task list.
///
/// Every mutation recomputes `current_task_id` before returning. Operations
/// that take an id return [`AppError::TaskNotFound`] and leave the list
/// untouched when the id is unknown.
pub struct TaskStore {
    tasks: Vec<Task>,
    current_task_id: Option<String>,
    reach_threshold: u32,
    clock: Arc<dyn Clock>,
}

impl TaskStore {
    pub fn new(tasks: Vec<Task>, clock: Arc<dyn Clock>) -> Self {
        let current_task_id = current_task_id(&tasks);
        Self {
            tasks,
            current_task_id,
            reach_threshold: DEFAULT_REACH_THRESHOLD_METERS,
            clock,
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_tasks(), Arc::new(SystemClock))
    }

    pub fn with_reach_threshold(mut self, meters: u32) -> Self {
        self.reach_threshold = meters;
        self
    }

    pub fn reach_threshold(&self) -> u32 {
        self.reach_threshold
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &str) -> Result<&Task, AppError> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::task_not_found(id))
    }

    pub fn current_task_id(&self) -> Option<&str> {
        self.current_task_id.as_deref()
    }

    pub fn current_task(&self) -> Option<&Task> {
        let id = self.current_task_id.as_deref()?;
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn summary(&self) -> StatusSummary {
        let mut summary = StatusSummary {
            total: self.tasks.len(),
            ..StatusSummary::default()
        };
        for task in &self.tasks {
            match task.status {
                TaskStatus::Pending => summary.pending += 1,
                TaskStatus::Reached => summary.reached += 1,
                TaskStatus::Skipped => summary.skipped += 1,
            }
        }
        summary
    }

    /// Marks every pending task closer than the threshold as reached and
    /// returns the ids that changed.
    pub fn check_proximity(&mut self) -> Result<Vec<String>, AppError> {
        let threshold = self.reach_threshold;
        let in_range = |task: &Task| task.is_pending() && task.distance < threshold;
        if !self.tasks.iter().any(in_range) {
            return Ok(Vec::new());
        }

        let stamp = format_hour_minute(self.clock.now())?;
        let mut reached = Vec::new();
        for task in self.tasks.iter_mut().filter(|task| in_range(task)) {
            task.status = TaskStatus::Reached;
            task.reached_at = Some(stamp.clone());
            info!(task_id = %task.id, distance = task.distance, "task auto-reached");
            reached.push(task.id.clone());
        }

        self.refresh_current();
        Ok(reached)
    }

    pub fn set_status(&mut self, id: &str, status: TaskStatus) -> Result<Task, AppError> {
        let stamp = match status {
            TaskStatus::Reached => Some(format_hour_minute(self.clock.now())?),
            TaskStatus::Pending | TaskStatus::Skipped => None,
        };

        let task = self.task_mut(id)?;
        task.status = status;
        task.reached_at = stamp;
        let updated = task.clone();
        debug!(task_id = %id, status = %status, "status changed");

        self.refresh_current();
        Ok(updated)
    }

    /// Replaces the notes verbatim; an empty string is kept as-is.
    pub fn set_notes(&mut self, id: &str, notes: &str) -> Result<Task, AppError> {
        let task = self.task_mut(id)?;
        task.notes = Some(notes.to_string());
        Ok(task.clone())
    }

    /// Feeds a new simulated distance. Status is left for the next
    /// proximity check to decide.
    pub fn update_distance(&mut self, id: &str, meters: u32) -> Result<Task, AppError> {
        let task = self.task_mut(id)?;
        task.distance = meters;
        Ok(task.clone())
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task, AppError> {
        let index = self.index_of(id)?;
        let removed = self.tasks.remove(index);
        info!(task_id = %id, "task deleted");

        self.refresh_current();
        Ok(removed)
    }

    pub fn insert_task(
        &mut self,
        reference_id: &str,
        position: InsertPosition,
        draft: TaskDraft,
    ) -> Result<Task, AppError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(AppError::invalid_input("title is required"));
        }

        let reference = self.index_of(reference_id)?;
        let index = match position {
            InsertPosition::Before => reference,
            InsertPosition::After => reference + 1,
        };

        let task = Task {
            id: self.next_id(),
            title: title.to_string(),
            scheduled_time: draft.scheduled_time.trim().to_string(),
            location: draft.location,
            distance: draft.distance,
            status: TaskStatus::Pending,
            reached_at: None,
            notes: None,
        };
        self.tasks.insert(index, task.clone());
        info!(task_id = %task.id, reference_id, ?position, "task inserted");

        self.refresh_current();
        Ok(task)
    }

    fn next_id(&self) -> String {
        let highest = self
            .tasks
            .iter()
            .filter_map(|task| task.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        let mut candidate = highest + 1;
        while self.tasks.iter().any(|task| task.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }

    fn index_of(&self, id: &str) -> Result<usize, AppError> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or_else(|| AppError::task_not_found(id))
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task, AppError> {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| AppError::task_not_found(id))
    }

    fn refresh_current(&mut self) {
        self.current_task_id = current_task_id(&self.tasks);
    }
}

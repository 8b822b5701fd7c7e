//! Text the renderer shows for store state, plus the local notices emitted by
//! the map, share and delete actions.

use crate::model::{DayContext, Task, TaskStatus};

pub fn distance_label(distance: u32, reach_threshold: u32) -> String {
    if distance < reach_threshold {
        "Nearby".to_string()
    } else if distance < 1000 {
        format!("{distance}m away")
    } else {
        format!("{:.1}km away", f64::from(distance) / 1000.0)
    }
}

pub fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "On the way",
        TaskStatus::Reached => "Reached",
        TaskStatus::Skipped => "Skipped",
    }
}

pub fn context_banner(context: DayContext) -> &'static str {
    match context {
        DayContext::Today => "Focus on what's ahead. We'll track progress quietly.",
        DayContext::Past => "This day has passed. Records are preserved.",
        DayContext::Upcoming => "Plans can still be adjusted.",
    }
}

/// Past days are read-only: no status buttons.
pub fn shows_status_controls(context: DayContext) -> bool {
    context != DayContext::Past
}

pub fn map_notice(task: &Task) -> String {
    format!("Opening map for {}", task.location.name)
}

pub fn share_notice() -> &'static str {
    "Location link copied"
}

pub fn removed_notice() -> &'static str {
    "Task removed"
}

pub fn reached_notice(task: &Task) -> Option<String> {
    task.reached_at
        .as_deref()
        .map(|stamp| format!("Reached at {stamp}"))
}

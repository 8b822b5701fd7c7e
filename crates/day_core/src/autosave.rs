use crate::error::AppError;
use crate::model::Task;
use crate::poller::SharedStore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const DEFAULT_AUTOSAVE_DELAY: Duration = Duration::from_secs(2);

struct PendingEdit {
    notes: String,
    generation: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct Edits {
    by_task: HashMap<String, PendingEdit>,
    generation: u64,
}

/// Debounced notes editor: an edit is written to the store once `delay`
/// passes without a newer edit for the same task.
pub struct NotesAutoSave {
    store: SharedStore,
    delay: Duration,
    edits: Arc<Mutex<Edits>>,
}

impl NotesAutoSave {
    pub fn new(store: SharedStore, delay: Duration) -> Self {
        Self {
            store,
            delay,
            edits: Arc::new(Mutex::new(Edits::default())),
        }
    }

    /// Records a draft and restarts the task's timer. Returns `false` when the
    /// draft already matches the saved notes and nothing was scheduled.
    pub async fn edit(&self, task_id: &str, notes: &str) -> Result<bool, AppError> {
        let unchanged = {
            let store = self.store.lock().await;
            let task = store.task(task_id)?;
            task.notes.as_deref().unwrap_or("") == notes
        };

        let mut edits = self.edits.lock().await;
        if let Some(previous) = edits.by_task.remove(task_id) {
            previous.timer.abort();
        }
        if unchanged {
            return Ok(false);
        }

        edits.generation += 1;
        let generation = edits.generation;
        let timer = tokio::spawn(save_after(
            self.store.clone(),
            self.edits.clone(),
            task_id.to_string(),
            generation,
            self.delay,
        ));
        edits.by_task.insert(
            task_id.to_string(),
            PendingEdit {
                notes: notes.to_string(),
                generation,
                timer,
            },
        );
        debug!(task_id, generation, "notes edit scheduled");
        Ok(true)
    }

    pub async fn is_pending(&self, task_id: &str) -> bool {
        self.edits.lock().await.by_task.contains_key(task_id)
    }

    /// Saves every pending draft now, in no particular order.
    pub async fn flush(&self) -> Vec<Task> {
        let drained: Vec<(String, PendingEdit)> =
            self.edits.lock().await.by_task.drain().collect();

        let mut saved = Vec::with_capacity(drained.len());
        let mut store = self.store.lock().await;
        for (task_id, edit) in drained {
            edit.timer.abort();
            match store.set_notes(&task_id, &edit.notes) {
                Ok(task) => saved.push(task),
                Err(err) => {
                    warn!(task_id = %task_id, error = %err, "dropping notes for missing task")
                }
            }
        }
        saved
    }
}

impl Drop for NotesAutoSave {
    fn drop(&mut self) {
        if let Ok(mut edits) = self.edits.try_lock() {
            for (_, edit) in edits.by_task.drain() {
                edit.timer.abort();
            }
        }
    }
}

async fn save_after(
    store: SharedStore,
    edits: Arc<Mutex<Edits>>,
    task_id: String,
    generation: u64,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;

    let notes = {
        let mut edits = edits.lock().await;
        let superseded = edits
            .by_task
            .get(&task_id)
            .is_none_or(|edit| edit.generation != generation);
        if superseded {
            return;
        }
        match edits.by_task.remove(&task_id) {
            Some(edit) => edit.notes,
            None => return,
        }
    };

    match store.lock().await.set_notes(&task_id, &notes) {
        Ok(_) => debug!(task_id = %task_id, "notes auto-saved"),
        Err(err) => warn!(task_id = %task_id, error = %err, "notes auto-save failed"),
    }
}

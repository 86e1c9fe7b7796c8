//! Debounced commits of in-progress edits
//!
//! An editor calls [`Autosave::schedule`] on every change. Each call cancels
//! the pending commit and starts a new idle timer; only when the timer runs
//! out does the accumulated edit reach [`PromptStore::update_prompt`], so a
//! burst of keystrokes becomes a single version bump.
//!
//! Edits to the same prompt are merged, later fields winning. Scheduling an
//! edit for a different prompt commits the previous prompt's pending edit
//! straight away rather than dropping it; [`Autosave::flush`] waits for those
//! commits too.

use crate::store::{PromptStore, PromptUpdate};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Default idle window before an edit is committed
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Store shared between the host and background tasks; every mutation goes
/// through the one lock, so mutations stay serialized
pub type SharedStore = Arc<AsyncMutex<PromptStore>>;

#[derive(Debug)]
struct PendingEdit {
    generation: u64,
    prompt_id: String,
    update: PromptUpdate,
    cancel: CancellationToken,
}

#[derive(Debug)]
struct Inner {
    store: SharedStore,
    delay: Duration,
    pending: Mutex<Option<PendingEdit>>,
    /// Commits of edits displaced by an edit to another prompt
    switched: Mutex<Vec<JoinHandle<bool>>>,
    generation: AtomicU64,
}

impl Inner {
    fn pending(&self) -> MutexGuard<'_, Option<PendingEdit>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn switched(&self) -> MutexGuard<'_, Vec<JoinHandle<bool>>> {
        self.switched.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn take_pending(&self) -> Option<PendingEdit> {
        let pending = self.pending().take();
        if let Some(edit) = &pending {
            edit.cancel.cancel();
        }
        pending
    }

    /// Commit the pending edit if it is still the one armed as `generation`
    async fn fire(&self, generation: u64) {
        let due = {
            let mut slot = self.pending();
            match slot.as_ref() {
                Some(edit) if edit.generation == generation => slot.take(),
                _ => None,
            }
        };
        if let Some(edit) = due {
            commit(&self.store, edit).await;
        }
    }
}

async fn commit(store: &SharedStore, edit: PendingEdit) -> bool {
    let applied = store.lock().await.update_prompt(&edit.prompt_id, edit.update);
    if applied {
        tracing::debug!(prompt_id = %edit.prompt_id, "Autosaved edit");
    } else {
        tracing::debug!(prompt_id = %edit.prompt_id, "Autosave target no longer exists");
    }
    applied
}

/// Debouncer in front of `update_prompt`
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct Autosave {
    inner: Arc<Inner>,
}

impl Autosave {
    pub fn new(store: SharedStore, delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                store,
                delay,
                pending: Mutex::new(None),
                switched: Mutex::new(Vec::new()),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }

    /// Queue `update` for `prompt_id` and restart the idle timer
    pub fn schedule(&self, prompt_id: &str, update: PromptUpdate) {
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        let cancel = CancellationToken::new();

        {
            let mut slot = self.inner.pending();
            let update = match slot.take() {
                Some(previous) if previous.prompt_id == prompt_id => {
                    previous.cancel.cancel();
                    previous.update.merge(update)
                }
                Some(previous) => {
                    previous.cancel.cancel();
                    let store = Arc::clone(&self.inner.store);
                    let handle = tokio::spawn(async move { commit(&store, previous).await });
                    let mut switched = self.inner.switched();
                    switched.retain(|h| !h.is_finished());
                    switched.push(handle);
                    update
                }
                None => update,
            };

            *slot = Some(PendingEdit {
                generation,
                prompt_id: prompt_id.to_string(),
                update,
                cancel: cancel.clone(),
            });
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(inner.delay) => inner.fire(generation).await,
            }
        });
    }

    /// Commit the pending edit now instead of waiting for the timer
    ///
    /// Also waits for edits displaced by a switch to another prompt, so every
    /// scheduled edit has reached the store once this returns.
    ///
    /// # Returns
    ///
    /// `true` if at least one edit was committed to a prompt that still existed
    pub async fn flush(&self) -> bool {
        let mut applied = false;

        let switched = std::mem::take(&mut *self.inner.switched());
        for handle in switched {
            match handle.await {
                Ok(done) => applied |= done,
                Err(e) => tracing::warn!("Autosave commit task failed: {}", e),
            }
        }

        if let Some(edit) = self.inner.take_pending() {
            applied |= commit(&self.inner.store, edit).await;
        }
        applied
    }

    /// Drop the pending edit without committing it
    pub fn cancel(&self) -> bool {
        self.inner.take_pending().is_some()
    }

    /// Whether an edit is armed or a displaced edit is still being committed
    pub fn has_pending(&self) -> bool {
        self.inner.pending().is_some() || self.inner.switched().iter().any(|h| !h.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NewPrompt;
    use crate::test_utils::sequential_store;

    fn shared_store_with_prompt() -> (SharedStore, String) {
        let mut store = sequential_store();
        let id = store.add_prompt(NewPrompt::new("A", "a"));
        (Arc::new(AsyncMutex::new(store)), id)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_commits_once() {
        let (store, id) = shared_store_with_prompt();
        let autosave = Autosave::new(Arc::clone(&store), DEFAULT_DEBOUNCE);

        for text in ["ab", "abc", "abcd"] {
            autosave.schedule(&id, PromptUpdate::new().content(text));
            tokio::time::advance(Duration::from_millis(300)).await;
        }
        assert_eq!(store.lock().await.prompt_by_id(&id).unwrap().version, 1);

        tokio::time::sleep(Duration::from_millis(2000)).await;

        let guard = store.lock().await;
        let prompt = guard.prompt_by_id(&id).unwrap();
        assert_eq!(prompt.content, "abcd");
        assert_eq!(prompt.version, 2);
        assert_eq!(prompt.history.len(), 2);
        assert!(!autosave.has_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_prompt_edits_are_merged() {
        let (store, id) = shared_store_with_prompt();
        let autosave = Autosave::new(Arc::clone(&store), DEFAULT_DEBOUNCE);

        autosave.schedule(&id, PromptUpdate::new().title("New title"));
        autosave.schedule(&id, PromptUpdate::new().content("new body"));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let guard = store.lock().await;
        let prompt = guard.prompt_by_id(&id).unwrap();
        assert_eq!(prompt.title, "New title");
        assert_eq!(prompt.content, "new body");
        assert_eq!(prompt.version, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_switching_prompts_commits_previous_edit() {
        let (store, first) = shared_store_with_prompt();
        let second = store.lock().await.add_prompt(NewPrompt::new("B", "b"));
        let autosave = Autosave::new(Arc::clone(&store), DEFAULT_DEBOUNCE);

        autosave.schedule(&first, PromptUpdate::new().content("first edit"));
        autosave.schedule(&second, PromptUpdate::new().content("second edit"));
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let guard = store.lock().await;
        assert_eq!(guard.prompt_by_id(&first).unwrap().content, "first edit");
        assert_eq!(guard.prompt_by_id(&second).unwrap().content, "second edit");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_waits_for_switched_prompt_edit() {
        let (store, first) = shared_store_with_prompt();
        let second = store.lock().await.add_prompt(NewPrompt::new("B", "b"));
        let autosave = Autosave::new(Arc::clone(&store), DEFAULT_DEBOUNCE);

        autosave.schedule(&first, PromptUpdate::new().content("edit A"));
        autosave.schedule(&second, PromptUpdate::new().content("edit B"));
        assert!(autosave.flush().await);
        assert!(!autosave.has_pending());

        let guard = store.lock().await;
        assert_eq!(guard.prompt_by_id(&first).unwrap().content, "edit A");
        assert_eq!(guard.prompt_by_id(&first).unwrap().version, 2);
        assert_eq!(guard.prompt_by_id(&second).unwrap().content, "edit B");
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_commits_immediately() {
        let (store, id) = shared_store_with_prompt();
        let autosave = Autosave::new(Arc::clone(&store), DEFAULT_DEBOUNCE);

        autosave.schedule(&id, PromptUpdate::new().content("now"));
        assert!(autosave.flush().await);
        assert_eq!(store.lock().await.prompt_by_id(&id).unwrap().content, "now");

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(store.lock().await.prompt_by_id(&id).unwrap().version, 2);
        assert!(!autosave.flush().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_edit() {
        let (store, id) = shared_store_with_prompt();
        let autosave = Autosave::new(Arc::clone(&store), DEFAULT_DEBOUNCE);

        autosave.schedule(&id, PromptUpdate::new().content("never"));
        assert!(autosave.cancel());
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let guard = store.lock().await;
        assert_eq!(guard.prompt_by_id(&id).unwrap().content, "a");
        assert_eq!(guard.prompt_by_id(&id).unwrap().version, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_for_deleted_prompt_is_dropped() {
        let (store, id) = shared_store_with_prompt();
        let autosave = Autosave::new(Arc::clone(&store), DEFAULT_DEBOUNCE);

        autosave.schedule(&id, PromptUpdate::new().content("late"));
        store.lock().await.delete_prompt(&id);
        assert!(!autosave.flush().await);
    }
}

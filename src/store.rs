//! Task Cache Store
//!
//! Keyed cache of the task collection, built on Leptos reactive_stores for
//! fine-grained reactivity. The collection endpoint URL is the key.
//!
//! Reads go through [`revalidate`], which is single-flight: a fetch that
//! starts while another is pending is dropped. Writes go through [`mutate`],
//! which applies the server's answer to the cached list on success and leaves
//! the cache alone on failure. A mutation never triggers a refetch.
//!
//! A fetch result is discarded if any mutation started or finished while the
//! fetch was pending, so an older list never overwrites a confirmed change.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::{self, ApiError};
use crate::config::ApiConfig;
use crate::models::Task;

/// Window focus revalidation is skipped if the last fetch is younger than this
pub const FOCUS_THROTTLE_MS: f64 = 5_000.0;

/// Cached collection plus request bookkeeping
#[derive(Clone, Debug, Default, Store)]
pub struct TaskState {
    /// Cache key (collection endpoint URL)
    pub key: String,
    /// `None` until the first successful fetch
    pub tasks: Option<Vec<Task>>,
    /// Message of the last failed fetch
    pub error: Option<String>,
    /// A fetch for `key` is pending
    pub in_flight: bool,
    /// `Date.now()` of the last completed fetch
    pub fetched_at: Option<f64>,
    /// Bumped when a mutation starts and again when it settles
    pub mutation_gen: u64,
    /// Mutations awaiting the server
    pub pending_mutations: u32,
}

impl TaskState {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }
}

pub type TaskStore = Store<TaskState>;

/// Get the task store from context
pub fn use_task_store() -> TaskStore {
    expect_context::<TaskStore>()
}

/// What the list screen should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Error,
    Ready,
}

/// Loading wins while no data has arrived and a fetch is pending
pub fn view_state(has_data: bool, in_flight: bool, has_error: bool) -> ViewState {
    match (has_data, in_flight, has_error) {
        (false, true, _) => ViewState::Loading,
        (_, _, true) => ViewState::Error,
        (false, false, false) => ViewState::Loading,
        (true, _, false) => ViewState::Ready,
    }
}

/// Change to apply to the cached list once the server confirmed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheUpdate {
    Append(Task),
    Replace(Task),
    Remove(String),
}

// ========================
// List Helpers
// ========================

pub fn find_task<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|task| task.id == id)
}

pub fn append_task(tasks: &mut Vec<Task>, task: Task) {
    tasks.push(task);
}

/// Swap the entry with the same id; other entries untouched
pub fn replace_task(tasks: &mut [Task], updated: Task) {
    if let Some(task) = tasks.iter_mut().find(|task| task.id == updated.id) {
        *task = updated;
    }
}

pub fn remove_task(tasks: &mut Vec<Task>, id: &str) {
    tasks.retain(|task| task.id != id);
}

pub fn apply_update(tasks: &mut Vec<Task>, update: CacheUpdate) {
    match update {
        CacheUpdate::Append(task) => append_task(tasks, task),
        CacheUpdate::Replace(task) => replace_task(tasks, task),
        CacheUpdate::Remove(id) => remove_task(tasks, &id),
    }
}

pub fn is_stale(fetched_at: Option<f64>, now: f64) -> bool {
    match fetched_at {
        Some(at) => now - at >= FOCUS_THROTTLE_MS,
        None => true,
    }
}

/// A fetch may land only if no mutation touched the cache since it started
pub fn should_accept_fetch(started_gen: u64, current_gen: u64, pending_mutations: u32) -> bool {
    started_gen == current_gen && pending_mutations == 0
}

// ========================
// Store Operations
// ========================

/// Snapshot lookup without subscribing
pub fn store_find_task(store: &TaskStore, id: &str) -> Option<Task> {
    store
        .tasks()
        .read_untracked()
        .as_deref()
        .and_then(|tasks| find_task(tasks, id).cloned())
}

/// Fetch the whole collection and replace the cache with it
pub async fn revalidate(store: TaskStore, config: ApiConfig) {
    if store.in_flight().get_untracked() {
        tracing::debug!(key = %store.key().get_untracked(), "fetch already in flight, skipping");
        return;
    }
    store.in_flight().set(true);
    let started_gen = store.mutation_gen().get_untracked();

    let result = api::list_tasks(&config).await;
    apply_fetch(&store, started_gen, result);

    store.fetched_at().set(Some(js_sys::Date::now()));
    store.in_flight().set(false);
}

/// Store the outcome of a fetch that started at mutation generation `started_gen`
pub fn apply_fetch(store: &TaskStore, started_gen: u64, result: Result<Vec<Task>, ApiError>) {
    match result {
        Ok(tasks) => {
            let current_gen = store.mutation_gen().get_untracked();
            let pending = store.pending_mutations().get_untracked();
            if !should_accept_fetch(started_gen, current_gen, pending) {
                tracing::debug!(started_gen, current_gen, pending, "discarding fetch raced by a mutation");
                return;
            }
            tracing::debug!(count = tasks.len(), "loaded tasks");
            store.tasks().set(Some(tasks));
            store.error().set(None);
        }
        Err(err) => {
            tracing::error!(error = %err, "loading tasks failed");
            store.error().set(Some(err.to_string()));
        }
    }
}

/// Run a backend mutation and merge its result into the cache
///
/// The merge is applied to the list as it is when the response arrives. On
/// error the cache is left as it was and the error is handed back.
pub async fn mutate<F>(store: TaskStore, mutation: F) -> Result<(), ApiError>
where
    F: std::future::Future<Output = Result<CacheUpdate, ApiError>>,
{
    store.mutation_gen().update(|generation| *generation += 1);
    store.pending_mutations().update(|n| *n += 1);

    let result = mutation.await;

    store.mutation_gen().update(|generation| *generation += 1);
    store.pending_mutations().update(|n| *n = n.saturating_sub(1));

    let update = result?;
    let tasks_field = store.tasks();
    let mut tasks = tasks_field.write();
    apply_update(tasks.get_or_insert_with(Vec::new), update);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    fn make_task(id: &str, title: &str, is_completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            is_completed,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            make_task("1", "Buy milk", false),
            make_task("2", "Walk dog", true),
            make_task("3", "Write report", false),
        ]
    }

    #[test]
    fn test_append_goes_to_tail() {
        let mut tasks = sample();
        let created = make_task("4", "Call mom", false);
        apply_update(&mut tasks, CacheUpdate::Append(created.clone()));
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[3], created);
    }

    #[test]
    fn test_append_to_empty_list() {
        let mut tasks = Vec::new();
        let created = make_task("1", "Buy milk", false);
        apply_update(&mut tasks, CacheUpdate::Append(created.clone()));
        assert_eq!(tasks, vec![created]);
    }

    #[test]
    fn test_replace_only_touches_matching_id() {
        let mut tasks = sample();
        let before = tasks.clone();
        let updated = make_task("1", "Buy milk", true);
        apply_update(&mut tasks, CacheUpdate::Replace(updated.clone()));

        assert_eq!(tasks[0], updated);
        assert_eq!(tasks[1..], before[1..]);
    }

    #[test]
    fn test_replace_unknown_id_is_noop() {
        let mut tasks = sample();
        apply_update(&mut tasks, CacheUpdate::Replace(make_task("9", "Ghost", true)));
        assert_eq!(tasks, sample());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut tasks = sample();
        tasks.push(make_task("4", "Call mom", false));
        apply_update(&mut tasks, CacheUpdate::Remove("3".to_string()));

        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "4"]);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut tasks = sample();
        remove_task(&mut tasks, "9");
        assert_eq!(tasks, sample());
    }

    #[test]
    fn test_find_task() {
        let tasks = sample();
        assert_eq!(find_task(&tasks, "2").map(|t| t.title.as_str()), Some("Walk dog"));
        assert!(find_task(&tasks, "9").is_none());
    }

    #[test]
    fn test_view_state() {
        // Initial fetch pending or not started yet
        assert_eq!(view_state(false, true, false), ViewState::Loading);
        assert_eq!(view_state(false, false, false), ViewState::Loading);
        // Initial fetch failed
        assert_eq!(view_state(false, false, true), ViewState::Error);
        // Retrying without data still shows loading
        assert_eq!(view_state(false, true, true), ViewState::Loading);
        // Data present
        assert_eq!(view_state(true, false, false), ViewState::Ready);
        assert_eq!(view_state(true, true, false), ViewState::Ready);
        // A failed refresh surfaces even with data cached
        assert_eq!(view_state(true, false, true), ViewState::Error);
    }

    #[test]
    fn test_is_stale() {
        assert!(is_stale(None, 0.0));
        assert!(!is_stale(Some(1_000.0), 1_500.0));
        assert!(is_stale(Some(1_000.0), 6_000.0));
        assert!(!is_stale(Some(1_000.0), 3_000.0));
    }

    #[test]
    fn test_should_accept_fetch() {
        assert!(should_accept_fetch(0, 0, 0));
        // A mutation started and finished while the fetch was pending
        assert!(!should_accept_fetch(0, 2, 0));
        // A mutation is still waiting on the server
        assert!(!should_accept_fetch(1, 1, 1));
    }

    fn with_store(test: impl FnOnce(TaskStore)) {
        let owner = Owner::new();
        owner.set();
        test(Store::new(TaskState::new("http://localhost:8080/allTodos")));
    }

    fn cached(store: &TaskStore) -> Option<Vec<Task>> {
        store.tasks().get_untracked()
    }

    #[test]
    fn test_failed_mutation_leaves_cache_untouched() {
        with_store(|store| {
            store.tasks().set(Some(sample()));
            let result = block_on(mutate(store, async {
                Err(ApiError::Status(500))
            }));

            assert_eq!(result, Err(ApiError::Status(500)));
            assert_eq!(cached(&store), Some(sample()));
            assert_eq!(store.pending_mutations().get_untracked(), 0);
        });
    }

    #[test]
    fn test_mutation_merges_into_latest_list() {
        with_store(|store| {
            store.tasks().set(Some(sample()));
            let result = block_on(mutate(store, async move {
                // The cache changes while the request is pending
                store.tasks().set(Some(vec![make_task("2", "Walk dog", true)]));
                Ok(CacheUpdate::Append(make_task("4", "Call mom", false)))
            }));

            assert_eq!(result, Ok(()));
            assert_eq!(
                cached(&store),
                Some(vec![make_task("2", "Walk dog", true), make_task("4", "Call mom", false)])
            );
        });
    }

    #[test]
    fn test_mutation_before_first_load_starts_a_list() {
        with_store(|store| {
            let result = block_on(mutate(store, async {
                Ok(CacheUpdate::Append(make_task("1", "Buy milk", false)))
            }));

            assert_eq!(result, Ok(()));
            assert_eq!(cached(&store), Some(vec![make_task("1", "Buy milk", false)]));
        });
    }

    #[test]
    fn test_fetch_replaces_cache_and_clears_error() {
        with_store(|store| {
            store.error().set(Some("HTTP 500".to_string()));
            apply_fetch(&store, 0, Ok(sample()));

            assert_eq!(cached(&store), Some(sample()));
            assert_eq!(store.error().get_untracked(), None);
        });
    }

    #[test]
    fn test_failed_fetch_keeps_previous_data() {
        with_store(|store| {
            store.tasks().set(Some(sample()));
            apply_fetch(&store, 0, Err(ApiError::Status(503)));

            assert_eq!(cached(&store), Some(sample()));
            assert_eq!(store.error().get_untracked(), Some("HTTP 503".to_string()));
        });
    }

    #[test]
    fn test_fetch_started_before_create_does_not_drop_created_task() {
        with_store(|store| {
            store.tasks().set(Some(sample()));
            let started_gen = store.mutation_gen().get_untracked();

            let created = make_task("4", "Buy milk", false);
            let result = block_on(mutate(store, {
                let created = created.clone();
                async move { Ok(CacheUpdate::Append(created)) }
            }));
            assert_eq!(result, Ok(()));

            // The older list arrives after the create was confirmed
            apply_fetch(&store, started_gen, Ok(sample()));

            let tasks = cached(&store).unwrap();
            assert_eq!(tasks.len(), 4);
            assert_eq!(tasks[3], created);
        });
    }

    #[test]
    fn test_fetch_after_mutation_settled_is_accepted() {
        with_store(|store| {
            let _ = block_on(mutate(store, async {
                Ok(CacheUpdate::Append(make_task("1", "Buy milk", false)))
            }));
            let started_gen = store.mutation_gen().get_untracked();
            apply_fetch(&store, started_gen, Ok(sample()));

            assert_eq!(cached(&store), Some(sample()));
        });
    }

    #[test]
    fn test_task_state_new() {
        let state = TaskState::new("http://localhost:8080/allTodos");
        assert_eq!(state.key, "http://localhost:8080/allTodos");
        assert!(state.tasks.is_none());
        assert!(!state.in_flight);
        assert_eq!(state.mutation_gen, 0);
        assert_eq!(state.pending_mutations, 0);
    }
}

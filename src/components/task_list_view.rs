//! Task List View Component
//!
//! Top-level screen: loads the task collection into the store, renders the
//! add form and the list, and turns row actions into backend calls.
//!
//! Mutation failures leave the cache untouched and are only logged; the
//! load path is the one place an error reaches the screen.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{self, ApiError};
use crate::components::TaskRow;
use crate::config::ApiConfig;
use crate::context::use_app_context;
use crate::dialog::prompt_title;
use crate::models::{normalize_title, TaskPayload};
use crate::store::{
    is_stale, mutate, revalidate, store_find_task, use_task_store, view_state, CacheUpdate,
    TaskStateStoreFields, TaskStore, ViewState,
};

// ========================
// Operations
// ========================

async fn create_task(store: TaskStore, config: ApiConfig, title: String) -> Result<(), ApiError> {
    let payload = TaskPayload::new_task(title);
    mutate(store, async move {
        api::create_task(&config, &payload).await.map(CacheUpdate::Append)
    })
    .await
}

async fn toggle_task(store: TaskStore, config: ApiConfig, id: String) -> Result<(), ApiError> {
    let Some(task) = store_find_task(&store, &id) else {
        return Ok(());
    };
    let payload = TaskPayload::toggled(&task);
    mutate(store, async move {
        api::update_task(&config, &id, &payload).await.map(CacheUpdate::Replace)
    })
    .await
}

async fn rename_task(store: TaskStore, config: ApiConfig, id: String) -> Result<(), ApiError> {
    let Some(task) = store_find_task(&store, &id) else {
        return Ok(());
    };
    let Some(title) = prompt_title("Edit task", &task.title) else {
        return Ok(());
    };
    let payload = TaskPayload::renamed(&task, title);
    mutate(store, async move {
        api::update_task(&config, &id, &payload).await.map(CacheUpdate::Replace)
    })
    .await
}

async fn delete_task(store: TaskStore, config: ApiConfig, id: String) -> Result<(), ApiError> {
    mutate(store, async move {
        api::delete_task(&config, &id).await?;
        Ok(CacheUpdate::Remove(id))
    })
    .await
}

/// Fire and forget; failures only reach the log
fn spawn_mutation<F>(action: &'static str, id: String, mutation: F)
where
    F: std::future::Future<Output = Result<(), ApiError>> + 'static,
{
    spawn_local(async move {
        if let Err(err) = mutation.await {
            tracing::warn!(action, id = %id, error = %err, "task mutation failed");
        }
    });
}

// ========================
// Components
// ========================

/// Whole to-do screen
#[component]
pub fn TaskListView() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_task_store();

    // Load on mount and whenever a reload is requested
    Effect::new(move |_| {
        let trigger = ctx.reload_trigger.get();
        tracing::debug!(trigger, "revalidating task list");
        spawn_local(revalidate(store, ctx.config()));
    });

    // Refresh when the window regains focus, unless we just fetched
    let focus_handle = window_event_listener(leptos::ev::focus, move |_| {
        if is_stale(store.fetched_at().get_untracked(), js_sys::Date::now()) {
            ctx.reload();
        }
    });
    // Reconnecting always refreshes
    let online_handle = window_event_listener(leptos::ev::online, move |_| ctx.reload());
    on_cleanup(move || {
        focus_handle.remove();
        online_handle.remove();
    });

    let state = Memo::new(move |_| {
        view_state(
            store.tasks().read().is_some(),
            store.in_flight().get(),
            store.error().read().is_some(),
        )
    });

    let on_toggle = Callback::new(move |id: String| {
        spawn_mutation("toggle", id.clone(), toggle_task(store, ctx.config(), id));
    });
    let on_edit = Callback::new(move |id: String| {
        spawn_mutation("rename", id.clone(), rename_task(store, ctx.config(), id));
    });
    let on_delete = Callback::new(move |id: String| {
        spawn_mutation("delete", id.clone(), delete_task(store, ctx.config(), id));
    });

    move || match state.get() {
        ViewState::Loading => view! { <div class="status">"Loading..."</div> }.into_any(),
        ViewState::Error => view! { <div class="status error">"Fetch error"</div> }.into_any(),
        ViewState::Ready => view! {
            <div class="todo-card">
                <div class="todo-header">
                    <h1>"To-Do List"</h1>
                </div>

                <NewTaskForm />

                <ul class="todo-list">
                    <For
                        each=move || store.tasks().get().unwrap_or_default()
                        key=|task| (task.id.clone(), task.title.clone(), task.is_completed)
                        children=move |task| {
                            view! {
                                <TaskRow
                                    task=task
                                    on_toggle=on_toggle
                                    on_edit=on_edit
                                    on_delete=on_delete
                                />
                            }
                        }
                    />
                </ul>
            </div>
        }
        .into_any(),
    }
}

/// Text input plus "Add" button
#[component]
fn NewTaskForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_task_store();
    let input_ref = NodeRef::<leptos::html::Input>::new();

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(input) = input_ref.get_untracked() else {
            return;
        };
        let Some(title) = normalize_title(&input.value()) else {
            return;
        };

        spawn_local(async move {
            match create_task(store, ctx.config(), title).await {
                Ok(()) => {
                    input.set_value("");
                    if let Err(err) = input.focus() {
                        tracing::debug!(error = ?err, "could not focus task input");
                    }
                }
                Err(err) => tracing::warn!(action = "create", error = %err, "task mutation failed"),
            }
        });
    };

    view! {
        <form class="new-task-form" on:submit=on_submit>
            <div class="new-task-row">
                <input node_ref=input_ref name="title" type="text" placeholder="Add a task" />
                <button type="submit">"Add"</button>
            </div>
        </form>
    }
}

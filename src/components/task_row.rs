//! Task Row Component
//!
//! One task in the list. Holds no state; every action goes to the parent.

use leptos::prelude::*;

use crate::models::Task;

/// DOM id shared by the checkbox and its label
pub fn checkbox_id(id: &str) -> String {
    format!("todo-{}", id)
}

/// Completed titles are struck through
pub fn title_class(is_completed: bool) -> &'static str {
    if is_completed {
        "todo-title line-through"
    } else {
        "todo-title"
    }
}

/// A single task row
#[component]
pub fn TaskRow(
    task: Task,
    #[prop(into)] on_toggle: Callback<String>,
    #[prop(into)] on_edit: Callback<String>,
    #[prop(into)] on_delete: Callback<String>,
) -> impl IntoView {
    let Task { id, title, is_completed } = task;
    let input_id = checkbox_id(&id);
    let (toggle_id, edit_id, delete_id) = (id.clone(), id.clone(), id);

    view! {
        <li class="todo-row">
            <div class="todo-main">
                <input
                    id=input_id.clone()
                    name=input_id.clone()
                    type="checkbox"
                    class="todo-checkbox"
                    prop:checked=is_completed
                    on:change=move |ev| {
                        // The row re-renders once the server confirms; until then show the cached state
                        event_target::<web_sys::HtmlInputElement>(&ev).set_checked(is_completed);
                        on_toggle.run(toggle_id.clone());
                    }
                />
                <label for=input_id class="todo-label">
                    <span class=title_class(is_completed)>{title}</span>
                </label>
            </div>
            <div class="todo-actions">
                <button type="button" class="edit-btn" on:click=move |_| on_edit.run(edit_id.clone())>
                    "✒"
                </button>
                <button type="button" class="delete-btn" on:click=move |_| on_delete.run(delete_id.clone())>
                    "✖"
                </button>
            </div>
        </li>
    }
}

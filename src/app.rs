//! To-Do Frontend App
//!
//! Root component: wires configuration, context and the task store.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::components::TaskListView;
use crate::config::ApiConfig;
use crate::context::AppContext;
use crate::store::TaskState;

#[component]
pub fn App() -> impl IntoView {
    let config = ApiConfig::resolve();
    let reload_trigger = signal(0u32);

    // The collection endpoint is the cache key
    provide_context(Store::new(TaskState::new(config.list_url())));
    provide_context(AppContext::new(config, reload_trigger));

    view! {
        <main class="app-layout">
            <TaskListView />
        </main>
    }
}

//! Application Context
//!
//! Shared state provided via Leptos Context API.

use leptos::prelude::*;

use crate::config::ApiConfig;

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Backend location
    config: StoredValue<ApiConfig>,
    /// Trigger to revalidate the task list - read
    pub reload_trigger: ReadSignal<u32>,
    /// Trigger to revalidate the task list - write
    set_reload_trigger: WriteSignal<u32>,
}

impl AppContext {
    pub fn new(config: ApiConfig, reload_trigger: (ReadSignal<u32>, WriteSignal<u32>)) -> Self {
        Self {
            config: StoredValue::new(config),
            reload_trigger: reload_trigger.0,
            set_reload_trigger: reload_trigger.1,
        }
    }

    pub fn config(&self) -> ApiConfig {
        self.config.get_value()
    }

    /// Ask for a fresh copy of the task list
    pub fn reload(&self) {
        self.set_reload_trigger.update(|v| *v += 1);
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}

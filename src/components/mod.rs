//! UI Components
//!
//! Leptos components for the to-do screen.

mod task_list_view;
mod task_row;

pub use task_list_view::TaskListView;
pub use task_row::TaskRow;

//! Browser Dialogs

use crate::models::normalize_title;

/// Blocking prompt pre-filled with `current`
///
/// Returns `None` when the user cancels or leaves only whitespace.
pub fn prompt_title(message: &str, current: &str) -> Option<String> {
    let answer = gloo::dialogs::prompt(message, Some(current));
    accept_answer(answer)
}

fn accept_answer(answer: Option<String>) -> Option<String> {
    answer.as_deref().and_then(normalize_title)
}

//! Bounded conversation window rendering.

use studyrag_core::types::{ChatTurn, Role};

/// Render the trailing `max_turns` entries of the conversation log as
/// labeled lines in chronological order. Empty history gives an empty
/// block. The block slots between the retrieved context and the current
/// question in the assembled prompt.
pub fn conversation_window(history: &[ChatTurn], max_turns: usize) -> String {
    if history.is_empty() || max_turns == 0 {
        return String::new();
    }
    let tail = &history[history.len().saturating_sub(max_turns)..];
    let mut block = String::from("\n\nPrevious conversation:\n");
    for turn in tail {
        let label = match turn.role {
            Role::Student => "Student",
            Role::Assistant => "Assistant",
        };
        block.push_str(label);
        block.push_str(": ");
        block.push_str(&turn.content);
        block.push('\n');
    }
    block.push('\n');
    block
}

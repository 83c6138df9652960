//! Plain-text rendering of the rabbit hole.

use crate::compose::display_text;
use crate::models::{Node, SessionState};

pub const UNTITLED: &str = "Untitled rabbit hole";
pub const EMPTY: &str = "No nodes added yet.";

/// Render the session as a tree of nodes.
///
/// Example output:
/// ```text
/// Physics
/// ├── [0] Albert Einstein
/// │   note: physicist
/// │   Albert Einstein was a German-born theoretical physicist.
/// └── [1] Photoelectric effect
///     note: the 1921 prize
/// ```
pub fn render_session(state: &SessionState) -> String {
    let mut output = String::new();
    if state.title.trim().is_empty() {
        output.push_str(UNTITLED);
    } else {
        output.push_str(&state.title);
    }
    output.push('\n');

    if state.nodes.is_empty() {
        output.push_str(EMPTY);
        output.push('\n');
        return output;
    }

    for (i, node) in state.nodes.iter().enumerate() {
        let is_last = i == state.nodes.len() - 1;
        render_node(&mut output, i, node, is_last);
    }
    output
}

fn render_node(output: &mut String, index: usize, node: &Node, is_last: bool) {
    let branch = if is_last { "└── " } else { "├── " };
    let continuation = if is_last { "    " } else { "│   " };

    output.push_str(branch);
    output.push_str(&format!("[{}] {}", index, node.article.title));
    output.push('\n');

    let note = display_text(&node.note);
    if !note.is_empty() {
        output.push_str(continuation);
        output.push_str("note: ");
        output.push_str(&note);
        output.push('\n');
    }

    for line in node.article.summary.lines().filter(|l| !l.trim().is_empty()) {
        output.push_str(continuation);
        output.push_str(line);
        output.push('\n');
    }
}

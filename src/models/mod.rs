//! Domain models for the rabbit hole.
//!
//! # Core Concepts
//!
//! - [`ArticleSummary`]: The canonical title, extract and optional thumbnail of a
//!   Wikipedia article. Replaced wholesale, never patched field by field.
//! - [`Node`]: One entry in the rabbit hole, pairing an article with the user's note.
//!   Nodes have no identity beyond their position in the session.
//! - [`SessionState`]: The session title plus the ordered list of nodes. Lives only
//!   for the lifetime of the process.
//! - [`SearchResult`]: A prefix-search candidate, ranked by the server.

mod article;
mod search;

pub use article::*;
pub use search::*;

//! Rabbit hole: a session-scoped, annotated trail of Wikipedia articles.
//!
//! - `models`: Articles, nodes, session state and search results
//! - `store`: The node store every mutation goes through
//! - `wiki`: Wikipedia client and the error-absorbing summary fetcher
//! - `debounce`: Cancellable scheduled search
//! - `picker`: Keyboard navigation over search results
//! - `compose`: Composition form state machine and mention markup
//! - `overlay`: Full-text detail view capturing summary overrides
//! - `render`: Plain-text session listing
//! - `api`: JSON HTTP surface
//! - `config`: File and environment configuration

pub mod api;
pub mod compose;
pub mod config;
pub mod debounce;
pub mod models;
pub mod overlay;
pub mod picker;
pub mod render;
pub mod store;
pub mod wiki;

//! Wikipedia access: the raw HTTP client plus the summary fetcher that wraps it.
//!
//! Three endpoints are used:
//! - REST summary: `{base}/api/rest_v1/page/summary/{Title_With_Underscores}`
//! - Action API full text: `{base}/w/api.php?action=query&prop=extracts&explaintext=1`
//! - Action API prefix search: `{base}/w/api.php?action=query&generator=prefixsearch`

mod client;
mod summary;
mod types;

pub use client::*;
pub use summary::*;

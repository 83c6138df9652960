//! Wire shapes of the Wikipedia responses we consume.

use std::collections::HashMap;

use serde::Deserialize;

use crate::models::{ArticleSummary, SearchResult, Thumbnail};

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryResponse {
    pub title: String,
    #[serde(default)]
    pub extract: String,
    pub thumbnail: Option<SummaryThumbnail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryThumbnail {
    pub source: String,
    pub width: u32,
    pub height: u32,
}

impl From<SummaryResponse> for ArticleSummary {
    fn from(data: SummaryResponse) -> Self {
        Self {
            title: data.title,
            summary: data.extract,
            thumbnail: data.thumbnail.map(|t| Thumbnail {
                url: t.source,
                width: t.width,
                height: t.height,
            }),
        }
    }
}

/// `prop=extracts` response. Pages are keyed by page id (`-1` for missing pages).
#[derive(Debug, Deserialize)]
pub(crate) struct ExtractResponse {
    pub query: Option<ExtractQuery>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtractQuery {
    #[serde(default)]
    pub pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtractPage {
    pub extract: Option<String>,
}

/// `generator=prefixsearch` response with `formatversion=2`, so pages is a list.
#[derive(Debug, Deserialize)]
pub(crate) struct PrefixSearchResponse {
    pub query: Option<PrefixSearchQuery>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PrefixSearchQuery {
    #[serde(default)]
    pub pages: Vec<PrefixSearchPage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PrefixSearchPage {
    pub title: String,
    pub description: Option<String>,
    pub thumbnail: Option<PageThumbnail>,
    pub index: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageThumbnail {
    pub source: String,
}

impl From<PrefixSearchPage> for SearchResult {
    fn from(page: PrefixSearchPage) -> Self {
        Self {
            title: page.title,
            description: page.description.unwrap_or_default(),
            thumbnail_url: page.thumbnail.map(|t| t.source),
            index: page.index,
        }
    }
}

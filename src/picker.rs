//! Keyboard navigation over search candidates.

use serde::{Deserialize, Serialize};

use crate::models::SearchResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickerKey {
    Down,
    Up,
    Enter,
    Escape,
}

#[derive(Debug, Clone, Default)]
pub struct ResultPicker {
    results: Vec<SearchResult>,
    highlighted: Option<usize>,
    open: bool,
}

impl ResultPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show a fresh result list. Opens only when there is something to show.
    pub fn set_results(&mut self, results: Vec<SearchResult>) {
        self.open = !results.is_empty();
        self.results = results;
        self.highlighted = None;
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Typing again forgets the highlighted entry.
    pub fn clear_highlight(&mut self) {
        self.highlighted = None;
    }

    /// Drop all results, as when an article has already been chosen.
    pub fn clear(&mut self) {
        self.results.clear();
        self.close();
    }

    /// Reopen on focus if there are results left from the last search.
    pub fn focus(&mut self) {
        self.open = !self.results.is_empty();
    }

    /// Handle a key. Returns the picked title on `Enter`.
    pub fn key(&mut self, key: PickerKey) -> Option<String> {
        if !self.open || self.results.is_empty() {
            return None;
        }

        match key {
            PickerKey::Down => {
                let last = self.results.len() - 1;
                self.highlighted = Some(match self.highlighted {
                    Some(i) => (i + 1).min(last),
                    None => 0,
                });
                None
            }
            PickerKey::Up => {
                self.highlighted = self.highlighted.and_then(|i| i.checked_sub(1));
                None
            }
            PickerKey::Enter => {
                let title = self.results.get(self.highlighted?)?.title.clone();
                self.close();
                Some(title)
            }
            PickerKey::Escape => {
                self.close();
                None
            }
        }
    }

    /// Pick a result directly, as a click would.
    pub fn pick(&mut self, index: usize) -> Option<String> {
        let title = self.results.get(index)?.title.clone();
        self.close();
        Some(title)
    }

    fn close(&mut self) {
        self.open = false;
        self.highlighted = None;
    }
}

//! Keystroke-driven article search for the composition form.
//!
//! Search-box and `@`-mention input both go through one debounced
//! [`SearchBox`]; every batch it delivers replaces the candidates in a
//! [`ResultPicker`]. Batches are applied in arrival order, so a slow earlier
//! response can still overwrite a newer one.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use super::{ComposeError, Composer};
use crate::debounce::SearchBox;
use crate::models::SearchResult;
use crate::picker::{PickerKey, ResultPicker};
use crate::wiki::WikiClient;

/// Read-only view of the candidate list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerView {
    pub results: Vec<SearchResult>,
    pub highlighted: Option<usize>,
    pub open: bool,
}

#[derive(Debug)]
pub struct SearchPanel {
    search_box: SearchBox,
    picker: Arc<Mutex<ResultPicker>>,
    listener: JoinHandle<()>,
}

impl SearchPanel {
    /// Must be called from within a tokio runtime.
    pub fn new(client: WikiClient, delay: Duration) -> Self {
        let (search_box, mut batches) = SearchBox::new(client, delay);
        let picker = Arc::new(Mutex::new(ResultPicker::new()));

        let shared = picker.clone();
        let listener = tokio::spawn(async move {
            while let Some(batch) = batches.recv().await {
                tracing::debug!("{} results for {:?}", batch.results.len(), batch.query);
                shared
                    .lock()
                    .expect("picker lock poisoned")
                    .set_results(batch.results);
            }
        });

        Self {
            search_box,
            picker,
            listener,
        }
    }

    /// Search-box keystroke.
    pub fn input(&mut self, term: impl Into<String>) {
        self.lock_picker().clear_highlight();
        self.search_box.input(term);
    }

    /// `@`-mention query typed into the note. Suggests nothing once the form
    /// already has an article.
    pub fn mention_input(&mut self, query: impl Into<String>, form: &Composer) {
        if form.selected_article().is_some() {
            self.search_box.cancel();
            self.lock_picker().clear();
            return;
        }
        self.input(query);
    }

    /// Keyboard navigation. `Enter` on a highlighted candidate selects it in the form.
    pub fn key(
        &mut self,
        key: PickerKey,
        form: &mut Composer,
    ) -> Result<Option<String>, ComposeError> {
        form.ensure_editable()?;
        let picked = self.lock_picker().key(key);
        self.select(picked, form)
    }

    /// Click on the candidate at `index`.
    pub fn pick(
        &mut self,
        index: usize,
        form: &mut Composer,
    ) -> Result<Option<String>, ComposeError> {
        form.ensure_editable()?;
        let picked = self.lock_picker().pick(index);
        self.select(picked, form)
    }

    pub fn view(&self) -> PickerView {
        let picker = self.lock_picker();
        PickerView {
            results: picker.results().to_vec(),
            highlighted: picker.highlighted(),
            open: picker.is_open(),
        }
    }

    fn select(
        &mut self,
        picked: Option<String>,
        form: &mut Composer,
    ) -> Result<Option<String>, ComposeError> {
        if let Some(title) = &picked {
            self.search_box.cancel();
            form.select_article(title.clone())?;
        }
        Ok(picked)
    }

    fn lock_picker(&self) -> std::sync::MutexGuard<'_, ResultPicker> {
        self.picker.lock().expect("picker lock poisoned")
    }
}

impl Drop for SearchPanel {
    fn drop(&mut self) {
        self.listener.abort();
    }
}

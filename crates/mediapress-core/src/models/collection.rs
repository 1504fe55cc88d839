//! Ordered media collection backing an announcement form.
//!
//! The collection holds public URLs in display order. The element at index 0
//! is the cover item wherever the collection feeds a preview or publish
//! payload; that invariant is enforced by consumers, the collection only
//! guarantees ordering.
//!
//! Removing an entry never deletes the underlying stored object; cleanup of
//! orphaned objects is handled out-of-band.

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("Reorder is not a permutation of the current collection")]
    NotPermutation,
}

/// Ordered sequence of media URLs scoped to one form instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaCollection {
    urls: Vec<String>,
}

impl MediaCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate from previously saved form values.
    pub fn from_urls(urls: Vec<String>) -> Self {
        Self { urls }
    }

    /// Append URLs at the end, preserving arrival order.
    pub fn append<I>(&mut self, urls: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.urls.extend(urls);
    }

    /// Remove the entry at `index`; later entries shift down. Returns the
    /// removed URL, or `None` when the index is out of range.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.urls.len() {
            Some(self.urls.remove(index))
        } else {
            None
        }
    }

    /// Replace the full ordering with `new_order`. Drag-and-drop reports a
    /// complete permutation, so anything that is not one is rejected.
    pub fn reorder(&mut self, new_order: Vec<String>) -> Result<(), CollectionError> {
        let mut current = self.urls.clone();
        let mut proposed = new_order.clone();
        current.sort_unstable();
        proposed.sort_unstable();
        if current != proposed {
            return Err(CollectionError::NotPermutation);
        }
        self.urls = new_order;
        Ok(())
    }

    /// The cover item: always the entry at index 0.
    pub fn cover(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.urls.iter()
    }
}

impl IntoIterator for MediaCollection {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.into_iter()
    }
}

/// Media fields of one announcement form: the primary image list and the
/// additional media list, persisted by the host form on every mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementMedia {
    pub images: MediaCollection,
    pub additional_medias: MediaCollection,
}

//! In-memory verse store.
//!
//! Loaded once at startup and read-only afterwards. Row `i` of the embedding
//! matrix built by [`crate::search::engine::SearchEngine`] corresponds to
//! [`VerseStore::get`]`(i)`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::types::{self, Verse, SURAH_COUNT};
use crate::error::SearchError;

/// Ordered, validated, immutable collection of verses.
#[derive(Debug, Clone)]
pub struct VerseStore {
    verses: Vec<Verse>,
}

impl VerseStore {
    /// Load and validate a JSON array of verse records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| SearchError::data_load(path, e))?;
        let verses: Vec<Verse> = serde_json::from_str(&json)
            .map_err(|e| SearchError::data_load(path, format!("invalid verse JSON: {e}")))?;

        let store = Self::validate(verses, path.to_path_buf())?;
        tracing::info!(
            path = %path.display(),
            verses = store.len(),
            surahs = store.surah_count(),
            "verse store loaded"
        );
        Ok(store)
    }

    /// Build a store from records already in memory.
    pub fn from_verses(verses: Vec<Verse>) -> Result<Self, SearchError> {
        Self::validate(verses, PathBuf::from("<memory>"))
    }

    fn validate(verses: Vec<Verse>, origin: PathBuf) -> Result<Self, SearchError> {
        let mut seen = HashSet::with_capacity(verses.len());
        for (i, verse) in verses.iter().enumerate() {
            if !(1..=SURAH_COUNT).contains(&verse.surah) {
                return Err(SearchError::data_load(
                    origin,
                    format!("record {i}: surah {} outside 1-{SURAH_COUNT}", verse.surah),
                ));
            }
            if verse.ayah == 0 {
                return Err(SearchError::data_load(
                    origin,
                    format!("record {i}: ayah must be positive"),
                ));
            }
            if !seen.insert(verse.key()) {
                return Err(SearchError::data_load(
                    origin,
                    format!("record {i}: duplicate verse {}:{}", verse.surah, verse.ayah),
                ));
            }
        }
        Ok(Self { verses })
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Verse> {
        self.verses.get(index)
    }

    pub fn verses(&self) -> &[Verse] {
        &self.verses
    }

    /// Embedding input for every verse, in store order.
    pub fn embedding_texts(&self) -> Vec<&str> {
        self.verses.iter().map(Verse::embedding_text).collect()
    }

    /// Number of distinct surahs represented.
    pub fn surah_count(&self) -> usize {
        types::surah_count(&self.verses)
    }
}

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use verse_finder::embedding::EmbeddingProvider;
use verse_finder::search::SearchEngine;
use verse_finder::verses::dataset::save_verses;
use verse_finder::verses::{Verse, VerseStore};

/// Deterministic bag-of-words embedding over a fixed vocabulary.
///
/// Dimension `i` counts occurrences of `vocabulary[i]`; words outside the
/// vocabulary are ignored. Texts sharing vocabulary words get positive
/// cosine similarity, texts sharing none score 0.
pub struct KeywordProvider {
    vocabulary: Vec<String>,
}

impl KeywordProvider {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|w| w.to_lowercase()).collect(),
        }
    }
}

impl EmbeddingProvider for KeywordProvider {
    fn encode(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut v = vec![0.0f32; self.vocabulary.len()];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let word = word.to_lowercase();
            if let Some(i) = self.vocabulary.iter().position(|w| *w == word) {
                v[i] += 1.0;
            }
        }
        Ok(v)
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }
}

pub const VOCABULARY: [&str; 12] = [
    "god", "name", "praise", "merciful", "lord", "worlds", "patience", "prayer", "mercy",
    "forgive", "guidance", "day",
];

pub fn verse(surah: u16, ayah: u32, translation: &str) -> Verse {
    Verse::new(surah, ayah, format!("arabic {surah}:{ayah}"), translation.to_string())
}

/// A handful of verses with translations built from [`VOCABULARY`] words.
pub fn sample_verses() -> Vec<Verse> {
    vec![
        verse(1, 1, "In the name of God, the Merciful"),
        verse(1, 2, "Praise be to God, Lord of the worlds"),
        verse(1, 4, "Sovereign of the Day of Judgment"),
        verse(2, 153, "Seek help through patience and prayer"),
        verse(39, 53, "Do not despair of the mercy of God; He will forgive"),
        verse(1, 6, "Show us the straight path of guidance"),
    ]
}

/// Write `verses` to a dataset file in a fresh temp dir.
pub fn write_dataset(verses: &[Verse]) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("quran_verses.json");
    save_verses(&path, verses).unwrap();
    (dir, path)
}

/// Build an engine over `verses` with the keyword provider.
pub fn test_engine(verses: Vec<Verse>) -> SearchEngine {
    let store = VerseStore::from_verses(verses).unwrap();
    let provider: Arc<dyn EmbeddingProvider> = Arc::new(KeywordProvider::new(&VOCABULARY));
    SearchEngine::build(store, provider, 4, false).unwrap()
}

//! Verse record definition.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Number of surahs in the Quran.
pub const SURAH_COUNT: u16 = 114;

/// A single verse record, as stored in the dataset JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verse {
    /// Surah (chapter) number, `1..=114`.
    pub surah: u16,
    /// Ayah (verse) number within the surah, starting at 1.
    pub ayah: u32,
    /// Original Arabic text.
    pub arabic: String,
    /// Latin transliteration. Empty when the source provides none.
    #[serde(default)]
    pub transliteration: String,
    /// English translation. Required in the file, but may be empty when the
    /// source has none.
    pub translation: String,
    /// Text fed to the embedding model.
    #[serde(default)]
    pub text: String,
}

/// Uniqueness key of a verse within a dataset.
pub type VerseKey = (u16, u32);

impl Verse {
    /// Build a verse from fetched parts. `text` is the translation, or the
    /// Arabic when no translation exists.
    pub fn new(surah: u16, ayah: u32, arabic: String, translation: String) -> Self {
        let text = if translation.trim().is_empty() {
            arabic.clone()
        } else {
            translation.clone()
        };
        Self {
            surah,
            ayah,
            arabic,
            transliteration: String::new(),
            translation,
            text,
        }
    }

    pub fn key(&self) -> VerseKey {
        (self.surah, self.ayah)
    }

    /// The string to embed: `text`, then `translation`, then `arabic`,
    /// skipping blank candidates.
    pub fn embedding_text(&self) -> &str {
        [&self.text, &self.translation, &self.arabic]
            .into_iter()
            .find(|s| !s.trim().is_empty())
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Number of distinct surahs among `verses`.
pub fn surah_count(verses: &[Verse]) -> usize {
    verses.iter().map(|v| v.surah).collect::<HashSet<_>>().len()
}

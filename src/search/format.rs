//! Turn ranked indices into display records and markdown.

use serde::{Deserialize, Serialize};

use super::rank::Ranked;
use crate::verses::{surah_name, VerseStore};

pub const NO_RESULTS_MESSAGE: &str = "No results found. Please try a different search query.";
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a search query.";

/// A verse matched by a query, enriched for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub surah: u16,
    pub surah_name: String,
    pub ayah: u32,
    pub arabic: String,
    pub translation: String,
    pub transliteration: String,
    pub similarity: f32,
}

/// Map ranked rows back to their verses.
///
/// # Panics
///
/// If a ranked index is outside the store. The ranker only emits indices of
/// matrix rows, and the matrix has one row per stored verse.
pub fn format_results(ranked: &[Ranked], store: &VerseStore) -> Vec<SearchResult> {
    ranked
        .iter()
        .map(|r| {
            let verse = store.get(r.index).unwrap_or_else(|| {
                panic!("ranked index {} outside store of {} verses", r.index, store.len())
            });
            SearchResult {
                surah: verse.surah,
                surah_name: surah_name(verse.surah).into_owned(),
                ayah: verse.ayah,
                arabic: verse.arabic.clone(),
                translation: verse.translation.clone(),
                transliteration: verse.transliteration.clone(),
                similarity: r.score,
            }
        })
        .collect()
}

/// Render results as markdown, one block per verse.
pub fn render_markdown(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return NO_RESULTS_MESSAGE.to_string();
    }

    let mut out = String::new();
    for (i, r) in results.iter().enumerate() {
        let transliteration = if r.transliteration.is_empty() {
            "N/A"
        } else {
            r.transliteration.as_str()
        };
        out.push_str(&format!(
            "\n**Result {}** (Similarity: {:.2}%)\n**{} ({}:{})**\n\n\
             **Arabic:**\n{}\n\n\
             **Transliteration:**\n{}\n\n\
             **Translation:**\n{}\n\n---\n",
            i + 1,
            r.similarity * 100.0,
            r.surah_name,
            r.surah,
            r.ayah,
            r.arabic,
            transliteration,
            r.translation,
        ));
    }
    out
}

//! Offline dataset maintenance: fetch, merge, deduplicate, sort, save.
//!
//! These operations run out-of-band from the server. A failed fetch never
//! touches the file on disk, and [`save_verses`] writes atomically.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::types::{Verse, VerseKey};
use crate::error::SearchError;

pub const ARABIC_URL: &str = "https://api.alquran.cloud/v1/quran/quran-uthmani";
pub const TRANSLATION_URL: &str = "https://api.alquran.cloud/v1/quran/en.sahih";

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of [`merge_verses`].
#[derive(Debug)]
pub struct MergeOutcome {
    pub verses: Vec<Verse>,
    /// Number of records taken from the new set.
    pub added: usize,
}

/// Append the records of `new` whose `(surah, ayah)` key is not yet present.
///
/// Every existing record is kept, in its original order.
pub fn merge_verses(existing: Vec<Verse>, new: Vec<Verse>) -> MergeOutcome {
    let mut keys: HashSet<VerseKey> = existing.iter().map(Verse::key).collect();
    let mut verses = existing;
    let mut added = 0;
    for verse in new {
        if keys.insert(verse.key()) {
            verses.push(verse);
            added += 1;
        }
    }
    MergeOutcome { verses, added }
}

/// Drop repeated `(surah, ayah)` keys, keeping the first occurrence.
pub fn deduplicate_verses(verses: Vec<Verse>) -> Vec<Verse> {
    let mut seen = HashSet::with_capacity(verses.len());
    verses.into_iter().filter(|v| seen.insert(v.key())).collect()
}

/// Sort by `(surah, ayah)`.
pub fn sort_verses(verses: &mut [Verse]) {
    verses.sort_by_key(Verse::key);
}

/// Load a dataset file, treating a missing file as an empty dataset.
pub fn load_or_empty(path: &Path) -> Result<Vec<Verse>> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no dataset file yet, starting empty");
        return Ok(Vec::new());
    }
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset: {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("failed to parse dataset: {}", path.display()))
}

/// Write the dataset as pretty JSON. Uses atomic write (tmp + rename).
pub fn save_verses(path: &Path, verses: &[Verse]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir: {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(verses)?;
    let tmp_path = path.with_extension("tmp");
    std::fs::write(&tmp_path, json)
        .with_context(|| format!("failed to write temp file: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path).context("failed to rename temp file")?;
    tracing::info!(path = %path.display(), verses = verses.len(), "dataset saved");
    Ok(())
}

// ── alquran.cloud API ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ApiResponse {
    data: ApiEdition,
}

#[derive(Debug, Deserialize)]
struct ApiEdition {
    surahs: Vec<ApiSurah>,
}

#[derive(Debug, Deserialize)]
struct ApiSurah {
    number: u16,
    ayahs: Vec<ApiAyah>,
}

#[derive(Debug, Deserialize)]
struct ApiAyah {
    #[serde(rename = "numberInSurah")]
    number_in_surah: u32,
    text: String,
}

/// Join an Arabic edition with a translation edition into verse records.
///
/// Verses with no matching translation fall back to the Arabic text for
/// embedding.
fn join_editions(arabic: ApiEdition, translation: ApiEdition) -> Vec<Verse> {
    let mut translations: HashMap<VerseKey, String> = translation
        .surahs
        .into_iter()
        .flat_map(|s| {
            let surah = s.number;
            s.ayahs
                .into_iter()
                .map(move |a| ((surah, a.number_in_surah), a.text))
        })
        .collect();

    arabic
        .surahs
        .into_iter()
        .flat_map(|s| {
            let surah = s.number;
            s.ayahs
                .into_iter()
                .map(move |a| (surah, a.number_in_surah, a.text))
        })
        .map(|(surah, ayah, text)| {
            let translation = translations.remove(&(surah, ayah)).unwrap_or_default();
            Verse::new(surah, ayah, text, translation)
        })
        .collect()
}

async fn fetch_edition(client: &reqwest::Client, url: &str) -> Result<ApiEdition, SearchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SearchError::DatasetFetch(format!("HTTP request failed for {url}: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SearchError::DatasetFetch(format!("{url} returned HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| SearchError::DatasetFetch(format!("error reading {url}: {e}")))?;
    let parsed: ApiResponse = serde_json::from_str(&body)
        .map_err(|e| SearchError::DatasetFetch(format!("unexpected response from {url}: {e}")))?;
    Ok(parsed.data)
}

/// Download an Arabic edition and a translation edition and join them.
///
/// Both endpoints must answer in the alquran.cloud format; the public ones
/// are [`ARABIC_URL`] and [`TRANSLATION_URL`].
pub async fn fetch_from(
    arabic_url: &str,
    translation_url: &str,
) -> Result<Vec<Verse>, SearchError> {
    let client = reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| SearchError::DatasetFetch(e.to_string()))?;

    tracing::info!(url = arabic_url, "fetching Arabic text");
    tracing::info!(url = translation_url, "fetching English translation");
    let (arabic, translation) = tokio::try_join!(
        fetch_edition(&client, arabic_url),
        fetch_edition(&client, translation_url),
    )?;

    let verses = join_editions(arabic, translation);
    tracing::info!(verses = verses.len(), "fetched verses from API");
    Ok(verses)
}

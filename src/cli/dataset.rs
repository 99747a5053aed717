//! CLI `dataset` commands — maintain the verse JSON file.

use anyhow::{Context, Result};

use crate::config::VerseFinderConfig;
use crate::verses::dataset::{
    self, deduplicate_verses, load_or_empty, merge_verses, save_verses, sort_verses,
};
use crate::verses::types::surah_count;

/// Fetch the full text from the public API and merge it into the dataset file.
///
/// If the fetch fails the file is left untouched.
pub async fn fetch(config: &VerseFinderConfig) -> Result<()> {
    fetch_from(config, dataset::ARABIC_URL, dataset::TRANSLATION_URL).await
}

/// Same as [`fetch`], against explicit edition endpoints.
pub async fn fetch_from(
    config: &VerseFinderConfig,
    arabic_url: &str,
    translation_url: &str,
) -> Result<()> {
    let path = config.resolved_dataset_path();
    let existing = load_or_empty(&path)?;
    println!("Current dataset: {} verses", existing.len());

    let new = dataset::fetch_from(arabic_url, translation_url)
        .await
        .context("could not fetch from API; current dataset unchanged")?;

    let outcome = merge_verses(existing, new);
    println!("Added {} new verses", outcome.added);

    let mut verses = deduplicate_verses(outcome.verses);
    sort_verses(&mut verses);
    save_verses(&path, &verses)?;

    println!("Total verses in dataset: {}", verses.len());
    println!("Unique surahs: {}", surah_count(&verses));
    Ok(())
}

/// Print verse and surah counts for the dataset file.
pub fn stats(config: &VerseFinderConfig) -> Result<()> {
    let path = config.resolved_dataset_path();
    let verses = load_or_empty(&path)?;
    println!("Dataset:        {}", path.display());
    println!("Verses:         {}", verses.len());
    println!("Unique surahs:  {}", surah_count(&verses));
    Ok(())
}

/// Deduplicate and sort the dataset file in place.
pub fn tidy(config: &VerseFinderConfig) -> Result<()> {
    let path = config.resolved_dataset_path();
    let verses = load_or_empty(&path)?;
    let before = verses.len();

    let mut verses = deduplicate_verses(verses);
    sort_verses(&mut verses);
    save_verses(&path, &verses)?;

    println!(
        "Removed {} duplicate verses, {} remain.",
        before - verses.len(),
        verses.len()
    );
    Ok(())
}

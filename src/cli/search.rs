use anyhow::Result;
use std::sync::Arc;

use crate::config::VerseFinderConfig;
use crate::search::SearchEngine;
use crate::verses::VerseStore;

/// Run a one-off search from the terminal and print the markdown output.
pub async fn search(config: &VerseFinderConfig, query: &str, top_k: Option<i64>) -> Result<()> {
    let store = VerseStore::load(config.resolved_dataset_path())?;
    let top_k = config.clamp_results(top_k) as i64;

    let embedding_config = config.embedding.clone();
    let batch_size = config.search.batch_size;
    let query = query.to_string();

    let output = tokio::task::spawn_blocking(move || -> Result<String> {
        let provider: Arc<dyn crate::embedding::EmbeddingProvider> =
            Arc::from(crate::embedding::create_provider(&embedding_config)?);
        let engine = SearchEngine::build(store, provider, batch_size, true)?;
        Ok(engine.search_markdown(&query, top_k)?)
    })
    .await??;

    println!("{output}");
    Ok(())
}

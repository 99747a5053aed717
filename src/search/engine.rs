//! Process-wide search state and the per-query pipeline.
//!
//! [`SearchEngine::build`] embeds every verse once. After that the store and
//! matrix are never mutated, so an `Arc<SearchEngine>` can be shared across
//! request handlers without locking.

use std::sync::Arc;

use ndarray::Array2;

use super::format::{format_results, render_markdown, SearchResult, EMPTY_QUERY_MESSAGE};
use super::rank::rank;
use crate::embedding::{encode_matrix, EmbeddingProvider};
use crate::error::SearchError;
use crate::verses::VerseStore;

pub struct SearchEngine {
    store: VerseStore,
    matrix: Array2<f32>,
    provider: Arc<dyn EmbeddingProvider>,
}

impl SearchEngine {
    /// Embed every verse in `store` and keep the matrix for the engine's lifetime.
    pub fn build(
        store: VerseStore,
        provider: Arc<dyn EmbeddingProvider>,
        batch_size: usize,
        show_progress: bool,
    ) -> Result<Self, SearchError> {
        tracing::info!(verses = store.len(), "creating verse embeddings");
        let texts = store.embedding_texts();
        let matrix = encode_matrix(provider.as_ref(), &texts, batch_size, show_progress)?;
        tracing::info!(
            verses = matrix.nrows(),
            dimensions = matrix.ncols(),
            "verse embeddings ready"
        );

        Ok(Self {
            store,
            matrix,
            provider,
        })
    }

    pub fn store(&self) -> &VerseStore {
        &self.store
    }

    pub fn dimensions(&self) -> usize {
        self.matrix.ncols()
    }

    /// Rank all verses against `query` and return the best `top_k`.
    ///
    /// A blank query returns no results without calling the model.
    pub fn search(&self, query: &str, top_k: i64) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim();
        if query.is_empty() || top_k <= 0 {
            return Ok(Vec::new());
        }

        let query_vec = self
            .provider
            .encode(query)
            .map_err(|e| SearchError::Encode(format!("{e:#}")))?;
        let ranked = rank(&query_vec, &self.matrix, top_k);

        tracing::debug!(
            query_len = query.len(),
            top_k,
            returned = ranked.len(),
            best = ranked.first().map(|r| r.score),
            "search complete"
        );

        Ok(format_results(&ranked, &self.store))
    }

    /// [`search`](Self::search), rendered as markdown for display.
    pub fn search_markdown(&self, query: &str, top_k: i64) -> Result<String, SearchError> {
        if query.trim().is_empty() {
            return Ok(EMPTY_QUERY_MESSAGE.to_string());
        }
        let results = self.search(query, top_k)?;
        Ok(render_markdown(&results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verses::Verse;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Axis-aligned vectors keyed on the first letter, counting encode calls.
    struct CountingProvider {
        calls: AtomicUsize,
    }

    impl EmbeddingProvider for CountingProvider {
        fn encode(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut v = vec![0.0; 4];
            match text.chars().next().map(|c| c.to_ascii_lowercase()) {
                Some('a') => v[0] = 1.0,
                Some('b') => v[1] = 1.0,
                Some('c') => v[2] = 1.0,
                _ => v[3] = 1.0,
            }
            Ok(v)
        }

        fn dimensions(&self) -> usize {
            4
        }
    }

    fn engine() -> (SearchEngine, Arc<CountingProvider>) {
        let store = VerseStore::from_verses(vec![
            Verse::new(1, 1, "x".into(), "apple".into()),
            Verse::new(1, 2, "x".into(), "banana".into()),
            Verse::new(1, 3, "x".into(), "cherry".into()),
        ])
        .unwrap();
        let provider = Arc::new(CountingProvider {
            calls: AtomicUsize::new(0),
        });
        let engine = SearchEngine::build(store, provider.clone(), 2, false).unwrap();
        (engine, provider)
    }

    #[test]
    fn build_embeds_every_verse_once() {
        let (engine, provider) = engine();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(engine.dimensions(), 4);
        assert_eq!(engine.store().len(), 3);
    }

    #[test]
    fn search_returns_best_match_first() {
        let (engine, _) = engine();
        let results = engine.search("Bananas please", 2).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].ayah, 2);
        assert!((results[0].similarity - 1.0).abs() < 1e-6);
    }

    #[test]
    fn blank_query_skips_the_model() {
        let (engine, provider) = engine();
        assert!(engine.search("   \n", 5).unwrap().is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(engine.search_markdown("", 5).unwrap(), EMPTY_QUERY_MESSAGE);
    }

    #[test]
    fn non_positive_top_k_is_empty() {
        let (engine, _) = engine();
        assert!(engine.search("apple", 0).unwrap().is_empty());
        assert!(engine.search("apple", -1).unwrap().is_empty());
        assert_eq!(engine.search("apple", 50).unwrap().len(), 3);
    }

    #[test]
    fn search_markdown_renders_results() {
        let (engine, _) = engine();
        let md = engine.search_markdown("cherry", 1).unwrap();
        assert!(md.contains("**Al-Fatihah (1:3)**"));
        assert!(md.contains("Similarity: 100.00%"));
    }
}

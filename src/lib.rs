//! Semantic search over Quran verses.
//!
//! verse-finder embeds a fixed collection of verses once at startup with a
//! local sentence-embedding model, embeds each query with the same model, and
//! ranks the collection by cosine similarity. Results are served through a
//! small web form and a JSON endpoint.
//!
//! # Architecture
//!
//! - **Data**: a JSON array of verse records, loaded into memory and never mutated
//! - **Embeddings**: Local ONNX Runtime with all-MiniLM-L6-v2 (384 dimensions)
//! - **Search**: exact linear scan, cosine similarity, top-K with index tie-break
//! - **Transport**: axum HTTP server (HTML form + JSON)
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`error`] — Domain error taxonomy
//! - [`verses`] — Verse records, the in-memory store, surah names, dataset maintenance
//! - [`embedding`] — Text-to-vector embedding pipeline via ONNX Runtime
//! - [`search`] — Ranking, result formatting, and the shared search engine
//! - [`server`] — Web form and JSON API
//! - [`cli`] — Terminal commands (model download, one-off search, dataset tools)

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod search;
pub mod server;
pub mod verses;

//! Matching core: normalization, keyword extraction, embeddings and scoring

pub mod vocabulary;
pub mod text_processor;
pub mod embeddings;
pub mod embedding_manager;
pub mod keyword_booster;
pub mod scoring;
pub mod diff;
pub mod matcher;
pub mod batch;

//! Natural Language Processing components
//!
//! This module provides sentence splitting, tokenization, stemming and stopword filtering.

pub mod language;
pub mod splitter;
pub mod stopwords;
pub mod tokenizer;

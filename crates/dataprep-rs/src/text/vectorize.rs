//! Vocabulary-learning text vectorizers.
//!
//! All three vectorizers share the same fit step: standardize each document,
//! tokenize on whitespace, drop stop words, and assign each unseen token the
//! next dense index (the vocabulary size at insertion time). They differ only
//! in what `transform` writes: occurrence counts, 0/1 presence flags, or the
//! token indices themselves.

use std::collections::HashMap;

use anyhow::{ensure, Result};

use crate::tensor::{DType, Matrix, Scalar};

use super::standardize::{standardize, tokenize, StandardizeConfig};
use super::stop_words::StopWords;

/// Index reserved for padding in [`IndexVectorizer`] output.
pub const PAD_TOKEN: &str = "__pad__";
/// Index reserved for out-of-vocabulary tokens in [`IndexVectorizer`] output.
pub const UNK_TOKEN: &str = "__unk__";

/// Options shared by every vectorizer.
#[derive(Debug, Clone, Default)]
pub struct VectorizerOptions {
    pub standardize: StandardizeConfig,
    pub stop_words: StopWords,
}

fn doc_tokens(doc: &str, options: &VectorizerOptions) -> Vec<String> {
    let text = standardize(doc, &options.standardize);
    tokenize(&text)
        .filter(|token| !options.stop_words.contains(token))
        .map(str::to_string)
        .collect()
}

fn grow_vocabulary(vocabulary: &mut HashMap<String, usize>, tokens: &[String]) {
    for token in tokens {
        if !vocabulary.contains_key(token) {
            vocabulary.insert(token.clone(), vocabulary.len());
        }
    }
}

/// Bag-of-words vectorizer: one column per vocabulary token, cells hold
/// occurrence counts.
#[derive(Debug, Clone, Default)]
pub struct CountVectorizer {
    options: VectorizerOptions,
    vocabulary: HashMap<String, usize>,
}

impl CountVectorizer {
    pub fn new(options: VectorizerOptions) -> Self {
        CountVectorizer {
            options,
            vocabulary: HashMap::new(),
        }
    }

    /// Learns (or extends) the vocabulary from `docs`.
    pub fn fit(&mut self, docs: &[&str]) -> &mut Self {
        for doc in docs {
            let tokens = doc_tokens(doc, &self.options);
            grow_vocabulary(&mut self.vocabulary, &tokens);
        }
        self
    }

    /// Borrows the learned token-to-column mapping.
    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Produces a `[docs.len(), vocabulary.len()]` matrix of token counts.
    ///
    /// Tokens outside the vocabulary are ignored. Counting goes through the
    /// engine's checked in-place add, so a count exceeding the chosen element
    /// kind surfaces as an error instead of wrapping.
    pub fn transform(&self, docs: &[&str], dtype: DType) -> Result<Matrix> {
        ensure!(
            !self.vocabulary.is_empty(),
            "transform called before fit learned any vocabulary"
        );
        let mut out = Matrix::zeros(dtype, docs.len(), self.vocabulary.len())?;
        for (row, doc) in docs.iter().enumerate() {
            for token in doc_tokens(doc, &self.options) {
                if let Some(&col) = self.vocabulary.get(&token) {
                    out.set_add(row, col, Scalar::one(dtype))?;
                }
            }
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, docs: &[&str], dtype: DType) -> Result<Matrix> {
        self.fit(docs).transform(docs, dtype)
    }
}

/// Presence vectorizer: like [`CountVectorizer`] but cells are capped at one.
#[derive(Debug, Clone, Default)]
pub struct MultiHotVectorizer {
    options: VectorizerOptions,
    vocabulary: HashMap<String, usize>,
}

impl MultiHotVectorizer {
    pub fn new(options: VectorizerOptions) -> Self {
        MultiHotVectorizer {
            options,
            vocabulary: HashMap::new(),
        }
    }

    pub fn fit(&mut self, docs: &[&str]) -> &mut Self {
        for doc in docs {
            let tokens = doc_tokens(doc, &self.options);
            grow_vocabulary(&mut self.vocabulary, &tokens);
        }
        self
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Produces a `[docs.len(), vocabulary.len()]` matrix of 0/1 flags.
    pub fn transform(&self, docs: &[&str], dtype: DType) -> Result<Matrix> {
        ensure!(
            !self.vocabulary.is_empty(),
            "transform called before fit learned any vocabulary"
        );
        let mut out = Matrix::zeros(dtype, docs.len(), self.vocabulary.len())?;
        for (row, doc) in docs.iter().enumerate() {
            for token in doc_tokens(doc, &self.options) {
                if let Some(&col) = self.vocabulary.get(&token) {
                    out.set_cell(row, col, Scalar::one(dtype))?;
                }
            }
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, docs: &[&str], dtype: DType) -> Result<Matrix> {
        self.fit(docs).transform(docs, dtype)
    }
}

/// Sequence vectorizer: each row holds the token indices of one document,
/// right-padded to the longest document in the batch.
///
/// Index 0 is reserved for padding and index 1 for out-of-vocabulary tokens;
/// real tokens start at 2.
#[derive(Debug, Clone)]
pub struct IndexVectorizer {
    options: VectorizerOptions,
    vocabulary: HashMap<String, usize>,
}

impl IndexVectorizer {
    pub fn new(options: VectorizerOptions) -> Self {
        let mut vocabulary = HashMap::new();
        vocabulary.insert(PAD_TOKEN.to_string(), 0);
        vocabulary.insert(UNK_TOKEN.to_string(), 1);
        IndexVectorizer {
            options,
            vocabulary,
        }
    }

    pub fn fit(&mut self, docs: &[&str]) -> &mut Self {
        for doc in docs {
            let tokens = doc_tokens(doc, &self.options);
            grow_vocabulary(&mut self.vocabulary, &tokens);
        }
        self
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Produces a `[docs.len(), longest_doc]` matrix of token indices.
    ///
    /// Unknown tokens map to the reserved index 1; shorter documents are
    /// padded with the reserved index 0. A vocabulary index that does not fit
    /// the chosen element kind surfaces as an error.
    pub fn transform(&self, docs: &[&str], dtype: DType) -> Result<Matrix> {
        let tokenized: Vec<Vec<String>> = docs
            .iter()
            .map(|doc| doc_tokens(doc, &self.options))
            .collect();
        let width = tokenized.iter().map(Vec::len).max().unwrap_or(0);
        let mut out = Matrix::zeros(dtype, docs.len(), width)?;
        for (row, tokens) in tokenized.iter().enumerate() {
            for (col, token) in tokens.iter().enumerate() {
                let index = self.vocabulary.get(token).copied().unwrap_or(1);
                out.set_cell(row, col, Scalar::from_usize(dtype, index)?)?;
            }
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, docs: &[&str], dtype: DType) -> Result<Matrix> {
        self.fit(docs).transform(docs, dtype)
    }
}

impl Default for IndexVectorizer {
    fn default() -> Self {
        IndexVectorizer::new(VectorizerOptions::default())
    }
}

//! Text preparation: standardization, vocabulary vectorizers, TF-IDF.

mod standardize;
mod stop_words;
mod tfidf;
mod vectorize;

pub use standardize::{standardize, tokenize, StandardizeConfig};
pub use stop_words::StopWords;
pub use tfidf::TfIdfTransformer;
pub use vectorize::{
    CountVectorizer, IndexVectorizer, MultiHotVectorizer, VectorizerOptions, PAD_TOKEN,
    UNK_TOKEN,
};

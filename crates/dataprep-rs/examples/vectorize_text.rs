use anyhow::Result;
use dataprep_rs::tensor::DType;
use dataprep_rs::text::{CountVectorizer, StopWords, TfIdfTransformer, VectorizerOptions};

fn main() -> Result<()> {
    let docs = [
        "the quick brown fox jumps over the lazy dog",
        "a quick movie review: the dog steals the show",
        "brown foxes and lazy dogs make poor reviewers",
    ];

    let options = VectorizerOptions {
        stop_words: StopWords::English,
        ..VectorizerOptions::default()
    };
    let mut vectorizer = CountVectorizer::new(options);
    let counts = vectorizer.fit_transform(&docs, DType::U32)?;
    println!("vocabulary size: {}", vectorizer.vocabulary().len());
    println!("counts:\n{counts}");

    let weighted = TfIdfTransformer::new().fit_transform(&counts)?;
    println!("tf-idf:\n{weighted}");
    Ok(())
}

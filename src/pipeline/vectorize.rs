use std::collections::HashMap;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineError;

/// N-gram bag-of-words vectorizer.
///
/// `fit` builds the vocabulary once; `transform` only counts against it.
/// The vocabulary is frozen after fitting — n-grams unseen at fit time are
/// silently ignored at transform time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vectorizer {
    ngram_range: (usize, usize),
    max_features: usize,
    vocabulary: HashMap<String, usize>,
}

impl Vectorizer {
    pub fn new(ngram_range: (usize, usize), max_features: usize) -> Self {
        Self {
            ngram_range,
            max_features,
            vocabulary: HashMap::new(),
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &HashMap<String, usize> {
        &self.vocabulary
    }

    /// Builds the vocabulary from the documents.
    ///
    /// When more than `max_features` distinct n-grams occur, the most
    /// frequent ones are kept, with ties broken alphabetically so fitting is
    /// deterministic. Feature indices are assigned in alphabetical term
    /// order.
    pub fn fit(&mut self, documents: &[String]) -> Result<(), PipelineError> {
        if documents.is_empty() {
            return Err(PipelineError::Training(
                "cannot fit vectorizer on an empty document set".to_string(),
            ));
        }

        let mut term_counts: HashMap<String, usize> = HashMap::new();
        for document in documents {
            for ngram in self.ngrams(document) {
                *term_counts.entry(ngram).or_insert(0) += 1;
            }
        }

        let mut terms: Vec<(String, usize)> = term_counts.into_iter().collect();
        if terms.len() > self.max_features {
            terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            terms.truncate(self.max_features);
        }

        let mut selected: Vec<String> = terms.into_iter().map(|(term, _)| term).collect();
        selected.sort_unstable();

        self.vocabulary = selected
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term, index))
            .collect();
        Ok(())
    }

    /// Counts the documents' n-grams against the frozen vocabulary.
    ///
    /// Rows align 1:1 with `documents`; out-of-vocabulary n-grams are
    /// dropped without notice.
    pub fn transform(&self, documents: &[String]) -> Result<Array2<f32>, PipelineError> {
        if self.vocabulary.is_empty() {
            return Err(PipelineError::Prediction(
                "vectorizer has not been fitted".to_string(),
            ));
        }

        let mut matrix = Array2::zeros((documents.len(), self.vocabulary.len()));
        for (row, document) in documents.iter().enumerate() {
            for ngram in self.ngrams(document) {
                if let Some(&column) = self.vocabulary.get(&ngram) {
                    matrix[[row, column]] += 1.0;
                }
            }
        }
        Ok(matrix)
    }

    fn ngrams(&self, document: &str) -> Vec<String> {
        let tokens: Vec<&str> = document.split_whitespace().collect();
        let (min_n, max_n) = self.ngram_range;
        let mut ngrams = Vec::new();
        for n in min_n..=max_n {
            if n == 0 || n > tokens.len() {
                continue;
            }
            for window in tokens.windows(n) {
                ngrams.push(window.join(" "));
            }
        }
        ngrams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn documents() -> Vec<String> {
        vec![
            "payment failed again".to_string(),
            "payment screen froze".to_string(),
            "recorder broken".to_string(),
        ]
    }

    #[test]
    fn test_fit_builds_unigrams_and_bigrams() -> Result<(), PipelineError> {
        let mut vectorizer = Vectorizer::new((1, 2), 100);
        vectorizer.fit(&documents())?;
        assert!(vectorizer.vocabulary().contains_key("payment"));
        assert!(vectorizer.vocabulary().contains_key("payment failed"));
        Ok(())
    }

    #[test]
    fn test_max_features_keeps_most_frequent() -> Result<(), PipelineError> {
        let mut vectorizer = Vectorizer::new((1, 1), 1);
        vectorizer.fit(&documents())?;
        assert_eq!(vectorizer.vocabulary_size(), 1);
        assert!(vectorizer.vocabulary().contains_key("payment"));
        Ok(())
    }

    #[test]
    fn test_transform_never_grows_the_vocabulary() -> Result<(), PipelineError> {
        let mut vectorizer = Vectorizer::new((1, 2), 100);
        vectorizer.fit(&documents())?;
        let size = vectorizer.vocabulary_size();

        let unseen = vec!["entirely novel words here".to_string()];
        let matrix = vectorizer.transform(&unseen)?;
        assert_eq!(vectorizer.vocabulary_size(), size);
        assert_eq!(matrix.shape(), &[1, size]);
        assert_eq!(matrix.sum(), 0.0);

        let matrix = vectorizer.transform(&documents())?;
        assert_eq!(vectorizer.vocabulary_size(), size);
        assert_eq!(matrix.shape(), &[3, size]);
        Ok(())
    }

    #[test]
    fn test_transform_counts_occurrences() -> Result<(), PipelineError> {
        let mut vectorizer = Vectorizer::new((1, 1), 100);
        vectorizer.fit(&documents())?;
        let matrix = vectorizer.transform(&["payment payment froze".to_string()])?;
        let payment = vectorizer.vocabulary()["payment"];
        let froze = vectorizer.vocabulary()["froze"];
        assert_eq!(matrix[[0, payment]], 2.0);
        assert_eq!(matrix[[0, froze]], 1.0);
        Ok(())
    }

    #[test]
    fn test_unfitted_transform_is_an_error() {
        let vectorizer = Vectorizer::new((1, 2), 100);
        let result = vectorizer.transform(&documents());
        assert!(matches!(result, Err(PipelineError::Prediction(_))));
    }

    #[test]
    fn test_empty_batch_transforms_to_zero_rows() -> Result<(), PipelineError> {
        let mut vectorizer = Vectorizer::new((1, 2), 100);
        vectorizer.fit(&documents())?;
        let matrix = vectorizer.transform(&[])?;
        assert_eq!(matrix.shape()[0], 0);
        Ok(())
    }
}

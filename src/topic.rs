use crate::error::PipelineError;
use crate::pipeline::matrix::DocTermMatrix;

/// Result of fitting a topic model: per-document topic weights and per-topic
/// term weights. Row order matches the matrix's rows; column order of
/// `topic_term` matches the matrix's columns.
#[derive(Debug, Clone)]
pub struct TopicFit {
    /// `rows x topic_count`
    pub doc_topic: Vec<Vec<f64>>,
    /// `topic_count x cols`
    pub topic_term: Vec<Vec<f64>>,
}

/// Seam to the external topic-model estimator.
///
/// The pipeline only produces the matrix; estimation is a black-box
/// collaborator behind this trait, so preprocessing is testable without any
/// specific inference algorithm. The seed fixes the consumer's stochastic
/// estimation for reproducibility.
pub trait TopicModel {
    fn fit(
        &self,
        matrix: &DocTermMatrix<u32>,
        topic_count: usize,
        seed: u64,
    ) -> Result<TopicFit, PipelineError>;
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use crate::pipeline::filter::DocTerms;
    use crate::pipeline::matrix::EmptyDocPolicy;

    use super::*;

    /// Stub estimator: spreads every weight uniformly. Enough to pin down
    /// the shapes the trait promises.
    struct UniformModel;

    impl TopicModel for UniformModel {
        fn fit(
            &self,
            matrix: &DocTermMatrix<u32>,
            topic_count: usize,
            _seed: u64,
        ) -> Result<TopicFit, PipelineError> {
            if topic_count == 0 {
                return Err(PipelineError::Estimator("topic_count must be > 0".into()));
            }
            let doc_weight = 1.0 / topic_count as f64;
            let term_weight = 1.0 / matrix.cols().max(1) as f64;
            Ok(TopicFit {
                doc_topic: vec![vec![doc_weight; topic_count]; matrix.rows()],
                topic_term: vec![vec![term_weight; matrix.cols()]; topic_count],
            })
        }
    }

    fn tiny_matrix() -> DocTermMatrix<u32> {
        let mut counts = IndexMap::new();
        counts.insert("coffee".to_string(), 2);
        counts.insert("service".to_string(), 1);
        let docs = vec![DocTerms { doc_id: 0, counts }];
        DocTermMatrix::from_doc_terms(&docs, EmptyDocPolicy::Drop).0
    }

    #[test]
    fn fit_shapes_follow_matrix_dimensions() {
        let matrix = tiny_matrix();
        let fit = UniformModel.fit(&matrix, 4, 7).unwrap();
        assert_eq!(fit.doc_topic.len(), matrix.rows());
        assert_eq!(fit.doc_topic[0].len(), 4);
        assert_eq!(fit.topic_term.len(), 4);
        assert_eq!(fit.topic_term[0].len(), matrix.cols());
    }

    #[test]
    fn zero_topics_is_an_estimator_error() {
        let err = UniformModel.fit(&tiny_matrix(), 0, 7).unwrap_err();
        assert!(matches!(err, PipelineError::Estimator(_)));
    }
}

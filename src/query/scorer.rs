//! BM25 scoring.

/// BM25 scorer for one term.
///
/// The scorer is built once per term matcher from index-wide statistics.
/// The per-document norm uses the field's average length rather than the
/// exact per-document length, so the score is a pure function of term
/// frequency and rarity: strictly increasing in `term_freq` and in the
/// term's inverse document frequency.
#[derive(Debug, Clone)]
pub struct Bm25Scorer {
    /// Number of documents containing the term.
    doc_freq: u64,
    /// Total number of documents in the index.
    total_docs: u64,
    /// Average field length in tokens.
    avg_field_length: f64,
    /// Boost factor.
    boost: f32,
    /// BM25 k1 parameter.
    k1: f32,
    /// BM25 b parameter.
    b: f32,
}

impl Bm25Scorer {
    /// Create a scorer with the standard k1=1.2, b=0.75 parameters.
    pub fn new(doc_freq: u64, total_docs: u64, avg_field_length: f64, boost: f32) -> Self {
        Bm25Scorer {
            doc_freq,
            total_docs,
            avg_field_length,
            boost,
            k1: 1.2,
            b: 0.75,
        }
    }

    /// Inverse document frequency component.
    fn idf(&self) -> f32 {
        if self.doc_freq == 0 || self.total_docs == 0 {
            return 0.0;
        }

        let n = self.total_docs as f32;
        let df = self.doc_freq as f32;

        // The +1 inside the log keeps idf strictly positive even for terms
        // present in every document.
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln()
    }

    /// Term frequency component, normalized by field length.
    fn tf(&self, term_freq: f32, field_length: f32) -> f32 {
        if term_freq <= 0.0 {
            return 0.0;
        }

        let avg = (self.avg_field_length as f32).max(f32::EPSILON);
        let norm = 1.0 - self.b + self.b * (field_length / avg);

        (term_freq * (self.k1 + 1.0)) / (term_freq + self.k1 * norm)
    }

    /// Score a document by its term frequency.
    ///
    /// The document's field length is approximated by the field average.
    pub fn score(&self, term_freq: u32) -> f32 {
        self.boost * self.idf() * self.tf(term_freq as f32, self.avg_field_length as f32)
    }

    /// The highest score this scorer can produce.
    pub fn max_score(&self) -> f32 {
        self.boost * self.idf() * (self.k1 + 1.0)
    }

    /// Get the k1 parameter.
    pub fn k1(&self) -> f32 {
        self.k1
    }

    /// Get the b parameter.
    pub fn b(&self) -> f32 {
        self.b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_monotonic_in_term_freq() {
        let scorer = Bm25Scorer::new(2, 100, 5.0, 1.0);

        let s1 = scorer.score(1);
        let s2 = scorer.score(2);
        let s5 = scorer.score(5);

        assert!(s1 > 0.0);
        assert!(s2 > s1);
        assert!(s5 > s2);
    }

    #[test]
    fn test_rarer_terms_score_higher() {
        let rare = Bm25Scorer::new(1, 100, 5.0, 1.0);
        let common = Bm25Scorer::new(50, 100, 5.0, 1.0);

        assert!(rare.score(1) > common.score(1));
    }

    #[test]
    fn test_missing_term_scores_zero() {
        let scorer = Bm25Scorer::new(0, 100, 5.0, 1.0);
        assert_eq!(scorer.score(3), 0.0);

        let empty_index = Bm25Scorer::new(0, 0, 0.0, 1.0);
        assert_eq!(empty_index.score(1), 0.0);
    }

    #[test]
    fn test_idf_never_negative() {
        // A term in every document would have a negative raw log.
        let scorer = Bm25Scorer::new(100, 100, 5.0, 1.0);
        assert!(scorer.score(1) >= 0.0);
    }

    #[test]
    fn test_boost_scales_score() {
        let plain = Bm25Scorer::new(2, 100, 5.0, 1.0);
        let boosted = Bm25Scorer::new(2, 100, 5.0, 2.0);

        let s = plain.score(1);
        assert!((boosted.score(1) - 2.0 * s).abs() < 1e-6);
    }

    #[test]
    fn test_score_bounded_by_max_score() {
        let scorer = Bm25Scorer::new(2, 100, 5.0, 1.0);

        for tf in [1, 2, 10, 1000] {
            assert!(scorer.score(tf) <= scorer.max_score());
        }
    }
}

//! Recurrence detection via text similarity
//!
//! Compares a free-text incident description against the stored
//! title + root-cause text of historical records using a plain
//! character-diff ratio, and returns the top-K matches. This is a
//! single off-the-shelf scoring primitive over an in-memory list,
//! not a retrieval index.

use serde::Serialize;
use similar::TextDiff;

/// One historical record's searchable text.
#[derive(Debug, Clone)]
pub struct SearchRow {
    pub rca_id: String,
    pub title: String,
    pub root_cause: String,
}

/// One ranked similarity match.
#[derive(Debug, Clone, Serialize)]
pub struct SimilarMatch {
    pub rca_id: String,
    pub title: String,
    /// Similarity ratio in [0, 1], rounded to two decimals.
    pub score: f64,
}

/// Character-diff similarity ratio between two strings, case-insensitive.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    TextDiff::from_chars(a.as_str(), b.as_str()).ratio() as f64
}

/// Score every candidate against the query and return the top `k`
/// matches, highest score first.
pub fn find_similar(query: &str, candidates: &[SearchRow], k: usize) -> Vec<SimilarMatch> {
    let mut matches: Vec<SimilarMatch> = candidates
        .iter()
        .map(|row| {
            let combined = format!("{} {}", row.title, row.root_cause);
            let score = similarity_ratio(query, &combined);
            SimilarMatch {
                rca_id: row.rca_id.clone(),
                title: row.title.clone(),
                score: (score * 100.0).round() / 100.0,
            }
        })
        .collect();

    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    matches.truncate(k);

    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rca_id: &str, title: &str, root_cause: &str) -> SearchRow {
        SearchRow {
            rca_id: rca_id.to_string(),
            title: title.to_string(),
            root_cause: root_cause.to_string(),
        }
    }

    #[test]
    fn test_identical_text_scores_one() {
        assert!((similarity_ratio("session flag", "session flag") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratio_is_case_insensitive() {
        let a = similarity_ratio("Session Flag Mismatch", "session flag mismatch");
        assert!((a - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ranking_prefers_closer_record() {
        let rows = vec![
            row("RCA-AAAAAA", "Billing export slow", "Cron overlap in the export job"),
            row(
                "RCA-BBBBBB",
                "Mobile data outage",
                "Carrier rejected the dynamic address flag",
            ),
        ];

        let matches = find_similar("mobile data outage dynamic address flag", &rows, 5);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].rca_id, "RCA-BBBBBB");
        assert!(matches[0].score > matches[1].score);
    }

    #[test]
    fn test_top_k_truncation() {
        let rows: Vec<SearchRow> = (0..8)
            .map(|i| row(&format!("RCA-{i:06}"), "Recurring outage", "Same cause"))
            .collect();

        let matches = find_similar("outage", &rows, 5);
        assert_eq!(matches.len(), 5);
    }

    #[test]
    fn test_empty_candidates() {
        assert!(find_similar("anything", &[], 5).is_empty());
    }
}

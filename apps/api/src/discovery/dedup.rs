//! Deduplicator: first-seen-wins partition of a discovery batch by
//! normalized (title, company) signature.

use std::collections::HashSet;
use std::fmt;

use crate::models::job::NewJob;
use crate::models::posting::RawPosting;

/// Unit separator; never expected inside a title or company name.
const SIGNATURE_SEPARATOR: char = '\u{1f}';

/// Normalized duplicate-detection key: lower-cased title and company.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupSignature {
    title: String,
    company: String,
}

impl DedupSignature {
    pub fn new(title: &str, company: &str) -> Self {
        Self {
            title: title.to_lowercase(),
            company: company.to_lowercase(),
        }
    }
}

impl fmt::Display for DedupSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.title, SIGNATURE_SEPARATOR, self.company)
    }
}

/// Anything that can be deduplicated by title and company.
pub trait HasSignature {
    fn signature(&self) -> DedupSignature;
}

impl HasSignature for RawPosting {
    fn signature(&self) -> DedupSignature {
        DedupSignature::new(&self.title, &self.company)
    }
}

impl HasSignature for NewJob {
    fn signature(&self) -> DedupSignature {
        DedupSignature::new(&self.title, &self.company)
    }
}

#[derive(Debug, Clone)]
pub struct DedupOutcome<T> {
    /// First occurrence of each signature, in input order.
    pub unique: Vec<T>,
    pub duplicates: usize,
}

/// Partitions `items` into first-seen uniques and a duplicate count.
/// `unique.len() + duplicates == items.len()` always holds.
pub fn deduplicate<T: HasSignature>(items: Vec<T>) -> DedupOutcome<T> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(items.len());
    let mut duplicates = 0;

    for item in items {
        if seen.insert(item.signature()) {
            unique.push(item);
        } else {
            duplicates += 1;
        }
    }

    DedupOutcome { unique, duplicates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn posting(title: &str, company: &str, url: &str) -> RawPosting {
        RawPosting {
            title: title.to_string(),
            company: company.to_string(),
            description: String::new(),
            location: String::new(),
            experience_required: String::new(),
            source: "test".to_string(),
            source_url: url.to_string(),
            discovered_at: Utc::now(),
        }
    }

    #[test]
    fn test_case_insensitive_duplicates_collapse() {
        let batch = vec![
            posting("Backend Engineer", "Acme", "a"),
            posting("backend engineer", "ACME", "b"),
            posting("Data Scientist", "Acme", "c"),
        ];
        let outcome = deduplicate(batch);
        assert_eq!(outcome.unique.len(), 2);
        assert_eq!(outcome.duplicates, 1);
    }

    #[test]
    fn test_first_occurrence_is_kept() {
        let batch = vec![
            posting("SRE", "Initech", "first"),
            posting("Platform", "Initech", "other"),
            posting("sre", "INITECH", "second"),
        ];
        let outcome = deduplicate(batch);
        let urls: Vec<&str> = outcome.unique.iter().map(|p| p.source_url.as_str()).collect();
        assert_eq!(urls, vec!["first", "other"]);
    }

    #[test]
    fn test_partition_is_total() {
        let batches = vec![
            vec![],
            vec![posting("A", "X", "1")],
            vec![posting("A", "X", "1"), posting("a", "x", "2"), posting("A", "x", "3")],
            vec![posting("A", "X", "1"), posting("B", "X", "2"), posting("A", "Y", "3")],
        ];
        for batch in batches {
            let len = batch.len();
            let outcome = deduplicate(batch);
            assert_eq!(outcome.unique.len() + outcome.duplicates, len);
        }
    }

    #[test]
    fn test_reordering_never_drops_distinct_signature() {
        let forward = vec![
            posting("A", "X", "1"),
            posting("B", "X", "2"),
            posting("a", "x", "3"),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        let sigs = |o: &DedupOutcome<RawPosting>| -> HashSet<DedupSignature> {
            o.unique.iter().map(|p| p.signature()).collect()
        };
        let a = deduplicate(forward);
        let b = deduplicate(reversed);
        assert_eq!(sigs(&a), sigs(&b));
        assert_eq!(a.unique[0].source_url, "1");
        assert_eq!(b.unique[0].source_url, "3");
    }

    #[test]
    fn test_separator_prevents_field_bleed() {
        let a = DedupSignature::new("Engineer|Remote", "Acme");
        let b = DedupSignature::new("Engineer", "Remote|Acme");
        assert_ne!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_whitespace_is_significant() {
        let a = DedupSignature::new("Engineer ", "Acme");
        let b = DedupSignature::new("Engineer", "Acme");
        assert_ne!(a, b);
    }
}

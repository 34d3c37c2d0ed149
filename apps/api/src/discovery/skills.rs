//! Skill Extractor: finds known skill tokens in a job description and splits
//! them into required vs nice-to-have.

use serde::{Deserialize, Serialize};

/// Reference vocabulary, matched as case-insensitive substrings.
pub const SKILL_VOCABULARY: &[&str] = &[
    "python",
    "javascript",
    "typescript",
    "java",
    "c++",
    "c#",
    "go",
    "rust",
    "react",
    "angular",
    "vue",
    "node.js",
    "django",
    "flask",
    "fastapi",
    "aws",
    "azure",
    "gcp",
    "docker",
    "kubernetes",
    "terraform",
    "sql",
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "git",
    "ci/cd",
    "jenkins",
    "github actions",
    "machine learning",
    "deep learning",
    "nlp",
    "computer vision",
    "agile",
    "scrum",
    "jira",
];

/// Phrases that soften requirements. One occurrence anywhere in the text routes
/// every matched skill to `nice_to_have`.
pub const SOFTENING_PHRASES: &[&str] = &["nice to have", "preferred", "bonus"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSkills {
    pub required: Vec<String>,
    pub nice_to_have: Vec<String>,
}

/// Extracts skills from `description`, ordered by first occurrence in the text.
/// Skills found at the same offset keep vocabulary order.
pub fn extract_skills(description: &str) -> ExtractedSkills {
    let text = description.to_lowercase();
    if text.trim().is_empty() {
        return ExtractedSkills::default();
    }

    let mut found: Vec<(usize, &str)> = SKILL_VOCABULARY
        .iter()
        .filter_map(|skill| text.find(skill).map(|pos| (pos, *skill)))
        .collect();
    // stable: ties keep vocabulary order
    found.sort_by_key(|(pos, _)| *pos);

    let skills: Vec<String> = found.into_iter().map(|(_, s)| s.to_string()).collect();

    if SOFTENING_PHRASES.iter().any(|p| text.contains(p)) {
        ExtractedSkills {
            required: vec![],
            nice_to_have: skills,
        }
    } else {
        ExtractedSkills {
            required: skills,
            nice_to_have: vec![],
        }
    }
}

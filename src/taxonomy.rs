use serde::{Deserialize, Serialize};

/// One topical bucket. Matchers are lowercase keywords/phrases tested with
/// plain substring containment against the lowercased query and body text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
    pub matchers: Vec<String>,
}

/// Ordered section list. Order is part of the contract: the classifier scans
/// it linearly and the first match wins. The last section is the person-name
/// fallback bucket and carries no matchers.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    sections: Vec<Section>,
}

impl Taxonomy {
    /// Construct from an explicit section list. The caller guarantees the
    /// list is non-empty and ends with the fallback bucket.
    pub fn new(sections: Vec<Section>) -> Self {
        debug_assert!(!sections.is_empty());
        Taxonomy { sections }
    }

    /// The reference taxonomy shipped with the digest.
    pub fn reference() -> Self {
        fn section(id: &str, name: &str, matchers: &[&str]) -> Section {
            Section {
                id: id.to_string(),
                name: name.to_string(),
                matchers: matchers.iter().map(|m| m.to_string()).collect(),
            }
        }

        Taxonomy::new(vec![
            section("sec-hexaco", "Hexaco", &["hexaco"]),
            section(
                "sec-darktriad",
                "Dark Triad & Machiavellianism",
                &[
                    "dark triad",
                    "machiavellianism",
                    "machiavellian",
                    "psychopathy",
                    "narcissism",
                ],
            ),
            section(
                "sec-mbti",
                "MBTI & Myers-Briggs & Myers Briggs",
                &["mbti", "myers-briggs", "myers briggs", "jungian"],
            ),
            section(
                "sec-bigfive",
                "Big Five & Big 5 & Industriousness",
                &[
                    "big five",
                    "big 5",
                    "industriousness",
                    "conscientiousness",
                    "openness",
                    "agreeableness",
                    "extraversion",
                    "neuroticism",
                ],
            ),
            section(
                "sec-socio",
                "Sociosexuality",
                &[
                    "sociosexuality",
                    "sociosexual",
                    "soi",
                    "short-term mating",
                    "mating strategy",
                ],
            ),
            section("sec-authors", "Authors", &[]),
        ])
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Sections eligible for keyword matching, i.e. everything but the
    /// trailing fallback bucket.
    pub fn topical(&self) -> &[Section] {
        &self.sections[..self.sections.len() - 1]
    }

    pub fn fallback(&self) -> &Section {
        &self.sections[self.sections.len() - 1]
    }

    pub fn fallback_id(&self) -> &str {
        &self.fallback().id
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }
}

// ── Tests ──

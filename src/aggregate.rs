use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::parser::study::Study;
use crate::taxonomy::Taxonomy;

/// One section's merged results, in first-seen order.
#[derive(Debug, Clone, Serialize)]
pub struct SectionBucket {
    pub id: String,
    pub name: String,
    pub studies: Vec<Study>,
}

/// Per-section buckets in taxonomy order. Every section is present, empty
/// or not; rendering decides what to omit. Built fresh per invocation.
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub sections: Vec<SectionBucket>,
    pub total: usize,
}

impl Digest {
    pub fn bucket(&self, id: &str) -> Option<&SectionBucket> {
        self.sections.iter().find(|b| b.id == id)
    }
}

/// Fold classified per-email batches into a digest. Input order is
/// preserved and deduplication (by trimmed url) is per section, so the same
/// url may legitimately appear under two different sections.
pub fn aggregate<'a, I>(taxonomy: &Taxonomy, batches: I) -> Digest
where
    I: IntoIterator<Item = (&'a str, Vec<Study>)>,
{
    let mut sections: Vec<SectionBucket> = taxonomy
        .sections()
        .iter()
        .map(|s| SectionBucket {
            id: s.id.clone(),
            name: s.name.clone(),
            studies: Vec::new(),
        })
        .collect();
    let mut seen: Vec<HashSet<String>> = vec![HashSet::new(); sections.len()];

    for (section_id, studies) in batches {
        // Unknown ids cannot come out of the classifier; routed to the
        // fallback bucket all the same.
        let idx = taxonomy
            .index_of(section_id)
            .unwrap_or(sections.len() - 1);
        for study in studies {
            let key = study.dedup_key().to_string();
            if key.is_empty() || !seen[idx].insert(key) {
                continue;
            }
            sections[idx].studies.push(study);
        }
    }

    let total = sections.iter().map(|b| b.studies.len()).sum();
    for bucket in &sections {
        if !bucket.studies.is_empty() {
            info!(section = %bucket.id, count = bucket.studies.len(), "bucketed studies");
        }
    }
    info!(total, "digest aggregated");

    Digest { sections, total }
}

// ── Tests ──

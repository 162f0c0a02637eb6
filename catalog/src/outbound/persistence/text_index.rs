//! Inverted token index over entry names and descriptions.
//!
//! Tokens are lowercase alphanumeric runs. Each posting records how often a
//! token appears in an entry's name and description separately, so a search
//! can weight the fields differently. Scores are weighted term frequencies
//! summed over the distinct query tokens.

use std::collections::{BTreeSet, HashMap};

use crate::domain::TextSearchWeights;

#[derive(Clone, Copy, Default)]
struct FieldHits {
    name: u32,
    description: u32,
}

pub(super) struct TextIndex {
    weights: TextSearchWeights,
    postings: HashMap<String, HashMap<u64, FieldHits>>,
}

impl TextIndex {
    pub(super) fn new(weights: TextSearchWeights) -> Self {
        Self {
            weights,
            postings: HashMap::new(),
        }
    }

    pub(super) fn index(&mut self, seq: u64, name: &str, description: Option<&str>) {
        for token in tokens(name) {
            self.record(token, seq, |hits| hits.name += 1);
        }
        if let Some(description) = description {
            for token in tokens(description) {
                self.record(token, seq, |hits| hits.description += 1);
            }
        }
    }

    pub(super) fn remove(&mut self, seq: u64, name: &str, description: Option<&str>) {
        for token in tokens(name) {
            self.unrecord(&token, seq, |hits| {
                hits.name = hits.name.saturating_sub(1);
            });
        }
        if let Some(description) = description {
            for token in tokens(description) {
                self.unrecord(&token, seq, |hits| {
                    hits.description = hits.description.saturating_sub(1);
                });
            }
        }
    }

    /// Score every entry matching the query, best first with ties by
    /// ascending sequence number.
    pub(super) fn search(&self, query: &str) -> Vec<(u64, f64)> {
        let terms: BTreeSet<String> = tokens(query).collect();
        let mut scores: HashMap<u64, f64> = HashMap::new();
        for term in &terms {
            if let Some(entries) = self.postings.get(term) {
                for (&seq, hits) in entries {
                    *scores.entry(seq).or_default() += f64::from(hits.name)
                        * self.weights.name()
                        + f64::from(hits.description) * self.weights.description();
                }
            }
        }
        let mut ranked: Vec<(u64, f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked
    }

    fn record(&mut self, token: String, seq: u64, hit: impl Fn(&mut FieldHits)) {
        hit(self
            .postings
            .entry(token)
            .or_default()
            .entry(seq)
            .or_default());
    }

    fn unrecord(&mut self, token: &str, seq: u64, hit: impl Fn(&mut FieldHits)) {
        let Some(entries) = self.postings.get_mut(token) else {
            return;
        };
        if let Some(hits) = entries.get_mut(&seq) {
            hit(hits);
            if hits.name == 0 && hits.description == 0 {
                entries.remove(&seq);
            }
        }
        if entries.is_empty() {
            self.postings.remove(token);
        }
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

//! Relevance filtering and tiered ranking of search candidates.

use crate::models::SearchResult;

/// A validated match before ranking.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Symbol as upstream reported it, before formatting.
    pub raw_symbol: String,
    pub result: SearchResult,
}

/// Relevance tier. Lower sorts first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchTier {
    Exact,
    Prefix,
    Contains,
}

impl Candidate {
    fn haystacks(&self) -> [String; 3] {
        [
            self.result.symbol.to_lowercase(),
            self.raw_symbol.to_lowercase(),
            self.result.name.to_lowercase(),
        ]
    }

    /// Tier for a lowercased query, or `None` when the candidate is irrelevant.
    pub fn tier(&self, query: &str) -> Option<MatchTier> {
        let haystacks = self.haystacks();
        if haystacks.iter().any(|text| text == query) {
            Some(MatchTier::Exact)
        } else if haystacks.iter().any(|text| text.starts_with(query)) {
            Some(MatchTier::Prefix)
        } else if haystacks.iter().any(|text| text.contains(query)) {
            Some(MatchTier::Contains)
        } else {
            None
        }
    }
}

/// Drop irrelevant candidates and order the rest by tier. Upstream order is
/// kept within a tier.
pub fn rank(candidates: Vec<Candidate>, query: &str) -> Vec<Candidate> {
    let query = query.trim().to_lowercase();

    let mut tiered: Vec<(MatchTier, Candidate)> = candidates
        .into_iter()
        .filter_map(|candidate| candidate.tier(&query).map(|tier| (tier, candidate)))
        .collect();

    // sort_by_key is stable
    tiered.sort_by_key(|(tier, _)| *tier);
    tiered.into_iter().map(|(_, candidate)| candidate).collect()
}

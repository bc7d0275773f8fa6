use super::views::{Heatmap, HeatmapCell};
use crate::dashboard::dataset::Speech;
use crate::dashboard::keywords::{extract_keywords, TermCount};
use std::collections::{BTreeMap, HashSet};

/// Terms from the top of the keyword ranking that get a heatmap column.
pub const HEATMAP_FOCUS_TERMS: usize = 15;
pub const MAX_HEATMAP_TERMS: usize = 20;

pub fn build_heatmap(speeches: &[&Speech], top_terms: &[TermCount], focus: usize) -> Heatmap {
    let focus_terms: HashSet<&str> = top_terms
        .iter()
        .take(focus)
        .map(|entry| entry.term.as_str())
        .collect();
    if focus_terms.is_empty() {
        return Heatmap::default();
    }

    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for speech in speeches {
        for term in extract_keywords(speech.text()) {
            if focus_terms.contains(term) {
                *counts.entry((speech.party.as_str(), term)).or_default() += 1;
            }
        }
    }
    if counts.is_empty() {
        return Heatmap::default();
    }

    let mut term_totals: BTreeMap<&str, usize> = BTreeMap::new();
    let mut party_totals: BTreeMap<&str, usize> = BTreeMap::new();
    for (&(party, term), &count) in &counts {
        *term_totals.entry(term).or_default() += count;
        *party_totals.entry(party).or_default() += count;
    }

    let mut terms = ranked(term_totals);
    terms.truncate(MAX_HEATMAP_TERMS);
    let parties = ranked(party_totals);

    let mut cells = Vec::with_capacity(parties.len() * terms.len());
    for party in &parties {
        for term in &terms {
            let count = counts
                .get(&(party.as_str(), term.as_str()))
                .copied()
                .unwrap_or(0);
            cells.push(HeatmapCell {
                party: party.clone(),
                term: term.clone(),
                count,
            });
        }
    }

    Heatmap {
        terms,
        parties,
        cells,
    }
}

/// Descending by total; equal totals stay in name order.
fn ranked(totals: BTreeMap<&str, usize>) -> Vec<String> {
    let mut entries: Vec<(&str, usize)> = totals.into_iter().collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.into_iter().map(|(name, _)| name.to_string()).collect()
}

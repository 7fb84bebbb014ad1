mod config;
use log::{debug, info};

use std::collections::HashMap;

pub use crate::config::*;

pub mod builder;
pub mod manual;

// **** Private structures ****

// Counts in order of first appearance. Sorting happens once, at the end.
#[derive(Debug, Default)]
struct Tally {
    counts: Vec<(String, u64)>,
    positions: HashMap<String, usize>,
}

impl Tally {
    fn add_all(&mut self, names: &[String]) {
        for name in names {
            if let Some(idx) = self.positions.get(name) {
                self.counts[*idx].1 += 1;
            } else {
                self.positions.insert(name.clone(), self.counts.len());
                self.counts.push((name.clone(), 1));
            }
        }
    }

    fn into_frequency_table(self) -> FrequencyTable {
        FrequencyTable::from_counts(&self.counts)
    }
}

/// The smallest of the `n` highest scores, or None if there is nothing to rank.
fn top_cutoff(scores: &[f64], n: usize) -> Option<f64> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));
    let k = n.min(sorted.len());
    if k == 0 {
        None
    } else {
        Some(sorted[k - 1])
    }
}

/// The largest of the `n` lowest scores, or None if there is nothing to rank.
fn bottom_cutoff(scores: &[f64], n: usize) -> Option<f64> {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let k = n.min(sorted.len());
    if k == 0 {
        None
    } else {
        Some(sorted[k - 1])
    }
}

/// Finds the top and bottom traits of one respondent.
///
/// Arguments:
/// * `traits` the names of the traits
/// * `scores` the scores of the respondent, aligned with `traits`
/// * `rules` how many traits to select at each end
///
/// The top traits are all the traits scoring at least as much as the
/// `rules.top_count`-th highest score. Ties with that score are included, so
/// more traits than requested may be returned. The bottom traits are selected
/// the same way from the lowest scores. When there are fewer traits than
/// requested, all of them are selected. Both lists follow the order of `traits`.
pub fn extract(traits: &[String], scores: &[f64], rules: &RankRules) -> RankedSet {
    let scored = || traits.iter().zip(scores.iter());
    let top = match top_cutoff(scores, rules.top_count) {
        Some(cutoff) => scored()
            .filter(|(_, s)| **s >= cutoff)
            .map(|(t, _)| t.clone())
            .collect(),
        None => Vec::new(),
    };
    let bottom = match bottom_cutoff(scores, rules.bottom_count) {
        Some(cutoff) => scored()
            .filter(|(_, s)| **s <= cutoff)
            .map(|(t, _)| t.clone())
            .collect(),
        None => Vec::new(),
    };
    RankedSet { top, bottom }
}

/// Runs the ranking for every respondent of the table and counts how often each
/// trait is selected.
///
/// The computation is done from scratch at each call. An empty table gives empty
/// frequency tables and no rows.
pub fn aggregate(table: &ScoreTable, rules: &RankRules) -> Aggregate {
    info!(
        "Aggregating {} respondents over {} traits, rules: {:?}",
        table.len(),
        table.traits().len(),
        rules
    );

    let mut top = Tally::default();
    let mut bottom = Tally::default();
    let mut rows: Vec<ExportRow> = Vec::with_capacity(table.len());
    for r in table.respondents() {
        let ranked = extract(table.traits(), &r.scores, rules);
        debug!(
            "aggregate: {}: top: {:?} bottom: {:?}",
            r.name, ranked.top, ranked.bottom
        );
        top.add_all(&ranked.top);
        bottom.add_all(&ranked.bottom);
        rows.push(ExportRow {
            name: r.name.clone(),
            top_traits: ranked.top.join(", "),
            bottom_traits: ranked.bottom.join(", "),
        });
    }

    Aggregate {
        top: top.into_frequency_table(),
        bottom: bottom.into_frequency_table(),
        rows,
        respondents: table.len(),
    }
}

/// Splits a frequency table for display.
///
/// The traits down to the `rules.display_group_size`-th one are featured, along
/// with any trait tied with it. When the table is shorter, every trait is
/// featured. The remaining traits are merged into an "Others" bucket, which is
/// None when nothing remains.
///
/// The percentages are relative to the number of respondents, not to the total
/// of the counts.
pub fn group_for_display(
    freq: &FrequencyTable,
    respondents: usize,
    rules: &RankRules,
) -> DisplayGrouping {
    let entries = freq.entries();
    let boundary = entries
        .get(rules.display_group_size.saturating_sub(1))
        .or_else(|| entries.last());
    let cutoff = match boundary {
        Some(e) => e.count,
        None => return DisplayGrouping::default(),
    };

    let percentage = |count: u64| {
        if respondents == 0 {
            0.0
        } else {
            count as f64 / respondents as f64 * 100.0
        }
    };

    let featured: Vec<FeaturedTrait> = entries
        .iter()
        .filter(|e| e.count >= cutoff)
        .map(|e| FeaturedTrait {
            name: e.name.clone(),
            count: e.count,
            percentage: percentage(e.count),
        })
        .collect();
    let rest: Vec<&TraitCount> = entries.iter().filter(|e| e.count < cutoff).collect();
    let others = if rest.is_empty() {
        None
    } else {
        Some(OthersBucket {
            count: rest.iter().map(|e| e.count).sum(),
            traits: rest.iter().map(|e| e.name.clone()).collect(),
        })
    };
    debug!(
        "group_for_display: cutoff: {} featured: {} others: {:?}",
        cutoff,
        featured.len(),
        others
    );
    DisplayGrouping { featured, others }
}

/// Looks up one respondent by exact name and ranks their traits.
///
/// Unlike [`extract`], the selected traits are ordered by descending score
/// (column order among equal scores).
pub fn lookup(
    table: &ScoreTable,
    name: &str,
    rules: &RankRules,
) -> Result<RankedSet, RankingErrors> {
    let respondent = table
        .respondent(name)
        .ok_or_else(|| RankingErrors::RespondentNotFound(name.to_string()))?;

    let mut order: Vec<(&String, f64)> = table
        .traits()
        .iter()
        .zip(respondent.scores.iter().cloned())
        .collect();
    order.sort_by(|a, b| b.1.total_cmp(&a.1));
    let sorted_traits: Vec<String> = order.iter().map(|(t, _)| (*t).clone()).collect();
    let sorted_scores: Vec<f64> = order.iter().map(|(_, s)| *s).collect();

    Ok(extract(&sorted_traits, &sorted_scores, rules))
}

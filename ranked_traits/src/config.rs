// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// One row of a survey: the respondent's name and one score per trait.
///
/// The scores are aligned with the trait schema of the table that owns the row.
#[derive(PartialEq, Debug, Clone)]
pub struct Respondent {
    pub name: String,
    pub scores: Vec<f64>,
}

/// A table of survey responses.
///
/// Every respondent has a finite score for every trait, and both the trait
/// names and the respondent names are unique. Use the [`crate::builder::Builder`]
/// to construct one.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct ScoreTable {
    pub(crate) traits: Vec<String>,
    pub(crate) respondents: Vec<Respondent>,
}

impl ScoreTable {
    /// The trait names, in column order.
    pub fn traits(&self) -> &[String] {
        &self.traits
    }

    /// The respondents, in row order.
    pub fn respondents(&self) -> &[Respondent] {
        &self.respondents
    }

    pub fn respondent(&self, name: &str) -> Option<&Respondent> {
        self.respondents.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.respondents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.respondents.is_empty()
    }
}

// ******** Output data structures *********

/// The traits ranked at the top and at the bottom for one respondent.
///
/// Both lists include every trait tied with the boundary score, so they may
/// hold more entries than requested, and they may overlap when the scores are
/// flat.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RankedSet {
    pub top: Vec<String>,
    pub bottom: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TraitCount {
    pub name: String,
    pub count: u64,
}

/// How many respondents selected each trait, by descending count.
///
/// Traits that no respondent selected are absent.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct FrequencyTable {
    pub(crate) entries: Vec<TraitCount>,
}

impl FrequencyTable {
    /// Builds a table from raw counts, sorting them by descending count.
    /// Entries with the same count keep their relative order.
    pub fn from_counts(counts: &[(String, u64)]) -> FrequencyTable {
        let mut entries: Vec<TraitCount> = counts
            .iter()
            .map(|(name, count)| TraitCount {
                name: name.clone(),
                count: *count,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        FrequencyTable { entries }
    }

    pub fn entries(&self) -> &[TraitCount] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.count)
    }

    /// The sum of all the counts.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One line of the per-respondent report.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ExportRow {
    pub name: String,
    /// The top traits, joined with ", ".
    pub top_traits: String,
    /// The bottom traits, joined with ", ".
    pub bottom_traits: String,
}

/// The outcome of running the ranking over a whole table.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Aggregate {
    pub top: FrequencyTable,
    pub bottom: FrequencyTable,
    pub rows: Vec<ExportRow>,
    pub respondents: usize,
}

#[derive(PartialEq, Debug, Clone)]
pub struct FeaturedTrait {
    pub name: String,
    pub count: u64,
    /// Share of all the respondents, between 0 and 100.
    pub percentage: f64,
}

/// The traits that did not make it into the featured group, merged together.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct OthersBucket {
    pub count: u64,
    pub traits: Vec<String>,
}

/// A frequency table split for display: the leading traits are shown on their
/// own, the rest is merged into a single "Others" entry.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct DisplayGrouping {
    pub featured: Vec<FeaturedTrait>,
    pub others: Option<OthersBucket>,
}

/// Errors that prevent a table from being built or queried.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum RankingErrors {
    DuplicateTrait(String),
    DuplicateRespondent(String),
    RowLength {
        respondent: String,
        expected: usize,
        found: usize,
    },
    NonFiniteScore {
        respondent: String,
        trait_name: String,
    },
    RespondentNotFound(String),
}

impl Error for RankingErrors {}

impl Display for RankingErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingErrors::DuplicateTrait(name) => write!(f, "duplicate trait name {:?}", name),
            RankingErrors::DuplicateRespondent(name) => {
                write!(f, "duplicate respondent name {:?}", name)
            }
            RankingErrors::RowLength {
                respondent,
                expected,
                found,
            } => write!(
                f,
                "respondent {:?} has {} scores, expected {}",
                respondent, found, expected
            ),
            RankingErrors::NonFiniteScore {
                respondent,
                trait_name,
            } => write!(
                f,
                "respondent {:?} has a non-finite score for {:?}",
                respondent, trait_name
            ),
            RankingErrors::RespondentNotFound(name) => {
                write!(f, "respondent {:?} not found", name)
            }
        }
    }
}

// ********* Configuration **********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RankRules {
    /// How many of the highest scores define the top cutoff.
    pub top_count: usize,
    /// How many of the lowest scores define the bottom cutoff.
    pub bottom_count: usize,
    /// The rank of the last trait shown on its own when displaying a frequency table.
    pub display_group_size: usize,
}

impl RankRules {
    pub const DEFAULT_RULES: RankRules = RankRules {
        top_count: 3,
        bottom_count: 3,
        display_group_size: 7,
    };
}

impl Default for RankRules {
    fn default() -> Self {
        RankRules::DEFAULT_RULES
    }
}

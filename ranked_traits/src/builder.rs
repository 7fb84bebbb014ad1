pub use crate::config::*;

use std::collections::HashSet;

/// A builder for score tables.
///
/// It checks the invariants of a [`ScoreTable`] as the rows come in.
///
/// ```
/// pub use ranked_traits::builder::Builder;
/// # use ranked_traits::RankingErrors;
///
/// let mut builder = Builder::new(&["Mercy".to_string(), "Teaching".to_string()])?;
///
/// builder.add_respondent("Anna", &[12.0, 15.0])?;
/// builder.add_respondent("Bob", &[9.0, 4.0])?;
///
/// let table = builder.build();
/// assert_eq!(table.len(), 2);
/// # Ok::<(), RankingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _traits: Vec<String>,
    pub(crate) _respondents: Vec<Respondent>,
    _seen: HashSet<String>,
}

impl Builder {
    pub fn new(traits: &[String]) -> Result<Builder, RankingErrors> {
        let mut seen: HashSet<&String> = HashSet::new();
        for t in traits {
            if !seen.insert(t) {
                return Err(RankingErrors::DuplicateTrait(t.clone()));
            }
        }
        Ok(Builder {
            _traits: traits.to_vec(),
            _respondents: Vec::new(),
            _seen: HashSet::new(),
        })
    }

    /// Adds the scores of one respondent.
    ///
    /// The scores must follow the order of the traits given to the builder.
    pub fn add_respondent(&mut self, name: &str, scores: &[f64]) -> Result<(), RankingErrors> {
        if scores.len() != self._traits.len() {
            return Err(RankingErrors::RowLength {
                respondent: name.to_string(),
                expected: self._traits.len(),
                found: scores.len(),
            });
        }
        if let Some((t, _)) = self
            ._traits
            .iter()
            .zip(scores.iter())
            .find(|(_, s)| !s.is_finite())
        {
            return Err(RankingErrors::NonFiniteScore {
                respondent: name.to_string(),
                trait_name: t.clone(),
            });
        }
        if !self._seen.insert(name.to_string()) {
            return Err(RankingErrors::DuplicateRespondent(name.to_string()));
        }
        self._respondents.push(Respondent {
            name: name.to_string(),
            scores: scores.to_vec(),
        });
        Ok(())
    }

    pub fn build(self) -> ScoreTable {
        ScoreTable {
            traits: self._traits,
            respondents: self._respondents,
        }
    }
}

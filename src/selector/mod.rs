//! First-fit problem selection over rating bands
//!
//! [`select`] is a pure function: given an ordered contest list, the
//! problems known so far per contest, and the set of already-used problem
//! keys, it fills one slot per difficulty band and stops scanning as soon
//! as all three are filled. The generation coordinator calls it repeatedly
//! while contest data is still being fetched, so identical inputs must
//! always produce identical output.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{problem_key, BandProblem, Contest, DailyProblemSet, Problem};

/// One of the three difficulty tiers, defined by a rating interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Easy,
    Medium,
    Hard,
}

impl Band {
    /// All bands in selection order
    pub const ALL: [Band; 3] = [Band::Easy, Band::Medium, Band::Hard];

    /// Whether a rating falls inside this band.
    ///
    /// Easy and medium are closed intervals; hard excludes its upper bound.
    pub fn contains(self, rating: u32) -> bool {
        match self {
            Self::Easy => (800..=1000).contains(&rating),
            Self::Medium => (1100..=1400).contains(&rating),
            Self::Hard => (1500..1600).contains(&rating),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

/// A problem chosen for one band
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedProblem {
    pub contest_id: i64,
    pub index: String,
    pub rating: u32,
    pub name: String,
}

impl SelectedProblem {
    pub fn key(&self) -> String {
        problem_key(self.contest_id, &self.index)
    }
}

impl From<SelectedProblem> for BandProblem {
    fn from(p: SelectedProblem) -> Self {
        Self {
            contest_id: p.contest_id,
            index: p.index,
            rating: p.rating,
        }
    }
}

/// Outcome of one selection pass; any slot may still be unfilled
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub easy: Option<SelectedProblem>,
    pub medium: Option<SelectedProblem>,
    pub hard: Option<SelectedProblem>,
}

impl Selection {
    /// All three bands filled
    pub fn is_complete(&self) -> bool {
        self.easy.is_some() && self.medium.is_some() && self.hard.is_some()
    }

    /// Bands still missing a problem
    pub fn missing_bands(&self) -> Vec<Band> {
        Band::ALL
            .into_iter()
            .filter(|band| self.slot(*band).is_none())
            .collect()
    }

    fn slot(&self, band: Band) -> &Option<SelectedProblem> {
        match band {
            Band::Easy => &self.easy,
            Band::Medium => &self.medium,
            Band::Hard => &self.hard,
        }
    }

    fn slot_mut(&mut self, band: Band) -> &mut Option<SelectedProblem> {
        match band {
            Band::Easy => &mut self.easy,
            Band::Medium => &mut self.medium,
            Band::Hard => &mut self.hard,
        }
    }

    /// Convert into a persistable set; `None` unless complete
    pub fn into_problem_set(self, date: NaiveDate) -> Option<DailyProblemSet> {
        match (self.easy, self.medium, self.hard) {
            (Some(easy), Some(medium), Some(hard)) => Some(DailyProblemSet {
                date,
                easy: easy.into(),
                medium: medium.into(),
                hard: hard.into(),
            }),
            _ => None,
        }
    }
}

/// Pick the first unused problem for each band.
///
/// Contests are scanned in the order given (callers supply newest first),
/// each contest's problems in archive order. The first eligible problem
/// per band wins; a problem is eligible when it has a rating inside the
/// band and its (contest, index) key is not in `used_keys`. Scanning stops
/// the moment all three bands are filled.
pub fn select(
    contests: &[Contest],
    problems_by_contest: &HashMap<i64, Vec<Problem>>,
    used_keys: &HashSet<String>,
) -> Selection {
    let mut selection = Selection::default();

    'contests: for contest in contests {
        let Some(problems) = problems_by_contest.get(&contest.id) else {
            continue;
        };

        for problem in problems {
            let Some(rating) = problem.rating else {
                continue;
            };
            let key = problem_key(contest.id, &problem.index);

            for band in Band::ALL {
                let slot = selection.slot_mut(band);
                if slot.is_none() && band.contains(rating) && !used_keys.contains(&key) {
                    *slot = Some(SelectedProblem {
                        contest_id: contest.id,
                        index: problem.index.clone(),
                        rating,
                        name: problem.name.clone(),
                    });
                    break;
                }
            }

            if selection.is_complete() {
                break 'contests;
            }
        }
    }

    selection
}

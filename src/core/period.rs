//! Academic periods - terms, academic years and the current-period resolver.
//!
//! Stored records keep terms and years as plain strings. The types here
//! validate input at the boundary and give stored values an ordering.

use crate::errors::{Error, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three school terms, in calendar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Term {
    /// September to December
    FirstTerm,
    /// January to April
    SecondTerm,
    /// May to August
    ThirdTerm,
}

impl Term {
    /// All terms in order.
    pub const ALL: [Self; 3] = [Self::FirstTerm, Self::SecondTerm, Self::ThirdTerm];

    /// Display name as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstTerm => "First Term",
            Self::SecondTerm => "Second Term",
            Self::ThirdTerm => "Third Term",
        }
    }

    /// Position within the academic year, starting at 0.
    #[must_use]
    pub const fn index(self) -> i32 {
        match self {
            Self::FirstTerm => 0,
            Self::SecondTerm => 1,
            Self::ThirdTerm => 2,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Term {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|term| term.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::validation(format!(
                    "Unknown term '{s}'; expected First Term, Second Term or Third Term"
                ))
            })
    }
}

/// A validated `YYYY/YYYY+1` academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AcademicYear {
    start: i32,
}

impl AcademicYear {
    /// Academic year starting in `start`.
    #[must_use]
    pub const fn starting(start: i32) -> Self {
        Self { start }
    }

    /// Parses `YYYY/YYYY+1`.
    ///
    /// # Errors
    /// Returns `Error::Validation` for anything else, including years that
    /// are not consecutive.
    pub fn parse(s: &str) -> Result<Self> {
        let invalid = || Error::validation(format!("Invalid academic year '{s}'; expected YYYY/YYYY"));
        let (first, second) = s.trim().split_once('/').ok_or_else(invalid)?;
        if first.len() != 4 || second.len() != 4 {
            return Err(invalid());
        }
        let start: i32 = first.parse().map_err(|_| invalid())?;
        let end: i32 = second.parse().map_err(|_| invalid())?;
        if end != start + 1 {
            return Err(invalid());
        }
        Ok(Self { start })
    }

    /// First calendar year of the academic year.
    #[must_use]
    pub const fn start_year(self) -> i32 {
        self.start
    }

    /// Last two digits of the first year, zero-padded (`"25"` for 2025/2026).
    #[must_use]
    pub fn short_code(self) -> String {
        format!("{:02}", self.start.rem_euclid(100))
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start, self.start + 1)
    }
}

/// A (term, academic year) pair as stored on records.
///
/// Kept as strings so periods read back from the store can always be shown
/// and ordered, even when an old record holds an unparseable value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AcademicPeriod {
    /// Academic year, e.g. "2024/2025"
    pub academic_year: String,
    /// Term name, e.g. "First Term"
    pub term: String,
}

impl AcademicPeriod {
    /// Builds a period from validated parts.
    #[must_use]
    pub fn new(academic_year: AcademicYear, term: Term) -> Self {
        Self {
            academic_year: academic_year.to_string(),
            term: term.as_str().to_string(),
        }
    }

    /// Ordering key: (start year, term index).
    ///
    /// A year whose start cannot be parsed counts as 0 and an unknown term
    /// counts as -1, so such periods sort as the oldest.
    #[must_use]
    pub fn sort_key(&self) -> (i32, i32) {
        let start_year = self
            .academic_year
            .split('/')
            .next()
            .and_then(|start| start.trim().parse().ok())
            .unwrap_or(0);
        let term_index = self.term.parse::<Term>().map_or(-1, Term::index);
        (start_year, term_index)
    }
}

impl fmt::Display for AcademicPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.term, self.academic_year)
    }
}

/// Resolves the academic period a calendar date falls in.
///
/// September to December open a new academic year in its first term; January
/// to April are the second term and May to August the third term of the year
/// that started the previous September.
#[must_use]
pub fn current_period(date: NaiveDate) -> (AcademicYear, Term) {
    let year = date.year();
    match date.month() {
        9..=12 => (AcademicYear::starting(year), Term::FirstTerm),
        1..=4 => (AcademicYear::starting(year - 1), Term::SecondTerm),
        _ => (AcademicYear::starting(year - 1), Term::ThirdTerm),
    }
}

//! Monthly attendance aggregation.
//!
//! Counts each status per roster entity over one calendar month. The month is
//! matched as the date range `[first_day, last_day]`, which selects the same
//! records as a `YYYY-MM%` prefix match on ISO dates.

use crate::{
    core::{
        attendance::StatusCounts,
        roster::{self, RosterEntry, RosterScope},
    },
    entities::{AttendanceRecord, attendance_record},
    errors::{Error, Result},
};
use chrono::{Datelike, Months, NaiveDate};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const MONTH_NAMES_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Indonesian name of a month number (1-12).
#[must_use]
pub fn month_name_id(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|index| MONTH_NAMES_ID.get(index as usize))
        .copied()
        .unwrap_or("-")
}

/// A calendar month, written `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    first: NaiveDate,
    last: NaiveDate,
}

impl YearMonth {
    /// Builds a month from its year and 1-based month number.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        let invalid = || Error::InvalidMonth {
            input: format!("{year:04}-{month:02}"),
        };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(invalid)?;
        Ok(Self { first, last })
    }

    /// Month containing `date`.
    pub fn from_date(date: NaiveDate) -> Result<Self> {
        Self::new(date.year(), date.month())
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    /// Month number, 1-12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.first.month()
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(&self) -> NaiveDate {
        self.first
    }

    /// Last day of the month.
    #[must_use]
    pub const fn last_day(&self) -> NaiveDate {
        self.last
    }

    /// Whether `date` falls inside the month.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.first <= date && date <= self.last
    }

    /// Human label such as `Mei 2024`.
    #[must_use]
    pub fn label_id(&self) -> String {
        format!("{} {}", month_name_id(self.month()), self.year())
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth {
            input: input.to_string(),
        };
        let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

/// Monthly counts for one roster entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyTally {
    /// The student or teacher
    pub entry: RosterEntry,
    /// Status counts within the month
    pub counts: StatusCounts,
}

/// Tallies `records` per roster entity over `month`.
///
/// Returns one row per roster entity in roster order, including entities with
/// no records. Records outside the month or for entities not on the roster are
/// ignored. `records` must all belong to the roster's subject kind.
#[must_use]
pub fn tally_month(
    roster: &[RosterEntry],
    records: &[attendance_record::Model],
    month: YearMonth,
) -> Vec<MonthlyTally> {
    let mut counts: HashMap<i64, StatusCounts> = HashMap::new();
    for record in records.iter().filter(|r| month.contains(r.date)) {
        counts.entry(record.subject_id).or_default().record(record.status);
    }

    roster
        .iter()
        .map(|entry| MonthlyTally {
            counts: counts.get(&entry.id).copied().unwrap_or_default(),
            entry: entry.clone(),
        })
        .collect()
}

/// Records for the roster's subject kind within `month`, oldest first.
pub async fn records_in_month(
    db: &DatabaseConnection,
    scope: RosterScope,
    month: YearMonth,
) -> Result<Vec<attendance_record::Model>> {
    AttendanceRecord::find()
        .filter(attendance_record::Column::Subject.eq(scope.subject()))
        .filter(attendance_record::Column::Date.between(month.first_day(), month.last_day()))
        .order_by_asc(attendance_record::Column::Date)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Loads every member of `scope` and its records for `month` and tallies them.
///
/// Inactive students are included, so deactivating a student never removes
/// them from the months they were recorded in.
pub async fn aggregate_month(
    db: &DatabaseConnection,
    scope: RosterScope,
    month: YearMonth,
) -> Result<Vec<MonthlyTally>> {
    let roster = roster::load_members(db, scope).await?;
    let records = records_in_month(db, scope, month).await?;
    Ok(tally_month(&roster, &records, month))
}

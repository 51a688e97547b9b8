//! Ordered date sets and inclusive date ranges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::DateRangeError;

/// An inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Start date (inclusive).
    pub start: NaiveDate,
    /// End date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new date range, validating that start <= end.
    ///
    /// # Errors
    ///
    /// Returns an error if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range covering a single day.
    #[must_use]
    pub const fn single_day(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Returns true if the range contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Returns the total number of days in the range.
    #[must_use]
    pub fn total_days(&self) -> usize {
        ((self.end - self.start).num_days() + 1) as usize
    }

    /// Returns an iterator over all days in the range, ascending.
    pub const fn days(&self) -> DayIterator {
        DayIterator {
            current: self.start,
            end: self.end,
        }
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Iterator over all days in a [`DateRange`], ascending.
#[derive(Debug, Clone)]
pub struct DayIterator {
    current: NaiveDate,
    end: NaiveDate,
}

impl Iterator for DayIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current > self.end {
            return None;
        }
        let result = self.current;
        self.current = self.current.succ_opt()?;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.current > self.end {
            return (0, Some(0));
        }
        let days = (self.end - self.current).num_days() as usize + 1;
        (days, Some(days))
    }
}

impl ExactSizeIterator for DayIterator {}

/// An ordered set of unique calendar dates.
///
/// This is the unit the catalog protocol exchanges for a
/// (security, data type, format) triple. Iteration is always ascending, and
/// gap resolution is expressed directly as [`DateSet::difference`] after
/// [`DateSet::intersect_range`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateSet(BTreeSet<NaiveDate>);

impl DateSet {
    /// Creates an empty date set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Inserts a date. Returns true if the date was not already present.
    pub fn insert(&mut self, date: NaiveDate) -> bool {
        self.0.insert(date)
    }

    /// Returns true if the set contains the given date.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    /// Returns the number of dates in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the earliest date, if any.
    #[must_use]
    pub fn first(&self) -> Option<NaiveDate> {
        self.0.first().copied()
    }

    /// Returns the latest date, if any.
    #[must_use]
    pub fn last(&self) -> Option<NaiveDate> {
        self.0.last().copied()
    }

    /// Returns an iterator over the dates in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().copied()
    }

    /// Returns the dates present in `self` but absent from `other`,
    /// in ascending order.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.difference(&other.0).copied().collect())
    }

    /// Returns the union of both sets.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }

    /// Returns the subset of dates falling inside the given range.
    #[must_use]
    pub fn intersect_range(&self, range: &DateRange) -> Self {
        Self(self.0.range(range.start..=range.end).copied().collect())
    }

    /// Merges all dates from `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        self.0.extend(other.iter());
    }
}

impl FromIterator<NaiveDate> for DateSet {
    fn from_iter<T: IntoIterator<Item = NaiveDate>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<NaiveDate> for DateSet {
    fn extend<T: IntoIterator<Item = NaiveDate>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a DateSet {
    type Item = NaiveDate;
    type IntoIter = std::iter::Copied<std::collections::btree_set::Iter<'a, NaiveDate>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

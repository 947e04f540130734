use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};
use log::{debug, trace};
use smallvec::SmallVec;

use super::*;

/// A window within a day, stored as seconds from midnight.
/// The start is inclusive, the end exclusive; a window without end lasts until midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    start: u32,
    end: Option<u32>,
}

impl TimeWindow {
    pub fn new(start: NaiveTime, end: Option<NaiveTime>) -> Self {
        Self {
            start: start.num_seconds_from_midnight(),
            end: end.map(|t| t.num_seconds_from_midnight()),
        }
    }

    /// Shorthand for windows starting and ending at full hours
    pub fn from_hours(start: u32, end: Option<u32>) -> Self {
        Self {
            start: start * 3600,
            end: end.map(|h| h * 3600),
        }
    }

    /// Returns *true* if `time` lies within the window
    pub fn contains(&self, time: &NaiveTime) -> bool {
        let s = time.num_seconds_from_midnight();
        self.start <= s && self.end.is_none_or(|end| s < end)
    }
}

/// Applies `factor` to trips starting on one of `days` within `window`
/// (or at any time of these days if there is no window)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscountRule {
    pub days: SmallVec<[Weekday; 7]>,
    pub window: Option<TimeWindow>,
    pub factor: f64,
}

impl DiscountRule {
    pub fn matches(&self, at: &NaiveDateTime) -> bool {
        self.days.contains(&at.weekday())
            && self.window.as_ref().is_none_or(|w| w.contains(&at.time()))
    }
}

/// An ordered list of [`DiscountRule`]s; the first matching rule determines the factor.
/// If no rule matches, `fallback` is used.
///
/// The default schedule discounts weekday trips starting before 10:00 or from 18:00 on by
/// `0.8`, charges `1.2` between 10:00 and 18:00 and discounts all weekend trips by `0.7`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use tollgraph::toll::*;
///
/// let schedule = DiscountSchedule::default();
/// // 2024-01-01 is a Monday
/// let monday_noon = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let sunday_noon = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap().and_hms_opt(12, 0, 0).unwrap();
///
/// assert_eq!(schedule.factor_at(&monday_noon), 1.2);
/// assert_eq!(schedule.factor_at(&sunday_noon), 0.7);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscountSchedule {
    rules: Vec<DiscountRule>,
    fallback: f64,
}

const WEEKDAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

const WEEKEND: [Weekday; 2] = [Weekday::Sat, Weekday::Sun];

impl Default for DiscountSchedule {
    fn default() -> Self {
        Self::new(1.0)
            .rule(WEEKDAYS, Some(TimeWindow::from_hours(0, Some(10))), 0.8)
            .rule(WEEKDAYS, Some(TimeWindow::from_hours(10, Some(18))), 1.2)
            .rule(WEEKDAYS, Some(TimeWindow::from_hours(18, None)), 0.8)
            .rule(WEEKEND, None, 0.7)
    }
}

impl DiscountSchedule {
    /// Creates a schedule without rules
    pub fn new(fallback: f64) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Appends a rule; it is only consulted if all earlier rules did not match
    pub fn rule<D>(mut self, days: D, window: Option<TimeWindow>, factor: f64) -> Self
    where
        D: IntoIterator<Item = Weekday>,
    {
        self.rules.push(DiscountRule {
            days: days.into_iter().collect(),
            window,
            factor,
        });
        self
    }

    /// Returns the rules in order
    pub fn rules(&self) -> &[DiscountRule] {
        &self.rules
    }

    /// Returns the factor of the first rule matching `at` or the fallback
    pub fn factor_at(&self, at: &NaiveDateTime) -> f64 {
        self.rules
            .iter()
            .find(|r| r.matches(at))
            .map_or(self.fallback, |r| r.factor)
    }

    /// Returns `Err(Error::InvalidInput)` if a factor is negative or not finite
    pub fn validate(&self) -> Result<()> {
        let factors = self.rules.iter().map(|r| r.factor);
        for (pos, factor) in factors.chain(std::iter::once(self.fallback)).enumerate() {
            invalid_input_unless!(
                factor.is_finite() && factor >= 0.0,
                "Factor {factor} of rule #{pos} is not a finite non-negative number"
            );
        }
        Ok(())
    }
}

/// A [`TollRow`] of a trip between `start` and `end`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimedTollRow<I = Id> {
    pub row: TollRow<I>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Multiplies all vehicle tolls of every row by the factor `schedule` assigns to the row's
/// start. Rows keep their order.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if a factor of `schedule` is invalid or a row ends before
/// it starts.
pub fn calculate_time_based_toll_rates<I: Identifier>(
    rows: &[TimedTollRow<I>],
    schedule: &DiscountSchedule,
) -> Result<Vec<TimedTollRow<I>>> {
    schedule.validate()?;

    let mut result = Vec::with_capacity(rows.len());
    for (pos, timed) in rows.iter().enumerate() {
        invalid_input_unless!(
            timed.start <= timed.end,
            "Row #{pos} ends at {} before it starts at {}",
            timed.end,
            timed.start
        );

        let factor = schedule.factor_at(&timed.start);
        trace!("Row #{pos} starting {} gets factor {factor}", timed.start);

        let mut row = timed.row.clone();
        row.tolls = row.tolls.scaled(factor);
        result.push(TimedTollRow {
            row,
            start: timed.start,
            end: timed.end,
        });
    }

    debug!("Applied time based factors to {} rows", result.len());
    Ok(result)
}

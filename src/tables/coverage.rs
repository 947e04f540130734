use std::collections::BTreeMap;

use chrono::{NaiveTime, Timelike, Weekday};
use log::debug;

use super::*;

const SECONDS_PER_DAY: u32 = 24 * 60 * 60;
const SECONDS_PER_WEEK: u32 = 7 * SECONDS_PER_DAY;

/// A time span within a Monday-to-Sunday week recorded for an `(id, id_2)` pair
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoverageRecord<I = Id> {
    pub id: I,
    pub id_2: I,
    pub start_day: Weekday,
    pub start_time: NaiveTime,
    pub end_day: Weekday,
    pub end_time: NaiveTime,
}

impl<I: Identifier> CoverageRecord<I> {
    /// Returns the covered seconds of the week as an inclusive range `(first, last)`
    fn seconds_of_week(&self) -> (u32, u32) {
        let at = |day: Weekday, time: NaiveTime| {
            day.num_days_from_monday() * SECONDS_PER_DAY + time.num_seconds_from_midnight()
        };
        (
            at(self.start_day, self.start_time),
            at(self.end_day, self.end_time),
        )
    }
}

/// Checks for every `(id, id_2)` pair whether its records together cover every second of the
/// week, from Monday `00:00:00` to Sunday `23:59:59`.
///
/// Sub-second precision is ignored: a record ending at `23:59:59` covers that entire second.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if a record ends before it starts.
///
/// # Example
/// ```
/// use chrono::{NaiveTime, Weekday};
/// use tollgraph::tables::*;
///
/// let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
/// let last = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
/// let record = |id_2, end_day| CoverageRecord {
///     id: 1u64, id_2, start_day: Weekday::Mon, start_time: midnight, end_day, end_time: last,
/// };
///
/// let complete = time_check(&[record(2, Weekday::Sun), record(3, Weekday::Fri)]).unwrap();
/// assert!(complete[&(1, 2)]);
/// assert!(!complete[&(1, 3)]);
/// ```
pub fn time_check<I: Identifier>(records: &[CoverageRecord<I>]) -> Result<BTreeMap<(I, I), bool>> {
    let mut spans: BTreeMap<(I, I), Vec<(u32, u32)>> = BTreeMap::new();

    for (pos, record) in records.iter().enumerate() {
        let (first, last) = record.seconds_of_week();
        invalid_input_unless!(
            first <= last,
            "Record #{pos} of ({:?}, {:?}) ends before it starts",
            record.id,
            record.id_2
        );

        spans
            .entry((record.id.clone(), record.id_2.clone()))
            .or_default()
            .push((first, last));
    }

    let complete: BTreeMap<(I, I), bool> = spans
        .into_iter()
        .map(|(pair, mut spans)| {
            spans.sort_unstable();
            (pair, covers_week(&spans))
        })
        .collect();

    debug!(
        "Checked {} pairs, {} fully covered",
        complete.len(),
        complete.values().filter(|&&c| c).count()
    );

    Ok(complete)
}

/// Returns *true* if the sorted inclusive spans cover `0..SECONDS_PER_WEEK` without gaps
fn covers_week(sorted_spans: &[(u32, u32)]) -> bool {
    // first second not covered yet
    let mut next = 0;
    for &(first, last) in sorted_spans {
        if first > next {
            return false;
        }
        next = next.max(last + 1);
    }
    next >= SECONDS_PER_WEEK
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn record(id_2: u64, start: (Weekday, NaiveTime), end: (Weekday, NaiveTime)) -> CoverageRecord {
        CoverageRecord {
            id: 1040000,
            id_2,
            start_day: start.0,
            start_time: start.1,
            end_day: end.0,
            end_time: end.1,
        }
    }

    #[test]
    fn full_week_from_pieces() {
        let mut records = Vec::new();
        for day in [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ] {
            records.push(record(1, (day, time(0, 0, 0)), (day, time(9, 59, 59))));
            records.push(record(1, (day, time(10, 0, 0)), (day, time(17, 59, 59))));
            records.push(record(1, (day, time(18, 0, 0)), (day, time(23, 59, 59))));
        }
        // Overlaps are fine
        records.push(record(1, (Weekday::Tue, time(8, 0, 0)), (Weekday::Wed, time(12, 0, 0))));

        let complete = time_check(&records).unwrap();
        assert_eq!(complete.len(), 1);
        assert!(complete[&(1040000, 1)]);
    }

    #[test]
    fn gaps() {
        let records = vec![
            // one second missing on Wednesday
            record(1, (Weekday::Mon, time(0, 0, 0)), (Weekday::Wed, time(11, 59, 58))),
            record(1, (Weekday::Wed, time(12, 0, 0)), (Weekday::Sun, time(23, 59, 59))),
            // Sunday evening missing
            record(2, (Weekday::Mon, time(0, 0, 0)), (Weekday::Sun, time(20, 0, 0))),
            // Monday morning missing
            record(3, (Weekday::Mon, time(0, 0, 1)), (Weekday::Sun, time(23, 59, 59))),
            // complete
            record(4, (Weekday::Mon, time(0, 0, 0)), (Weekday::Sun, time(23, 59, 59))),
        ];

        let complete = time_check(&records).unwrap();
        assert_eq!(
            complete.into_iter().collect::<Vec<_>>(),
            vec![
                ((1040000, 1), false),
                ((1040000, 2), false),
                ((1040000, 3), false),
                ((1040000, 4), true),
            ]
        );
    }

    #[test]
    fn reversed_record() {
        let records = vec![record(1, (Weekday::Fri, time(0, 0, 0)), (Weekday::Thu, time(0, 0, 0)))];
        assert!(matches!(time_check(&records), Err(Error::InvalidInput(_))));
    }
}

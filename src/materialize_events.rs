use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};
use miette::miette;

use crate::slot_times;

/// Some calendar importers ignore zone qualifiers entirely, so the feed
/// ships every boundary pre-shifted by this many hours instead of
/// relying on the zone being honoured. Deliberate, do not "fix".
const IMPORTER_OFFSET_HOURS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotBoundary {
  Start,
  End,
}

/// Materializes one boundary of a class occurrence into an absolute
/// timestamp: the base date's year and month, the walker's day-of-month,
/// and the slot's wall-clock time, minus the importer offset, in UTC.
pub fn occurrence_boundary(
  base: NaiveDate,
  day_of_month: u32,
  slot: u32,
  boundary: SlotBoundary,
) -> miette::Result<DateTime<Utc>> {
  miette::ensure!(day_of_month >= 1, "day-of-month must be 1-based");

  let time = match boundary {
    SlotBoundary::Start => slot_times::slot_start(slot),
    SlotBoundary::End => slot_times::slot_end(slot),
  }
  .ok_or(miette!("hour-slot {slot} is outside the lesson grid"))?;

  // built from the first of the month so a day counter that ran past
  // the month's end rolls into the next month
  let first_of_month = NaiveDate::from_ymd_opt(base.year(), base.month(), 1)
    .ok_or(miette!("base date {base} has no first of month"))?;
  let date = first_of_month
    .checked_add_days(Days::new(u64::from(day_of_month) - 1))
    .ok_or(miette!(
      "day-of-month {day_of_month} overflows the calendar"
    ))?;

  Ok(date.and_time(time).and_utc() - Duration::hours(IMPORTER_OFFSET_HOURS))
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 1).unwrap()
  }

  #[test]
  fn start_boundary_is_shifted_two_hours_back() {
    // slot 1 starts 08:00 wall-clock
    let stamp =
      occurrence_boundary(base(), 7, 1, SlotBoundary::Start).unwrap();
    assert_eq!(
      stamp,
      Utc.with_ymd_and_hms(2024, 10, 7, 6, 0, 0).unwrap()
    );
  }

  #[test]
  fn end_boundary_uses_the_end_table() {
    // slot 2 ends 09:30 wall-clock
    let stamp = occurrence_boundary(base(), 7, 2, SlotBoundary::End).unwrap();
    assert_eq!(
      stamp,
      Utc.with_ymd_and_hms(2024, 10, 7, 7, 30, 0).unwrap()
    );
  }

  #[test]
  fn day_counter_past_the_month_rolls_over() {
    let base = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let stamp = occurrence_boundary(base, 35, 1, SlotBoundary::Start).unwrap();
    // January has 31 days; day 35 lands on February 4th
    assert_eq!(stamp, Utc.with_ymd_and_hms(2024, 2, 4, 6, 0, 0).unwrap());
  }

  #[test]
  fn slots_outside_the_grid_are_rejected() {
    assert!(occurrence_boundary(base(), 7, 0, SlotBoundary::Start).is_err());
    assert!(occurrence_boundary(base(), 7, 17, SlotBoundary::End).is_err());
  }
}

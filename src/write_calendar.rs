use chrono::{NaiveDate, Utc};
use icalendar::{Calendar, Component, Event, EventLike, Property};
use miette::{Context, IntoDiagnostic};
use tracing::{debug, instrument, trace};
use uuid::Uuid;

use crate::{
  materialize_events::{SlotBoundary, occurrence_boundary},
  walk_grid::model::DaySchedule,
};

pub const OUTPUT_PATH: &str = "calendar.ics";
const CALENDAR_TIMEZONE: &str = "Europe/Warsaw";
const ICS_STAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Assembles one VEVENT per (day, occurrence) pair. Days iterate in
/// calendar order and classes in slot order, so the feed is
/// reproducible across runs.
#[instrument(skip(days), fields(%start_date))]
pub fn build_calendar(
  start_date: NaiveDate,
  days: &DaySchedule,
) -> miette::Result<Calendar> {
  let mut calendar = Calendar::new();
  calendar.timezone(CALENDAR_TIMEZONE);
  calendar.append_property(Property::new("TIMEZONE-ID", CALENDAR_TIMEZONE));

  let now = Utc::now();
  let stamp = now.format(ICS_STAMP_FORMAT).to_string();

  for (&day, occurrences) in days {
    for occurrence in occurrences {
      let starts = occurrence_boundary(
        start_date,
        day,
        occurrence.start_slot,
        SlotBoundary::Start,
      )
      .context(format!(
        "failed to materialize start of {:?} on day {day}",
        occurrence.name
      ))?;
      let ends = occurrence_boundary(
        start_date,
        day,
        occurrence.end_slot,
        SlotBoundary::End,
      )
      .context(format!(
        "failed to materialize end of {:?} on day {day}",
        occurrence.name
      ))?;

      if !occurrence.weeks.is_empty() {
        // recurrence weeks ride along in the model but are not expanded
        // into repeating events
        trace!(
          name = occurrence.name.as_str(),
          weeks = ?occurrence.weeks,
          "occurrence has recurrence weeks"
        );
      }

      let event = Event::new()
        .uid(&Uuid::new_v4().simple().to_string())
        .summary(&occurrence.name)
        .description(&format!("Prowadzący: {}", occurrence.teacher))
        .location(occurrence.locations.join(", ").trim())
        .timestamp(now)
        .append_property(Property::new("CREATED", &stamp))
        .append_property(Property::new("LAST-MODIFIED", &stamp))
        .starts(starts)
        .ends(ends)
        .append_property(Property::new("VTIMEZONE", CALENDAR_TIMEZONE))
        .done();

      calendar.push(event);
    }
  }

  Ok(calendar)
}

pub fn write_calendar(calendar: &Calendar) -> miette::Result<()> {
  std::fs::write(OUTPUT_PATH, calendar.to_string())
    .into_diagnostic()
    .context(format!("failed to write {OUTPUT_PATH}"))?;
  debug!(path = OUTPUT_PATH, "wrote calendar file");
  Ok(())
}

use calamine::Data;
use chrono::{Datelike, NaiveDate};
use miette::{Context, IntoDiagnostic, bail, miette};
use tracing::{debug, instrument, trace};

use self::model::{ClassOccurrence, DaySchedule};
use crate::{locate_sections::model::Section, open_sheet::DecodedWorksheet};

pub mod model;

// Fixed geometry of the schedule template. One calendar day occupies 17
// columns; the 15 sub-columns past the day header can each hold one
// lesson. Never inferred from the sheet.
pub const DAY_BLOCK_WIDTH: u32 = 17;
pub const CHECKED_SLOTS: u32 = 15;
const FIRST_DAY_COLUMN: u32 = 2;
const NAME_SUB_ROW: i64 = 2;
const TEACHER_SUB_ROW: i64 = 3;
const WEEKS_SUB_ROW: i64 = 4;
const LOCATION_SUB_ROWS: std::ops::Range<i64> = 3..8;

const START_DATE_FORMAT: &str = "%m-%d-%y";

/// Walks every day-block of the chosen section, producing the
/// day-of-month → classes mapping. The day counter advances by exactly
/// one per day-block, however many of its slots are empty.
#[instrument(skip_all, fields(section = %section.name, %start_date))]
pub fn walk_grid(
  worksheet: &DecodedWorksheet,
  section: &Section,
  start_date: NaiveDate,
) -> miette::Result<DaySchedule> {
  let column_count = worksheet.column_count();
  let mut current_col = FIRST_DAY_COLUMN;
  let mut current_day = start_date.day();
  let mut days = DaySchedule::new();

  loop {
    for slot in 1..=CHECKED_SLOTS {
      let Some(occurrence) = read_slot(worksheet, section, current_col, slot)
        .context(format!(
          "failed to read slot {slot} of day {current_day}"
        ))?
      else {
        continue;
      };
      trace!(day = current_day, slot, "found class occurrence");
      days.entry(current_day).or_default().push(occurrence);
    }

    current_col += DAY_BLOCK_WIDTH;
    current_day += 1;

    if current_col >= column_count {
      break;
    }
  }

  debug!(days = days.len(), "walked schedule grid");
  Ok(days)
}

fn read_slot(
  worksheet: &DecodedWorksheet,
  section: &Section,
  day_column: u32,
  slot: u32,
) -> miette::Result<Option<ClassOccurrence>> {
  let name =
    worksheet.cell_text(day_column + slot, sub_row(section, NAME_SUB_ROW)?);
  if name.is_empty() {
    return Ok(None);
  }

  let teacher = worksheet
    .cell_text(day_column + slot, sub_row(section, TEACHER_SUB_ROW)?);
  let weeks_raw =
    worksheet.cell_text(day_column + slot, sub_row(section, WEEKS_SUB_ROW)?);
  let weeks = parse_week_tokens(&weeks_raw)
    .context(format!("failed to parse week list for class {name:?}"))?;

  // the adjacent column holds up to 5 location candidates
  let mut locations = Vec::new();
  for location_sub_row in LOCATION_SUB_ROWS {
    let location = worksheet
      .cell_text(day_column + slot + 1, sub_row(section, location_sub_row)?);
    if !location.is_empty() {
      locations.push(location);
    }
  }

  trace!(name, teacher, ?weeks, ?locations, "read class slot");

  Ok(Some(ClassOccurrence {
    name,
    teacher,
    weeks,
    start_slot: slot,
    end_slot: slot + 1,
    locations,
  }))
}

fn sub_row(section: &Section, offset: i64) -> miette::Result<u32> {
  match u32::try_from(section.start_row + offset) {
    Ok(row) if row > 0 => Ok(row),
    _ => Err(miette!(
      "section {:?} starts above the sheet (row {})",
      section.name,
      section.start_row
    )),
  }
}

/// Parses a comma-separated recurrence-week list. Empty tokens and
/// tokens containing a slash (one-off exception markers, not base
/// weeks) are dropped; anything else must parse as an integer.
pub fn parse_week_tokens(raw: &str) -> miette::Result<Vec<i32>> {
  let mut weeks = Vec::new();
  for token in raw.split(',') {
    if token.is_empty() || token.contains('/') {
      continue;
    }
    let week = token
      .parse::<i32>()
      .into_diagnostic()
      .context(format!("failed to parse week token, got {token:?}"))?;
    weeks.push(week);
  }
  Ok(weeks)
}

/// Reads the semester start date. The cell decodes either as a real
/// XLSX date-time or as `MM-DD-YY` text, depending on how the template
/// was last saved.
pub fn read_start_date(
  worksheet: &DecodedWorksheet,
  col: u32,
  row: u32,
) -> miette::Result<NaiveDate> {
  match worksheet.cell_data(col, row) {
    Some(Data::DateTime(dt)) => dt.as_datetime().map(|dt| dt.date()).ok_or(
      miette!("start date cell holds an invalid date-time: {dt:?}"),
    ),
    None | Some(Data::Empty) => {
      bail!("start date cell at column {col}, row {row} is empty")
    }
    Some(data) => {
      let text = data.to_string();
      NaiveDate::parse_from_str(text.trim(), START_DATE_FORMAT)
        .into_diagnostic()
        .context(format!("failed to parse start date, got {text:?}"))
    }
  }
}

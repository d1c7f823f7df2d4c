use std::collections::HashMap;

use chrono::NaiveDate;
use kinded::Kinded;
use miette::{Context, miette};
use tracing::info;

use crate::{
  config::Config,
  locate_sections::{locate_sections, model::Section},
  open_sheet::{DecodedWorksheet, open_xlsx_from_path},
  walk_grid::{model::DaySchedule, read_start_date, walk_grid},
  write_calendar::{build_calendar, write_calendar},
};

#[derive(Kinded)]
#[kinded(kind = MasterStateStep, derive(Debug))]
pub enum MasterState {
  Start,
  DecodedWorkbook {
    worksheet: DecodedWorksheet,
  },
  LocatedSections {
    worksheet: DecodedWorksheet,
    sections:  HashMap<String, Section>,
  },
  WalkedGrid {
    start_date: NaiveDate,
    days:       DaySchedule,
  },
  BuiltCalendar {
    calendar: icalendar::Calendar,
  },
  WroteCalendar,
}

impl MasterState {
  pub fn completed(&self) -> bool {
    matches!(self, Self::WroteCalendar)
  }

  pub fn step(self, config: &Config) -> miette::Result<Self> {
    let old_state_step = self.kind();
    let new_state: MasterState = match self {
      MasterState::Start => MasterState::DecodedWorkbook {
        worksheet: open_xlsx_from_path(&config.path)?
          .first_worksheet()
          .context("failed to get schedule worksheet")?,
      },
      MasterState::DecodedWorkbook { worksheet } => {
        let sections = locate_sections(
          &worksheet,
          config.start_column_index()?,
          config.start_row,
        )
        .context("failed to locate schedule sections")?;
        MasterState::LocatedSections {
          worksheet,
          sections,
        }
      }
      MasterState::LocatedSections {
        worksheet,
        sections,
      } => {
        let section = choose_section(&sections, &config.group)?;
        info!(
          group = section.name.as_str(),
          start_row = section.start_row,
          end_row = section.end_row,
          "chose schedule section"
        );
        let (date_col, date_row) = config.date_cell()?;
        let start_date = read_start_date(&worksheet, date_col, date_row)
          .context("failed to read semester start date")?;
        let days = walk_grid(&worksheet, section, start_date)
          .context("failed to walk schedule grid")?;
        MasterState::WalkedGrid { start_date, days }
      }
      MasterState::WalkedGrid { start_date, days } => {
        MasterState::BuiltCalendar {
          calendar: build_calendar(start_date, &days)
            .context("failed to build calendar events")?,
        }
      }
      MasterState::BuiltCalendar { calendar } => {
        write_calendar(&calendar).context("failed to write calendar")?;
        MasterState::WroteCalendar
      }
      MasterState::WroteCalendar => unreachable!(),
    };

    info!(
      old_state = ?old_state_step,
      new_state = ?(new_state.kind()),
      "successfully transitioned state"
    );
    Ok(new_state)
  }
}

fn choose_section<'a>(
  sections: &'a HashMap<String, Section>,
  group: &str,
) -> miette::Result<&'a Section> {
  sections.get(group).ok_or_else(|| {
    let mut known: Vec<&str> = sections.keys().map(String::as_str).collect();
    known.sort_unstable();
    miette!(
      "group {group:?} not found in the schedule; known groups: {}",
      known.join(", ")
    )
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sections() -> HashMap<String, Section> {
    let mut sections = HashMap::new();
    for name in ["13K2", "14K1"] {
      sections.insert(name.to_owned(), Section {
        name:      name.to_owned(),
        start_row: 10,
        end_row:   20,
      });
    }
    sections
  }

  #[test]
  fn chooses_the_requested_group() {
    let sections = sections();
    let section = choose_section(&sections, "13K2").unwrap();
    assert_eq!(section.name, "13K2");
  }

  #[test]
  fn missing_group_reports_the_known_groups() {
    let sections = sections();
    let err = choose_section(&sections, "99Z9").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("99Z9"));
    assert!(message.contains("13K2"));
    assert!(message.contains("14K1"));
  }
}

use std::path::PathBuf;

use clap::Parser;
use umya_spreadsheet::helper::coordinate::column_index_from_string;

/// Columns between the scan column and the cell holding the semester
/// start date in the fixed schedule template.
const DATE_COLUMN_OFFSET: u32 = 4;
/// Rows between the configured start row and the start-date cell.
const DATE_ROW_OFFSET: u32 = 2;

#[derive(Debug, Parser)]
#[command(name = "gridcal")]
#[command(
  about = "Converts a weekly class-schedule spreadsheet into an iCalendar \
           feed",
  long_about = None
)]
pub struct Config {
  /// Spreadsheet file path
  #[arg(long)]
  pub path:         PathBuf,
  /// Class group to extract
  #[arg(long)]
  pub group:        String,
  /// Starting column of the section scan
  #[arg(long = "sc", default_value = "B")]
  pub start_column: String,
  /// Starting row of the section scan
  #[arg(long = "sr", default_value_t = 1)]
  pub start_row:    u32,
}

impl Config {
  pub fn start_column_index(&self) -> miette::Result<u32> {
    miette::ensure!(
      !self.start_column.is_empty()
        && self.start_column.chars().all(|c| c.is_ascii_alphabetic()),
      "starting column must be a column letter, got {:?}",
      self.start_column
    );
    Ok(column_index_from_string(&self.start_column))
  }

  /// 1-based (column, row) of the cell holding the semester start date.
  pub fn date_cell(&self) -> miette::Result<(u32, u32)> {
    Ok((
      self.start_column_index()? + DATE_COLUMN_OFFSET,
      self.start_row + DATE_ROW_OFFSET,
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse_config(args: &[&str]) -> Config {
    let mut full = vec!["gridcal", "--path", "plan.xlsx", "--group", "13K2"];
    full.extend_from_slice(args);
    Config::try_parse_from(full).expect("args should parse")
  }

  #[test]
  fn defaults_to_column_b_row_one() {
    let config = parse_config(&[]);
    assert_eq!(config.start_column, "B");
    assert_eq!(config.start_row, 1);
  }

  #[test]
  fn date_cell_sits_four_columns_right_and_two_rows_down() {
    let config = parse_config(&[]);
    assert_eq!(config.date_cell().unwrap(), (6, 3));

    let config = parse_config(&["--sc", "D", "--sr", "3"]);
    assert_eq!(config.date_cell().unwrap(), (8, 5));
  }

  #[test]
  fn rejects_non_letter_starting_column() {
    let config = parse_config(&["--sc", "4"]);
    assert!(config.start_column_index().is_err());
  }

  #[test]
  fn converts_multi_letter_columns() {
    let config = parse_config(&["--sc", "AA"]);
    assert_eq!(config.start_column_index().unwrap(), 27);
  }
}

use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use self::model::Section;
use crate::open_sheet::DecodedWorksheet;

pub mod model;

/// The scan never runs past this row; the template's section area ends
/// well above it.
pub const SCAN_ROW_LIMIT: u32 = 140;

/// Rows between a section's start marker and the row the template
/// treats as the section's true first row (two header rows above).
const SECTION_HEADER_ROWS: i64 = 2;

/// Scans one column of the sheet top to bottom, delimiting sections by
/// border-style transitions and keying them by their accumulated label.
#[instrument(skip(worksheet))]
pub fn locate_sections(
  worksheet: &DecodedWorksheet,
  scan_column: u32,
  start_row: u32,
) -> miette::Result<HashMap<String, Section>> {
  let mut scanner = SectionScanner::new(start_row);

  for row in start_row..SCAN_ROW_LIMIT {
    let text = worksheet.cell_text(scan_column, row);
    let edges = worksheet.cell_border_edges(scan_column, row);
    scanner.push_row(row, &text, edges.top || edges.bottom);
  }

  let sections = scanner.into_sections();
  debug!(count = sections.len(), "located sections");
  Ok(sections)
}

/// Accumulator state machine behind the scan: label fragments gather
/// across rows and are evaluated whenever a border edge marks a section
/// boundary.
#[derive(Debug)]
pub struct SectionScanner {
  marker:    i64,
  fragments: Vec<String>,
  sections:  HashMap<String, Section>,
}

impl SectionScanner {
  pub fn new(start_row: u32) -> Self {
    Self {
      marker:    i64::from(start_row),
      fragments: Vec::new(),
      sections:  HashMap::new(),
    }
  }

  /// Feed one scanned row: its trimmed text joins the accumulator, and a
  /// top-or-bottom border edge triggers a boundary evaluation.
  pub fn push_row(&mut self, row: u32, text: &str, boundary: bool) {
    self.fragments.push(text.trim().to_owned());
    if !boundary {
      return;
    }
    self.evaluate_boundary(i64::from(row));
  }

  fn evaluate_boundary(&mut self, row: i64) {
    let label = self.fragments.join(" ").trim().to_owned();
    self.fragments.clear();

    if label.is_empty() {
      trace!(row, "boundary with empty accumulator, moving section start");
      self.marker = row;
      return;
    }

    // stray week numbers land in the scan column; they are not labels
    if label.parse::<i64>().is_ok() {
      trace!(row, label, "boundary label is numeric noise, discarding");
      return;
    }

    debug!(row, label, "emitting section");
    self.sections.insert(label.clone(), Section {
      name:      label,
      start_row: self.marker - SECTION_HEADER_ROWS,
      end_row:   row,
    });
    self.marker = row;
  }

  /// Later identically-named sections overwrite earlier ones.
  pub fn into_sections(self) -> HashMap<String, Section> {
    self.sections
  }
}

/// A named, border-delimited vertical block of rows holding one class
/// group's schedule.
///
/// Rows are signed because the template arithmetic anchors a section two
/// rows above its first labelled row, which can land above row 1 at the
/// very top of the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
  pub name:      String,
  pub start_row: i64,
  pub end_row:   i64,
}

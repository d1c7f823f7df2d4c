use std::{fs, io::Cursor, path::Path};

use calamine::{Data, Range, Reader, Xlsx};
use miette::{Context, IntoDiagnostic};
use tracing::{debug, instrument};

pub struct DecodedSpreadsheet {
  pub main:   Xlsx<Cursor<Vec<u8>>>,
  pub styles: umya_spreadsheet::Spreadsheet,
}

impl DecodedSpreadsheet {
  /// The schedule always lives on the first sheet of the workbook.
  pub fn first_worksheet(&mut self) -> miette::Result<DecodedWorksheet> {
    let name = self
      .main
      .sheet_names()
      .first()
      .cloned()
      .ok_or(miette::miette!("workbook contains no sheets"))?;
    self.get_worksheet(&name)
  }

  pub fn get_worksheet(
    &mut self,
    name: &str,
  ) -> miette::Result<DecodedWorksheet> {
    let main = self
      .main
      .worksheet_range(name)
      .into_diagnostic()
      .context(format!("failed to find sheet in main: \"{name}\""))?;
    self.styles.read_sheet_by_name(name);
    let styles = self
      .styles
      .get_sheet_by_name(name)
      .ok_or(miette::miette!(
        "failed to find sheet in styles: \"{name}\""
      ))?
      .clone();

    Ok(DecodedWorksheet {
      main,
      styles: Box::new(styles),
    })
  }
}

pub struct DecodedWorksheet {
  pub main:   Range<Data>,
  pub styles: Box<umya_spreadsheet::Worksheet>,
}

/// Whether a cell's style carries a visible top or bottom border edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorderEdges {
  pub top:    bool,
  pub bottom: bool,
}

impl DecodedWorksheet {
  /// Raw textual value of the cell at a 1-based (column, row)
  /// coordinate, whitespace and all; callers trim where their own
  /// rules want it. Blank and out-of-range cells read as the empty
  /// string.
  pub fn cell_text(&self, col: u32, row: u32) -> String {
    if col == 0 || row == 0 {
      return String::new();
    }
    match self.main.get_value((row - 1, col - 1)) {
      None | Some(Data::Empty) => String::new(),
      Some(value) => value.to_string(),
    }
  }

  /// Raw decoded value of the cell, for callers that care about the
  /// underlying cell type rather than its text.
  pub fn cell_data(&self, col: u32, row: u32) -> Option<&Data> {
    if col == 0 || row == 0 {
      return None;
    }
    self.main.get_value((row - 1, col - 1))
  }

  pub fn cell_border_edges(&self, col: u32, row: u32) -> BorderEdges {
    if col == 0 || row == 0 {
      return BorderEdges::default();
    }
    // coords are one-indexed in umya
    let style = self.styles.get_style((col, row));
    let Some(borders) = style.get_borders() else {
      return BorderEdges::default();
    };
    BorderEdges {
      top:    borders.get_top().get_border_style()
        != umya_spreadsheet::Border::BORDER_NONE,
      bottom: borders.get_bottom().get_border_style()
        != umya_spreadsheet::Border::BORDER_NONE,
    }
  }

  /// 1-based column count of the used range.
  pub fn column_count(&self) -> u32 {
    self.main.end().map(|(_, col)| col + 1).unwrap_or(0)
  }
}

#[instrument]
pub fn open_xlsx_from_path(
  path: &Path,
) -> miette::Result<DecodedSpreadsheet> {
  debug!("reading spreadsheet file");
  let body = fs::read(path).into_diagnostic().context(format!(
    "failed to read spreadsheet at {}",
    path.display()
  ))?;

  let payload = Cursor::new(body);

  let main_sheet = Xlsx::new(payload.clone())
    .into_diagnostic()
    .context("failed to decode spreadsheet values as XLSX")?;
  debug!("decoded spreadsheet values");
  let styles_only_sheet =
    umya_spreadsheet::reader::xlsx::read_reader(payload, false)
      .into_diagnostic()
      .context("failed to decode spreadsheet styles as XLSX")?;

  Ok(DecodedSpreadsheet {
    main:   main_sheet,
    styles: styles_only_sheet,
  })
}

#[cfg(test)]
pub(crate) fn worksheet_fixture(
  max_col: u32,
  max_row: u32,
  cells: &[(u32, u32, &str)],
  bottom_borders: &[(u32, u32)],
) -> DecodedWorksheet {
  let mut range: Range<Data> = Range::new((0, 0), (max_row - 1, max_col - 1));
  for &(col, row, value) in cells {
    range.set_value((row - 1, col - 1), Data::String(value.to_owned()));
  }

  let mut book = umya_spreadsheet::new_file();
  let sheet = book
    .get_sheet_by_name_mut("Sheet1")
    .expect("new workbook should have Sheet1");
  for &(col, row) in bottom_borders {
    sheet
      .get_style_mut((col, row))
      .get_borders_mut()
      .get_bottom_mut()
      .set_border_style(umya_spreadsheet::Border::BORDER_THIN);
  }

  DecodedWorksheet {
    main:   range,
    styles: Box::new(sheet.clone()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cell_text_is_empty_outside_the_used_range() {
    let worksheet = worksheet_fixture(4, 4, &[(2, 2, "label")], &[]);
    assert_eq!(worksheet.cell_text(2, 2), "label");
    assert_eq!(worksheet.cell_text(3, 3), "");
    assert_eq!(worksheet.cell_text(200, 200), "");
    assert_eq!(worksheet.cell_text(0, 1), "");
  }

  #[test]
  fn cell_text_does_not_trim() {
    let worksheet = worksheet_fixture(4, 4, &[(2, 2, "  13K2 ")], &[]);
    assert_eq!(worksheet.cell_text(2, 2), "  13K2 ");
  }

  #[test]
  fn border_edges_reflect_the_cell_style() {
    let worksheet = worksheet_fixture(4, 4, &[], &[(2, 3)]);
    let edges = worksheet.cell_border_edges(2, 3);
    assert!(edges.bottom);
    assert!(!edges.top);
    let edges = worksheet.cell_border_edges(2, 2);
    assert!(!edges.bottom && !edges.top);
  }

  #[test]
  fn column_count_covers_the_used_range() {
    let worksheet = worksheet_fixture(36, 20, &[], &[]);
    assert_eq!(worksheet.column_count(), 36);
  }
}

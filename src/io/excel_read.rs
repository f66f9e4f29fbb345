use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};

use crate::error::{Result, ToolError};

/// How a spreadsheet column is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    /// Positional letter address such as `A` or `AB`.
    Letter(String),
    /// Header-title lookup against the first row.
    Title(String),
}

impl ColumnRef {
    /// Classifies a raw column argument: all-uppercase ASCII letters address
    /// a position, anything else is matched against the header row.
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_uppercase()) {
            ColumnRef::Letter(raw.to_string())
        } else {
            ColumnRef::Title(raw.to_string())
        }
    }
}

/// Reads one column from a workbook sheet. The first row is the header and
/// is excluded; empty cells are dropped; row order is preserved. A missing
/// sheet or header title is an error rather than a silently empty result.
pub fn read_column(path: &Path, sheet: Option<&str>, column: &ColumnRef) -> Result<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = resolve_sheet_name(&workbook, sheet)?;
    let range = read_sheet_range(&mut workbook, &sheet_name)?;

    let col_idx = match column {
        ColumnRef::Letter(letters) => letter_to_index(letters),
        ColumnRef::Title(title) => range
            .rows()
            .next()
            .and_then(|row| {
                row.iter()
                    .position(|cell| cell_to_string(Some(cell)) == *title)
            })
            .ok_or_else(|| ToolError::ColumnNotFound {
                sheet: sheet_name.clone(),
                column: title.clone(),
            })?,
    };

    let mut values = Vec::new();
    for row in range.rows().skip(1) {
        let value = cell_to_string(row.get(col_idx));
        if !value.is_empty() {
            values.push(value);
        }
    }
    Ok(values)
}

/// A sheet captured as raw strings, header row included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetTable {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Loads every sheet of a workbook as raw strings. The writer uses this to
/// rebuild a workbook around an updated sheet.
pub fn read_tables(path: &Path) -> Result<Vec<SheetTable>> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let names: Vec<String> = workbook.sheet_names().to_vec();

    let mut tables = Vec::with_capacity(names.len());
    for name in names {
        let range = read_sheet_range(&mut workbook, &name)?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(|cell| cell_to_string(Some(cell))).collect())
            .collect();
        tables.push(SheetTable { name, rows });
    }
    Ok(tables)
}

fn resolve_sheet_name<R: std::io::Read + std::io::Seek>(
    workbook: &Xlsx<R>,
    requested: Option<&str>,
) -> Result<String> {
    match requested {
        Some(name) => Ok(name.to_string()),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ToolError::InvalidWorkbook("workbook has no sheets".into())),
    }
}

fn read_sheet_range<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    name: &str,
) -> Result<calamine::Range<DataType>> {
    let range_result = workbook
        .worksheet_range(name)
        .ok_or_else(|| ToolError::SheetNotFound(name.to_string()))?;
    let range = range_result.map_err(ToolError::from)?;
    Ok(range)
}

/// `A` → 0, `Z` → 25, `AA` → 26.
fn letter_to_index(letters: &str) -> usize {
    letters
        .bytes()
        .fold(0usize, |acc, b| acc * 26 + usize::from(b - b'A') + 1)
        .saturating_sub(1)
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_ref_classifies_letters_and_titles() {
        assert_eq!(ColumnRef::parse("A"), ColumnRef::Letter("A".into()));
        assert_eq!(ColumnRef::parse("AB"), ColumnRef::Letter("AB".into()));
        assert_eq!(ColumnRef::parse("email"), ColumnRef::Title("email".into()));
        assert_eq!(ColumnRef::parse("邮箱"), ColumnRef::Title("邮箱".into()));
        assert_eq!(ColumnRef::parse(""), ColumnRef::Title("".into()));
    }

    #[test]
    fn letters_map_to_indices() {
        assert_eq!(letter_to_index("A"), 0);
        assert_eq!(letter_to_index("C"), 2);
        assert_eq!(letter_to_index("Z"), 25);
        assert_eq!(letter_to_index("AA"), 26);
    }
}

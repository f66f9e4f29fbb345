use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::io::excel_read::{self, SheetTable};

/// Writes a new workbook containing a single sheet. An existing file at
/// `path` is replaced.
pub fn write_sheet(
    path: &Path,
    sheet_name: &str,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<()> {
    let table = build_table(sheet_name, headers, rows);
    write_tables(path, &[table])
}

/// Adds a sheet to an existing workbook. A taken sheet name gets a numeric
/// suffix (`Users`, `Users_1`, ...) instead of clobbering the existing sheet.
pub fn append_sheet(
    path: &Path,
    sheet_name: &str,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<()> {
    let mut tables = excel_read::read_tables(path)?;

    let mut final_name = sheet_name.to_string();
    let mut counter = 1;
    while tables.iter().any(|table| table.name == final_name) {
        final_name = format!("{sheet_name}_{counter}");
        counter += 1;
    }

    tables.push(build_table(&final_name, headers, rows));
    write_tables(path, &tables)
}

/// Replaces or extends the named sheet, creating it when absent. In append
/// mode the new rows land after the existing ones; otherwise the sheet body
/// is replaced wholesale.
pub fn update_sheet(
    path: &Path,
    sheet_name: &str,
    headers: &[&str],
    rows: &[Vec<String>],
    append: bool,
) -> Result<()> {
    let mut tables = excel_read::read_tables(path)?;

    match tables.iter_mut().find(|table| table.name == sheet_name) {
        Some(existing) if append => {
            existing.rows.extend(rows.iter().cloned());
        }
        Some(existing) => {
            *existing = build_table(sheet_name, headers, rows);
        }
        None => tables.push(build_table(sheet_name, headers, rows)),
    }

    write_tables(path, &tables)
}

/// Materialises the given tables as an xlsx workbook at `path`.
pub fn write_tables(path: &Path, tables: &[SheetTable]) -> Result<()> {
    let mut workbook = Workbook::new();

    for table in tables {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&table.name)?;

        for (row_idx, row) in table.rows.iter().enumerate() {
            for (col_idx, cell) in row.iter().enumerate() {
                worksheet.write_string(row_idx as u32, col_idx as u16, cell)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn build_table(sheet_name: &str, headers: &[&str], rows: &[Vec<String>]) -> SheetTable {
    let mut all_rows = Vec::with_capacity(rows.len() + 1);
    if !headers.is_empty() {
        all_rows.push(headers.iter().map(|header| (*header).to_string()).collect());
    }
    all_rows.extend(rows.iter().cloned());
    SheetTable {
        name: sheet_name.to_string(),
        rows: all_rows,
    }
}

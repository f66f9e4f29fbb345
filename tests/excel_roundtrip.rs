use roster_tools::ToolError;
use roster_tools::io::excel_read::{self, ColumnRef};
use roster_tools::io::excel_write;
use tempfile::tempdir;

fn user_rows() -> Vec<Vec<String>> {
    vec![
        vec!["张三".to_string(), "zhangsan@example.com".to_string()],
        vec!["李四".to_string(), "lisi@example.com".to_string()],
    ]
}

#[test]
fn written_sheet_reads_back_by_letter_and_title() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("output.xlsx");

    excel_write::write_sheet(&path, "Users", &["name", "email"], &user_rows())
        .expect("sheet written");

    let names = excel_read::read_column(&path, Some("Users"), &ColumnRef::parse("A"))
        .expect("names read");
    assert_eq!(names, vec!["张三".to_string(), "李四".to_string()]);

    let emails = excel_read::read_column(&path, Some("Users"), &ColumnRef::parse("email"))
        .expect("emails read");
    assert_eq!(
        emails,
        vec!["zhangsan@example.com".to_string(), "lisi@example.com".to_string()]
    );
}

#[test]
fn appending_a_taken_sheet_name_gets_a_suffix() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("output.xlsx");

    excel_write::write_sheet(&path, "Users", &["email"], &[vec!["a@x.com".to_string()]])
        .expect("sheet written");
    excel_write::append_sheet(&path, "Users", &["email"], &[vec!["b@x.com".to_string()]])
        .expect("sheet appended");

    let tables = excel_read::read_tables(&path).expect("workbook read");
    let names: Vec<&str> = tables.iter().map(|table| table.name.as_str()).collect();
    assert_eq!(names, vec!["Users", "Users_1"]);

    let appended = excel_read::read_column(&path, Some("Users_1"), &ColumnRef::parse("A"))
        .expect("appended column read");
    assert_eq!(appended, vec!["b@x.com".to_string()]);
}

#[test]
fn update_overwrites_or_extends_a_sheet() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("output.xlsx");

    excel_write::write_sheet(&path, "Users", &["email"], &[vec!["a@x.com".to_string()]])
        .expect("sheet written");

    excel_write::update_sheet(
        &path,
        "Users",
        &["email"],
        &[vec!["b@x.com".to_string()]],
        true,
    )
    .expect("sheet extended");
    let extended = excel_read::read_column(&path, Some("Users"), &ColumnRef::parse("A"))
        .expect("column read");
    assert_eq!(extended, vec!["a@x.com".to_string(), "b@x.com".to_string()]);

    excel_write::update_sheet(
        &path,
        "Users",
        &["email"],
        &[vec!["c@x.com".to_string()]],
        false,
    )
    .expect("sheet replaced");
    let replaced = excel_read::read_column(&path, Some("Users"), &ColumnRef::parse("A"))
        .expect("column read");
    assert_eq!(replaced, vec!["c@x.com".to_string()]);

    // Updating an absent sheet creates it alongside the others.
    excel_write::update_sheet(
        &path,
        "Departments",
        &["department"],
        &[vec!["技术部".to_string()]],
        false,
    )
    .expect("sheet created");
    let tables = excel_read::read_tables(&path).expect("workbook read");
    assert_eq!(tables.len(), 2);
}

#[test]
fn missing_sheet_and_column_are_typed_errors() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("output.xlsx");

    excel_write::write_sheet(&path, "Users", &["name", "email"], &user_rows())
        .expect("sheet written");

    let missing_sheet = excel_read::read_column(&path, Some("nope"), &ColumnRef::parse("A"));
    assert!(matches!(missing_sheet, Err(ToolError::SheetNotFound(_))));

    let missing_column = excel_read::read_column(&path, Some("Users"), &ColumnRef::parse("邮箱"));
    assert!(matches!(
        missing_column,
        Err(ToolError::ColumnNotFound { .. })
    ));
}

#[test]
fn empty_cells_are_dropped_and_order_preserved() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("output.xlsx");

    excel_write::write_sheet(
        &path,
        "Users",
        &["email"],
        &[
            vec!["c@x.com".to_string()],
            vec![String::new()],
            vec!["a@x.com".to_string()],
        ],
    )
    .expect("sheet written");

    let emails = excel_read::read_column(&path, Some("Users"), &ColumnRef::parse("A"))
        .expect("column read");
    assert_eq!(emails, vec!["c@x.com".to_string(), "a@x.com".to_string()]);
}

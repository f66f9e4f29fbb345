//! Renderers for the aligned console tables and the two report files. Pure
//! string-building; printing and file writes stay in the binary.

pub mod width;

use crate::model::{RosterEntry, UNKNOWN_LABEL};
use crate::reconcile::{DuplicateEmail, SheetOnlyEmail};

use self::width::pad;

/// Report file listing spreadsheet emails absent from the roster.
pub const NOT_FOUND_REPORT: &str = "not_found_in_json.txt";
/// Report file listing roster entries absent from the spreadsheet sheets.
pub const JSON_ONLY_REPORT: &str = "json_only_emails.txt";

/// Fixed display widths for the aligned tables. The CJK header labels count
/// as two columns per character, which the narrow budgets already allow for.
mod widths {
    pub const INDEX: usize = 4;
    pub const TEAM: usize = 8;
    pub const NAME: usize = 16;
    pub const EMAIL: usize = 35;
    pub const ROLE: usize = 8;
    pub const LAST_USED: usize = 25;
    pub const EMAIL_LIST: usize = 35;
    pub const COUNT: usize = 10;
}

const EMAILS_PER_ROW: usize = 3;

fn rule(len: usize) -> String {
    "=".repeat(len)
}

/// Rule spanning the roster-style tables: the column budget plus separators.
fn roster_rule() -> String {
    rule(
        widths::INDEX
            + widths::TEAM
            + widths::NAME
            + widths::EMAIL
            + widths::ROLE
            + widths::LAST_USED
            + 15,
    )
}

fn team_or_unknown(team: &str) -> &str {
    if team.is_empty() { UNKNOWN_LABEL } else { team }
}

/// Renders the flattened roster as an aligned table.
pub fn roster_table(entries: &[RosterEntry]) -> String {
    let separator = roster_rule();
    let header = [
        pad("序号", widths::INDEX),
        pad("团队", widths::TEAM - 2),
        pad("用户名", widths::NAME),
        pad("邮箱", widths::EMAIL),
        pad("角色", widths::ROLE),
        pad("最后使用时间", widths::LAST_USED),
    ]
    .join(" | ");

    let mut lines = vec![separator.clone(), header, separator.clone()];
    for (index, entry) in entries.iter().enumerate() {
        lines.push(
            [
                pad(&(index + 1).to_string(), widths::INDEX),
                format!("[{}]", pad(team_or_unknown(&entry.team), widths::TEAM - 2)),
                pad(&entry.name, widths::NAME),
                pad(&entry.email, widths::EMAIL),
                pad(&entry.role, widths::ROLE),
                // The last-used column is left unpadded on data rows.
                entry.last_used.clone(),
            ]
            .join(" | "),
        );
    }
    lines.push(separator);
    lines.join("\n")
}

/// Renders an email list three to a row, numbered, between `=` rules.
pub fn email_grid(emails: &[String]) -> String {
    let separator = rule((widths::EMAIL_LIST + 3) * EMAILS_PER_ROW + 5);
    let header_cell = format!(
        "{} | {}",
        pad("序号", widths::INDEX),
        pad("邮箱", widths::EMAIL_LIST)
    );
    let header = vec![header_cell; EMAILS_PER_ROW].join(" | ");

    let mut lines = vec![separator.clone(), header, separator.clone()];
    for chunk_start in (0..emails.len()).step_by(EMAILS_PER_ROW) {
        let mut cells = Vec::with_capacity(EMAILS_PER_ROW);
        for offset in 0..EMAILS_PER_ROW {
            let cell = match emails.get(chunk_start + offset) {
                Some(email) => format!(
                    "{} | {}",
                    pad(&(chunk_start + offset + 1).to_string(), widths::INDEX),
                    pad(email, widths::EMAIL_LIST)
                ),
                None => format!(
                    "{} | {}",
                    pad("", widths::INDEX),
                    pad("", widths::EMAIL_LIST)
                ),
            };
            cells.push(cell);
        }
        lines.push(cells.join(" | "));
    }
    lines.push(separator);
    lines.join("\n")
}

/// Renders the duplicate-email table, roster details joined where known.
pub fn duplicates_table(duplicates: &[DuplicateEmail]) -> String {
    let separator = roster_rule();
    let header = [
        format!("[{}]", pad("团队", widths::TEAM - 2)),
        pad("用户名", widths::NAME),
        pad("邮箱", widths::EMAIL),
        pad("角色", widths::ROLE),
        pad("最后使用时间", widths::LAST_USED),
        pad("重复次数", widths::COUNT),
    ]
    .join(" | ");

    let mut lines = vec![separator.clone(), header, separator.clone()];
    for duplicate in duplicates {
        lines.push(duplicate_row(duplicate));
    }
    lines.push(separator);
    lines.join("\n")
}

fn duplicate_row(duplicate: &DuplicateEmail) -> String {
    let (team, name, role, last_used) = match &duplicate.entry {
        Some(entry) => (
            team_or_unknown(&entry.team),
            entry.name.as_str(),
            entry.role.as_str(),
            entry.last_used.as_str(),
        ),
        None => (UNKNOWN_LABEL, UNKNOWN_LABEL, UNKNOWN_LABEL, UNKNOWN_LABEL),
    };
    [
        format!("[{}]", pad(team, widths::TEAM - 2)),
        pad(name, widths::NAME),
        pad(&duplicate.email, widths::EMAIL),
        pad(role, widths::ROLE),
        pad(last_used, widths::LAST_USED),
        pad(&duplicate.count.to_string(), widths::COUNT),
    ]
    .join(" | ")
}

/// Renders the spreadsheet-only table: emails with no roster match, plus
/// the sheets that contained them.
pub fn sheet_only_table(entries: &[SheetOnlyEmail]) -> String {
    let separator = rule(widths::EMAIL + 20);
    let header = format!(
        "{} | {} | 来源",
        pad("序号", widths::INDEX),
        pad("邮箱", widths::EMAIL)
    );

    let mut lines = vec![separator.clone(), header, separator.clone()];
    for (index, entry) in entries.iter().enumerate() {
        lines.push(format!(
            "{} | {} | {}",
            pad(&(index + 1).to_string(), widths::INDEX),
            pad(&entry.email, widths::EMAIL),
            entry.sheets.join(", ")
        ));
    }
    lines.push(separator);
    lines.join("\n")
}

/// Renders the roster-only table: entries whose email never appears in the
/// spreadsheet sheets.
pub fn roster_only_table(entries: &[RosterEntry]) -> String {
    let separator = roster_rule();
    let header = [
        format!("[{}]", pad("团队", widths::TEAM - 2)),
        pad("用户名", widths::NAME),
        pad("邮箱", widths::EMAIL),
        pad("角色", widths::ROLE),
        pad("最后使用时间", widths::LAST_USED),
    ]
    .join(" | ");

    let mut lines = vec![separator.clone(), header, separator.clone()];
    for entry in entries {
        lines.push(
            [
                format!("[{}]", pad(team_or_unknown(&entry.team), widths::TEAM - 2)),
                pad(&entry.name, widths::NAME),
                pad(&entry.email, widths::EMAIL),
                pad(&entry.role, widths::ROLE),
                pad(&entry.last_used, widths::LAST_USED),
            ]
            .join(" | "),
        );
    }
    lines.push(separator);
    lines.join("\n")
}

/// Builds the `not_found_in_json.txt` body: header line, delimited rows
/// between `=` rules, then the comma-joined email list.
pub fn sheet_only_report(entries: &[SheetOnlyEmail]) -> String {
    let mut content = String::new();
    content.push_str("在JSON数据中未找到的邮箱:\n");
    content.push_str(&rule(80));
    content.push('\n');
    content.push_str("序号 | 邮箱 | 来源\n");
    content.push_str(&rule(80));
    content.push('\n');
    for (index, entry) in entries.iter().enumerate() {
        content.push_str(&format!(
            "{}. {} | {}\n",
            index + 1,
            entry.email,
            entry.sheets.join(", ")
        ));
    }
    content.push_str(&rule(80));
    content.push_str("\n\n");
    content.push_str("邮箱列表（逗号分隔）:\n");
    let emails: Vec<&str> = entries.iter().map(|entry| entry.email.as_str()).collect();
    content.push_str(&emails.join(","));
    content
}

/// Builds the `json_only_emails.txt` body, mirroring the roster-only table
/// in delimited text form.
pub fn roster_only_report(entries: &[RosterEntry]) -> String {
    let mut content = String::new();
    content.push_str("JSON数据中独有的邮箱（不在Excel表中）:\n");
    content.push_str(&rule(120));
    content.push('\n');
    content.push_str("序号 | 团队 | 用户名 | 邮箱 | 角色 | 最后使用时间\n");
    content.push_str(&rule(120));
    content.push('\n');
    for (index, entry) in entries.iter().enumerate() {
        content.push_str(&format!(
            "{}. [{}] | {} | {} | {} | {}\n",
            index + 1,
            team_or_unknown(&entry.team),
            entry.name,
            entry.email,
            entry.role,
            entry.last_used
        ));
    }
    content.push_str(&rule(120));
    content.push_str("\n\n");
    content.push_str("邮箱列表（逗号分隔）:\n");
    let emails: Vec<&str> = entries.iter().map(|entry| entry.email.as_str()).collect();
    content.push_str(&emails.join(","));
    content
}

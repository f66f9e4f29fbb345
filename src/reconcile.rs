//! Email reconciliation engine: pure set/map bookkeeping over collections
//! built once per run. No IO; rendering lives in [`crate::report`].

use std::collections::HashMap;

use crate::model::RosterEntry;

/// Lowercase join key used for matching emails across sources. Matching is
/// always case-insensitive; display always keeps the original casing.
pub fn email_key(raw: &str) -> String {
    raw.to_lowercase()
}

/// Emails read from one spreadsheet sheet, in row order.
#[derive(Debug, Clone)]
pub struct SheetEmails {
    pub sheet: String,
    pub emails: Vec<String>,
}

/// One spreadsheet occurrence of an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub raw: String,
    pub sheet: String,
    pub row: usize,
}

/// All occurrences of one case-insensitive email, in encounter order.
#[derive(Debug, Clone)]
pub struct EmailGroup {
    /// First-seen original casing; used for display.
    pub display: String,
    pub occurrences: Vec<Occurrence>,
}

impl EmailGroup {
    pub fn count(&self) -> usize {
        self.occurrences.len()
    }

    /// Sheet labels that contained this email, deduplicated, first-seen order.
    pub fn sheets(&self) -> Vec<String> {
        let mut sheets: Vec<String> = Vec::new();
        for occurrence in &self.occurrences {
            if !sheets.contains(&occurrence.sheet) {
                sheets.push(occurrence.sheet.clone());
            }
        }
        sheets
    }
}

/// Index over every spreadsheet email occurrence, grouped by the
/// case-insensitive key. Built once per run and immutable afterwards;
/// groups keep first-occurrence order.
#[derive(Debug, Default)]
pub struct EmailIndex {
    groups: Vec<EmailGroup>,
    by_key: HashMap<String, usize>,
}

impl EmailIndex {
    /// Concatenates the given sheet lists into one ordered multiset and
    /// groups it by the join key. Empty input yields an empty index.
    pub fn build(sources: &[SheetEmails]) -> Self {
        let mut index = EmailIndex::default();
        for source in sources {
            for (row, raw) in source.emails.iter().enumerate() {
                let key = email_key(raw);
                let slot = match index.by_key.get(&key) {
                    Some(&slot) => slot,
                    None => {
                        index.groups.push(EmailGroup {
                            display: raw.clone(),
                            occurrences: Vec::new(),
                        });
                        let slot = index.groups.len() - 1;
                        index.by_key.insert(key, slot);
                        slot
                    }
                };
                index.groups[slot].occurrences.push(Occurrence {
                    raw: raw.clone(),
                    sheet: source.sheet.clone(),
                    row,
                });
            }
        }
        index
    }

    /// Total number of occurrences across all sources.
    pub fn total(&self) -> usize {
        self.groups.iter().map(EmailGroup::count).sum()
    }

    pub fn contains(&self, email: &str) -> bool {
        self.by_key.contains_key(&email_key(email))
    }

    pub fn groups(&self) -> &[EmailGroup] {
        &self.groups
    }

    /// Groups appearing at least twice, descending by count. Count ties keep
    /// first-occurrence order; beyond stability the tie-break is deliberately
    /// unspecified.
    pub fn duplicates(&self) -> Vec<&EmailGroup> {
        let mut duplicates: Vec<&EmailGroup> = self
            .groups
            .iter()
            .filter(|group| group.count() >= 2)
            .collect();
        duplicates.sort_by(|lhs, rhs| rhs.count().cmp(&lhs.count()));
        duplicates
    }
}

/// A duplicate email joined against the roster for display.
#[derive(Debug, Clone)]
pub struct DuplicateEmail {
    pub email: String,
    pub count: usize,
    /// First roster entry matching the email, when there is one.
    pub entry: Option<RosterEntry>,
}

/// An email present in the spreadsheet sheets but absent from the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetOnlyEmail {
    pub email: String,
    pub sheets: Vec<String>,
}

/// Outcome of one reconciliation run. Transient; nothing here is persisted
/// beyond the two report files.
#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    pub duplicates: Vec<DuplicateEmail>,
    pub sheet_only: Vec<SheetOnlyEmail>,
    pub roster_only: Vec<RosterEntry>,
}

/// Classifies every email: duplicates within the spreadsheet multiset,
/// spreadsheet-only emails with their source sheets, and roster entries
/// absent from the spreadsheet, sorted by team then email.
pub fn reconcile(roster: &[RosterEntry], index: &EmailIndex) -> Reconciliation {
    let mut roster_by_key: HashMap<String, &RosterEntry> = HashMap::new();
    for entry in roster {
        // First matching entry wins, as with the display casing.
        roster_by_key.entry(email_key(&entry.email)).or_insert(entry);
    }

    let duplicates = index
        .duplicates()
        .into_iter()
        .map(|group| DuplicateEmail {
            email: group.display.clone(),
            count: group.count(),
            entry: roster_by_key
                .get(&email_key(&group.display))
                .map(|entry| (*entry).clone()),
        })
        .collect();

    let sheet_only = index
        .groups()
        .iter()
        .filter(|group| !roster_by_key.contains_key(&email_key(&group.display)))
        .map(|group| SheetOnlyEmail {
            email: group.display.clone(),
            sheets: group.sheets(),
        })
        .collect();

    let mut roster_only: Vec<RosterEntry> = roster
        .iter()
        .filter(|entry| !index.contains(&entry.email))
        .cloned()
        .collect();
    roster_only.sort_by(|lhs, rhs| lhs.team.cmp(&rhs.team).then_with(|| lhs.email.cmp(&rhs.email)));

    Reconciliation {
        duplicates,
        sheet_only,
        roster_only,
    }
}

// ABOUTME: Output writers: an xlsx workbook with one sheet per keyword, or a JSON document.
// ABOUTME: Sheet names are sanitized, truncated to the 31-character limit, and de-duplicated.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tracing::{info, warn};

use crate::error::{Result, ScoutError};
use crate::record::{KeywordOutcome, COLUMNS};

/// Maximum sheet name length accepted by spreadsheet applications.
pub const SHEET_NAME_MAX_CHARS: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// Sheet name for a keyword: forbidden characters replaced by `_`, truncated.
pub fn sheet_name(keyword: &str) -> String {
    fix_apostrophes(truncate_chars(&sanitize(keyword), SHEET_NAME_MAX_CHARS))
}

fn sanitize(keyword: &str) -> String {
    let name: String = keyword
        .trim()
        .chars()
        .map(|c| if FORBIDDEN_SHEET_CHARS.contains(&c) { '_' } else { c })
        .collect();
    if name.is_empty() {
        "sheet".to_string()
    } else {
        name
    }
}

/// Sheet names may not start or end with an apostrophe; applied to the final name.
fn fix_apostrophes(mut name: String) -> String {
    if name.starts_with('\'') {
        name.replace_range(..1, "_");
    }
    if name.ends_with('\'') {
        name.pop();
        name.push('_');
    }
    name
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Hands out unique sheet names; names compare case-insensitively.
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sheet name for `keyword`, suffixed with ` (n)` if already taken.
    pub fn assign(&mut self, keyword: &str) -> String {
        let base = sanitize(keyword);
        let mut candidate = fix_apostrophes(truncate_chars(&base, SHEET_NAME_MAX_CHARS));
        let mut n = 2;
        while !self.used.insert(candidate.to_lowercase()) {
            let suffix = format!(" ({})", n);
            let room = SHEET_NAME_MAX_CHARS - suffix.chars().count();
            candidate = fix_apostrophes(format!("{}{}", truncate_chars(&base, room), suffix));
            n += 1;
        }
        candidate
    }
}

fn output_error(path: &Path, op: &str, e: XlsxError) -> ScoutError {
    ScoutError::output(path.display().to_string(), op, Some(anyhow::Error::new(e)))
}

/// Writes one sheet per non-empty outcome to `path`. Returns the number of sheets.
///
/// Nothing is written when every outcome is empty.
pub fn write_workbook(path: &Path, outcomes: &[KeywordOutcome]) -> Result<usize> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let mut namer = SheetNamer::new();
    let mut sheets = 0;

    for outcome in outcomes.iter().filter(|o| !o.is_empty()) {
        let mut name = namer.assign(&outcome.keyword);
        let sheet = workbook.add_worksheet();
        if let Err(e) = sheet.set_name(&name) {
            let fallback = namer.assign(&format!("Sheet{}", sheets + 1));
            warn!(keyword = %outcome.keyword, sheet = %name, fallback = %fallback, error = %e, "sheet name rejected, using fallback");
            sheet
                .set_name(&fallback)
                .map_err(|e| output_error(path, "name sheet", e))?;
            name = fallback;
        }

        for (col, title) in COLUMNS.iter().enumerate() {
            sheet
                .write_string_with_format(0, col as u16, *title, &header)
                .map_err(|e| output_error(path, "write header", e))?;
        }

        for (i, record) in outcome.records.iter().enumerate() {
            let row = (i + 1) as u32;
            let cells = [
                record.id.as_str(),
                record.title.as_str(),
                record.author.as_str(),
                record.publish_date.as_str(),
            ];
            for (col, value) in cells.iter().enumerate() {
                sheet
                    .write_string(row, col as u16, *value)
                    .map_err(|e| output_error(path, "write cell", e))?;
            }
            sheet
                .write_number(row, 4, record.likes as f64)
                .map_err(|e| output_error(path, "write cell", e))?;
            sheet
                .write_number(row, 5, record.comments as f64)
                .map_err(|e| output_error(path, "write cell", e))?;
            sheet
                .write_string(row, 6, record.tags_display())
                .map_err(|e| output_error(path, "write cell", e))?;
            sheet
                .write_string(row, 7, record.permalink.as_str())
                .map_err(|e| output_error(path, "write cell", e))?;
        }

        info!(keyword = %outcome.keyword, sheet = %name, rows = outcome.records.len(), "sheet written");
        sheets += 1;
    }

    if sheets > 0 {
        workbook
            .save(path)
            .map_err(|e| output_error(path, "save workbook", e))?;
    }
    Ok(sheets)
}

/// Serializes non-empty outcomes as pretty JSON.
pub fn to_json(outcomes: &[KeywordOutcome]) -> Result<String> {
    let kept: Vec<&KeywordOutcome> = outcomes.iter().filter(|o| !o.is_empty()).collect();
    serde_json::to_string_pretty(&kept)
        .map_err(|e| ScoutError::output("json", "serialize", Some(anyhow::Error::new(e))))
}

/// Writes [`to_json`] output to `path`.
pub fn write_json(path: &Path, outcomes: &[KeywordOutcome]) -> Result<()> {
    let json = to_json(outcomes)?;
    fs::write(path, json).map_err(|e| {
        ScoutError::output(path.display().to_string(), "write json", Some(anyhow::Error::new(e)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ExtractedRecord, NONE, UNKNOWN};
    use calamine::{open_workbook, Data, Range, Reader, Xlsx};
    use pretty_assertions::assert_eq;

    fn outcome(keyword: &str, titles: &[&str]) -> KeywordOutcome {
        let mut o = KeywordOutcome::empty(keyword);
        o.records = titles
            .iter()
            .enumerate()
            .map(|(i, t)| ExtractedRecord {
                id: format!("note_{}", i + 1),
                title: t.to_string(),
                author: UNKNOWN.to_string(),
                publish_date: UNKNOWN.to_string(),
                likes: 12_000,
                comments: 3,
                tags: vec![],
                permalink: NONE.to_string(),
            })
            .collect();
        o
    }

    #[test]
    fn sheet_name_truncates_to_limit() {
        let long = "口".repeat(40);
        assert_eq!(sheet_name(&long).chars().count(), 31);
        assert_eq!(sheet_name("lipstick"), "lipstick");
    }

    #[test]
    fn sheet_name_replaces_forbidden_characters() {
        assert_eq!(sheet_name("a/b [c]: d?*\\"), "a_b _c__ d___");
        assert_eq!(sheet_name("'quoted'"), "_quoted_");
    }

    #[test]
    fn namer_deduplicates_case_insensitively() {
        let mut namer = SheetNamer::new();
        assert_eq!(namer.assign("Lipstick"), "Lipstick");
        assert_eq!(namer.assign("lipstick"), "lipstick (2)");
        assert_eq!(namer.assign("LIPSTICK"), "LIPSTICK (3)");
    }

    #[test]
    fn namer_keeps_suffixed_names_within_limit() {
        let mut namer = SheetNamer::new();
        let long = "x".repeat(40);
        assert_eq!(namer.assign(&long), "x".repeat(31));
        let second = namer.assign(&long);
        assert_eq!(second.chars().count(), 31);
        assert!(second.ends_with(" (2)"));
    }

    fn read_back(path: &Path) -> Xlsx<std::io::BufReader<fs::File>> {
        open_workbook(path).unwrap()
    }

    fn cell(range: &Range<Data>, row: u32, col: u32) -> Data {
        range.get_value((row, col)).cloned().unwrap_or(Data::Empty)
    }

    #[test]
    fn workbook_rows_follow_column_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.xlsx");
        let mut tagged = outcome("口红", &["Matte red", "Glossy"]);
        tagged.records[0].tags = vec!["#lip".to_string(), "#red".to_string()];
        tagged.records[0].permalink = "https://www.xiaohongshu.com/explore/aa11".to_string();
        let outcomes = vec![tagged, KeywordOutcome::empty("nothing")];
        assert_eq!(write_workbook(&path, &outcomes).unwrap(), 1);

        let mut book = read_back(&path);
        assert_eq!(book.sheet_names(), vec!["口红".to_string()]);
        let range = book.worksheet_range("口红").unwrap();
        assert_eq!(range.height(), 3);

        let header: Vec<Data> = (0..8).map(|c| cell(&range, 0, c)).collect();
        let expected: Vec<Data> = COLUMNS.iter().map(|c| Data::String(c.to_string())).collect();
        assert_eq!(header, expected);

        assert_eq!(cell(&range, 1, 0), Data::String("note_1".to_string()));
        assert_eq!(cell(&range, 1, 1), Data::String("Matte red".to_string()));
        assert_eq!(cell(&range, 1, 2), Data::String("unknown".to_string()));
        assert_eq!(cell(&range, 1, 4), Data::Float(12_000.0));
        assert_eq!(cell(&range, 1, 5), Data::Float(3.0));
        assert_eq!(cell(&range, 1, 6), Data::String("#lip, #red".to_string()));
        assert_eq!(
            cell(&range, 1, 7),
            Data::String("https://www.xiaohongshu.com/explore/aa11".to_string())
        );
        assert_eq!(cell(&range, 2, 6), Data::String("none".to_string()));
        assert_eq!(cell(&range, 2, 7), Data::String("none".to_string()));
    }

    #[test]
    fn workbook_sheet_names_are_sanitized_and_unique() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.xlsx");
        let outcomes = vec![
            outcome("lip/tint", &["a"]),
            outcome("口红", &["b"]),
            outcome("LIP?tint", &["c"]),
        ];
        assert_eq!(write_workbook(&path, &outcomes).unwrap(), 3);

        let book = read_back(&path);
        assert_eq!(
            book.sheet_names(),
            vec!["lip_tint".to_string(), "口红".to_string(), "LIP_tint (2)".to_string()]
        );
    }

    #[test]
    fn apostrophe_at_truncation_point_is_replaced() {
        let keyword = format!("{}'zzz", "a".repeat(30));
        let expected = format!("{}_", "a".repeat(30));
        assert_eq!(sheet_name(&keyword), expected);
        assert_eq!(SheetNamer::new().assign(&keyword), expected);

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.xlsx");
        let outcomes = vec![outcome("口红", &["a"]), outcome(&keyword, &["b"])];
        assert_eq!(write_workbook(&path, &outcomes).unwrap(), 2);

        let book = read_back(&path);
        assert_eq!(book.sheet_names(), vec!["口红".to_string(), expected]);
    }

    #[test]
    fn suffixed_names_never_start_with_apostrophe() {
        let mut namer = SheetNamer::new();
        assert_eq!(namer.assign("'lead"), "_lead");
        assert_eq!(namer.assign("'LEAD"), "_LEAD (2)");
    }

    #[test]
    fn rejected_sheet_name_falls_back_and_keeps_the_run() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.xlsx");
        // Excel reserves "History"; either name for it is fine here.
        let outcomes = vec![outcome("History", &["a"]), outcome("口红", &["b"])];
        assert_eq!(write_workbook(&path, &outcomes).unwrap(), 2);

        let book = read_back(&path);
        let names = book.sheet_names();
        assert_eq!(names.len(), 2);
        assert_eq!(names[1], "口红");
    }

    #[test]
    fn empty_run_writes_no_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("notes.xlsx");
        assert_eq!(write_workbook(&path, &[KeywordOutcome::empty("x")]).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn json_lists_non_empty_outcomes() {
        let outcomes = vec![outcome("lipstick", &["a"]), KeywordOutcome::empty("none")];
        let value: serde_json::Value = serde_json::from_str(&to_json(&outcomes).unwrap()).unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 1);
        assert_eq!(arr[0]["keyword"], "lipstick");
        assert_eq!(arr[0]["records"][0]["likes"], 12_000);
        assert_eq!(arr[0]["records"][0]["permalink"], "none");
    }
}

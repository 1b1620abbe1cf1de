//! Spreadsheet discovery and parsing.
//!
//! The loader knows nothing about sheet names or layouts. It finds the first
//! spreadsheet in a directory, opens it with the modern OOXML engine and then
//! the legacy BIFF engine, and lifts every sheet into a plain [`Sheet`] table
//! of [`Cell`]s with the header text kept verbatim.

use calamine::{open_workbook, Data, Range, Reader, Xls, XlsError, Xlsx, XlsxError};
use chrono::NaiveDateTime;
use std::fmt::Display;
use std::fs;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::{DataError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

impl From<&Data> for Cell {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty | Data::Error(_) => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(f) => Cell::Number(*f),
            Data::Int(i) => Cell::Number(*i as f64),
            Data::Bool(b) => Cell::Bool(*b),
            Data::DateTime(dt) => dt.as_datetime().map(Cell::Date).unwrap_or(Cell::Empty),
            Data::DateTimeIso(s) => NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
                .map(Cell::Date)
                .unwrap_or_else(|_| Cell::Text(s.clone())),
            Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }
}

/// One worksheet as a generic row/column table.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, headers: &[&str], rows: Vec<Vec<Cell>>) -> Self {
        Sheet {
            name: name.to_string(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }

    /// First row becomes the header row; fully blank data rows are skipped.
    pub fn from_range(name: &str, range: &Range<Data>) -> Self {
        let mut rows = range.rows();
        let headers = rows
            .next()
            .map(|header| {
                header
                    .iter()
                    .map(|cell| match cell {
                        Data::String(s) => s.clone(),
                        Data::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let rows = rows
            .map(|row| row.iter().map(Cell::from).collect::<Vec<_>>())
            .filter(|row| row.iter().any(|c| *c != Cell::Empty))
            .collect();
        Sheet {
            name: name.to_string(),
            headers,
            rows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    Xlsx,
    Xls,
}

/// Engines in the order they are tried.
pub const ENGINES: [Engine; 2] = [Engine::Xlsx, Engine::Xls];

#[derive(Debug, Clone)]
pub struct Workbook {
    pub path: PathBuf,
    pub engine: Engine,
    pub sheets: Vec<Sheet>,
}

/// First file in `dir` (by name) whose extension is one of `extensions`.
///
/// A missing directory is created so the next refresh has somewhere to look.
pub fn find_input(dir: &Path, extensions: &[String]) -> Result<PathBuf> {
    if !dir.exists() {
        log::warn!("Data directory {} does not exist, creating it", dir.display());
        fs::create_dir_all(dir)?;
        return Err(DataError::InputMissing {
            dir: dir.to_path_buf(),
        });
    }
    let mut candidates: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
                .unwrap_or(false)
        })
        .collect();
    candidates.sort();
    candidates
        .into_iter()
        .next()
        .ok_or_else(|| DataError::InputMissing {
            dir: dir.to_path_buf(),
        })
}

/// Open `path` with each engine in turn until one yields at least one sheet.
pub fn load_workbook(path: &Path) -> Result<Workbook> {
    let mut last_reason = String::from("no engine attempted");
    for engine in ENGINES {
        match read_with(engine, path) {
            Ok(sheets) if sheets.is_empty() => {
                log::error!("{:?} engine found no sheets in {}", engine, path.display());
                last_reason = format!("{:?}: workbook has no sheets", engine);
            }
            Ok(sheets) => {
                for sheet in &sheets {
                    log::info!("Loaded sheet '{}' with {} rows", sheet.name, sheet.rows.len());
                }
                return Ok(Workbook {
                    path: path.to_path_buf(),
                    engine,
                    sheets,
                });
            }
            Err(reason) => {
                log::error!("Error with {:?} engine on {}: {}", engine, path.display(), reason);
                last_reason = format!("{:?}: {}", engine, reason);
            }
        }
    }
    Err(DataError::InputUnreadable {
        path: path.to_path_buf(),
        reason: last_reason,
    })
}

fn read_with(engine: Engine, path: &Path) -> std::result::Result<Vec<Sheet>, String> {
    match engine {
        Engine::Xlsx => {
            let mut workbook: Xlsx<_> =
                open_workbook(path).map_err(|e: XlsxError| e.to_string())?;
            read_sheets(&mut workbook)
        }
        Engine::Xls => {
            let mut workbook: Xls<_> = open_workbook(path).map_err(|e: XlsError| e.to_string())?;
            read_sheets(&mut workbook)
        }
    }
}

fn read_sheets<RS, R>(workbook: &mut R) -> std::result::Result<Vec<Sheet>, String>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let names = workbook.sheet_names();
    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| format!("sheet '{}': {}", name, e))?;
        sheets.push(Sheet::from_range(&name, &range));
    }
    Ok(sheets)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn exts() -> Vec<String> {
        vec!["xlsx".to_string(), "xls".to_string()]
    }

    #[test]
    fn missing_directory_is_created_and_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("data");
        let err = find_input(&dir, &exts()).unwrap_err();
        assert!(matches!(err, DataError::InputMissing { .. }));
        assert!(dir.exists());
    }

    #[test]
    fn first_match_by_name_wins() {
        let tmp = tempfile::tempdir().unwrap();
        File::create(tmp.path().join("notes.txt")).unwrap();
        File::create(tmp.path().join("b_health.xlsx")).unwrap();
        File::create(tmp.path().join("a_health.XLSX")).unwrap();
        let found = find_input(tmp.path(), &exts()).unwrap();
        assert_eq!(found.file_name().unwrap(), "a_health.XLSX");
    }

    #[test]
    fn no_spreadsheet_is_input_missing() {
        let tmp = tempfile::tempdir().unwrap();
        File::create(tmp.path().join("readme.md")).unwrap();
        let err = find_input(tmp.path(), &exts()).unwrap_err();
        assert!(matches!(err, DataError::InputMissing { .. }));
    }

    #[test]
    fn garbage_file_exhausts_both_engines() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("broken.xlsx");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"this is not a spreadsheet").unwrap();
        let err = load_workbook(&path).unwrap_err();
        match err {
            DataError::InputUnreadable { reason, .. } => assert!(reason.starts_with("Xls")),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn xlsx_engine_reads_every_sheet_in_order() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/health.xlsx");
        let workbook = load_workbook(&path).unwrap();
        assert_eq!(workbook.engine, Engine::Xlsx);
        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Pakistan", "Sindh", "Locations"]);

        let summary = &workbook.sheets[0];
        assert_eq!(summary.headers, vec!["Diseases", "Total"]);
        assert_eq!(summary.rows.len(), 3);
        assert_eq!(summary.rows[0][0], Cell::Text("Malaria".into()));
        assert_eq!(summary.rows[0][1], Cell::Number(62096.0));
        assert_eq!(workbook.sheets[2].rows[1][1], Cell::Number(31.5204));
    }

    #[test]
    fn cells_lift_from_calamine_data() {
        assert_eq!(Cell::from(&Data::Int(7)), Cell::Number(7.0));
        assert_eq!(Cell::from(&Data::String("x".into())), Cell::Text("x".into()));
        assert_eq!(Cell::from(&Data::Empty), Cell::Empty);
        assert_eq!(Cell::from(&Data::Bool(true)), Cell::Bool(true));
    }

    #[test]
    fn header_row_kept_verbatim() {
        let mut range: Range<Data> = Range::new((0, 0), (2, 1));
        range.set_value((0, 0), Data::String("Diseases ".into()));
        range.set_value((0, 1), Data::String("Total ".into()));
        range.set_value((1, 0), Data::String("Malaria".into()));
        range.set_value((1, 1), Data::Float(62096.0));
        let sheet = Sheet::from_range("Pakistan", &range);
        assert_eq!(sheet.headers, vec!["Diseases ", "Total "]);
        // the third row is entirely empty and skipped
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.rows[0][1], Cell::Number(62096.0));
    }
}

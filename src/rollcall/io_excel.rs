// Reading rosters from Excel workbooks.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook, DataType, Range, Reader, Xls, Xlsx};
use chrono::Timelike;
use log::{debug, info, warn};
use snafu::{ensure, OptionExt, ResultExt};

use crate::rollcall::*;

/// Where to find the names inside a workbook.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct ImportOptions {
    /// The worksheet to read. The first worksheet when not provided.
    pub worksheet: Option<String>,
    /// Number of leading rows of the sheet to ignore, for example a header.
    pub skip_rows: usize,
}

/// Reads the student names in column A of the worksheet, top to bottom.
pub fn import_names(path: &str, options: &ImportOptions) -> RollCallResult<Vec<String>> {
    let p = Path::new(path);
    ensure!(p.exists(), NotFoundSnafu { path });

    let extension = p
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    info!("Attempting to read roster file {:?}", path);
    let wrange = match extension.as_str() {
        "xlsx" => get_range::<Xlsx<BufReader<File>>>(path, options)?,
        "xls" => get_range::<Xls<BufReader<File>>>(path, options)?,
        _ => {
            return InvalidFileSnafu {
                path,
                extension: format!(".{}", extension),
            }
            .fail()
        }
    };
    ensure!(wrange.width() > 0, EmptyDataSnafu { path });
    let (start, end) = wrange
        .start()
        .zip(wrange.end())
        .context(EmptyDataSnafu { path })?;
    debug!("import_names: used cells from {:?} to {:?}", start, end);
    if start.1 > 0 {
        warn!("Column A of {:?} is empty", path);
    }

    // Positions are absolute: the range itself starts at the first used cell.
    let first_row = u32::try_from(options.skip_rows).unwrap_or(u32::MAX);
    let names: Vec<String> = (first_row..=end.0)
        .filter_map(|row| wrange.get_value((row, 0)))
        .filter_map(read_cell)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    info!("Read {} names from {:?}", names.len(), path);
    Ok(names)
}

fn get_range<R>(path: &str, options: &ImportOptions) -> RollCallResult<Range<DataType>>
where
    R: Reader<RS = BufReader<File>>,
    calamine::Error: From<R::Error>,
{
    debug!(
        "get_range: path: {:?} worksheet: {:?}",
        path, options.worksheet
    );
    let mut workbook: R = open_workbook(path)
        .map_err(calamine::Error::from)
        .context(OpeningExcelSnafu { path })?;

    let wrange = match &options.worksheet {
        Some(worksheet_name) => workbook.worksheet_range(worksheet_name),
        None => workbook.worksheet_range_at(0),
    };
    wrange
        .context(EmptyDataSnafu { path })?
        .map_err(calamine::Error::from)
        .context(OpeningExcelSnafu { path })
}

// Renders a cell the way it reads in the spreadsheet. Blank and error cells
// carry no name.
fn read_cell(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) => Some(s.clone()),
        DataType::Int(i) => Some(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Some((*f as i64).to_string()),
        DataType::Float(f) => Some(f.to_string()),
        DataType::Bool(b) => Some(b.to_string()),
        DataType::DateTime(_) => cell.as_datetime().map(|dt| {
            if dt.num_seconds_from_midnight() == 0 {
                dt.format("%Y-%m-%d").to_string()
            } else {
                dt.format("%Y-%m-%d %H:%M:%S").to_string()
            }
        }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use std::fs;

    fn write_column(path: &Path, cells: &[(u32, u16, &str)]) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (row, col, text) in cells {
            sheet.write_string(*row, *col, *text).unwrap();
        }
        workbook.save(path).unwrap();
    }

    fn read(path: &Path, options: &ImportOptions) -> RollCallResult<Vec<String>> {
        import_names(&path.display().to_string(), options)
    }

    #[test]
    fn reads_first_column_in_row_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        write_column(
            &path,
            &[
                (0, 0, "Name"),
                (1, 0, "  Anna "),
                (1, 1, "ignored"),
                (2, 0, "   "),
                (4, 0, "张三"),
                (5, 0, "Bob"),
            ],
        );
        assert_eq!(
            read(&path, &ImportOptions::default()).unwrap(),
            vec!["Name", "Anna", "张三", "Bob"]
        );

        let skip_header = ImportOptions {
            worksheet: None,
            skip_rows: 1,
        };
        assert_eq!(
            read(&path, &skip_header).unwrap(),
            vec!["Anna", "张三", "Bob"]
        );
    }

    #[test]
    fn empty_column_a_gives_no_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        write_column(&path, &[(0, 1, "Anna"), (1, 1, "Bob")]);
        assert!(read(&path, &ImportOptions::default()).unwrap().is_empty());
    }

    #[test]
    fn skip_rows_count_from_the_top_of_the_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        // Rows 1 and 2 are blank, the header sits on row 3.
        write_column(&path, &[(2, 0, "Name"), (3, 0, "Anna"), (4, 0, "Bob")]);
        let options = ImportOptions {
            worksheet: None,
            skip_rows: 3,
        };
        assert_eq!(read(&path, &options).unwrap(), vec!["Anna", "Bob"]);
    }

    #[test]
    fn named_worksheet_and_numbers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classes.xlsx");
        let mut workbook = Workbook::new();
        workbook
            .add_worksheet()
            .write_string(0, 0, "Anna")
            .unwrap();
        let second = workbook.add_worksheet();
        second.set_name("3B").unwrap();
        second.write_string(0, 0, "Clara").unwrap();
        second.write_number(1, 0, 42.0).unwrap();
        workbook.save(&path).unwrap();

        assert_eq!(read(&path, &ImportOptions::default()).unwrap(), vec!["Anna"]);
        let options = ImportOptions {
            worksheet: Some("3B".to_string()),
            skip_rows: 0,
        };
        assert_eq!(read(&path, &options).unwrap(), vec!["Clara", "42"]);

        let missing = ImportOptions {
            worksheet: Some("4C".to_string()),
            skip_rows: 0,
        };
        assert!(matches!(
            read(&path, &missing),
            Err(RollCallError::EmptyData { .. })
        ));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.xlsx");
        assert!(matches!(
            read(&path, &ImportOptions::default()),
            Err(RollCallError::NotFound { .. })
        ));
    }

    #[test]
    fn unsupported_extension_is_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        fs::write(&path, "Anna\nBob\n").unwrap();
        match read(&path, &ImportOptions::default()) {
            Err(RollCallError::InvalidFile { extension, .. }) => assert_eq!(extension, ".csv"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn malformed_workbook_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["roster.xlsx", "ROSTER.XLS"] {
            let path = dir.path().join(name);
            fs::write(&path, "definitely not a workbook").unwrap();
            assert!(matches!(
                read(&path, &ImportOptions::default()),
                Err(RollCallError::OpeningExcel { .. })
            ));
        }
    }

    #[test]
    fn cells_render_like_the_sheet() {
        assert_eq!(read_cell(&DataType::String(" Anna ".to_string())), Some(" Anna ".to_string()));
        assert_eq!(read_cell(&DataType::Float(42.0)), Some("42".to_string()));
        assert_eq!(read_cell(&DataType::Float(1.5)), Some("1.5".to_string()));
        assert_eq!(read_cell(&DataType::Int(7)), Some("7".to_string()));
        assert_eq!(read_cell(&DataType::Empty), None);
    }

    #[test]
    fn dates_render_as_dates() {
        assert_eq!(
            read_cell(&DataType::DateTime(45000.0)),
            Some("2023-03-15".to_string())
        );
        assert_eq!(
            read_cell(&DataType::DateTime(45000.5)),
            Some("2023-03-15 12:00:00".to_string())
        );
    }
}

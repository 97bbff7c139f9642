use std::path::Path;

use calamine::{open_workbook_auto, Reader};
use lotto645_db::error::{LottoError, Result};
use lotto645_db::models::{to_lotto_number, HistoricalDraw, PICK_COUNT};

/// 이 비율 이상 숫자로 읽히는 컬럼만 당첨번호 후보로 본다.
pub const NUMERIC_RATIO_THRESHOLD: f64 = 0.7;

/// 헤더에 포함되면 보너스 번호 컬럼으로 간주 (대소문자 무시).
pub const BONUS_ALIASES: [&str; 3] = ["bonus", "보너스", "bns"];

/// 첫 행을 헤더로 읽은 표. 셀은 원문 문자열 그대로 둔다.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawSheet {
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0)
    }

    pub fn column_name(&self, col: usize) -> String {
        match self.headers.get(col) {
            Some(h) if !h.is_empty() => h.clone(),
            _ => format!("Unnamed: {}", col),
        }
    }

    fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 숫자로 읽히는 셀의 비율. 빈 셀도 분모에 포함된다.
    pub fn numeric_ratio(&self, col: usize) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        let numeric = (0..self.rows.len())
            .filter(|&r| parse_numeric(self.cell(r, col)).is_some())
            .count();
        numeric as f64 / self.rows.len() as f64
    }
}

pub fn parse_numeric(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn is_bonus_column(name: &str) -> bool {
    let name = name.trim().to_lowercase();
    BONUS_ALIASES.iter().any(|alias| name.contains(alias))
}

fn push_row(sheet: &mut RawSheet, row: Vec<String>) {
    if row.iter().all(|c| c.is_empty()) {
        return;
    }
    sheet.rows.push(row);
}

fn load_workbook(path: &Path) -> Result<RawSheet> {
    let mut workbook = open_workbook_auto(path).map_err(|e| LottoError::Spreadsheet(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LottoError::Spreadsheet("워크시트가 없습니다".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LottoError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let mut sheet = RawSheet::default();
    if let Some(header_row) = rows.next() {
        sheet.headers = header_row.iter().map(|c| c.to_string().trim().to_string()).collect();
    }
    for data_row in rows {
        push_row(&mut sheet, data_row.iter().map(|c| c.to_string().trim().to_string()).collect());
    }
    Ok(sheet)
}

fn load_csv(path: &Path) -> Result<RawSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut sheet = RawSheet {
        headers: reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect(),
        rows: Vec::new(),
    };
    for record in reader.records() {
        let record = record?;
        push_row(&mut sheet, record.iter().map(|c| c.trim().to_string()).collect());
    }
    Ok(sheet)
}

/// 확장자에 따라 스프레드시트(calamine) 또는 CSV로 읽는다.
pub fn load_sheet(path: &Path) -> Result<RawSheet> {
    if !path.exists() {
        return Err(LottoError::DataSourceMissing(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path),
        "csv" => load_csv(path),
        _ => Err(LottoError::UnsupportedFormat(ext)),
    }
}

pub fn numeric_columns(sheet: &RawSheet) -> Vec<usize> {
    (0..sheet.column_count())
        .filter(|&c| sheet.numeric_ratio(c) >= NUMERIC_RATIO_THRESHOLD)
        .collect()
}

/// 당첨번호 6개 컬럼 선택. 보너스 컬럼을 뺀 뒤 6개가 안 되면 숫자 컬럼 앞 6개로 대체한다.
pub fn select_winning_columns(sheet: &RawSheet) -> Result<[usize; PICK_COUNT]> {
    let numeric = numeric_columns(sheet);
    if numeric.len() < PICK_COUNT {
        return Err(LottoError::InsufficientNumericColumns {
            found: numeric.iter().map(|&c| sheet.column_name(c)).collect(),
        });
    }

    let filtered: Vec<usize> = numeric
        .iter()
        .copied()
        .filter(|&c| !is_bonus_column(&sheet.column_name(c)))
        .collect();
    let source = if filtered.len() >= PICK_COUNT { &filtered } else { &numeric };

    let mut cols = [0usize; PICK_COUNT];
    cols.copy_from_slice(&source[..PICK_COUNT]);
    log::debug!(
        "당첨번호 컬럼: {:?}",
        cols.iter().map(|&c| sheet.column_name(c)).collect::<Vec<_>>()
    );
    Ok(cols)
}

/// 선택된 6개 컬럼에서 1~45 값만 남긴다. 유효 값이 하나도 없는 행은 버린다.
pub fn extract_draws(sheet: &RawSheet) -> Result<Vec<HistoricalDraw>> {
    let cols = select_winning_columns(sheet)?;

    let draws: Vec<HistoricalDraw> = (0..sheet.rows.len())
        .map(|r| HistoricalDraw {
            numbers: cols.map(|c| parse_numeric(sheet.cell(r, c)).and_then(to_lotto_number)),
        })
        .filter(HistoricalDraw::has_valid_entry)
        .collect();

    if draws.is_empty() {
        return Err(LottoError::NoValidDrawsFound);
    }
    Ok(draws)
}

pub fn load_winning_numbers(path: &Path) -> Result<Vec<HistoricalDraw>> {
    let sheet = load_sheet(path)?;
    let draws = extract_draws(&sheet)?;
    log::info!("{} 에서 {}회차 당첨번호 로드", path.display(), draws.len());
    Ok(draws)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sheet(headers: &[&str], rows: &[&[&str]]) -> RawSheet {
        RawSheet {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_parse_numeric() {
        assert_eq!(parse_numeric(" 12 "), Some(12.0));
        assert_eq!(parse_numeric("7.0"), Some(7.0));
        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric("inf"), None);
    }

    #[test]
    fn test_bonus_aliases_case_insensitive() {
        assert!(is_bonus_column("Bonus"));
        assert!(is_bonus_column("  BNS_NO "));
        assert!(is_bonus_column("보너스 번호"));
        assert!(!is_bonus_column("번호6"));
    }

    #[test]
    fn test_bonus_column_excluded() {
        let s = sheet(
            &["n1", "n2", "Bonus", "n3", "n4", "n5", "n6"],
            &[&["1", "2", "40", "3", "4", "5", "6"], &["7", "8", "41", "9", "10", "11", "12"]],
        );
        assert_eq!(select_winning_columns(&s).unwrap(), [0, 1, 3, 4, 5, 6]);
    }

    #[test]
    fn test_fallback_to_first_numeric_columns() {
        let s = sheet(
            &["n1", "n2", "n3", "n4", "n5", "보너스"],
            &[&["1", "2", "3", "4", "5", "6"]],
        );
        assert_eq!(select_winning_columns(&s).unwrap(), [0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_text_column_ignored() {
        let s = sheet(
            &["date", "a", "b", "c", "d", "e", "f"],
            &[
                &["2024-01-06", "1", "2", "3", "4", "5", "6"],
                &["2024-01-13", "7", "8", "9", "10", "11", "12"],
            ],
        );
        assert_eq!(select_winning_columns(&s).unwrap(), [1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_numeric_ratio_threshold() {
        // 10행 중 7행 숫자 → 포함, 6행 → 제외
        let mut rows: Vec<Vec<String>> = Vec::new();
        for i in 0..10 {
            let mut row: Vec<String> = (1..=5).map(|n| n.to_string()).collect();
            row.push(if i < 7 { "6".into() } else { "-".into() });
            row.push(if i < 6 { "7".into() } else { "x".into() });
            rows.push(row);
        }
        let s = RawSheet {
            headers: (1..=7).map(|i| format!("c{}", i)).collect(),
            rows,
        };
        assert_eq!(numeric_columns(&s), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_insufficient_numeric_columns() {
        let s = sheet(&["a", "b", "name"], &[&["1", "2", "x"]]);
        match select_winning_columns(&s) {
            Err(LottoError::InsufficientNumericColumns { found }) => {
                assert_eq!(found, vec!["a".to_string(), "b".to_string()]);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_becomes_missing() {
        let s = sheet(
            &["a", "b", "c", "d", "e", "f"],
            &[&["1", "46", "0", "4", "5.5", "45"], &["99", "99", "99", "99", "99", "99"]],
        );
        let draws = extract_draws(&s).unwrap();
        assert_eq!(draws.len(), 1);
        assert_eq!(draws[0].numbers, [Some(1), None, None, Some(4), None, Some(45)]);
    }

    #[test]
    fn test_no_valid_draws() {
        let s = sheet(&["a", "b", "c", "d", "e", "f"], &[&["50", "60", "70", "80", "90", "100"]]);
        assert!(matches!(extract_draws(&s), Err(LottoError::NoValidDrawsFound)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_winning_numbers(Path::new("/nonexistent/로또.xlsx")).unwrap_err();
        assert!(matches!(err, LottoError::DataSourceMissing(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".txt").unwrap();
        assert!(matches!(load_sheet(file.path()), Err(LottoError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_xlsx_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("로또.xlsx");

        let headers = ["회차", "추첨일", "1", "2", "3", "4", "5", "6", "보너스"];
        let rows: [(&str, &str, [f64; 7]); 2] = [
            ("1130회", "2024-08-03", [15.0, 19.0, 21.0, 25.0, 27.0, 28.0, 40.0]),
            ("1131회", "2024-08-10", [1.0, 5.0, 8.0, 16.0, 28.0, 33.0, 45.0]),
        ];

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let worksheet = workbook.add_worksheet();
        for (col, header) in headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header).unwrap();
        }
        for (r, (round, date, numbers)) in rows.iter().enumerate() {
            let row = r as u32 + 1;
            worksheet.write_string(row, 0, *round).unwrap();
            worksheet.write_string(row, 1, *date).unwrap();
            for (i, &n) in numbers.iter().enumerate() {
                worksheet.write_number(row, i as u16 + 2, n).unwrap();
            }
        }
        workbook.save(&path).unwrap();

        let s = load_sheet(&path).unwrap();
        assert_eq!(s.headers, headers.map(String::from).to_vec());
        assert_eq!(s.rows.len(), 2);
        // 숫자 셀은 소수점 없이 읽힌다
        assert_eq!(s.rows[0][2], "15");

        // 보너스(8번 컬럼)는 빠지고 1~6 컬럼만 선택된다
        assert_eq!(select_winning_columns(&s).unwrap(), [2, 3, 4, 5, 6, 7]);

        let draws = load_winning_numbers(&path).unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].numbers, [15, 19, 21, 25, 27, 28].map(Some));
        assert_eq!(draws[1].numbers, [1, 5, 8, 16, 28, 33].map(Some));
    }

    #[test]
    fn test_load_csv_file() {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(file, "\u{feff}회차,1,2,3,4,5,6,보너스").unwrap();
        writeln!(file, "1,10,23,29,33,37,40,16").unwrap();
        writeln!(file, ",,,,,,,").unwrap();
        writeln!(file, "2,9,13,21,25,32,42,2").unwrap();
        file.flush().unwrap();

        let s = load_sheet(file.path()).unwrap();
        assert_eq!(s.headers[0], "회차");
        assert_eq!(s.rows.len(), 2);

        let draws = load_winning_numbers(file.path()).unwrap();
        assert_eq!(draws.len(), 2);
        // 회차 컬럼도 숫자라서 앞 6개에 포함되고, 1·2회차는 그대로 번호로 읽힌다
        assert_eq!(draws[0].numbers, [Some(1), Some(10), Some(23), Some(29), Some(33), Some(37)]);
    }
}

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{LottoError, Result};
use crate::models::{validate_game, HistoryRecord, Strategy, PICK_COUNT, TIMESTAMP_FORMAT};

/// Excel에서 한글이 깨지지 않도록 파일 맨 앞에 한 번만 기록한다.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

pub const HEADER: [&str; 8] = ["created_at", "strategy", "n1", "n2", "n3", "n4", "n5", "n6"];

/// CSV 한 줄. 필드 이름이 곧 헤더가 된다.
#[derive(Debug, Serialize, Deserialize)]
struct HistoryRow {
    created_at: String,
    strategy: Strategy,
    n1: u8,
    n2: u8,
    n3: u8,
    n4: u8,
    n5: u8,
    n6: u8,
}

impl From<&HistoryRecord> for HistoryRow {
    fn from(record: &HistoryRecord) -> Self {
        let [n1, n2, n3, n4, n5, n6] = record.numbers;
        Self {
            created_at: record.created_at.format(TIMESTAMP_FORMAT).to_string(),
            strategy: record.strategy,
            n1,
            n2,
            n3,
            n4,
            n5,
            n6,
        }
    }
}

impl TryFrom<HistoryRow> for HistoryRecord {
    type Error = LottoError;

    fn try_from(row: HistoryRow) -> Result<Self> {
        let created_at = NaiveDateTime::parse_from_str(row.created_at.trim(), TIMESTAMP_FORMAT)
            .map_err(|e| LottoError::InvalidNumbers(format!("시각 '{}': {}", row.created_at, e)))?;
        let numbers: [u8; PICK_COUNT] = [row.n1, row.n2, row.n3, row.n4, row.n5, row.n6];
        validate_game(&numbers)?;
        Ok(Self {
            created_at,
            strategy: row.strategy,
            numbers,
        })
    }
}

fn ends_with_newline(path: &Path) -> Result<bool> {
    let mut file = File::open(path)?;
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// 추가 전용 히스토리 로그.
///
/// 프로세스 간 잠금은 없다. 여러 프로세스가 동시에 추가하면 줄이 섞일 수 있다.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 기록을 파일 끝에 추가한다. 파일이 없거나 비어 있으면 BOM과 헤더를 먼저 쓴다.
    pub fn append(&self, records: &[HistoryRecord]) -> Result<usize> {
        let write_header = match fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // 손으로 고친 파일이 줄바꿈 없이 끝나면 새 행이 마지막 행에 붙는다
        let needs_newline = !write_header && !ends_with_newline(&self.path)?;

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        if write_header {
            file.write_all(UTF8_BOM)?;
        } else if needs_newline {
            file.write_all(b"\n")?;
        }

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        for record in records {
            writer.serialize(HistoryRow::from(record))?;
        }
        writer.flush()?;

        log::info!("{}개 게임을 {} 에 저장", records.len(), self.path.display());
        Ok(records.len())
    }

    /// 전체 로그를 추가 순서대로 읽는다. 파일이 없으면 빈 목록.
    pub fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        let bytes = match fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let data = bytes.strip_prefix(UTF8_BOM).unwrap_or(&bytes[..]);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(data);

        let mut records = Vec::new();
        for (idx, result) in reader.deserialize::<HistoryRow>().enumerate() {
            // +2 : 헤더 줄과 1-based 번호
            let line = idx + 2;
            match result.map_err(LottoError::from).and_then(HistoryRecord::try_from) {
                Ok(record) => records.push(record),
                Err(e) => log::warn!("히스토리 {}행 무시: {}", line, e),
            }
        }
        Ok(records)
    }

    /// 가장 최근에 추가된 `limit`개 (추가 순서 유지).
    pub fn recent(&self, limit: usize) -> Result<Vec<HistoryRecord>> {
        let mut records = self.read_all()?;
        let start = records.len().saturating_sub(limit);
        records.drain(..start);
        Ok(records)
    }
}

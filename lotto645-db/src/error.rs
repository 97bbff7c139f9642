use std::path::PathBuf;

use thiserror::Error;

use crate::models::Strategy;

pub type Result<T> = std::result::Result<T, LottoError>;

#[derive(Error, Debug)]
pub enum LottoError {
    // ===== 입력 데이터 =====
    #[error("당첨번호 파일이 없습니다: {}", .0.display())]
    DataSourceMissing(PathBuf),

    #[error("지원하지 않는 파일 형식입니다: '{0}' (xlsx/xlsm/xls/ods/csv)")]
    UnsupportedFormat(String),

    #[error("스프레드시트를 읽을 수 없습니다: {0}")]
    Spreadsheet(String),

    #[error("당첨번호로 보이는 숫자 컬럼이 6개 미만입니다. 후보: {found:?}")]
    InsufficientNumericColumns { found: Vec<String> },

    #[error("1~45 범위의 당첨번호를 찾지 못했습니다")]
    NoValidDrawsFound,

    // ===== 생성 =====
    #[error("잘못된 번호 조합: {0}")]
    InvalidNumbers(String),

    #[error("{strategy} 풀의 서로 다른 후보가 {distinct}개뿐입니다 (최소 2개)")]
    MalformedPool { strategy: Strategy, distinct: usize },

    #[error("{attempts}회 시도 후에도 서로 다른 5게임을 만들지 못했습니다")]
    DuplicateBatch { attempts: usize },

    // ===== 히스토리 / 설정 =====
    #[error("CSV 오류: {0}")]
    Csv(#[from] csv::Error),

    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),

    #[error("설정 오류: {0}")]
    Config(String),
}

impl LottoError {
    /// 초기 데이터 로드를 중단시키는 입력 오류인지 여부.
    pub fn is_fatal_input(&self) -> bool {
        matches!(
            self,
            LottoError::DataSourceMissing(_)
                | LottoError::UnsupportedFormat(_)
                | LottoError::Spreadsheet(_)
                | LottoError::InsufficientNumericColumns { .. }
                | LottoError::NoValidDrawsFound
        )
    }
}

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use lotto645_db::error::{LottoError, Result};

use crate::analysis::sampler::DEFAULT_MAX_ATTEMPTS;

pub const DEFAULT_DATA_FILE: &str = "로또복권 번호모음1231.xlsx";
pub const DEFAULT_HISTORY_FILE: &str = "lotto_5games_history.csv";
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// 과거 당첨번호 스프레드시트
    pub data_file: PathBuf,
    pub history_file: PathBuf,
    /// 화면에 보여줄 최근 히스토리 행 수
    pub history_limit: usize,
    /// 중복 없는 5게임을 얻기 위한 최대 재생성 횟수
    pub max_attempts: usize,
    pub save_history: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            history_limit: DEFAULT_HISTORY_LIMIT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            save_history: true,
        }
    }
}

/// 실행 파일이 있는 디렉터리. 알 수 없으면 현재 디렉터리.
pub fn app_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| LottoError::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&json)
            .map_err(|e| LottoError::Config(format!("{}: {}", path.display(), e)))
    }

    /// 상대 경로를 `base` 기준으로 바꾼다.
    pub fn resolved(mut self, base: &Path) -> Self {
        if self.data_file.is_relative() {
            self.data_file = base.join(&self.data_file);
        }
        if self.history_file.is_relative() {
            self.history_file = base.join(&self.history_file);
        }
        self
    }
}

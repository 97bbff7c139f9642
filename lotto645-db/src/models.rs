use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{LottoError, Result};

pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 45;
/// 1..=45 전체 번호 개수
pub const NUMBER_COUNT: usize = MAX_NUMBER as usize;
pub const PICK_COUNT: usize = 6;
pub const BATCH_SIZE: usize = 5;

pub const HIGH_POOL_SIZE: usize = 6;
pub const LOW_POOL_SIZE: usize = 10;
pub const MID_POOL_SIZE: usize = 12;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 스프레드시트 셀 값을 1~45 정수로 변환. 범위 밖이거나 정수가 아니면 결측.
pub fn to_lotto_number(value: f64) -> Option<u8> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < MIN_NUMBER as f64 || value > MAX_NUMBER as f64 {
        return None;
    }
    Some(value as u8)
}

/// 과거 당첨 1회분. 결측 값은 `None`으로 남겨 집계에서 제외한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoricalDraw {
    pub numbers: [Option<u8>; PICK_COUNT],
}

impl HistoricalDraw {
    pub fn valid_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.numbers.iter().flatten().copied()
    }

    pub fn has_valid_entry(&self) -> bool {
        self.numbers.iter().any(Option::is_some)
    }
}

/// 번호별 출현 횟수. 1~45 모든 번호가 항상 존재한다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u32; NUMBER_COUNT],
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self { counts: [0; NUMBER_COUNT] }
    }
}

impl FrequencyTable {
    /// 범위 밖 번호는 무시하고 false를 반환한다.
    pub fn record(&mut self, number: u8) -> bool {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&number) {
            return false;
        }
        self.counts[(number - 1) as usize] += 1;
        true
    }

    pub fn count(&self, number: u8) -> u32 {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&number) {
            return 0;
        }
        self.counts[(number - 1) as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| ((i + 1) as u8, c))
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn mean(&self) -> f64 {
        self.total() as f64 / NUMBER_COUNT as f64
    }
}

/// 빈도 기반 후보 풀. 크기는 타입으로 고정된다 (6/10/12).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberPools {
    pub high: [u8; HIGH_POOL_SIZE],
    pub low: [u8; LOW_POOL_SIZE],
    pub mid: [u8; MID_POOL_SIZE],
}

impl NumberPools {
    /// 혼합 전략이 사용하는 풀. 랜덤 전략은 `None`.
    pub fn pool_for(&self, strategy: Strategy) -> Option<&[u8]> {
        match strategy {
            Strategy::HighMix => Some(&self.high[..]),
            Strategy::MidMix => Some(&self.mid[..]),
            Strategy::LowMix => Some(&self.low[..]),
            Strategy::Random1 | Strategy::Random2 => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    #[serde(rename = "RANDOM_1")]
    Random1,
    #[serde(rename = "RANDOM_2")]
    Random2,
    #[serde(rename = "HIGH_MIX")]
    HighMix,
    #[serde(rename = "MID_MIX")]
    MidMix,
    #[serde(rename = "LOW_MIX")]
    LowMix,
}

impl Strategy {
    /// 배치 내 슬롯 순서
    pub const SLOTS: [Strategy; BATCH_SIZE] = [
        Strategy::Random1,
        Strategy::Random2,
        Strategy::HighMix,
        Strategy::MidMix,
        Strategy::LowMix,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Random1 => "RANDOM_1",
            Strategy::Random2 => "RANDOM_2",
            Strategy::HighMix => "HIGH_MIX",
            Strategy::MidMix => "MID_MIX",
            Strategy::LowMix => "LOW_MIX",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedGame {
    pub strategy: Strategy,
    pub numbers: [u8; PICK_COUNT],
    pub created_at: NaiveDateTime,
}

impl GeneratedGame {
    /// 번호는 항상 오름차순으로 저장된다.
    pub fn new(strategy: Strategy, mut numbers: [u8; PICK_COUNT], created_at: NaiveDateTime) -> Result<Self> {
        numbers.sort_unstable();
        validate_game(&numbers)?;
        Ok(Self { strategy, numbers, created_at })
    }

    pub fn numbers_label(&self) -> String {
        format_numbers(&self.numbers)
    }
}

/// 히스토리 로그의 한 줄.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRecord {
    pub created_at: NaiveDateTime,
    pub strategy: Strategy,
    pub numbers: [u8; PICK_COUNT],
}

impl From<&GeneratedGame> for HistoryRecord {
    fn from(game: &GeneratedGame) -> Self {
        Self {
            created_at: game.created_at,
            strategy: game.strategy,
            numbers: game.numbers,
        }
    }
}

pub fn format_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join("  ")
}

pub fn validate_game(numbers: &[u8; PICK_COUNT]) -> Result<()> {
    for &n in numbers {
        if !(MIN_NUMBER..=MAX_NUMBER).contains(&n) {
            return Err(LottoError::InvalidNumbers(format!("번호 {} 범위 밖 (1-45)", n)));
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                return Err(LottoError::InvalidNumbers(format!("중복 번호: {}", numbers[i])));
            }
        }
    }
    Ok(())
}

use chrono::{NaiveDateTime, Timelike};
use rand::Rng;

use lotto645_db::error::Result;
use lotto645_db::history::HistoryStore;
use lotto645_db::models::{FrequencyTable, GeneratedGame, HistoricalDraw, HistoryRecord, NumberPools};

use crate::analysis::calc_frequency;
use crate::analysis::pools::build_pools;
use crate::analysis::sampler::generate_batch;
use crate::config::AppConfig;
use crate::import::load_winning_numbers;

/// 초 단위로 자른 현재 시각
pub fn now_seconds() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    Skipped,
    Saved(usize),
    /// 저장 실패는 경고로만 알린다. 생성된 게임은 그대로 보여준다.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub games: Vec<GeneratedGame>,
    pub persistence: Persistence,
}

/// 한 번 로드한 당첨번호와 그로부터 계산한 빈도·풀. `reload`로만 갱신된다.
#[derive(Debug)]
pub struct AppContext {
    config: AppConfig,
    draws: Vec<HistoricalDraw>,
    frequency: FrequencyTable,
    pools: NumberPools,
    history: HistoryStore,
}

struct Derived {
    draws: Vec<HistoricalDraw>,
    frequency: FrequencyTable,
    pools: NumberPools,
}

fn derive(config: &AppConfig) -> Result<Derived> {
    let draws = load_winning_numbers(&config.data_file)?;
    let frequency = calc_frequency(&draws);
    let pools = build_pools(&frequency);
    Ok(Derived { draws, frequency, pools })
}

impl AppContext {
    pub fn load(config: AppConfig) -> Result<Self> {
        let Derived { draws, frequency, pools } = derive(&config)?;
        let history = HistoryStore::new(&config.history_file);
        Ok(Self { config, draws, frequency, pools, history })
    }

    /// 파일을 다시 읽는다. 실패하면 기존 상태를 그대로 둔다.
    pub fn reload(&mut self) -> Result<()> {
        let Derived { draws, frequency, pools } = derive(&self.config)?;
        self.draws = draws;
        self.frequency = frequency;
        self.pools = pools;
        log::info!("당첨번호 다시 로드: {}회차", self.draws.len());
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn draws(&self) -> &[HistoricalDraw] {
        &self.draws
    }

    pub fn frequency(&self) -> &FrequencyTable {
        &self.frequency
    }

    pub fn pools(&self) -> &NumberPools {
        &self.pools
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// 5게임 생성 후 `save`이면 히스토리에 추가한다. 생성 실패 시 아무것도 저장되지 않는다.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        save: bool,
        created_at: NaiveDateTime,
    ) -> Result<GenerateOutcome> {
        let games = generate_batch(&self.pools, rng, created_at, self.config.max_attempts)?;

        let persistence = if save {
            let records: Vec<HistoryRecord> = games.iter().map(HistoryRecord::from).collect();
            match self.history.append(&records) {
                Ok(n) => Persistence::Saved(n),
                Err(e) => {
                    log::warn!("히스토리 저장 실패: {}", e);
                    Persistence::Failed(e.to_string())
                }
            }
        } else {
            Persistence::Skipped
        };

        Ok(GenerateOutcome { games, persistence })
    }

    pub fn recent_history(&self) -> Result<Vec<HistoryRecord>> {
        self.history.recent(self.config.history_limit)
    }
}

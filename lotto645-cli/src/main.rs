mod interactive;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use lotto645_cli::analysis::sampler::make_rng;
use lotto645_cli::config::{app_dir, AppConfig};
use lotto645_cli::context::{now_seconds, AppContext};
use lotto645_cli::display::{
    display_batch, display_frequency, display_history, display_load_summary, display_persistence,
    display_pools,
};
use lotto645_db::error::LottoError;
use lotto645_db::history::HistoryStore;

#[derive(Parser)]
#[command(name = "lotto645", about = "로또 6/45 | 5게임 생성기")]
struct Cli {
    /// JSON 설정 파일
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 과거 당첨번호 파일 (xlsx/xls/ods/csv)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// 생성 히스토리 CSV
    #[arg(long, global = true)]
    history: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 5게임 생성
    Generate {
        /// 히스토리에 저장하지 않음
        #[arg(long)]
        no_save: bool,

        /// 재현용 seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// 빈도 기반 풀 보기
    Pools,

    /// 번호별 출현 횟수
    Stats,

    /// 최근 히스토리
    History {
        /// 표시할 행 수 (기본: 설정의 history_limit)
        #[arg(short, long)]
        last: Option<usize>,
    },

    /// 대화형 모드
    Interactive {
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn build_config(cli: &Cli) -> Result<AppConfig> {
    let base = app_dir();
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(data) = &cli.data {
        config.data_file = data.clone();
    }
    if let Some(history) = &cli.history {
        config.history_file = history.clone();
    }
    Ok(config.resolved(&base))
}

/// 입력 파일 문제는 사용자에게 그대로 보여줄 메시지로, 나머지는 원인 체인과 함께 돌려준다.
pub(crate) fn load_error(err: LottoError) -> anyhow::Error {
    if err.is_fatal_input() {
        anyhow!("데이터 로드 오류: {err}")
    } else {
        anyhow::Error::new(err).context("초기화 중 예기치 않은 오류")
    }
}

fn load_context(config: AppConfig) -> Result<AppContext> {
    let ctx = AppContext::load(config).map_err(load_error)?;
    display_load_summary(ctx.draws().len(), &ctx.config().data_file);
    Ok(ctx)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = build_config(&cli)?;

    match cli.command {
        Command::Generate { no_save, seed } => {
            let ctx = load_context(config)?;
            let save = ctx.config().save_history && !no_save;
            cmd_generate(&ctx, &mut make_rng(seed), save)
        }
        Command::Pools => {
            let ctx = load_context(config)?;
            display_pools(ctx.pools());
            Ok(())
        }
        Command::Stats => cmd_stats(&load_context(config)?),
        Command::History { last } => {
            let limit = last.unwrap_or(config.history_limit);
            cmd_history(&HistoryStore::new(&config.history_file), limit)
        }
        Command::Interactive { seed } => {
            let mut ctx = load_context(config)?;
            interactive::run_interactive(&mut ctx, seed)
        }
    }
}

pub(crate) fn cmd_generate(ctx: &AppContext, rng: &mut rand::rngs::StdRng, save: bool) -> Result<()> {
    let outcome = ctx.generate(rng, save, now_seconds())?;
    display_batch(&outcome.games);
    display_persistence(&outcome.persistence);
    cmd_history(ctx.history(), ctx.config().history_limit)
}

pub(crate) fn cmd_stats(ctx: &AppContext) -> Result<()> {
    display_frequency(ctx.frequency(), ctx.draws().len());
    display_pools(ctx.pools());
    Ok(())
}

pub(crate) fn cmd_history(store: &HistoryStore, limit: usize) -> Result<()> {
    match store.recent(limit) {
        Ok(records) => display_history(&records, limit),
        Err(e) => println!("⚠ 히스토리를 읽을 수 없습니다: {}", e),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_data_reported_as_load_error() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            data_file: dir.path().join("draws.xlsx"),
            ..AppConfig::default()
        };
        let err = load_context(config).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("데이터 로드 오류"), "{msg}");
        assert!(msg.contains("draws.xlsx"), "{msg}");
    }

    #[test]
    fn test_other_errors_keep_cause_chain() {
        let err = load_error(LottoError::Io(std::io::Error::other("disk")));
        assert_eq!(err.to_string(), "초기화 중 예기치 않은 오류");
        assert!(format!("{err:#}").contains("disk"));
    }
}

use std::io::{self, Write};

use anyhow::{Context, Result};
use lotto645_cli::analysis::sampler::make_rng;
use lotto645_cli::context::AppContext;
use lotto645_cli::display::{display_load_summary, display_pools};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Generate,
    ToggleSave,
    Pools,
    Stats,
    History,
    Reload,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "생성" | "generate" | "gen" | "g" => Some(InteractiveCommand::Generate),
        "2" | "저장" | "save" | "toggle" => Some(InteractiveCommand::ToggleSave),
        "3" | "풀" | "pools" | "pool" => Some(InteractiveCommand::Pools),
        "4" | "빈도" | "stats" => Some(InteractiveCommand::Stats),
        "5" | "히스토리" | "history" | "hist" => Some(InteractiveCommand::History),
        "6" | "새로고침" | "reload" => Some(InteractiveCommand::Reload),
        "7" | "종료" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu(save: bool) {
    let save_label = if save { "ON" } else { "OFF" };
    println!();
    println!("── 대화형 모드 ──");
    println!("  1. 생성       5게임 생성");
    println!("  2. 저장       히스토리 저장 전환 (현재 {})", save_label);
    println!("  3. 풀         빈도 기반 풀 보기");
    println!("  4. 빈도       번호별 출현 횟수");
    println!("  5. 히스토리   최근 히스토리");
    println!("  6. 새로고침   당첨번호 파일 다시 읽기");
    println!("  7. 종료");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("입력 오류")?;
    if read == 0 {
        anyhow::bail!("입력 종료");
    }
    Ok(input.trim().to_string())
}

pub fn run_interactive(ctx: &mut AppContext, seed: Option<u64>) -> Result<()> {
    println!("로또 6/45 대화형 모드입니다.");
    let mut rng = make_rng(seed);
    let mut save = ctx.config().save_history;

    loop {
        display_menu(save);
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("종료합니다.");
                break;
            }
            Some(InteractiveCommand::Generate) => {
                if let Err(e) = super::cmd_generate(ctx, &mut rng, save) {
                    println!("오류: {e:#}");
                }
            }
            Some(InteractiveCommand::ToggleSave) => {
                save = !save;
                println!("히스토리 저장: {}", if save { "ON" } else { "OFF" });
            }
            Some(InteractiveCommand::Pools) => display_pools(ctx.pools()),
            Some(InteractiveCommand::Stats) => {
                if let Err(e) = super::cmd_stats(ctx) {
                    println!("오류: {e:#}");
                }
            }
            Some(InteractiveCommand::History) => {
                if let Err(e) = super::cmd_history(ctx.history(), ctx.config().history_limit) {
                    println!("오류: {e:#}");
                }
            }
            Some(InteractiveCommand::Reload) => match ctx.reload() {
                Ok(()) => {
                    display_load_summary(ctx.draws().len(), &ctx.config().data_file);
                    display_pools(ctx.pools());
                }
                Err(e) => println!("새로고침 실패 (기존 데이터 유지): {:#}", super::load_error(e)),
            },
            None => {
                println!("알 수 없는 명령: '{}'. 번호(1-7) 또는 명령 이름을 입력하세요.", input);
            }
        }
    }

    Ok(())
}

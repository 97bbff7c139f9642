use std::path::Path;

use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use lotto645_db::models::{
    format_numbers, FrequencyTable, GeneratedGame, HistoryRecord, NumberPools, Strategy,
    TIMESTAMP_FORMAT,
};

use crate::context::Persistence;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn strategy_color(strategy: Strategy) -> Color {
    match strategy {
        Strategy::Random1 | Strategy::Random2 => Color::White,
        Strategy::HighMix => Color::Green,
        Strategy::MidMix => Color::Yellow,
        Strategy::LowMix => Color::Cyan,
    }
}

pub fn display_load_summary(draw_count: usize, source: &Path) {
    println!("당첨번호 {}회차 로드 ({})", draw_count, source.display());
}

pub fn display_pools(pools: &NumberPools) {
    println!("\n── 빈도 기반 풀 ──");
    let mut table = new_table(vec!["풀", "번호"]);
    table.add_row(vec!["고빈도 TOP6".to_string(), format_numbers(&pools.high)]);
    table.add_row(vec!["저빈도 BOTTOM10".to_string(), format_numbers(&pools.low)]);
    table.add_row(vec!["중립 후보 12개".to_string(), format_numbers(&pools.mid)]);
    println!("{table}");
}

pub fn display_frequency(freq: &FrequencyTable, draw_count: usize) {
    println!("\n📊 {}회차 번호별 출현 횟수 (평균 {:.2})\n", draw_count, freq.mean());

    let mut sorted: Vec<(u8, u32)> = freq.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut table = new_table(vec!["번호", "횟수"]);
    for (number, count) in sorted {
        table.add_row(vec![format!("{:2}", number), count.to_string()]);
    }
    println!("{table}");
}

pub fn display_batch(games: &[GeneratedGame]) {
    println!("\n🎲 이번 회차 5게임\n");

    let mut table = new_table(vec!["#", "전략", "번호"]);
    for (i, game) in games.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(game.strategy).fg(strategy_color(game.strategy)),
            Cell::new(game.numbers_label()),
        ]);
    }
    println!("{table}");
}

pub fn display_persistence(persistence: &Persistence) {
    match persistence {
        Persistence::Saved(n) => println!("저장 완료! ({}개)", n),
        Persistence::Skipped => println!("히스토리 저장 안 함."),
        Persistence::Failed(reason) => println!("⚠ 히스토리 저장 실패: {}", reason),
    }
}

pub fn display_history(records: &[HistoryRecord], limit: usize) {
    println!("\n── 최근 히스토리(최대 {}개) ──", limit);
    if records.is_empty() {
        println!("아직 저장된 히스토리가 없습니다.");
        return;
    }

    let mut table = new_table(vec!["created_at", "strategy", "n1", "n2", "n3", "n4", "n5", "n6"]);
    for record in records {
        let mut row = vec![
            record.created_at.format(TIMESTAMP_FORMAT).to_string(),
            record.strategy.to_string(),
        ];
        row.extend(record.numbers.iter().map(|n| n.to_string()));
        table.add_row(row);
    }
    println!("{table}");
}

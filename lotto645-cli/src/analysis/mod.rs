pub mod pools;
pub mod sampler;

use lotto645_db::models::{FrequencyTable, HistoricalDraw};

/// 모든 회차의 유효 번호를 센다. 결측 값은 건너뛴다.
pub fn calc_frequency(draws: &[HistoricalDraw]) -> FrequencyTable {
    let mut table = FrequencyTable::default();
    for draw in draws {
        for n in draw.valid_numbers() {
            table.record(n);
        }
    }
    table
}

#[cfg(test)]
pub(crate) fn make_draws(rows: &[[u8; 6]]) -> Vec<HistoricalDraw> {
    rows.iter()
        .map(|r| HistoricalDraw { numbers: r.map(Some) })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotto645_db::models::NUMBER_COUNT;

    #[test]
    fn test_frequency_scenario() {
        let draws = make_draws(&[[1, 2, 3, 4, 5, 6], [1, 2, 3, 7, 8, 9], [10, 11, 12, 13, 14, 15]]);
        let freq = calc_frequency(&draws);

        for n in 1..=3 {
            assert_eq!(freq.count(n), 2, "번호 {n}");
        }
        for n in 4..=15 {
            assert_eq!(freq.count(n), 1, "번호 {n}");
        }
        for n in 16..=45 {
            assert_eq!(freq.count(n), 0, "번호 {n}");
        }
        assert_eq!(freq.iter().count(), NUMBER_COUNT);
    }

    #[test]
    fn test_frequency_total_matches_valid_entries() {
        let mut draws = make_draws(&[[1, 2, 3, 4, 5, 6], [40, 41, 42, 43, 44, 45]]);
        draws.push(HistoricalDraw { numbers: [Some(9), None, None, Some(10), None, None] });
        let freq = calc_frequency(&draws);

        assert_eq!(freq.total(), 14);
        assert!(freq.total() <= 6 * draws.len() as u64);
    }

    #[test]
    fn test_frequency_empty() {
        let freq = calc_frequency(&[]);
        assert_eq!(freq.total(), 0);
        assert_eq!(freq.iter().filter(|&(_, c)| c == 0).count(), NUMBER_COUNT);
    }
}

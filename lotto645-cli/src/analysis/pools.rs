use std::cmp::Reverse;

use lotto645_db::models::{FrequencyTable, NumberPools, NUMBER_COUNT};

/// 키 오름차순 정렬. 키가 같으면 낮은 번호가 앞선다.
fn ranked_by<K: Ord>(freq: &FrequencyTable, key: impl Fn(u32) -> K) -> Vec<u8> {
    let mut entries: Vec<(u8, u32)> = freq.iter().collect();
    entries.sort_by_key(|&(n, count)| (key(count), n));
    entries.into_iter().map(|(n, _)| n).collect()
}

fn take_first<const N: usize>(ranked: &[u8]) -> [u8; N] {
    let mut pool = [0u8; N];
    for (slot, &n) in pool.iter_mut().zip(ranked) {
        *slot = n;
    }
    pool
}

pub fn high_frequency<const N: usize>(freq: &FrequencyTable) -> [u8; N] {
    take_first(&ranked_by(freq, Reverse))
}

pub fn low_frequency<const N: usize>(freq: &FrequencyTable) -> [u8; N] {
    take_first(&ranked_by(freq, |count| count))
}

/// 평균 빈도와의 거리가 가까운 순. |count - total/45| 대신 |45·count - total|로 비교해
/// 부동소수 오차 없이 정렬한다.
pub fn mid_candidates<const N: usize>(freq: &FrequencyTable) -> [u8; N] {
    let total = freq.total() as i64;
    take_first(&ranked_by(freq, |count| {
        (NUMBER_COUNT as i64 * count as i64 - total).unsigned_abs()
    }))
}

pub fn build_pools(freq: &FrequencyTable) -> NumberPools {
    NumberPools {
        high: high_frequency(freq),
        low: low_frequency(freq),
        mid: mid_candidates(freq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{calc_frequency, make_draws};

    #[test]
    fn test_scenario_pools() {
        let draws = make_draws(&[[1, 2, 3, 4, 5, 6], [1, 2, 3, 7, 8, 9], [10, 11, 12, 13, 14, 15]]);
        let pools = build_pools(&calc_frequency(&draws));

        // 1,2,3 (2회) + 1회 출현 중 낮은 번호 4,5,6
        assert_eq!(pools.high, [1, 2, 3, 4, 5, 6]);
        assert_eq!(pools.low, [16, 17, 18, 19, 20, 21, 22, 23, 24, 25]);
        // 평균 0.4 : 0회(거리 0.4)가 1회(0.6)보다 가깝다
        assert_eq!(pools.mid, [16, 17, 18, 19, 20, 21, 22, 23, 24, 25, 26, 27]);
    }

    #[test]
    fn test_uniform_frequency_tie_break() {
        let pools = build_pools(&FrequencyTable::default());
        assert_eq!(pools.high, [1, 2, 3, 4, 5, 6]);
        assert_eq!(pools.low, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        assert_eq!(pools.mid, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
    }

    #[test]
    fn test_high_and_low_extremes() {
        let mut freq = FrequencyTable::default();
        for n in 1..=45u8 {
            for _ in 0..n {
                freq.record(n);
            }
        }
        let pools = build_pools(&freq);
        assert_eq!(pools.high, [45, 44, 43, 42, 41, 40]);
        assert_eq!(pools.low, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
        // 평균 23 : 23, 22·24, 21·25 ... 거리 6에서 17이 29보다 앞선다
        assert_eq!(pools.mid[0], 23);
        let mut mid = pools.mid.to_vec();
        mid.sort_unstable();
        assert_eq!(mid, (17..=28).collect::<Vec<u8>>());
    }

    #[test]
    fn test_pools_contain_distinct_numbers() {
        let draws = make_draws(&[[5, 9, 14, 22, 31, 44], [5, 9, 17, 22, 38, 41]]);
        let pools = build_pools(&calc_frequency(&draws));
        for pool in [&pools.high[..], &pools.low[..], &pools.mid[..]] {
            let mut v = pool.to_vec();
            v.sort_unstable();
            v.dedup();
            assert_eq!(v.len(), pool.len());
            assert!(v.iter().all(|&n| (1..=45).contains(&n)));
        }
    }
}

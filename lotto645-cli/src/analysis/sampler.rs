use chrono::NaiveDateTime;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use lotto645_db::error::{LottoError, Result};
use lotto645_db::models::{
    GeneratedGame, NumberPools, Strategy, MAX_NUMBER, MIN_NUMBER, NUMBER_COUNT, PICK_COUNT,
};

/// 혼합 게임에서 풀에서 고르는 번호 수
pub const MIX_FIXED_COUNT: usize = 2;
const MIX_REST_COUNT: usize = PICK_COUNT - MIX_FIXED_COUNT;

pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// 1~45에서 중복 없이 6개, 오름차순.
pub fn random_game<R: Rng + ?Sized>(rng: &mut R) -> [u8; PICK_COUNT] {
    let mut numbers = [0u8; PICK_COUNT];
    for (slot, idx) in numbers.iter_mut().zip(index::sample(rng, NUMBER_COUNT, PICK_COUNT).into_iter()) {
        *slot = idx as u8 + MIN_NUMBER;
    }
    numbers.sort_unstable();
    numbers
}

fn distinct_candidates(pool: &[u8]) -> Vec<u8> {
    let mut candidates: Vec<u8> = pool
        .iter()
        .copied()
        .filter(|n| (MIN_NUMBER..=MAX_NUMBER).contains(n))
        .collect();
    candidates.sort_unstable();
    candidates.dedup();
    candidates
}

/// 풀에서 2개, 그 2개를 뺀 1~45에서 4개를 각각 비복원 추출한다.
fn draw_mix<R: Rng + ?Sized>(
    rng: &mut R,
    candidates: &[u8],
) -> ([u8; MIX_FIXED_COUNT], [u8; MIX_REST_COUNT]) {
    let mut fixed = [0u8; MIX_FIXED_COUNT];
    for (slot, idx) in fixed.iter_mut().zip(index::sample(rng, candidates.len(), MIX_FIXED_COUNT).into_iter()) {
        *slot = candidates[idx];
    }

    let remaining: Vec<u8> = (MIN_NUMBER..=MAX_NUMBER).filter(|n| !fixed.contains(n)).collect();
    let mut rest = [0u8; MIX_REST_COUNT];
    for (slot, idx) in rest.iter_mut().zip(index::sample(rng, remaining.len(), MIX_REST_COUNT).into_iter()) {
        *slot = remaining[idx];
    }
    (fixed, rest)
}

pub fn mix_game<R: Rng + ?Sized>(
    rng: &mut R,
    pool: &[u8],
    strategy: Strategy,
) -> Result<[u8; PICK_COUNT]> {
    let candidates = distinct_candidates(pool);
    if candidates.len() < MIX_FIXED_COUNT {
        return Err(LottoError::MalformedPool {
            strategy,
            distinct: candidates.len(),
        });
    }

    let (fixed, rest) = draw_mix(rng, &candidates);
    let mut numbers = [0u8; PICK_COUNT];
    numbers[..MIX_FIXED_COUNT].copy_from_slice(&fixed);
    numbers[MIX_FIXED_COUNT..].copy_from_slice(&rest);
    numbers.sort_unstable();
    Ok(numbers)
}

fn all_distinct(games: &[[u8; PICK_COUNT]]) -> bool {
    (0..games.len()).all(|i| ((i + 1)..games.len()).all(|j| games[i] != games[j]))
}

/// 슬롯 순서대로 5게임을 만든다. 같은 조합이 둘 이상 나오면 배치 전체를 다시 뽑는다.
pub fn generate_batch<R: Rng + ?Sized>(
    pools: &NumberPools,
    rng: &mut R,
    created_at: NaiveDateTime,
    max_attempts: usize,
) -> Result<Vec<GeneratedGame>> {
    let max_attempts = max_attempts.max(1);

    for attempt in 1..=max_attempts {
        let mut games = Vec::with_capacity(Strategy::SLOTS.len());
        for strategy in Strategy::SLOTS {
            let numbers = match pools.pool_for(strategy) {
                Some(pool) => mix_game(rng, pool, strategy)?,
                None => random_game(rng),
            };
            games.push(numbers);
        }

        if all_distinct(&games) {
            return Strategy::SLOTS
                .into_iter()
                .zip(games)
                .map(|(strategy, numbers)| GeneratedGame::new(strategy, numbers, created_at))
                .collect();
        }
        log::debug!("중복 조합 발생, 배치 재생성 ({}/{})", attempt, max_attempts);
    }

    Err(LottoError::DuplicateBatch {
        attempts: max_attempts,
    })
}

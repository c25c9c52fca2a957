use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tui_bowling::core::{generate_roll, GameState, RosterSnapshot, SimpleRng};
use tui_bowling::types::{GameAction, ROLL_UPPER_BOUND};

fn bench_advance(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start();

    c.bench_function("advance_one_visit", |b| {
        b.iter(|| {
            // Single seat: a false return means the game is over.
            if !state.advance() {
                state.restart();
            }
        })
    });
}

fn bench_full_game(c: &mut Criterion) {
    let mut state = GameState::new(6071);
    state.start();
    for _ in 1..4 {
        state.apply_action(GameAction::AddPlayer);
    }

    c.bench_function("full_game_four_seats", |b| {
        b.iter(|| {
            state.restart();
            while !state.is_finished() {
                state.advance();
            }
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start();
    for _ in 0..10 {
        state.advance();
    }
    // First call sizes the per-player buffers; timed calls reuse them.
    let mut snapshot = RosterSnapshot::default();
    state.snapshot_into(&mut snapshot);

    c.bench_function("snapshot_mid_game", |b| {
        b.iter(|| {
            state.snapshot_into(black_box(&mut snapshot));
        })
    });
}

fn bench_generate_roll(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);

    c.bench_function("generate_roll_clamped", |b| {
        b.iter(|| generate_roll(&mut rng, black_box(&[7]), ROLL_UPPER_BOUND))
    });
}

criterion_group!(
    benches,
    bench_advance,
    bench_full_game,
    bench_snapshot,
    bench_generate_roll
);
criterion_main!(benches);

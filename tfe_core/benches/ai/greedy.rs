//! `tfe_core::ai::greedy` の性能計測（終局までの自動プレイ）。

use core::hint::black_box;
use criterion::BatchSize;
use criterion::BenchmarkId;
use criterion::Criterion;
use tfe_core::{ai, engine};

/// 自動プレイの手数上限。
const TURN_LIMIT: u64 = 100_000;

/// `cargo bench` の引数を取り込みつつ `Criterion` を生成する。
fn criterion_configured() -> Criterion {
    let base = Criterion::default();
    base.configure_from_args()
}

/// `autoplay::run` を盤面サイズごとに計測する。
fn bench_autoplay(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("ai/greedy/autoplay");

    for n in [3_usize, 4, 5] {
        let bench_id = BenchmarkId::new("n", n);
        group.bench_with_input(bench_id, &n, |bench, &size| {
            bench.iter_batched(
                || engine::Board::new(size, engine::RandomTiles::seeded(u64::MIN)).ok(),
                |board_opt| {
                    let Some(mut board) = board_opt else {
                        return None;
                    };
                    let mut agent = ai::greedy::Agent::new();
                    black_box(ai::autoplay::run(&mut board, &mut agent, TURN_LIMIT).ok())
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// ベンチマークのエントリーポイント。
fn main() {
    let mut criterion = criterion_configured();
    bench_autoplay(&mut criterion);
    criterion.final_summary();
}

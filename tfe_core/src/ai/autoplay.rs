use crate::ai::types::Ai;
use crate::engine::board::Board;
use crate::engine::spawn::{SpawnError, TileSource};
use crate::engine::types::{Score, Tile};
use tracing::{debug, info};

/// 自動プレイの結果。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct RunSummary {
    /// 終局に到達したか（`false` なら手数上限で止まった）。
    pub finished: bool,
    /// 盤上の最大タイル。
    pub max_tile: Tile,
    /// 最終スコア。
    pub score: Score,
    /// 盤面が変わった手の数。
    pub turns: u64,
}

/// AI に手を選ばせて、終局か `max_turns` 手に達するまで進める。
///
/// # Errors
///
/// タイルを置けなかった場合、`SpawnError` をそのまま返す。
#[inline]
pub fn run<S: TileSource, A: Ai>(
    board: &mut Board<S>,
    agent: &mut A,
    max_turns: u64,
) -> Result<RunSummary, SpawnError> {
    let mut turns = 0_u64;
    let mut finished = false;

    while turns < max_turns {
        let Some(direction) = agent.select_move(board) else {
            finished = true;
            break;
        };

        match board.play(direction) {
            Ok(true) => turns = turns.saturating_add(1),
            Ok(false) => {
                // 盤面が変わらない手を選ぶAIでは進まないので打ち切る。
                debug!(?direction, "agent selected a move with no effect");
                finished = board.is_game_over();
                break;
            }
            Err(err) => return Err(err),
        }
    }

    if !finished {
        finished = board.is_game_over();
    }

    let summary = RunSummary {
        finished,
        max_tile: board.max_tile(),
        score: board.score(),
        turns,
    };
    info!(
        turns = summary.turns,
        score = summary.score,
        max_tile = summary.max_tile,
        finished = summary.finished,
        "autoplay stopped"
    );
    Ok(summary)
}

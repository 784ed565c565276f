use crate::ai::types::Ai;
use crate::engine::board::Board;
use crate::engine::spawn::TileSource;
use crate::engine::types::Direction;

/// 左・上・右・下の順に試し、最初に盤面が変わる方向を選ぶAI。
///
/// 先読みや評価はしない。
#[derive(Clone, Copy, Debug, Default)]
#[non_exhaustive]
pub struct Agent;

impl Agent {
    /// 初期化する。
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Ai for Agent {
    #[inline]
    fn select_move<S: TileSource>(&mut self, board: &Board<S>) -> Option<Direction> {
        Direction::AUTO_PLAY_ORDER
            .into_iter()
            .find(|&direction| board.can_move(direction))
    }
}

#[cfg(test)]
mod tests {
    use super::Agent;
    use crate::ai::types::Ai as _;
    use crate::engine::board::Board;
    use crate::engine::spawn::ScriptedTiles;
    use crate::engine::types::Direction;

    fn fixture(cells: Vec<u64>) -> Board<ScriptedTiles> {
        match Board::from_cells(2, cells, ScriptedTiles::default()) {
            Ok(board) => board,
            Err(err) => panic!("{err}"),
        }
    }

    #[test]
    fn prefers_left_when_possible() {
        let board = fixture(vec![0, 2, 0, 0]);
        assert_eq!(Agent::new().select_move(&board), Some(Direction::Left));
    }

    #[test]
    fn falls_back_in_priority_order() {
        // 左にも上にも動けず、右には動ける。
        let board = fixture(vec![2, 0, 4, 0]);
        assert_eq!(Agent::new().select_move(&board), Some(Direction::Right));

        // 左・上・右に動けず、下には動ける。
        let board = fixture(vec![2, 4, 0, 0]);
        assert_eq!(Agent::new().select_move(&board), Some(Direction::Down));
    }

    #[test]
    fn returns_none_when_stuck() {
        let board = fixture(vec![2, 4, 8, 16]);
        assert_eq!(Agent::new().select_move(&board), None);
    }
}

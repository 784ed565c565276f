use crate::engine::board::Board;
use crate::engine::spawn::TileSource;
use crate::engine::types::Direction;

/// 手を選択するAI。
pub trait Ai {
    /// 現在の盤面から次の方向を選択する。動かせる方向が無ければ `None`。
    fn select_move<S: TileSource>(&mut self, board: &Board<S>) -> Option<Direction>;
}

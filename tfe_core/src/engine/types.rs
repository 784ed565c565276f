/// セルの値（0は空、それ以外は2のべき乗）。
pub type Tile = u64;

/// スコア（合成で生まれたタイル値の累計）。
pub type Score = u64;

/// 盤面を動かす方向。
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum Direction {
    /// 下方向（下の壁へ寄せる）。
    Down,
    /// 左方向（左の壁へ寄せる）。
    Left,
    /// 右方向（右の壁へ寄せる）。
    Right,
    /// 上方向（上の壁へ寄せる）。
    Up,
}

impl Direction {
    /// 4方向すべて。
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// 自動プレイで試す方向の優先順。
    pub const AUTO_PLAY_ORDER: [Self; 4] = [Self::Left, Self::Up, Self::Right, Self::Down];

    /// vi 風のキー（`h`/`j`/`k`/`l`、大文字小文字を区別しない）から方向を返す。
    #[inline]
    #[must_use]
    pub const fn from_vi_key(key: char) -> Option<Self> {
        match key.to_ascii_uppercase() {
            'H' => Some(Self::Left),
            'J' => Some(Self::Down),
            'K' => Some(Self::Up),
            'L' => Some(Self::Right),
            _ => None,
        }
    }
}

/// タイルの「段」を返す（空なら0、それ以外は `floor(log2(value)) + 1`）。
///
/// パレットの添字に使う。
#[inline]
#[must_use]
pub const fn tile_rank(value: Tile) -> u32 {
    Tile::BITS.saturating_sub(value.leading_zeros())
}

use crate::engine::types::Tile;
use core::fmt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 通常の新規タイル。
pub const TILE_TWO: Tile = 2;

/// まれに出現する新規タイル。
pub const TILE_FOUR: Tile = 4;

/// 新規タイルが `TILE_TWO` になる確率。
pub const TWO_PROBABILITY: f64 = 0.9;

/// タイル生成に失敗した理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum SpawnError {
    /// 空きマスが無い。
    BoardFull,
    /// タイル源が空きマスの数以上の順位を返した。
    CellOutOfRange {
        /// タイル源が返した順位。
        choice: usize,
        /// 空きマスの数。
        empty: usize,
    },
    /// タイル源が `TILE_TWO` でも `TILE_FOUR` でもない値を返した。
    InvalidTile {
        /// タイル源が返した値。
        value: Tile,
    },
}

impl fmt::Display for SpawnError {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::BoardFull => formatter.write_str("the board is full"),
            Self::CellOutOfRange { choice, empty } => {
                write!(formatter, "tile source chose empty cell {choice} of {empty}")
            }
            Self::InvalidTile { value } => {
                write!(formatter, "tile source produced {value}, expected {TILE_TWO} or {TILE_FOUR}")
            }
        }
    }
}

impl core::error::Error for SpawnError {}

/// 新規タイルの位置と値を決める乱数源。
pub trait TileSource {
    /// `empty_count` 個の空きマス（行優先の昇順）から1つ選び、その順位を返す。
    ///
    /// `empty_count` は常に1以上で呼ばれる。
    fn pick_cell(&mut self, empty_count: usize) -> usize;

    /// 新規タイルの値（`TILE_TWO` か `TILE_FOUR`）を返す。
    fn pick_value(&mut self) -> Tile;
}

/// `rand` の乱数生成器を使うタイル源。
#[derive(Clone, Debug)]
pub struct RandomTiles<R> {
    /// 乱数生成器。
    rng: R,
}

impl RandomTiles<StdRng> {
    /// OS の乱数で初期化する。
    #[inline]
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// `seed` を用いて初期化する（決定的に再現可能）。
    #[inline]
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomTiles<R> {
    /// 任意の乱数生成器から作る。
    #[inline]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TileSource for RandomTiles<R> {
    #[inline]
    fn pick_cell(&mut self, empty_count: usize) -> usize {
        self.rng.gen_range(0..empty_count.max(1))
    }

    #[inline]
    fn pick_value(&mut self) -> Tile {
        if self.rng.gen_bool(TWO_PROBABILITY) {
            TILE_TWO
        } else {
            TILE_FOUR
        }
    }
}

/// 決められた `(空きマスの順位, 値)` の列を繰り返し返すタイル源。
///
/// 順位は空きマス数で割った余りを使う。列が空なら常に先頭の空きマスに `TILE_TWO` を置く。
/// 値は検証しないので、`TILE_TWO`/`TILE_FOUR` 以外を入れると `Board::spawn` が `SpawnError::InvalidTile` を返す。
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ScriptedTiles {
    /// 次に使う `script` の位置。
    cursor: usize,
    /// 直前の `pick_cell` で使ったエントリの値。
    pending_value: Option<Tile>,
    /// 再生する `(順位, 値)` の列。
    script: Vec<(usize, Tile)>,
}

impl ScriptedTiles {
    /// 再生する列を指定して作る。
    #[inline]
    #[must_use]
    pub const fn new(script: Vec<(usize, Tile)>) -> Self {
        Self {
            cursor: 0,
            pending_value: None,
            script,
        }
    }

    /// 次のエントリを取り出し、カーソルを進める。
    fn next_entry(&mut self) -> (usize, Tile) {
        let entry = self.script.get(self.cursor).copied();
        let len = self.script.len();
        self.cursor = match self.cursor.checked_add(1) {
            Some(next) if next < len => next,
            _ => 0,
        };
        entry.unwrap_or((0, TILE_TWO))
    }
}

impl TileSource for ScriptedTiles {
    #[inline]
    fn pick_cell(&mut self, empty_count: usize) -> usize {
        let (choice, value) = self.next_entry();
        self.pending_value = Some(value);
        choice.checked_rem(empty_count).unwrap_or(0)
    }

    #[inline]
    fn pick_value(&mut self) -> Tile {
        match self.pending_value.take() {
            Some(value) => value,
            None => self.next_entry().1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RandomTiles, ScriptedTiles, TILE_FOUR, TILE_TWO, TileSource as _};

    #[test]
    fn scripted_tiles_replay_and_cycle() {
        let mut source = ScriptedTiles::new(vec![(5, TILE_TWO), (1, TILE_FOUR)]);

        assert_eq!(source.pick_cell(3), 2);
        assert_eq!(source.pick_value(), TILE_TWO);
        assert_eq!(source.pick_cell(3), 1);
        assert_eq!(source.pick_value(), TILE_FOUR);
        // 列の末尾まで来たら先頭に戻る。
        assert_eq!(source.pick_cell(4), 1);
        assert_eq!(source.pick_value(), TILE_TWO);
    }

    #[test]
    fn empty_script_falls_back_to_first_cell() {
        let mut source = ScriptedTiles::default();
        assert_eq!(source.pick_cell(7), 0);
        assert_eq!(source.pick_value(), TILE_TWO);
    }

    #[test]
    fn seeded_tiles_are_reproducible() {
        let mut first = RandomTiles::seeded(42);
        let mut second = RandomTiles::seeded(42);

        for empty in 1..64 {
            let cell = first.pick_cell(empty);
            assert!(cell < empty, "cell={cell} empty={empty}");
            assert_eq!(cell, second.pick_cell(empty));
            assert_eq!(first.pick_value(), second.pick_value());
        }
    }

    #[test]
    fn random_values_are_mostly_twos() {
        let mut source = RandomTiles::seeded(7);
        let mut twos = 0_u32;
        let mut fours = 0_u32;
        for _ in 0..10_000 {
            match source.pick_value() {
                TILE_TWO => twos += 1,
                TILE_FOUR => fours += 1,
                other => panic!("unexpected tile {other}"),
            }
        }
        assert!(fours > 500 && fours < 1500, "fours={fours}");
        assert!(twos > fours);
    }
}

use crate::engine::line::{LineSet, sift_all};
use crate::engine::spawn::{SpawnError, TILE_FOUR, TILE_TWO, TileSource};
use crate::engine::types::{Direction, Score, Tile};
use core::fmt;
use tracing::{debug, trace, warn};

/// ゲームの状態。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum Status {
    /// 終局（どの方向にも動かせない）。
    GameOver {
        /// 盤上の最大タイル。
        max_tile: Tile,
        /// 最終スコア。
        score: Score,
    },
    /// 進行中。
    InProgress,
}

/// 既存のセル列から盤面を作れなかった理由。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum LayoutError {
    /// セル数が `n * n` と一致しない。
    LengthMismatch {
        /// 実際のセル数。
        actual: usize,
        /// 期待したセル数。
        expected: usize,
    },
    /// 0でも2のべき乗でもない値がある（1も不可）。
    NotPowerOfTwo {
        /// 該当セルの添字。
        index: usize,
        /// 該当セルの値。
        value: Tile,
    },
}

impl fmt::Display for LayoutError {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::LengthMismatch { actual, expected } => {
                write!(formatter, "expected {expected} cells, got {actual}")
            }
            Self::NotPowerOfTwo { index, value } => {
                write!(formatter, "cell {index} holds {value}, which is not a tile value")
            }
        }
    }
}

impl core::error::Error for LayoutError {}

/// 2048 の盤面（行優先のセル列、スコア、タイル源）。
#[derive(Clone, Debug)]
pub struct Board<S> {
    /// 行優先のセル列（0は空き）。
    cells: Vec<Tile>,
    /// 4方向のライン列。
    lines: LineSet,
    /// 一辺の長さ。
    n: usize,
    /// 累計スコア。
    score: Score,
    /// 新規タイルの乱数源。
    source: S,
}

impl<S: TileSource> Board<S> {
    /// 指定方向に動かしたときに盤面が変わるかを返す（盤面は変更しない）。
    #[inline]
    #[must_use]
    pub fn can_move(&self, direction: Direction) -> bool {
        let mut scratch = self.cells.clone();
        sift_all(&mut scratch, self.lines.lines(direction)).changed
    }

    /// `(row, col)` のセル値を返す。範囲外なら `None`。
    #[inline]
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<Tile> {
        if row >= self.n || col >= self.n {
            return None;
        }

        let index = match row.checked_mul(self.n) {
            Some(offset) => offset.saturating_add(col),
            None => return None,
        };
        self.cells.get(index).copied()
    }

    /// 行優先のセル列を返す。
    #[inline]
    #[must_use]
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// 下へ動かす。
    ///
    /// # Errors
    ///
    /// `play` と同じ。
    #[inline]
    pub fn down(&mut self) -> Result<bool, SpawnError> {
        self.play(Direction::Down)
    }

    /// 空きマスの数を返す。
    #[inline]
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|&&value| value == Tile::MIN).count()
    }

    /// 既存のセル列から盤面を作る（タイルは追加しない、スコアは0）。
    ///
    /// # Errors
    ///
    /// - `LayoutError::LengthMismatch`: セル数が `n * n` でない場合
    /// - `LayoutError::NotPowerOfTwo`: 0 でも 2 以上の2のべき乗でもない値がある場合
    #[inline]
    pub fn from_cells(n: usize, cells: Vec<Tile>, source: S) -> Result<Self, LayoutError> {
        let expected = n.saturating_mul(n);
        if cells.len() != expected {
            return Err(LayoutError::LengthMismatch {
                actual: cells.len(),
                expected,
            });
        }

        let invalid = cells
            .iter()
            .enumerate()
            .find(|&(_, &value)| value != Tile::MIN && (value == 1 || !value.is_power_of_two()));
        if let Some((index, &value)) = invalid {
            return Err(LayoutError::NotPowerOfTwo { index, value });
        }

        Ok(Self {
            cells,
            lines: LineSet::new(n),
            n,
            score: Score::MIN,
            source,
        })
    }

    /// どの方向にも動かせないかを返す。
    #[inline]
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        !Direction::ALL
            .into_iter()
            .any(|direction| self.can_move(direction))
    }

    /// 左へ動かす。
    ///
    /// # Errors
    ///
    /// `play` と同じ。
    #[inline]
    pub fn left(&mut self) -> Result<bool, SpawnError> {
        self.play(Direction::Left)
    }

    /// 盤上の最大タイルを返す（空なら0）。
    #[inline]
    #[must_use]
    pub fn max_tile(&self) -> Tile {
        self.cells.iter().copied().max().unwrap_or(Tile::MIN)
    }

    /// 空の盤面を作り、タイルを2枚置いてゲームを開始する。
    ///
    /// `n` の検証はしない。`n < 2` の場合は2枚目（`n == 0` なら1枚目）の配置で失敗する。
    ///
    /// # Errors
    ///
    /// 初期タイルを置けなかった場合、`spawn` の `SpawnError` を返す
    /// （空きマスが無ければ `SpawnError::BoardFull`）。
    #[inline]
    pub fn new(n: usize, source: S) -> Result<Self, SpawnError> {
        let mut board = Self {
            cells: vec![Tile::MIN; n.saturating_mul(n)],
            lines: LineSet::new(n),
            n,
            score: Score::MIN,
            source,
        };

        for _ in 0..2_u8 {
            match board.spawn() {
                Ok(_index) => {}
                Err(err) => return Err(err),
            }
        }

        debug!(n, "board created");
        Ok(board)
    }

    /// 1手（全ラインの sift と、変化があればタイル1枚の追加）を適用する。
    ///
    /// 盤面が変わった場合は `true`。変わらなかった場合は盤面もスコアも変更せず `false`。
    ///
    /// # Errors
    ///
    /// 盤面が変わったのにタイルを置けなかった場合、`spawn` の `SpawnError` を返す
    /// （盤面が変わったなら空きマスが必ずあるので、`BoardFull` は起こらない）。
    #[inline]
    pub fn play(&mut self, direction: Direction) -> Result<bool, SpawnError> {
        let outcome = sift_all(&mut self.cells, self.lines.lines(direction));
        if !outcome.changed {
            trace!(?direction, "move had no effect");
            return Ok(false);
        }

        self.score = self.score.saturating_add(outcome.gained);
        debug!(?direction, gained = outcome.gained, score = self.score, "move applied");

        match self.spawn() {
            Ok(_index) => Ok(true),
            Err(err) => Err(err),
        }
    }

    /// 右へ動かす。
    ///
    /// # Errors
    ///
    /// `play` と同じ。
    #[inline]
    pub fn right(&mut self) -> Result<bool, SpawnError> {
        self.play(Direction::Right)
    }

    /// 累計スコアを返す。
    #[inline]
    #[must_use]
    pub const fn score(&self) -> Score {
        self.score
    }

    /// 一辺の長さを返す。
    #[inline]
    #[must_use]
    pub const fn side_len(&self) -> usize {
        self.n
    }

    /// タイル源を返す。
    #[inline]
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// ランダムな空きマスに新しいタイル（90% で 2、10% で 4）を置き、その添字を返す。
    ///
    /// # Errors
    ///
    /// 次の場合にエラーを返す（いずれも盤面は変更しない）：
    /// - `SpawnError::BoardFull`: 空きマスが無い場合
    /// - `SpawnError::CellOutOfRange`: タイル源が空きマスの数以上の順位を返した場合
    /// - `SpawnError::InvalidTile`: タイル源が 2 でも 4 でもない値を返した場合
    #[inline]
    pub fn spawn(&mut self) -> Result<usize, SpawnError> {
        let empty: Vec<usize> = self
            .cells
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value == Tile::MIN)
            .map(|(index, _)| index)
            .collect();
        if empty.is_empty() {
            warn!(score = self.score, "no empty cell left to spawn into");
            return Err(SpawnError::BoardFull);
        }

        let choice = self.source.pick_cell(empty.len());
        let index = match empty.get(choice) {
            Some(&value) => value,
            None => {
                return Err(SpawnError::CellOutOfRange {
                    choice,
                    empty: empty.len(),
                });
            }
        };
        let value = self.source.pick_value();
        if value != TILE_TWO && value != TILE_FOUR {
            return Err(SpawnError::InvalidTile { value });
        }

        if let Some(cell) = self.cells.get_mut(index) {
            *cell = value;
        }
        trace!(index, value, "tile spawned");
        Ok(index)
    }

    /// 現在のゲーム状態を返す。
    #[inline]
    #[must_use]
    pub fn status(&self) -> Status {
        if self.is_game_over() {
            return Status::GameOver {
                max_tile: self.max_tile(),
                score: self.score,
            };
        }

        Status::InProgress
    }

    /// 上へ動かす。
    ///
    /// # Errors
    ///
    /// `play` と同じ。
    #[inline]
    pub fn up(&mut self) -> Result<bool, SpawnError> {
        self.play(Direction::Up)
    }
}

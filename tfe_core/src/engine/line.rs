use crate::engine::types::{Direction, Score, Tile};

/// 1回の sift 中だけ使うマスの状態。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Slot {
    /// 空きマス。
    Empty,
    /// この sift で合成済みのタイル（これ以上合成も通過もできない）。
    Merged(Tile),
    /// 通常のタイル。
    Occupied(Tile),
}

impl Slot {
    /// セルの値から状態を作る。
    const fn from_tile(value: Tile) -> Self {
        if value == Tile::MIN {
            Self::Empty
        } else {
            Self::Occupied(value)
        }
    }

    /// 合成済みの印を外してセルの値に戻す。
    const fn into_tile(self) -> Tile {
        match self {
            Self::Empty => Tile::MIN,
            Self::Merged(value) | Self::Occupied(value) => value,
        }
    }
}

/// sift の結果。
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub struct SiftOutcome {
    /// いずれかのセルの値が変わったか。
    pub changed: bool,
    /// 合成で加算されるスコア。
    pub gained: Score,
    /// 合成の回数（タイル数はこの分だけ減る）。
    pub merges: usize,
}

impl SiftOutcome {
    /// 2つの結果をまとめる。
    #[inline]
    #[must_use]
    pub const fn combine(self, other: Self) -> Self {
        Self {
            changed: self.changed || other.changed,
            gained: self.gained.saturating_add(other.gained),
            merges: self.merges.saturating_add(other.merges),
        }
    }
}

/// 4方向それぞれのライン列（行優先のフラットな添字、壁側が先頭）。
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineSet {
    /// 下方向のライン（各列を下から上へ）。
    down: Vec<Vec<usize>>,
    /// 左方向のライン（各行を左から右へ）。
    left: Vec<Vec<usize>>,
    /// 右方向のライン（各行を右から左へ）。
    right: Vec<Vec<usize>>,
    /// 上方向のライン（各列を上から下へ）。
    up: Vec<Vec<usize>>,
}

impl LineSet {
    /// 指定方向のライン列を返す。
    #[inline]
    #[must_use]
    pub fn lines(&self, direction: Direction) -> &[Vec<usize>] {
        match direction {
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
            Direction::Up => &self.up,
        }
    }

    /// 一辺 `n` の盤面に対するライン列を生成する。
    #[inline]
    #[must_use]
    pub fn new(n: usize) -> Self {
        let cell_count = n.saturating_mul(n);

        let up: Vec<Vec<usize>> = (0..n)
            .map(|col| (col..cell_count).step_by(n.max(1)).collect())
            .collect();
        let left: Vec<Vec<usize>> = (0..n)
            .map(|row| {
                let start = row.saturating_mul(n);
                (start..start.saturating_add(n)).collect()
            })
            .collect();
        let down = reversed(&up);
        let right = reversed(&left);

        Self {
            down,
            left,
            right,
            up,
        }
    }
}

/// 各ラインの並びを逆にしたコピーを返す。
fn reversed(lines: &[Vec<usize>]) -> Vec<Vec<usize>> {
    lines
        .iter()
        .map(|line| line.iter().rev().copied().collect())
        .collect()
}

/// 1ライン分のタイルを先頭（壁）側へ寄せ、同じ値を1回だけ合成する。
///
/// `line` は `cells` の添字の列で、先頭が壁側。範囲外の添字は空きマスとして扱い、書き戻さない。
/// 合成されたタイルは同じ呼び出しの中で再び合成されず、後続のタイルはその手前で止まる。
#[inline]
pub fn sift(cells: &mut [Tile], line: &[usize]) -> SiftOutcome {
    let mut slots: Vec<Slot> = line
        .iter()
        .map(|&index| Slot::from_tile(cells.get(index).copied().unwrap_or(Tile::MIN)))
        .collect();
    let mut outcome = SiftOutcome::default();

    for from in 0..slots.len() {
        let value = match slots.get(from) {
            Some(&Slot::Occupied(value)) => value,
            _ => continue,
        };

        // 壁側へ向かって、空きを越えられるところまで進める。
        let mut to = from;
        let mut merged = false;
        while let Some(prev) = to.checked_sub(1) {
            match slots.get(prev) {
                Some(&Slot::Empty) => to = prev,
                Some(&Slot::Occupied(target)) if target == value => {
                    let doubled = value.saturating_add(value);
                    if let Some(slot) = slots.get_mut(prev) {
                        *slot = Slot::Merged(doubled);
                    }
                    outcome.gained = outcome.gained.saturating_add(doubled);
                    outcome.merges = outcome.merges.saturating_add(1);
                    merged = true;
                    break;
                }
                _ => break,
            }
        }

        if merged {
            if let Some(slot) = slots.get_mut(from) {
                *slot = Slot::Empty;
            }
            outcome.changed = true;
        } else if to != from {
            slots.swap(to, from);
            outcome.changed = true;
        }
    }

    for (&index, slot) in line.iter().zip(slots) {
        if let Some(cell) = cells.get_mut(index) {
            *cell = slot.into_tile();
        }
    }

    outcome
}

/// 全ラインに sift を適用する（途中で打ち切らない）。
#[inline]
pub fn sift_all(cells: &mut [Tile], lines: &[Vec<usize>]) -> SiftOutcome {
    lines
        .iter()
        .fold(SiftOutcome::default(), |acc, line| acc.combine(sift(cells, line)))
}

#[cfg(test)]
mod tests {
    use super::{LineSet, sift, sift_all};
    use crate::engine::types::{Direction, Tile};

    /// 添字 0..len を壁側からの1ラインとして sift する。
    fn sift_values(values: &[Tile]) -> (Vec<Tile>, bool, u64) {
        let mut cells = values.to_vec();
        let line: Vec<usize> = (0..cells.len()).collect();
        let outcome = sift(&mut cells, &line);
        (cells, outcome.changed, outcome.gained)
    }

    #[test]
    fn merges_leading_pair_and_slides_trailing_tile() {
        assert_eq!(sift_values(&[2, 2, 0, 2]), (vec![4, 2, 0, 0], true, 4));
    }

    #[test]
    fn blocked_line_is_unchanged() {
        assert_eq!(sift_values(&[2, 4, 8, 16]), (vec![2, 4, 8, 16], false, 0));
    }

    #[test]
    fn triple_does_not_chain_merge() {
        assert_eq!(sift_values(&[2, 2, 2, 0]), (vec![4, 2, 0, 0], true, 4));
    }

    #[test]
    fn two_pairs_merge_independently() {
        assert_eq!(sift_values(&[2, 2, 2, 2]), (vec![4, 4, 0, 0], true, 8));
    }

    #[test]
    fn merged_tile_does_not_absorb_equal_tile() {
        assert_eq!(sift_values(&[4, 4, 8, 0]), (vec![8, 8, 0, 0], true, 8));
    }

    #[test]
    fn tile_slides_across_several_empty_cells() {
        assert_eq!(sift_values(&[0, 0, 0, 2]), (vec![2, 0, 0, 0], true, 0));
    }

    #[test]
    fn tile_merges_after_sliding_through_gap() {
        assert_eq!(sift_values(&[2, 0, 0, 2]), (vec![4, 0, 0, 0], true, 4));
        assert_eq!(sift_values(&[0, 4, 0, 4]), (vec![8, 0, 0, 0], true, 8));
    }

    #[test]
    fn different_values_settle_next_to_each_other() {
        assert_eq!(sift_values(&[2, 0, 4, 0]), (vec![2, 4, 0, 0], true, 0));
    }

    #[test]
    fn empty_line_is_unchanged() {
        assert_eq!(sift_values(&[0, 0, 0, 0]), (vec![0, 0, 0, 0], false, 0));
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let mut cells = vec![2, 2];
        let outcome = sift(&mut cells, &[0, 1, 7]);
        assert_eq!(cells, vec![4, 0]);
        assert!(outcome.changed);
    }

    #[test]
    fn line_sets_start_at_the_wall() {
        let set = LineSet::new(3);
        assert_eq!(set.lines(Direction::Up), &[vec![0, 3, 6], vec![1, 4, 7], vec![2, 5, 8]]);
        assert_eq!(set.lines(Direction::Down), &[vec![6, 3, 0], vec![7, 4, 1], vec![8, 5, 2]]);
        assert_eq!(set.lines(Direction::Left), &[vec![0, 1, 2], vec![3, 4, 5], vec![6, 7, 8]]);
        assert_eq!(set.lines(Direction::Right), &[vec![2, 1, 0], vec![5, 4, 3], vec![8, 7, 6]]);
    }

    #[test]
    fn sift_all_processes_every_line() {
        let set = LineSet::new(2);
        // 1行目は動かないが、2行目は動く。
        let mut cells = vec![2, 4, 0, 8];
        let outcome = sift_all(&mut cells, set.lines(Direction::Left));
        assert_eq!(cells, vec![2, 4, 8, 0]);
        assert!(outcome.changed);
        assert_eq!(outcome.gained, 0);
        assert_eq!(outcome.merges, 0);
    }

    #[test]
    fn merges_are_counted_per_pair() {
        let mut cells = vec![2, 2, 2, 2, 4, 4, 8, 0];
        let line: Vec<usize> = (0..4).collect();
        let tail: Vec<usize> = (4..8).collect();

        let outcome = sift_all(&mut cells, &[line, tail]);
        assert_eq!(cells, vec![4, 4, 0, 0, 8, 8, 0, 0]);
        assert_eq!(outcome.merges, 3);
        assert_eq!(outcome.gained, 16);
    }
}

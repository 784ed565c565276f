use crate::engine::board::Board;
use crate::engine::spawn::TileSource;
use crate::engine::types::{Tile, tile_rank};
use core::fmt;
use core::fmt::Write as _;

/// タイルの段ごとの xterm-256 色（背景, 前景）。
pub const PALETTE: [(u8, u8); 32] = [
    (0, 15),
    (226, 0),
    (46, 0),
    (208, 15),
    (33, 15),
    (135, 15),
    (130, 15),
    (125, 15),
    (123, 0),
    (120, 0),
    (52, 15),
    (160, 15),
    (214, 0),
    (53, 15),
    (17, 15),
    (87, 0),
    (255, 0),
    (1, 0),
    (2, 0),
    (3, 0),
    (4, 0),
    (5, 0),
    (6, 0),
    (7, 0),
    (8, 0),
    (9, 0),
    (10, 0),
    (11, 0),
    (12, 0),
    (13, 0),
    (14, 0),
    (15, 0),
];

/// 既定のセル幅（文字数）。
pub const DEFAULT_CELL_WIDTH: usize = 7;

/// SGR の属性リセット。
const ANSI_RESET: &str = "\x1b[0m";

/// xterm-256 の基本16色。
const SYSTEM_COLORS: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

/// 6x6x6 カラーキューブの各段の輝度。
const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

/// 盤面の文字列整形の設定。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct RenderOptions {
    /// ANSI エスケープでセルに色を付けるか。
    pub ansi: bool,
    /// 1セルの幅（文字数）。
    pub cell_width: usize,
    /// 空きマスを空白で表示するか（`false` なら `0` を表示）。
    pub hide_zero: bool,
}

impl Default for RenderOptions {
    #[inline]
    fn default() -> Self {
        Self {
            ansi: false,
            cell_width: DEFAULT_CELL_WIDTH,
            hide_zero: true,
        }
    }
}

impl RenderOptions {
    /// `ansi` を切り替えた設定を返す。
    #[inline]
    #[must_use]
    pub const fn with_ansi(self, ansi: bool) -> Self {
        Self { ansi, ..self }
    }

    /// `cell_width` を変えた設定を返す。
    #[inline]
    #[must_use]
    pub const fn with_cell_width(self, cell_width: usize) -> Self {
        Self { cell_width, ..self }
    }

    /// `hide_zero` を切り替えた設定を返す。
    #[inline]
    #[must_use]
    pub const fn with_hide_zero(self, hide_zero: bool) -> Self {
        Self { hide_zero, ..self }
    }
}

/// タイル値に対応する `PALETTE` の添字を返す（末尾で頭打ち）。
#[inline]
#[must_use]
pub fn palette_index(value: Tile) -> usize {
    let rank = usize::try_from(tile_rank(value)).unwrap_or(usize::MAX);
    rank.min(PALETTE.len().saturating_sub(1))
}

/// タイル値に対応する xterm-256 色（背景, 前景）を返す。
#[inline]
#[must_use]
pub fn tile_colors(value: Tile) -> (u8, u8) {
    PALETTE.get(palette_index(value)).copied().unwrap_or((0, 15))
}

/// xterm-256 の色番号を RGB に変換する。
#[inline]
#[must_use]
pub fn xterm_rgb(index: u8) -> (u8, u8, u8) {
    if let Some(&rgb) = SYSTEM_COLORS.get(usize::from(index)) {
        return rgb;
    }

    if let Some(cube) = index.checked_sub(16).filter(|&cube| cube < 216) {
        let level = |step: u8| CUBE_LEVELS.get(usize::from(step % 6)).copied().unwrap_or(0);
        return (level(cube / 36), level(cube / 6), level(cube));
    }

    // 232..=255 のグレースケール。
    let grey = index.saturating_sub(232).saturating_mul(10).saturating_add(8);
    (grey, grey, grey)
}

/// 罫線の1行（`+-------+-------+` と改行）を追加する。
fn push_border(out: &mut String, n: usize, cell_width: usize) {
    out.push('+');
    for _ in 0..n {
        out.push_str(&"-".repeat(cell_width));
        out.push('+');
    }
    out.push('\n');
}

/// 1セル分の表示を追加する。
fn push_cell(out: &mut String, value: Tile, options: RenderOptions) {
    if options.ansi {
        let (background, foreground) = tile_colors(value);
        let _: fmt::Result = write!(out, "\x1b[48;5;{background}m\x1b[38;5;{foreground}m");
    }

    let width = options.cell_width;
    if options.hide_zero && value == Tile::MIN {
        out.push_str(&" ".repeat(width));
    } else {
        let _: fmt::Result = write!(out, "{value:>width$}");
    }

    if options.ansi {
        out.push_str(ANSI_RESET);
    }
}

impl<S: TileSource> Board<S> {
    /// 盤面を罫線付きの文字列に整形する。
    ///
    /// 罫線行とセル行が交互に並び、すべての行が改行で終わる。
    #[inline]
    #[must_use]
    pub fn render(&self, options: RenderOptions) -> String {
        let n = self.side_len();
        let mut out = String::new();

        push_border(&mut out, n, options.cell_width);
        for row in self.cells().chunks(n.max(1)) {
            out.push('|');
            for &value in row {
                push_cell(&mut out, value, options);
                out.push('|');
            }
            out.push('\n');
            push_border(&mut out, n, options.cell_width);
        }

        out
    }
}

impl<S: TileSource> fmt::Display for Board<S> {
    #[inline]
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.render(RenderOptions::default()))
    }
}

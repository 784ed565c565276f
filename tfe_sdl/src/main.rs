//! SDL で動作する最小 UI。

use clap::Parser;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color as SdlColor;
use sdl2::rect::Rect;
use std::time::Duration;
use tfe_core::engine::render::{tile_colors, xterm_rgb};
use tfe_core::{ai, engine};
use tracing::{debug, info};

/// 盤面のオフセット（左上）。
const OFFSET: i32 = 16;

/// 1マスのピクセルサイズ。
const CELL_SIZE: i32 = 96;

/// タイルの内側の余白（ピクセル）。
const INSET: i32 = 4;

/// 数字とタイル端の余白（ピクセル）。
const DIGIT_PAD: i32 = 8;

/// 数字1文字の最大幅（ピクセル）。
const DIGIT_MAX_WIDTH: i32 = 24;

/// 0..=9 の7セグメント表示（上, 右上, 右下, 下, 左下, 左上, 中央）。
const DIGIT_SEGMENTS: [[bool; 7]; 10] = [
    [true, true, true, true, true, true, false],
    [false, true, true, false, false, false, false],
    [true, true, false, true, true, false, true],
    [true, true, true, true, false, false, true],
    [false, true, true, false, false, true, true],
    [true, false, true, true, false, true, true],
    [true, false, true, true, true, true, true],
    [true, true, true, false, false, false, false],
    [true, true, true, true, true, true, true],
    [true, true, true, true, false, true, true],
];

/// 1フレームの待ち時間。
const FRAME: Duration = Duration::from_millis(16);

/// 2048 in an SDL window.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Allow using the arrow keys. Not recommended for cool people
    #[arg(long)]
    allow_arrows: bool,

    /// Play automatically, by trying to go left, up, right, down
    #[arg(long)]
    auto: bool,

    /// Number of game steps to do in between refreshing the screen
    #[arg(long, requires = "auto", default_value_t = 1000)]
    auto_chunk: u64,

    /// Maximum level of the JSON logs written to stderr
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    /// Board size
    #[arg(default_value_t = 4)]
    n: usize,

    /// Seed for tile placement (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug)]
enum Controller {
    Greedy(ai::greedy::Agent),
    Human,
}

#[derive(Debug)]
struct App {
    allow_arrows: bool,
    auto_chunk: u64,
    board: engine::Board<engine::StdTiles>,
    controller: Controller,
}

impl App {
    fn new(args: &Args) -> Result<Self, String> {
        let source = match args.seed {
            Some(seed) => engine::RandomTiles::seeded(seed),
            None => engine::RandomTiles::from_entropy(),
        };
        let board = engine::Board::new(args.n, source).map_err(|e| e.to_string())?;
        let controller = if args.auto {
            Controller::Greedy(ai::greedy::Agent::new())
        } else {
            Controller::Human
        };

        Ok(Self {
            allow_arrows: args.allow_arrows,
            auto_chunk: args.auto_chunk,
            board,
            controller,
        })
    }

    fn direction_for_key(&self, keycode: Keycode) -> Option<engine::Direction> {
        match keycode {
            Keycode::H => Some(engine::Direction::Left),
            Keycode::J => Some(engine::Direction::Down),
            Keycode::K => Some(engine::Direction::Up),
            Keycode::L => Some(engine::Direction::Right),
            Keycode::Left if self.allow_arrows => Some(engine::Direction::Left),
            Keycode::Down if self.allow_arrows => Some(engine::Direction::Down),
            Keycode::Up if self.allow_arrows => Some(engine::Direction::Up),
            Keycode::Right if self.allow_arrows => Some(engine::Direction::Right),
            _ => None,
        }
    }

    fn status_text(&self) -> String {
        match self.board.status() {
            engine::GameStatus::InProgress => format!("Score: {}", self.board.score()),
            engine::GameStatus::GameOver { score, .. } => format!("GAME OVER: {score}"),
            _ => format!("Score: {}", self.board.score()),
        }
    }

    fn step_ai_once(&mut self) -> Result<(), String> {
        let Controller::Greedy(agent) = &mut self.controller else {
            return Ok(());
        };
        if self.board.is_game_over() {
            return Ok(());
        }

        let summary =
            ai::autoplay::run(&mut self.board, agent, self.auto_chunk).map_err(|e| e.to_string())?;
        debug!(turns = summary.turns, score = summary.score, "auto chunk played");
        Ok(())
    }

    fn try_human_key(&mut self, keycode: Keycode) -> Result<bool, String> {
        if !matches!(self.controller, Controller::Human) || self.board.is_game_over() {
            return Ok(false);
        }

        let Some(direction) = self.direction_for_key(keycode) else {
            return Ok(false);
        };
        self.board.play(direction).map_err(|e| e.to_string())
    }
}

fn board_px(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(0).saturating_mul(CELL_SIZE)
}

/// タイル値を7セグメントの数字として `tile` の中央に描くための矩形を返す（空きなら空）。
fn digit_rects(value: u64, tile: Rect) -> Vec<Rect> {
    if value == 0 {
        return Vec::new();
    }

    let digits: Vec<usize> = value
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .filter_map(|d| usize::try_from(d).ok())
        .collect();
    let count = i32::try_from(digits.len()).unwrap_or(1).max(1);

    let width = tile.width() as i32;
    let height = tile.height() as i32;
    let avail = (width - DIGIT_PAD * 2).max(count);
    let cell_w = avail / count;
    let glyph_w = (cell_w * 3 / 4).clamp(1, DIGIT_MAX_WIDTH);
    let glyph_h = (glyph_w * 2).min(height - DIGIT_PAD * 2).max(2);
    let thick = (glyph_w / 6).max(2);
    let half = glyph_h / 2;

    let start_x = tile.x() + DIGIT_PAD + (avail - cell_w * count) / 2;
    let gy = tile.y() + (height - glyph_h) / 2;

    let mut rects = Vec::new();
    for (slot, digit) in (0_i32..).zip(digits) {
        let gx = start_x + slot * cell_w + (cell_w - glyph_w) / 2;
        let right = gx + glyph_w - thick;
        let segments = [
            (gx, gy, glyph_w, thick),
            (right, gy, thick, half),
            (right, gy + half, thick, glyph_h - half),
            (gx, gy + glyph_h - thick, glyph_w, thick),
            (gx, gy + half, thick, glyph_h - half),
            (gx, gy, thick, half),
            (gx, gy + half - thick / 2, glyph_w, thick),
        ];
        let Some(lit) = DIGIT_SEGMENTS.get(digit) else {
            continue;
        };
        for (&on, &(x, y, w, h)) in lit.iter().zip(segments.iter()) {
            if on {
                rects.push(Rect::new(x, y, w.max(1) as u32, h.max(1) as u32));
            }
        }
    }
    rects
}

fn draw_board(canvas: &mut sdl2::render::Canvas<sdl2::video::Window>, app: &App) {
    let n = app.board.side_len();

    canvas.set_draw_color(SdlColor::RGB(187, 173, 160));
    canvas.clear();

    for (index, &value) in app.board.cells().iter().enumerate() {
        let (row, col) = match (index.checked_div(n), index.checked_rem(n)) {
            (Some(row), Some(col)) => (row, col),
            _ => continue,
        };
        let xx = OFFSET + board_px(col);
        let yy = OFFSET + board_px(row);
        let rect = Rect::new(
            xx + INSET,
            yy + INSET,
            (CELL_SIZE - INSET * 2) as u32,
            (CELL_SIZE - INSET * 2) as u32,
        );

        // タイル。
        let (background, foreground) = tile_colors(value);
        let (r, g, b) = xterm_rgb(background);
        canvas.set_draw_color(SdlColor::RGB(r, g, b));
        let _: Result<(), String> = canvas.fill_rect(rect);

        // 数字は前景色で描く。
        let (r, g, b) = xterm_rgb(foreground);
        canvas.set_draw_color(SdlColor::RGB(r, g, b));
        let _: Result<(), String> = canvas.fill_rects(&digit_rects(value, rect));
    }
}

fn main() -> Result<(), String> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .json()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    let mut app = App::new(&args)?;
    info!(n = args.n, auto = args.auto, seed = ?args.seed, "game started");

    let window_px = u32::try_from(OFFSET + board_px(args.n) + OFFSET).map_err(|e| e.to_string())?;

    let sdl = sdl2::init()?;
    let video = sdl.video()?;

    let window = video
        .window("tfe (2048)", window_px, window_px)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;

    let mut canvas = window
        .into_canvas()
        .present_vsync()
        .accelerated()
        .build()
        .map_err(|e| e.to_string())?;

    let mut event_pump = sdl.event_pump()?;

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape | Keycode::Q),
                    ..
                } => break 'running,
                Event::KeyDown {
                    keycode: Some(keycode),
                    ..
                } => {
                    let moved = app.try_human_key(keycode)?;
                    debug!(?keycode, moved, "key pressed");
                }
                _ => {}
            }
        }

        app.step_ai_once()?;

        let title = app.status_text();
        let _: Result<(), std::ffi::NulError> = canvas.window_mut().set_title(&title);
        draw_board(&mut canvas, &app);
        canvas.present();

        std::thread::sleep(FRAME);
    }

    info!(score = app.board.score(), max_tile = app.board.max_tile(), "game ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{App, Args, CELL_SIZE, digit_rects};
    use clap::Parser as _;
    use sdl2::rect::Rect;

    fn tile() -> Rect {
        Rect::new(10, 20, CELL_SIZE as u32, CELL_SIZE as u32)
    }

    #[test]
    fn empty_tile_has_no_digits() {
        assert!(digit_rects(0, tile()).is_empty());
    }

    #[test]
    fn digits_light_their_segments() {
        assert_eq!(digit_rects(8, tile()).len(), 7);
        assert_eq!(digit_rects(2, tile()).len(), 5);
        // 2, 0, 4, 8 は 5 + 6 + 4 + 7 セグメント。
        assert_eq!(digit_rects(2048, tile()).len(), 22);
    }

    #[test]
    fn digits_stay_inside_the_tile() {
        let bounds = tile();
        for value in [2_u64, 64, 1024, 131_072] {
            for rect in digit_rects(value, bounds) {
                assert!(bounds.contains_rect(rect), "value={value} rect={rect:?}");
            }
        }
    }

    #[test]
    fn title_shows_score_only() {
        let parsed = Args::try_parse_from(["tfe_sdl", "--seed", "1"]);
        let args = match parsed {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        };
        let app = match App::new(&args) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        };
        assert_eq!(app.status_text(), "Score: 0");
    }
}

//! 1行ずつコマンドを読む端末 UI（`h`/`j`/`k`/`l` で移動、`q` で終了）。

use anyhow::{Context as _, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use tfe_core::engine::spawn::TileSource;
use tfe_core::{ai, engine};
use tracing::{debug, info};

/// 自動プレイで盤面を表示する間隔（手数）の既定値。
const DEFAULT_AUTO_CHUNK: u64 = 1000;

/// Simple shell-like interface to a 2048 board.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Play automatically, by trying to go left, up, right, down
    #[arg(long)]
    auto: bool,

    /// Number of game steps to do in between printing the board
    #[arg(long, requires = "auto")]
    auto_chunk: Option<u64>,

    /// Maximum level of the JSON logs written to stderr
    #[arg(long, default_value = "warn")]
    log_level: tracing::Level,

    /// Board size
    #[arg(default_value_t = 4)]
    n: usize,

    /// Don't use ansi codes to colour squares
    #[arg(long)]
    no_ansi: bool,

    /// Seed for tile placement (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,
}

/// 1行の入力を解釈した結果。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Command {
    /// 方向キー。
    Move(engine::Direction),
    /// 終了。
    Quit,
}

/// 入力行をコマンドに変換する。
fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim().to_uppercase();
    let mut chars = trimmed.chars();
    let (Some(key), None) = (chars.next(), chars.next()) else {
        return None;
    };

    if key == 'Q' {
        return Some(Command::Quit);
    }
    engine::Direction::from_vi_key(key).map(Command::Move)
}

/// スコアと盤面を書き出す。
fn print_board<S: TileSource, W: Write>(
    out: &mut W,
    board: &engine::Board<S>,
    options: engine::RenderOptions,
) -> Result<()> {
    writeln!(out, "Score: {}", board.score())?;
    write!(out, "{}", board.render(options))?;
    Ok(())
}

/// 終局表示を書き出す。
fn print_game_over<S: TileSource, W: Write>(
    out: &mut W,
    board: &engine::Board<S>,
    options: engine::RenderOptions,
) -> Result<()> {
    writeln!(out, "GAME OVER: {}", board.score())?;
    write!(out, "{}", board.render(options))?;
    Ok(())
}

/// 入力が尽きるか、`q` か、終局まで対話的に遊ぶ。
fn play_interactive<S: TileSource, R: BufRead, W: Write>(
    board: &mut engine::Board<S>,
    input: R,
    out: &mut W,
    options: engine::RenderOptions,
) -> Result<()> {
    let mut lines = input.lines();

    loop {
        if board.is_game_over() {
            return print_game_over(out, board, options);
        }

        print_board(out, board, options)?;
        out.flush()?;

        let Some(line) = lines.next() else {
            debug!("input closed");
            return Ok(());
        };
        let line = line.context("failed to read a move")?;

        match parse_command(&line) {
            Some(Command::Move(direction)) => {
                let moved = board.play(direction)?;
                debug!(?direction, moved, "move requested");
            }
            Some(Command::Quit) => return Ok(()),
            None => writeln!(out, "invalid move: {:?}", line.trim().to_uppercase())?,
        }
    }
}

/// 貪欲AIで終局まで進め、`chunk` 手ごとに盤面を表示する。
fn play_auto<S: TileSource, W: Write>(
    board: &mut engine::Board<S>,
    chunk: u64,
    out: &mut W,
    options: engine::RenderOptions,
) -> Result<()> {
    let mut agent = ai::greedy::Agent::new();

    loop {
        let summary = ai::autoplay::run(board, &mut agent, chunk.max(1))?;
        if summary.finished {
            break;
        }
        print_board(out, board, options)?;
    }

    print_game_over(out, board, options)
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .json()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    let source = match args.seed {
        Some(seed) => engine::RandomTiles::seeded(seed),
        None => engine::RandomTiles::from_entropy(),
    };
    let mut board = engine::Board::new(args.n, source)
        .with_context(|| format!("cannot start a game on a {0}x{0} board", args.n))?;
    info!(n = args.n, auto = args.auto, seed = ?args.seed, "game started");

    let options = engine::RenderOptions::default().with_ansi(!args.no_ansi);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.auto {
        let chunk = args.auto_chunk.unwrap_or(DEFAULT_AUTO_CHUNK);
        play_auto(&mut board, chunk, &mut out, options)?;
    } else {
        play_interactive(&mut board, io::stdin().lock(), &mut out, options)?;
    }

    info!(score = board.score(), max_tile = board.max_tile(), "game ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Args, Command, parse_command, play_auto, play_interactive};
    use clap::Parser as _;
    use std::io::Cursor;
    use tfe_core::engine;

    fn fixture(cells: Vec<u64>) -> engine::Board<engine::ScriptedTiles> {
        match engine::Board::from_cells(2, cells, engine::ScriptedTiles::default()) {
            Ok(board) => board,
            Err(err) => panic!("{err}"),
        }
    }

    #[test]
    fn commands_are_case_insensitive() {
        assert_eq!(parse_command("h\n"), Some(Command::Move(engine::Direction::Left)));
        assert_eq!(parse_command(" L "), Some(Command::Move(engine::Direction::Right)));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("hj"), None);
        assert_eq!(parse_command(""), None);
    }

    #[test]
    fn interactive_session_moves_and_reports_invalid_input() {
        let mut board = fixture(vec![0, 2, 0, 0]);
        let mut out = Vec::new();

        let result = play_interactive(
            &mut board,
            Cursor::new("h\nxy\nq\n"),
            &mut out,
            engine::RenderOptions::default(),
        );
        assert!(result.is_ok(), "{result:?}");

        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("invalid move: \"XY\""), "{text}");
        assert_eq!(text.matches("Score: 0").count(), 3, "{text}");
        // 左へ動いた 2 と、空きの先頭に置かれた新しい 2。
        assert_eq!(board.cells(), &[2, 2, 0, 0]);
    }

    #[test]
    fn interactive_session_ends_on_game_over() {
        let mut board = fixture(vec![2, 4, 8, 16]);
        let mut out = Vec::new();

        let result = play_interactive(&mut board, Cursor::new(""), &mut out, engine::RenderOptions::default());
        assert!(result.is_ok(), "{result:?}");
        assert!(String::from_utf8_lossy(&out).starts_with("GAME OVER: 0\n"));
    }

    #[test]
    fn auto_play_runs_to_the_end() {
        let mut board = match engine::Board::new(3, engine::RandomTiles::seeded(5)) {
            Ok(board) => board,
            Err(err) => panic!("{err}"),
        };
        let mut out = Vec::new();

        let result = play_auto(&mut board, 10, &mut out, engine::RenderOptions::default());
        assert!(result.is_ok(), "{result:?}");
        assert!(board.is_game_over());
        assert!(String::from_utf8_lossy(&out).contains("GAME OVER"));
    }

    #[test]
    fn auto_chunk_requires_auto() {
        assert!(Args::try_parse_from(["tfe_shell", "--auto-chunk", "5"]).is_err());

        let parsed = Args::try_parse_from(["tfe_shell", "--auto", "--auto-chunk", "5", "6"]);
        let args = match parsed {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        };
        assert_eq!(args.auto_chunk, Some(5));
        assert_eq!(args.n, 6);
        assert!(!args.no_ansi);
    }
}

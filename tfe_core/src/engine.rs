/// 盤面（セル・スコア・タイル生成）の実装。
pub mod board;
/// ライン（行/列）の列挙と、1ライン分のスライド/合成処理。
pub mod line;
/// 盤面の文字列整形とカラーパレット。
pub mod render;
/// タイル生成に使う乱数源。
pub mod spawn;
pub mod types;

pub type Board<S> = board::Board<S>;
pub type Direction = types::Direction;
pub type GameStatus = board::Status;
pub type LayoutError = board::LayoutError;
pub type RandomTiles<R> = spawn::RandomTiles<R>;
pub type RenderOptions = render::RenderOptions;
pub type ScriptedTiles = spawn::ScriptedTiles;
pub type SpawnError = spawn::SpawnError;
/// `StdRng` を使う標準のタイル源。
pub type StdTiles = spawn::RandomTiles<rand::rngs::StdRng>;
pub type Tile = types::Tile;
pub type Score = types::Score;

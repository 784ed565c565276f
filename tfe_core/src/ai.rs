/// 自動プレイのループ。
pub mod autoplay;
/// 固定の優先順で最初に動ける方向を選ぶAI。
pub mod greedy;
pub mod types;

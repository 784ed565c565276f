//! 2048 (sliding-tile puzzle) core logic.
//!
//! このクレートは盤面と手の適用を管理する `engine` と、自動プレイ用の手を選ぶ `ai` を提供します。
//! UI（`tfe_shell` / `tfe_sdl`）から利用されることを想定しています。

#![forbid(unsafe_code)]

/// 盤面・スライド/合成・タイル生成を提供するモジュール。
pub mod engine;

/// 自動プレイ（手選択と連続実行）を提供するモジュール。
pub mod ai;

//! Storefront Account Common Library
//!
//! 共通データモデル、エラー型、設定ヘルパーを提供

#![warn(missing_docs)]

/// 認証・アカウントのデータモデル
pub mod auth;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// エラー型定義
pub mod error;

//! 認証・認可機能
//!
//! トークンの発行・検証・ローテーション、パスワード検証、
//! ロールゲート、HTTPミドルウェア

/// 初回起動時の管理者アカウント作成
pub mod bootstrap;

/// ロールゲート（特権操作の認可）
pub mod gate;

/// 認証ミドルウェア
pub mod middleware;

/// パスワードハッシュ化と検証
pub mod password;

/// セッション継続（トークンローテーション）
pub mod rotation;

/// アカウント認証サービス
pub mod service;

/// トークン発行・検証
pub mod token;

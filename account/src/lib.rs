//! Storefront Account Service
//!
//! 認証・認可コア：資格情報の検証、ベアラートークンの発行・検証・
//! 透過的ローテーション、ロールによる特権操作のゲート

#![warn(missing_docs)]

/// REST APIハンドラー
pub mod api;

/// 認証・認可機能
pub mod auth;

/// アカウントディレクトリ抽象（外部コラボレーター）
pub mod directory;

/// ロギング初期化ユーティリティ
pub mod logging;

/// トークン署名鍵管理
pub mod secret;

use crate::auth::rotation::TokenRotator;
use crate::auth::service::AccountAuthService;
use crate::auth::token::{TokenIssuer, TokenValidator};
use crate::directory::AccountDirectory;
use std::sync::Arc;

/// アプリケーション状態
#[derive(Clone)]
pub struct AppState {
    /// アカウント認証サービス（ログイン、登録、アカウント操作）
    pub service: AccountAuthService,
    /// セッション継続（トークンローテーション）
    pub rotator: TokenRotator,
    /// トークン検証器
    pub validator: TokenValidator,
}

impl AppState {
    /// 署名鍵とディレクトリからアプリケーション状態を組み立てる
    ///
    /// 署名鍵はプロセス起動時に一度だけ解決され、以後はここで構築した
    /// 発行器/検証器に閉じる（グローバル変数にはしない）。
    pub fn new(
        directory: Arc<dyn AccountDirectory>,
        token_secret: &str,
        rotate_refresh: bool,
    ) -> Self {
        let issuer = TokenIssuer::new(token_secret);
        let validator = TokenValidator::new(token_secret);
        let rotator = TokenRotator::new(issuer.clone(), validator.clone(), rotate_refresh);
        let service = AccountAuthService::new(directory, issuer);

        AppState {
            service,
            rotator,
            validator,
        }
    }
}

//! セッション継続（トークンローテーション）
//!
//! アクセストークンとリフレッシュトークンのペアを受け取り、
//! そのまま通す / 期限切れアクセストークンを透過的に再発行する /
//! セッションを拒否する、のいずれかを決定する状態機械。

use crate::auth::token::{TokenIssuer, TokenValidator};
use storefront_common::auth::Claims;
use storefront_common::error::{AccountError, AccountResult, TokenError};

/// セッション継続の結果
///
/// `renewed` がtrueの場合、呼び出し側はレスポンスで新しいトークンを
/// クライアントへ返却しなければならない。
#[derive(Debug, Clone)]
pub struct Session {
    /// アクセストークン（再発行されていれば新しいもの）
    pub access_token: String,
    /// リフレッシュトークン（ローテーション有効時は新しいもの）
    pub refresh_token: String,
    /// 検証済みClaims
    pub claims: Claims,
    /// トークンが再発行されたか
    pub renewed: bool,
}

/// トークンローテーター
#[derive(Clone)]
pub struct TokenRotator {
    issuer: TokenIssuer,
    validator: TokenValidator,
    /// 再発行時にリフレッシュトークンも更新するか（ポリシーノブ）
    rotate_refresh: bool,
}

impl TokenRotator {
    /// 発行器・検証器からローテーターを生成
    pub fn new(issuer: TokenIssuer, validator: TokenValidator, rotate_refresh: bool) -> Self {
        TokenRotator {
            issuer,
            validator,
            rotate_refresh,
        }
    }

    /// セッションを継続する
    ///
    /// 1. リフレッシュトークンを先に検証する。完全に有効でなければ
    ///    `RefreshInvalid` で即時終了（呼び出し側は再ログインが必要）。
    ///    セッション継続可否の権威はリフレッシュトークンにある。
    /// 2. アクセストークンを検証する。
    ///    - 有効 → 両トークンを無変更で返す（TTL内は冪等）
    ///    - `Expired` のみ → **リフレッシュトークンの**Claimsから
    ///      アクセストークンを再発行する。再発行セッションの身元と
    ///      ロールはリフレッシュトークンが証明するものに束縛される。
    ///    - それ以外（署名不正・構造不正）→ そのエラーを返す。
    ///      壊れた/偽造されたアクセストークンをローテーションで
    ///      「修復」してはならない。
    ///
    /// # Arguments
    /// * `access` - アクセストークン
    /// * `refresh` - リフレッシュトークン
    ///
    /// # Returns
    /// * `Ok(Session)` - 継続が認められたセッション
    /// * `Err(AccountError)` - 拒否理由（リトライ不可）
    pub fn continue_session(&self, access: &str, refresh: &str) -> AccountResult<Session> {
        let refresh_claims = self
            .validator
            .validate(refresh)
            .map_err(|_| AccountError::RefreshInvalid)?;

        match self.validator.validate(access) {
            Ok(claims) => Ok(Session {
                access_token: access.to_string(),
                refresh_token: refresh.to_string(),
                claims,
                renewed: false,
            }),
            Err(TokenError::Expired) => {
                tracing::debug!(sub = %refresh_claims.sub, "Access token expired, rotating");

                let new_access = self
                    .issuer
                    .mint_access(&refresh_claims.sub, refresh_claims.role)?;
                let new_refresh = if self.rotate_refresh {
                    self.issuer
                        .mint_refresh(&refresh_claims.sub, refresh_claims.role)?
                } else {
                    refresh.to_string()
                };

                // 返すClaimsは新しいアクセストークンのものと厳密に一致させる
                let claims = self.validator.validate(&new_access)?;

                Ok(Session {
                    access_token: new_access,
                    refresh_token: new_refresh,
                    claims,
                    renewed: true,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

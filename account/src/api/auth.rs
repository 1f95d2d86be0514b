//! 認証API
//!
//! ログイン、登録、トークンリフレッシュ、セッション確認

use crate::api::accounts::AccountResponse;
use crate::api::error_response;
use crate::AppState;
use axum::{extract::State, http::StatusCode, response::Response, Extension, Json};
use serde::{Deserialize, Serialize};
use storefront_common::auth::{Claims, Role};

/// ログインリクエスト
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// メールアドレス
    pub email: String,
    /// 平文パスワード
    pub password: String,
}

/// ログインレスポンス
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// 認証されたアカウント（パスワードハッシュ除外）
    pub account: AccountResponse,
    /// アクセストークン（TTL 15分）
    pub access_token: String,
    /// リフレッシュトークン（TTL 7日）
    pub refresh_token: String,
}

/// アカウント登録リクエスト
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// 名
    pub first_name: String,
    /// 姓
    pub last_name: String,
    /// メールアドレス
    pub email: String,
    /// 平文パスワード
    pub password: String,
}

/// トークンリフレッシュリクエスト
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    /// アクセストークン（期限切れ可）
    pub access_token: String,
    /// リフレッシュトークン
    pub refresh_token: String,
}

/// トークンリフレッシュレスポンス
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// アクセストークン（必要に応じて再発行済み）
    pub access_token: String,
    /// リフレッシュトークン
    pub refresh_token: String,
    /// 再発行が行われたか
    pub renewed: bool,
}

/// セッション確認レスポンス
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// アカウントID
    pub sub: String,
    /// ロール
    pub role: Role,
    /// 有効期限（Unix timestamp）
    pub exp: usize,
}

/// POST /api/auth/login - ログイン
///
/// # Returns
/// * `200 OK` - アカウントと新規トークンペア
/// * `401 Unauthorized` - 認証失敗（不存在と不一致は区別しない）
/// * `503 Service Unavailable` - ディレクトリ障害
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, Response> {
    let outcome = state
        .service
        .login(&request.email, &request.password)
        .await
        .map_err(error_response)?;

    Ok(Json(LoginResponse {
        account: AccountResponse::from(outcome.account),
        access_token: outcome.access_token,
        refresh_token: outcome.refresh_token,
    }))
}

/// POST /api/auth/register - アカウント登録
///
/// # Returns
/// * `201 Created` - 作成されたアカウント
/// * `409 Conflict` - メールアドレス重複
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), Response> {
    let account = state
        .service
        .create_account(
            &request.first_name,
            &request.last_name,
            &request.email,
            &request.password,
        )
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(account))))
}

/// POST /api/auth/refresh - セッション継続
///
/// 期限切れアクセストークンを有効なリフレッシュトークンで透過的に
/// 再発行する。リフレッシュトークン自体が無効なら401（再ログイン必須）。
pub async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, Response> {
    let session = state
        .rotator
        .continue_session(&request.access_token, &request.refresh_token)
        .map_err(error_response)?;

    Ok(Json(RefreshResponse {
        access_token: session.access_token,
        refresh_token: session.refresh_token,
        renewed: session.renewed,
    }))
}

/// GET /api/auth/me - セッション確認
///
/// ミドルウェアで注入された検証済みClaimsをそのまま返す。
pub async fn me(Extension(claims): Extension<Claims>) -> Json<MeResponse> {
    Json(MeResponse {
        sub: claims.sub,
        role: claims.role,
        exp: claims.exp,
    })
}

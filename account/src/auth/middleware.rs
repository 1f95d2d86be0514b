//! 認証ミドルウェア
//!
//! Authorizationヘッダーから "Bearer {token}" を抽出して検証し、
//! 検証済みClaimsをrequestに注入する。リフレッシュトークンが
//! 提示されていればセッション継続（透過的ローテーション）を行い、
//! 再発行されたトークンをレスポンスヘッダーで呼び出し側へ返す。

use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use storefront_common::error::AccountError;

/// 再発行されたアクセストークンを返すレスポンスヘッダー
pub const ACCESS_TOKEN_HEADER: &str = "x-access-token";

/// リフレッシュトークンの要求/応答ヘッダー
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

/// セッション認証ミドルウェア
///
/// # Arguments
/// * `State(state)` - アプリケーション状態（検証器・ローテーター）
/// * `request` - HTTPリクエスト
/// * `next` - 次のミドルウェア/ハンドラー
///
/// # Returns
/// * `Ok(Response)` - 認証成功。requestにClaimsを追加し、ローテーション
///   が起きた場合はレスポンスに新トークンのヘッダーを付与する
/// * `Err(Response)` - 認証失敗、401 Unauthorized
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            )
                .into_response()
        })?;

    let access_token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            "Invalid Authorization header format".to_string(),
        )
            .into_response()
    })?;

    let refresh_token = request
        .headers()
        .get(REFRESH_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let (claims, rotated) = match refresh_token {
        // リフレッシュトークン付き: セッション継続（期限切れアクセス
        // トークンは透過的に再発行される）
        Some(refresh) => {
            let session = state
                .rotator
                .continue_session(access_token, &refresh)
                .map_err(|e| {
                    tracing::warn!("Session continuation failed: {}", e);
                    unauthorized_response(&e)
                })?;
            let rotated = session
                .renewed
                .then(|| (session.access_token.clone(), session.refresh_token.clone()));
            (session.claims, rotated)
        }
        // アクセストークン単体: 検証のみ
        None => {
            let claims = state.validator.validate(access_token).map_err(|e| {
                tracing::warn!("Token verification failed: {}", e);
                (StatusCode::UNAUTHORIZED, format!("Invalid token: {}", e)).into_response()
            })?;
            (claims, None)
        }
    };

    request.extensions_mut().insert(claims);

    let mut response = next.run(request).await;

    // 再発行されたトークンを呼び出し側へ返却し、手元の資格情報を
    // 最新に保たせる
    if let Some((access, refresh)) = rotated {
        if let (Ok(access), Ok(refresh)) = (
            HeaderValue::from_str(&access),
            HeaderValue::from_str(&refresh),
        ) {
            let headers = response.headers_mut();
            headers.insert(ACCESS_TOKEN_HEADER, access);
            headers.insert(REFRESH_TOKEN_HEADER, refresh);
        }
    }

    Ok(response)
}

fn unauthorized_response(err: &AccountError) -> Response {
    let message = match err {
        AccountError::RefreshInvalid => "Session expired, please log in again".to_string(),
        other => format!("Invalid token: {}", other),
    };
    (StatusCode::UNAUTHORIZED, message).into_response()
}

//! REST APIハンドラー
//!
//! 認証エンドポイントとアカウント管理エンドポイント

pub mod accounts;
pub mod auth;

use crate::AppState;
use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use storefront_common::error::AccountError;

/// APIルーターを作成
pub fn create_router(state: AppState) -> Router {
    // セッション認証が必要な保護されたルート
    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/accounts", get(accounts::list_accounts))
        .route("/api/accounts/:id", get(accounts::get_account))
        .route("/api/accounts/:id/role", put(accounts::set_account_role))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::auth::middleware::session_middleware,
        ));

    Router::new()
        // 認証エンドポイント（認証不要）
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/refresh", post(auth::refresh))
        // 保護されたルート
        .merge(protected_routes)
        .with_state(state)
}

/// サービスエラーをHTTPレスポンスへ変換する
///
/// 失敗はすべて型付きのまま境界まで運ばれ、ここで初めてステータス
/// コードに落ちる。`RefreshInvalid` のみが再ログインを要求する。
pub(crate) fn error_response(err: AccountError) -> Response {
    let status = match &err {
        AccountError::InvalidCredentials
        | AccountError::RefreshInvalid
        | AccountError::Token(_) => StatusCode::UNAUTHORIZED,
        AccountError::Unauthorized => StatusCode::FORBIDDEN,
        AccountError::NotFound => StatusCode::NOT_FOUND,
        AccountError::EmailTaken => StatusCode::CONFLICT,
        AccountError::DirectoryUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        AccountError::PasswordHash(_) | AccountError::Signing(_) | AccountError::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Internal error: {}", err);
        return (status, "Internal server error".to_string()).into_response();
    }

    (status, err.to_string()).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::middleware::{ACCESS_TOKEN_HEADER, REFRESH_TOKEN_HEADER};
    use crate::auth::password::hash_password;
    use crate::auth::token::TokenIssuer;
    use crate::directory::{AccountDirectory, MemoryDirectory};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use chrono::{Duration, Utc};
    use std::sync::Arc;
    use storefront_common::auth::{Account, Role};
    use tower::Service;

    const SECRET: &str = "api-test-secret";

    async fn test_state() -> (AppState, Arc<MemoryDirectory>) {
        let directory = Arc::new(MemoryDirectory::new());
        directory
            .put(Account {
                id: "admin-1".to_string(),
                first_name: "Root".to_string(),
                last_name: "Admin".to_string(),
                email: "admin@example.com".to_string(),
                password_hash: hash_password("admin-secret").unwrap(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        directory
            .put(Account {
                id: "user-1".to_string(),
                first_name: "Taro".to_string(),
                last_name: "Yamada".to_string(),
                email: "taro@example.com".to_string(),
                password_hash: hash_password("secret123").unwrap(),
                role: Role::User,
            })
            .await
            .unwrap();

        let state = AppState::new(directory.clone(), SECRET, true);
        (state, directory)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_login_then_me() {
        let (state, _) = test_state().await;
        let mut router = create_router(state);

        let response = router
            .call(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({"email": "taro@example.com", "password": "secret123"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let login = body_json(response).await;
        assert_eq!(login["account"]["role"], "user");
        assert!(login["account"]["password_hash"].is_null());
        let access_token = login["access_token"].as_str().unwrap().to_string();

        let response = router
            .call(
                Request::builder()
                    .uri("/api/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", access_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let me = body_json(response).await;
        assert_eq!(me["sub"], "user-1");
        assert_eq!(me["role"], "user");
    }

    #[tokio::test]
    async fn test_login_failures_are_identical() {
        let (state, _) = test_state().await;
        let mut router = create_router(state);

        let wrong_password = router
            .call(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({"email": "taro@example.com", "password": "wrong"}),
            ))
            .await
            .unwrap();
        let unknown_email = router
            .call(json_request(
                "POST",
                "/api/auth/login",
                serde_json::json!({"email": "nobody@x.com", "password": "secret123"}),
            ))
            .await
            .unwrap();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

        let body1 = to_bytes(wrong_password.into_body(), 1024).await.unwrap();
        let body2 = to_bytes(unknown_email.into_body(), 1024).await.unwrap();
        assert_eq!(body1, body2);
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let (state, _) = test_state().await;
        let mut router = create_router(state);

        let response = router
            .call(
                Request::builder()
                    .uri("/api/auth/me")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_accounts_is_admin_gated() {
        let (state, _) = test_state().await;
        let issuer = TokenIssuer::new(SECRET);
        let mut router = create_router(state);

        let user_token = issuer.mint_access("user-1", Role::User).unwrap();
        let response = router
            .call(
                Request::builder()
                    .uri("/api/accounts")
                    .header(header::AUTHORIZATION, format!("Bearer {}", user_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let admin_token = issuer.mint_access("admin-1", Role::Admin).unwrap();
        let response = router
            .call(
                Request::builder()
                    .uri("/api/accounts")
                    .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let listed = body_json(response).await;
        assert_eq!(listed["accounts"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_expired_access_is_rotated_via_headers() {
        let (state, _) = test_state().await;
        let issuer = TokenIssuer::new(SECRET);
        let mut router = create_router(state);

        // 期限切れアクセストークン + 有効なリフレッシュトークン
        let minted_at = Utc::now() - Duration::minutes(16);
        let access = issuer
            .mint_access_at("user-1", Role::User, minted_at)
            .unwrap();
        let refresh = issuer
            .mint_refresh_at("user-1", Role::User, minted_at)
            .unwrap();

        let response = router
            .call(
                Request::builder()
                    .uri("/api/auth/me")
                    .header(header::AUTHORIZATION, format!("Bearer {}", access))
                    .header(REFRESH_TOKEN_HEADER, &refresh)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // 透過的に再発行され、新トークンがレスポンスヘッダーに載る
        assert_eq!(response.status(), StatusCode::OK);
        let new_access = response.headers().get(ACCESS_TOKEN_HEADER).unwrap();
        assert_ne!(new_access.to_str().unwrap(), access);
        assert!(response.headers().contains_key(REFRESH_TOKEN_HEADER));
    }

    #[tokio::test]
    async fn test_expired_refresh_forces_relogin() {
        let (state, _) = test_state().await;
        let issuer = TokenIssuer::new(SECRET);
        let mut router = create_router(state);

        let old = Utc::now() - Duration::days(8);
        let access = issuer.mint_access_at("user-1", Role::User, old).unwrap();
        let refresh = issuer.mint_refresh_at("user-1", Role::User, old).unwrap();

        let response = router
            .call(json_request(
                "POST",
                "/api/auth/refresh",
                serde_json::json!({"access_token": access, "refresh_token": refresh}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_register_and_duplicate_conflict() {
        let (state, _) = test_state().await;
        let mut router = create_router(state);

        let body = serde_json::json!({
            "first_name": "Hanako",
            "last_name": "Sato",
            "email": "hanako@example.com",
            "password": "new-secret"
        });

        let response = router
            .call(json_request("POST", "/api/auth/register", body.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = body_json(response).await;
        assert_eq!(created["role"], "user");

        let response = router
            .call(json_request("POST", "/api/auth/register", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_promote_account_to_admin() {
        let (state, _) = test_state().await;
        let issuer = TokenIssuer::new(SECRET);
        let mut router = create_router(state);

        let admin_token = issuer.mint_access("admin-1", Role::Admin).unwrap();
        let response = router
            .call(
                Request::builder()
                    .method("PUT")
                    .uri("/api/accounts/user-1/role")
                    .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::json!({"role": "admin"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let updated = body_json(response).await;
        assert_eq!(updated["role"], "admin");
    }
}

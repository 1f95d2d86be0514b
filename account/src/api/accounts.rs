//! アカウント管理API
//!
//! 一覧取得と昇格はAdmin専用（判定はサービス層のロールゲート）。

use crate::api::error_response;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    response::Response,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use storefront_common::auth::{Account, Claims, Role};

/// アカウントレスポンス（password_hash除外）
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    /// アカウントID
    pub id: String,
    /// 名
    pub first_name: String,
    /// 姓
    pub last_name: String,
    /// メールアドレス
    pub email: String,
    /// ロール
    pub role: Role,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        AccountResponse {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            email: account.email,
            role: account.role,
        }
    }
}

/// アカウント一覧レスポンス
#[derive(Debug, Serialize)]
pub struct ListAccountsResponse {
    /// アカウント一覧
    pub accounts: Vec<AccountResponse>,
}

/// ページングパラメータ
#[derive(Debug, Deserialize)]
pub struct Pagination {
    /// スキップ件数
    #[serde(default)]
    pub skip: u64,
    /// 取得件数（最大100）
    #[serde(default)]
    pub take: u64,
}

/// ロール更新リクエスト
#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    /// 新しいロール
    pub role: Role,
}

/// GET /api/accounts - アカウント一覧取得
///
/// Admin専用。パスワードハッシュは除外して返す。
///
/// # Returns
/// * `200 OK` - アカウント一覧
/// * `403 Forbidden` - Admin権限なし
pub async fn list_accounts(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<ListAccountsResponse>, Response> {
    let accounts = state
        .service
        .list_accounts(&claims, pagination.skip, pagination.take)
        .await
        .map_err(error_response)?;

    Ok(Json(ListAccountsResponse {
        accounts: accounts.into_iter().map(AccountResponse::from).collect(),
    }))
}

/// GET /api/accounts/:id - アカウント取得
///
/// 認証済みセッションであれば取得できる。
pub async fn get_account(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, Response> {
    let account = state
        .service
        .get_account(&claims, &id)
        .await
        .map_err(error_response)?;

    Ok(Json(AccountResponse::from(account)))
}

/// PUT /api/accounts/:id/role - ロール更新（管理者昇格）
///
/// Admin専用。
///
/// # Returns
/// * `200 OK` - 更新後のアカウント
/// * `403 Forbidden` - Admin権限なし
/// * `404 Not Found` - アカウントなし
pub async fn set_account_role(
    Extension(claims): Extension<Claims>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<AccountResponse>, Response> {
    let account = state
        .service
        .set_account_role(&claims, &id, request.role)
        .await
        .map_err(error_response)?;

    Ok(Json(AccountResponse::from(account)))
}

//! 初回起動時の管理者アカウント作成
//!
//! 環境変数から管理者を作成する

use crate::auth::password::hash_password;
use crate::directory::{AccountDirectory, DirectoryError};
use storefront_common::auth::{Account, Role};
use storefront_common::config::resolve_env;
use storefront_common::error::{AccountError, AccountResult};
use uuid::Uuid;

/// 環境変数から管理者を作成
///
/// # Arguments
/// * `directory` - アカウントディレクトリ
///
/// # Environment Variables
/// * `STOREFRONT_ADMIN_EMAIL` - 管理者メールアドレス（省略時: "admin@localhost"）
/// * `STOREFRONT_ADMIN_PASSWORD` - 管理者パスワード（必須）
///
/// # Returns
/// * `Ok(Some(email))` - 管理者作成成功（メールアドレスを返す）
/// * `Ok(None)` - STOREFRONT_ADMIN_PASSWORDが未設定（作成しない）
/// * `Err(AccountError)` - 作成失敗
pub async fn create_admin_from_env(
    directory: &dyn AccountDirectory,
) -> AccountResult<Option<String>> {
    // STOREFRONT_ADMIN_PASSWORDが設定されていなければスキップ
    let password = match resolve_env("STOREFRONT_ADMIN_PASSWORD", "ADMIN_PASSWORD") {
        Some(p) if !p.is_empty() => p,
        _ => {
            tracing::debug!("STOREFRONT_ADMIN_PASSWORD not set, skipping admin creation from env");
            return Ok(None);
        }
    };

    let email = resolve_env("STOREFRONT_ADMIN_EMAIL", "ADMIN_EMAIL")
        .unwrap_or_else(|| "admin@localhost".to_string());

    let password_hash = hash_password(&password)?;

    let admin = Account {
        id: Uuid::new_v4().to_string(),
        first_name: "Service".to_string(),
        last_name: "Admin".to_string(),
        email: email.clone(),
        password_hash,
        role: Role::Admin,
    };

    match directory.put(admin).await {
        Ok(()) => {
            tracing::info!("Created admin account from env: email={}", email);
            Ok(Some(email))
        }
        Err(DirectoryError::AlreadyExists) => {
            tracing::warn!("Admin account {} already exists, skipping creation", email);
            Ok(Some(email))
        }
        Err(DirectoryError::Unavailable(reason)) => {
            tracing::error!("Failed to create admin account from env: {}", reason);
            Err(AccountError::DirectoryUnavailable(reason))
        }
        Err(DirectoryError::NotFound) => Err(AccountError::NotFound),
    }
}

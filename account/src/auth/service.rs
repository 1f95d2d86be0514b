//! アカウント認証サービス
//!
//! ログイン（資格情報検証→トークン発行）、アカウント登録、
//! Claimsゲート付きのアカウント操作を提供する。

use crate::auth::gate::require_admin;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenIssuer;
use crate::directory::{AccountDirectory, DirectoryError};
use std::sync::Arc;
use storefront_common::auth::{Account, Claims, Role};
use storefront_common::error::{AccountError, AccountResult};
use uuid::Uuid;

/// 一覧取得の最大件数（超過・未指定時はこの値に丸める）
const MAX_PAGE_SIZE: u64 = 100;

/// ログイン成功の結果
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// 認証されたアカウント
    pub account: Account,
    /// 新規発行されたアクセストークン
    pub access_token: String,
    /// 新規発行されたリフレッシュトークン
    pub refresh_token: String,
}

/// アカウント認証サービス
#[derive(Clone)]
pub struct AccountAuthService {
    directory: Arc<dyn AccountDirectory>,
    issuer: TokenIssuer,
}

impl AccountAuthService {
    /// ディレクトリと発行器からサービスを生成
    pub fn new(directory: Arc<dyn AccountDirectory>, issuer: TokenIssuer) -> Self {
        AccountAuthService { directory, issuer }
    }

    /// ログイン
    ///
    /// アカウント不存在とパスワード不一致は同一の `InvalidCredentials`
    /// に畳み込む（アカウント列挙への耐性）。ディレクトリの一時的障害
    /// のみ `DirectoryUnavailable` として区別する。
    ///
    /// # Arguments
    /// * `email` - ログインID
    /// * `password` - 平文パスワード
    ///
    /// # Returns
    /// * `Ok(LoginOutcome)` - アカウントと新規トークンペア
    /// * `Err(AccountError::InvalidCredentials)` - 認証失敗
    /// * `Err(AccountError::DirectoryUnavailable)` - ディレクトリ障害
    pub async fn login(&self, email: &str, password: &str) -> AccountResult<LoginOutcome> {
        let account = match self.directory.get_by_email(email).await {
            Ok(account) => account,
            Err(DirectoryError::Unavailable(reason)) => {
                return Err(AccountError::DirectoryUnavailable(reason));
            }
            Err(_) => {
                tracing::debug!("Login failed: no account for supplied email");
                return Err(AccountError::InvalidCredentials);
            }
        };

        if !verify_password(password, &account.password_hash)? {
            tracing::debug!(account_id = %account.id, "Login failed: password mismatch");
            return Err(AccountError::InvalidCredentials);
        }

        let access_token = self.issuer.mint_access(&account.id, account.role)?;
        let refresh_token = self.issuer.mint_refresh(&account.id, account.role)?;

        tracing::info!(account_id = %account.id, "Login succeeded");

        Ok(LoginOutcome {
            account,
            access_token,
            refresh_token,
        })
    }

    /// アカウント登録
    ///
    /// パスワードをbcryptでハッシュ化し、ロール `user`・生成UUIDで
    /// 登録する。
    pub async fn create_account(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> AccountResult<Account> {
        let password_hash = hash_password(password)?;

        let account = Account {
            id: Uuid::new_v4().to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            password_hash,
            role: Role::User,
        };

        match self.directory.put(account.clone()).await {
            Ok(()) => {
                tracing::info!(account_id = %account.id, "Account created");
                Ok(account)
            }
            Err(DirectoryError::AlreadyExists) => Err(AccountError::EmailTaken),
            Err(DirectoryError::Unavailable(reason)) => {
                Err(AccountError::DirectoryUnavailable(reason))
            }
            Err(DirectoryError::NotFound) => Err(AccountError::NotFound),
        }
    }

    /// アカウント取得（認証済みセッション向け）
    pub async fn get_account(&self, _claims: &Claims, id: &str) -> AccountResult<Account> {
        self.fetch(id).await
    }

    /// アカウント一覧（Admin専用）
    ///
    /// `take` が100を超える、または `skip`/`take` が共に0の場合は
    /// 100件に丸める。
    pub async fn list_accounts(
        &self,
        claims: &Claims,
        skip: u64,
        take: u64,
    ) -> AccountResult<Vec<Account>> {
        require_admin(claims)?;

        let take = if take > MAX_PAGE_SIZE || (skip == 0 && take == 0) {
            MAX_PAGE_SIZE
        } else {
            take
        };

        self.directory
            .list(skip, take)
            .await
            .map_err(map_directory_error)
    }

    /// ロール更新（Admin専用、管理者昇格に使う）
    pub async fn set_account_role(
        &self,
        claims: &Claims,
        id: &str,
        role: Role,
    ) -> AccountResult<Account> {
        require_admin(claims)?;

        let updated = self
            .directory
            .update_role(id, role)
            .await
            .map_err(map_directory_error)?;

        tracing::info!(account_id = %updated.id, role = ?role, "Account role updated");
        Ok(updated)
    }

    async fn fetch(&self, id: &str) -> AccountResult<Account> {
        self.directory
            .get_by_id(id)
            .await
            .map_err(map_directory_error)
    }
}

fn map_directory_error(err: DirectoryError) -> AccountError {
    match err {
        DirectoryError::NotFound => AccountError::NotFound,
        DirectoryError::AlreadyExists => AccountError::EmailTaken,
        DirectoryError::Unavailable(reason) => AccountError::DirectoryUnavailable(reason),
    }
}

//! アカウントディレクトリ抽象
//!
//! アカウントの永続化は外部コラボレーターが担う。本コアはこのトレイト
//! 越しに読み取り・登録・ロール更新のみを行う。すべての操作は呼び出し側の
//! キャンセル/タイムアウトに従う（内部でリトライしない）。

use async_trait::async_trait;
use storefront_common::auth::{Account, Role};
use thiserror::Error;
use tokio::sync::RwLock;

/// ディレクトリ操作のエラー
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// 該当アカウントなし
    #[error("account not found")]
    NotFound,

    /// 登録済みメールアドレスとの重複
    #[error("email is already registered")]
    AlreadyExists,

    /// 一時的障害（接続不可など）
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Result型エイリアス（ディレクトリ）
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// アカウントディレクトリ
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// メールアドレスでアカウントを取得
    async fn get_by_email(&self, email: &str) -> DirectoryResult<Account>;

    /// IDでアカウントを取得
    async fn get_by_id(&self, id: &str) -> DirectoryResult<Account>;

    /// 新規アカウントを登録
    async fn put(&self, account: Account) -> DirectoryResult<()>;

    /// アカウント一覧（登録順、skip/takeページング）
    async fn list(&self, skip: u64, take: u64) -> DirectoryResult<Vec<Account>>;

    /// ロールを更新し、更新後のアカウントを返す
    async fn update_role(&self, id: &str, role: Role) -> DirectoryResult<Account>;
}

/// インメモリ実装
///
/// サービス単体での起動とテストに使う。登録順を保持する。
#[derive(Default)]
pub struct MemoryDirectory {
    accounts: RwLock<Vec<Account>>,
}

impl MemoryDirectory {
    /// 空のディレクトリを生成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountDirectory for MemoryDirectory {
    async fn get_by_email(&self, email: &str) -> DirectoryResult<Account> {
        let accounts = self.accounts.read().await;
        accounts
            .iter()
            .find(|a| a.email == email)
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }

    async fn get_by_id(&self, id: &str) -> DirectoryResult<Account> {
        let accounts = self.accounts.read().await;
        accounts
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(DirectoryError::NotFound)
    }

    async fn put(&self, account: Account) -> DirectoryResult<()> {
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.email == account.email) {
            return Err(DirectoryError::AlreadyExists);
        }
        accounts.push(account);
        Ok(())
    }

    async fn list(&self, skip: u64, take: u64) -> DirectoryResult<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .iter()
            .skip(skip as usize)
            .take(take as usize)
            .cloned()
            .collect())
    }

    async fn update_role(&self, id: &str, role: Role) -> DirectoryResult<Account> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(DirectoryError::NotFound)?;
        account.role = role;
        Ok(account.clone())
    }
}

//! パスワードハッシュ化と検証（bcrypt実装）

use bcrypt::{hash, verify};
use storefront_common::error::{AccountError, AccountResult};

/// パスワードハッシュ化のコスト（12推奨、200-300ms）
const HASH_COST: u32 = 12;

/// パスワードをbcryptでハッシュ化
///
/// 空のパスワードはハッシュ化を拒否する。
///
/// # Arguments
/// * `password` - ハッシュ化するパスワード
///
/// # Returns
/// * `Ok(String)` - bcryptハッシュ文字列（$2b$で始まる）
/// * `Err(AccountError::PasswordHash)` - 空パスワードまたはハッシュ化失敗
pub fn hash_password(password: &str) -> AccountResult<String> {
    if password.is_empty() {
        return Err(AccountError::PasswordHash(
            "password must not be empty".to_string(),
        ));
    }

    hash(password, HASH_COST)
        .map_err(|e| AccountError::PasswordHash(format!("failed to hash password: {}", e)))
}

/// パスワードを検証
///
/// 空のパスワードは照合せずに不一致として扱う（空入力が空ハッシュと
/// 自明に一致する事故を防ぐ）。比較自体はbcrypt内部の定数時間比較。
///
/// # Arguments
/// * `password` - 検証する平文パスワード
/// * `hash` - bcryptハッシュ文字列
///
/// # Returns
/// * `Ok(true)` - パスワード一致
/// * `Ok(false)` - パスワード不一致（空パスワードを含む）
/// * `Err(AccountError::PasswordHash)` - 検証失敗（ハッシュが不正など）
pub fn verify_password(password: &str, hash: &str) -> AccountResult<bool> {
    if password.is_empty() {
        return Ok(false);
    }

    verify(password, hash)
        .map_err(|e| AccountError::PasswordHash(format!("failed to verify password: {}", e)))
}

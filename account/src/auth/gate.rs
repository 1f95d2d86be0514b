//! ロールゲート
//!
//! 検証済みClaimsに対する純粋な述語。I/Oも副作用もなく、任意の
//! スレッドから並行に呼び出せる。アカウント一覧取得、管理者昇格、
//! 在庫更新など「特権」とタグ付けされた操作の前段で使う。

use storefront_common::auth::{Claims, Role};
use storefront_common::error::{AccountError, AccountResult};

/// Claimsが要求ロールを持つことを確認する
///
/// ロールは発行時にトークンへ署名されたものであり、ここでディレクトリを
/// 再参照することはない。
///
/// # Arguments
/// * `claims` - 検証済みClaims
/// * `required` - 要求ロール
///
/// # Returns
/// * `Ok(())` - 許可
/// * `Err(AccountError::Unauthorized)` - ロール不一致
pub fn require_role(claims: &Claims, required: Role) -> AccountResult<()> {
    if claims.role != required {
        return Err(AccountError::Unauthorized);
    }
    Ok(())
}

/// Admin権限チェックヘルパー
pub fn require_admin(claims: &Claims) -> AccountResult<()> {
    require_role(claims, Role::Admin)
}

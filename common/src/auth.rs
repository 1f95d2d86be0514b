//! 認証・アカウントのデータモデル
//!
//! トークンに署名されるClaims、アカウントレコード、ロールを定義する。

use serde::{Deserialize, Serialize};

/// アカウントロール（閉じた2値）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 一般ユーザー
    User,
    /// 管理者
    Admin,
}

/// トークンClaims
///
/// アクセストークン/リフレッシュトークン双方のペイロード。
/// 発行時に確定し、それ以降は不変。ロールの変更はトークンの
/// 自然失効後の再認証まで反映されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject（アカウントID）
    pub sub: String,
    /// アカウントロール
    pub role: Role,
    /// 有効期限（Unix timestamp、秒）
    pub exp: usize,
}

/// アカウントレコード
///
/// 永続化は外部のアカウントディレクトリが担う。本コアはログイン時の
/// 読み取りとロール更新のみを行う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// アカウントID（UUID文字列）
    pub id: String,
    /// 名
    pub first_name: String,
    /// 姓
    pub last_name: String,
    /// メールアドレス（ログインID）
    pub email: String,
    /// bcryptパスワードハッシュ
    pub password_hash: String,
    /// ロール
    pub role: Role,
}

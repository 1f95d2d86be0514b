//! エラー型定義
//!
//! 統一エラー型（thiserror使用）

use thiserror::Error;

/// トークン検証エラー
///
/// 検証は構造→署名→有効期限の順で失敗する。署名検証より前に
/// ペイロード内のタイムスタンプを信用してはならない。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// トークンの構造が不正
    #[error("token is malformed")]
    Malformed,

    /// 署名が一致しない
    #[error("token signature is invalid")]
    SignatureInvalid,

    /// 有効期限切れ
    #[error("token has expired")]
    Expired,
}

/// アカウントサービスのエラー型
#[derive(Debug, Error)]
pub enum AccountError {
    /// トークン検証エラー
    #[error(transparent)]
    Token(#[from] TokenError),

    /// リフレッシュトークンが無効または期限切れ（再ログインが必要）
    #[error("refresh token is invalid, re-authentication required")]
    RefreshInvalid,

    /// 要求されたロールを満たさない
    #[error("insufficient role for this operation")]
    Unauthorized,

    /// 認証情報が不正（アカウント不存在とパスワード不一致は区別しない）
    #[error("invalid email or password")]
    InvalidCredentials,

    /// アカウントが存在しない
    #[error("account not found")]
    NotFound,

    /// メールアドレスが既に登録済み
    #[error("email is already registered")]
    EmailTaken,

    /// アカウントディレクトリに到達できない（一時的障害）
    #[error("account directory unavailable: {0}")]
    DirectoryUnavailable(String),

    /// パスワードハッシュ処理の失敗
    #[error("password hash error: {0}")]
    PasswordHash(String),

    /// トークン署名の失敗（署名鍵が使用不能な致命的設定エラー）
    #[error("token signing error: {0}")]
    Signing(String),

    /// 設定エラー
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result型エイリアス（トークン検証）
pub type TokenResult<T> = Result<T, TokenError>;

/// Result型エイリアス（アカウントサービス）
pub type AccountResult<T> = Result<T, AccountError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_error_display() {
        assert_eq!(TokenError::Malformed.to_string(), "token is malformed");
        assert_eq!(
            TokenError::SignatureInvalid.to_string(),
            "token signature is invalid"
        );
        assert_eq!(TokenError::Expired.to_string(), "token has expired");
    }

    #[test]
    fn test_account_error_from_token_error() {
        let err: AccountError = TokenError::Expired.into();
        assert!(matches!(err, AccountError::Token(TokenError::Expired)));
        assert_eq!(err.to_string(), "token has expired");
    }

    #[test]
    fn test_invalid_credentials_message_is_generic() {
        // アカウント列挙攻撃を防ぐため、メッセージから不存在か
        // パスワード不一致かを判別できないこと
        let err = AccountError::InvalidCredentials;
        assert_eq!(err.to_string(), "invalid email or password");
    }

    #[test]
    fn test_directory_unavailable_display() {
        let err = AccountError::DirectoryUnavailable("connection refused".to_string());
        assert_eq!(
            err.to_string(),
            "account directory unavailable: connection refused"
        );
    }
}

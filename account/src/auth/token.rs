//! トークン発行・検証（jsonwebtoken実装）
//!
//! アクセストークン（TTL 15分）とリフレッシュトークン（TTL 7日)を
//! HMAC-SHA-256で署名する。鍵は構築時に注入し、呼び出しごとに環境から
//! 読み直すことはしない。

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use storefront_common::auth::{Claims, Role};
use storefront_common::error::{AccountError, TokenError, TokenResult};

/// アクセストークンTTL（15分）
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// リフレッシュトークンTTL（7日）
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// トークン発行器
///
/// 構築時に渡された署名鍵でClaimsを署名する。発行以外の失敗要因を
/// 持たないため、エラーは致命的な設定不良としてのみ扱う。
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    /// 署名鍵から発行器を生成
    pub fn new(secret: &str) -> Self {
        TokenIssuer {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// アクセストークンを発行（有効期限は現在時刻+15分）
    ///
    /// # Arguments
    /// * `sub` - アカウントID
    /// * `role` - アカウントロール
    ///
    /// # Returns
    /// * `Ok(String)` - 署名済みトークン（ドット区切り3セグメント）
    /// * `Err(AccountError::Signing)` - 署名失敗（設定不良）
    pub fn mint_access(&self, sub: &str, role: Role) -> Result<String, AccountError> {
        self.mint_access_at(sub, role, Utc::now())
    }

    /// リフレッシュトークンを発行（有効期限は現在時刻+7日）
    pub fn mint_refresh(&self, sub: &str, role: Role) -> Result<String, AccountError> {
        self.mint_refresh_at(sub, role, Utc::now())
    }

    /// 発行時刻を指定してアクセストークンを発行（決定的なテスト用途）
    pub fn mint_access_at(
        &self,
        sub: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, AccountError> {
        self.mint(sub, role, now + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES))
    }

    /// 発行時刻を指定してリフレッシュトークンを発行（決定的なテスト用途）
    pub fn mint_refresh_at(
        &self,
        sub: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, AccountError> {
        self.mint(sub, role, now + Duration::days(REFRESH_TOKEN_TTL_DAYS))
    }

    fn mint(&self, sub: &str, role: Role, expires_at: DateTime<Utc>) -> Result<String, AccountError> {
        let claims = Claims {
            sub: sub.to_string(),
            role,
            exp: expires_at.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AccountError::Signing(format!("failed to sign token: {}", e)))
    }
}

/// トークン検証器
///
/// 検証順序は 構造→署名→有効期限。署名が一致するまではペイロード内の
/// タイムスタンプを信用しない（改竄ペイロードに未来のexpを仕込まれても
/// `SignatureInvalid` になる）。
#[derive(Clone)]
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    /// 署名鍵から検証器を生成
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // 期限判定に猶予を与えない
        validation.leeway = 0;

        TokenValidator {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// トークンを検証し、Claimsを返す
    ///
    /// # Arguments
    /// * `token` - 検証するトークン文字列
    ///
    /// # Returns
    /// * `Ok(Claims)` - 検証済みClaims
    /// * `Err(TokenError::Malformed)` - 構造が不正
    /// * `Err(TokenError::SignatureInvalid)` - 署名不一致
    /// * `Err(TokenError::Expired)` - 有効期限切れ
    pub fn validate(&self, token: &str) -> TokenResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            })
    }
}

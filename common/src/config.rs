//! 設定解決（環境変数）
//!
//! 環境変数名は旧実装から移行中のため、現行名を優先しつつ旧名にも
//! フォールバックする。旧名で解決された場合は非推奨警告を出す。

use std::str::FromStr;

/// 環境変数を現行名→旧名の順で解決する
///
/// # Arguments
/// * `current` - 現行の環境変数名
/// * `legacy` - 旧環境変数名（非推奨）
///
/// # Returns
/// * `Some(value)` - いずれかの名前で解決された値
/// * `None` - どちらも未設定
///
/// # Example
/// ```
/// use storefront_common::config::resolve_env;
///
/// let secret = resolve_env("STOREFRONT_TOKEN_SECRET", "SECRET_KEY");
/// ```
pub fn resolve_env(current: &str, legacy: &str) -> Option<String> {
    if let Ok(value) = std::env::var(current) {
        return Some(value);
    }

    std::env::var(legacy).ok().map(|value| {
        tracing::warn!("{} is deprecated, set {} instead", legacy, current);
        value
    })
}

/// 環境変数を解決し、未設定時はデフォルト値を返す
pub fn resolve_env_or(current: &str, legacy: &str, default: &str) -> String {
    resolve_env(current, legacy).unwrap_or_else(|| default.to_string())
}

/// 環境変数を解決して型`T`にパースする
///
/// 未設定、または値が解釈できない場合はデフォルト値に落ちる。
pub fn resolve_env_parse<T: FromStr>(current: &str, legacy: &str, default: T) -> T {
    resolve_env(current, legacy)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_resolve_env_prefers_current_name() {
        std::env::set_var("STOREFRONT_BIND", "0.0.0.0");
        std::env::set_var("ACCOUNT_BIND", "127.0.0.1");

        // 両方設定されている場合は現行名が勝つ
        let value = resolve_env("STOREFRONT_BIND", "ACCOUNT_BIND");
        assert_eq!(value.as_deref(), Some("0.0.0.0"));

        std::env::remove_var("STOREFRONT_BIND");
        std::env::remove_var("ACCOUNT_BIND");
    }

    #[test]
    #[serial]
    fn test_resolve_env_falls_back_to_legacy_name() {
        std::env::remove_var("STOREFRONT_DATA_DIR");
        std::env::set_var("ACCOUNT_DATA_DIR", "/var/lib/storefront");

        let value = resolve_env("STOREFRONT_DATA_DIR", "ACCOUNT_DATA_DIR");
        assert_eq!(value.as_deref(), Some("/var/lib/storefront"));

        std::env::remove_var("ACCOUNT_DATA_DIR");
    }

    #[test]
    #[serial]
    fn test_resolve_env_unset_is_none() {
        std::env::remove_var("STOREFRONT_UNSET");
        std::env::remove_var("ACCOUNT_UNSET");

        assert_eq!(resolve_env("STOREFRONT_UNSET", "ACCOUNT_UNSET"), None);
    }

    #[test]
    #[serial]
    fn test_resolve_env_or_uses_default() {
        std::env::remove_var("STOREFRONT_HOST_UNSET");
        std::env::remove_var("ACCOUNT_HOST_UNSET");

        let host = resolve_env_or("STOREFRONT_HOST_UNSET", "ACCOUNT_HOST_UNSET", "0.0.0.0");
        assert_eq!(host, "0.0.0.0");
    }

    #[test]
    #[serial]
    fn test_resolve_env_parse_typed_value() {
        std::env::set_var("STOREFRONT_TEST_PORT", "9090");
        std::env::remove_var("ACCOUNT_TEST_PORT");

        let port: u16 = resolve_env_parse("STOREFRONT_TEST_PORT", "ACCOUNT_TEST_PORT", 8080);
        assert_eq!(port, 9090);

        std::env::remove_var("STOREFRONT_TEST_PORT");
    }

    #[test]
    #[serial]
    fn test_resolve_env_parse_garbage_falls_back() {
        std::env::set_var("STOREFRONT_TEST_PORT2", "not-a-port");
        std::env::remove_var("ACCOUNT_TEST_PORT2");

        // 解釈できない値はデフォルトに落ちる
        let port: u16 = resolve_env_parse("STOREFRONT_TEST_PORT2", "ACCOUNT_TEST_PORT2", 8080);
        assert_eq!(port, 8080);

        std::env::remove_var("STOREFRONT_TEST_PORT2");
    }
}

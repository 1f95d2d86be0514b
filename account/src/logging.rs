//! ロギング初期化ユーティリティ
//!
//! `tracing` による構造化ロギングを標準出力とJSONライン形式ファイルへ出力する。

use chrono::Local;
use std::{
    env,
    fs::{self, OpenOptions},
    io::{self, Error, ErrorKind},
    path::PathBuf,
    sync::OnceLock,
};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// ログファイルベース名（JSON Lines）
pub const LOG_FILE_BASE: &str = "storefront-account.jsonl";

const LOG_SUBDIR: &str = "logs";
const DEFAULT_DATA_DIR: &str = ".storefront";
const DEFAULT_RETENTION_DAYS: u32 = 7;

// 環境変数名
const LOG_DIR_ENV: &str = "STOREFRONT_LOG_DIR";
const LOG_LEVEL_ENV: &str = "STOREFRONT_LOG_LEVEL";
const LOG_RETENTION_DAYS_ENV: &str = "STOREFRONT_LOG_RETENTION_DAYS";
const ALT_LEVEL_ENV: &str = "RUST_LOG";

static LOGGER_GUARD: OnceLock<Result<LoggerGuard, io::Error>> = OnceLock::new();

struct LoggerGuard {
    _file_guard: WorkerGuard,
}

/// ログ出力を初期化する。
pub fn init() -> io::Result<()> {
    match LOGGER_GUARD.get_or_init(configure_logger) {
        Ok(_) => Ok(()),
        Err(err) => Err(io::Error::new(err.kind(), err.to_string())),
    }
}

/// ログディレクトリのパスを返す。
pub fn log_dir() -> io::Result<PathBuf> {
    if let Ok(dir) = env::var(LOG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    // デフォルト: ~/.storefront/logs
    let home = env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map_err(|_| Error::new(ErrorKind::NotFound, "Failed to resolve home directory"))?;

    Ok(PathBuf::from(home).join(DEFAULT_DATA_DIR).join(LOG_SUBDIR))
}

/// 今日のログファイルのパスを返す。
pub fn log_file_path() -> io::Result<PathBuf> {
    let today = Local::now().format("%Y-%m-%d").to_string();
    let filename = format!("{}.{}", LOG_FILE_BASE, today);
    Ok(log_dir()?.join(filename))
}

/// 保持日数を取得する。
fn get_retention_days() -> u32 {
    if let Ok(val) = env::var(LOG_RETENTION_DAYS_ENV) {
        if let Ok(days) = val.parse() {
            return days;
        }
    }
    DEFAULT_RETENTION_DAYS
}

/// 古いログファイルを削除する。
fn cleanup_old_logs(log_dir: &PathBuf, retention_days: u32) -> io::Result<()> {
    if !log_dir.exists() {
        return Ok(());
    }

    let cutoff = Local::now() - chrono::Duration::days(retention_days as i64);
    let cutoff_str = cutoff.format("%Y-%m-%d").to_string();

    for entry in fs::read_dir(log_dir)? {
        let entry = entry?;
        let path = entry.path();
        if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
            // storefront-account.jsonl.YYYY-MM-DD 形式をチェック
            if let Some(date_part) = filename.strip_prefix(&format!("{}.", LOG_FILE_BASE)) {
                if date_part < cutoff_str.as_str() {
                    let _ = fs::remove_file(&path);
                }
            }
        }
    }
    Ok(())
}

fn configure_logger() -> io::Result<LoggerGuard> {
    let log_directory = log_dir()?;
    fs::create_dir_all(&log_directory)?;

    let retention_days = get_retention_days();
    cleanup_old_logs(&log_directory, retention_days)?;

    let log_path = log_file_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    let (file_writer, file_guard) = non_blocking(file);

    // 環境変数からログレベルを取得（優先順位: STOREFRONT_LOG_LEVEL > RUST_LOG）
    let env_filter = EnvFilter::try_from_env(LOG_LEVEL_ENV)
        .or_else(|_| EnvFilter::try_from_env(ALT_LEVEL_ENV))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // ファイル出力レイヤー（JSON形式）
    let file_layer = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_current_span(false)
        .with_span_list(false)
        .with_target(true)
        .with_file(false)
        .with_line_number(false);

    // 標準出力レイヤー（人間が読みやすい形式）
    let stdout_layer = fmt::layer()
        .with_target(true)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .try_init()
        .map_err(Error::other)?;

    tracing::info!(
        category = "system",
        "Account service logs initialized: {}",
        log_path.display()
    );

    Ok(LoggerGuard {
        _file_guard: file_guard,
    })
}

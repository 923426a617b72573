//! 命令行参数、环境变量与运行时配置。

use clap::Parser;
use std::path::PathBuf;

use crate::logging::LogFormat;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_LOG_FILE: &str = "submissions.csv";
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "jpg", "jpeg", "png"];
pub const LOG_HEADER: &str = "Username,Filename,Date\n";
/// multipart 边界与字段头的额外预算。
pub const MULTIPART_OVERHEAD: u64 = 64 * 1024;
pub const SHUTDOWN_GRACE_SECS: u64 = 10;

/// CLI arguments and environment configuration for the server.
#[derive(Parser, Debug)]
#[command(name = "submission-drop", version, about = "Single-file submission server")]
pub struct Args {
    #[arg(
        short = 'b',
        long,
        env = "HOST",
        default_value = "0.0.0.0",
        help = "Bind address"
    )]
    pub host: String,
    #[arg(
        short = 'p',
        long,
        env = "PORT",
        default_value_t = DEFAULT_PORT,
        help = "HTTP port"
    )]
    pub port: u16,
    #[arg(
        short = 'u',
        long,
        env = "UPLOAD_DIR",
        default_value = DEFAULT_UPLOAD_DIR,
        help = "Directory for stored uploads"
    )]
    pub upload_dir: PathBuf,
    #[arg(
        short = 'l',
        long,
        env = "SUBMISSIONS_LOG",
        default_value = DEFAULT_LOG_FILE,
        help = "Append-only submission log (CSV)"
    )]
    pub log_file: PathBuf,
    #[arg(
        long,
        env = "MAX_FILE_SIZE",
        default_value_t = DEFAULT_MAX_FILE_SIZE,
        help = "Max upload size in bytes"
    )]
    pub max_file_size: u64,
    #[arg(
        long,
        env = "LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Text,
        help = "Diagnostic log output format"
    )]
    pub log_format: LogFormat,
}

/// 存储位置配置，启动时传给存储初始化与审计日志。
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub log_file: PathBuf,
}

impl From<&Args> for StorageConfig {
    fn from(args: &Args) -> Self {
        Self {
            upload_dir: args.upload_dir.clone(),
            log_file: args.log_file.clone(),
        }
    }
}

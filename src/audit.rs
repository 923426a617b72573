//! 提交审计日志：每次成功上传追加一行 CSV。

use chrono::{DateTime, NaiveDate, Utc};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

use crate::config::StorageConfig;

/// 一条提交记录。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditRecord {
    pub username: String,
    pub filename: String,
    pub date: NaiveDate,
}

impl AuditRecord {
    pub fn new(username: &str, filename: &str, submitted_at: DateTime<Utc>) -> Self {
        Self {
            username: username.to_string(),
            filename: filename.to_string(),
            date: submitted_at.date_naive(),
        }
    }

    /// `"username","filename","YYYY-MM-DD"\n`
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{}\n",
            quote(&self.username),
            quote(&self.filename),
            quote(&self.date.format("%Y-%m-%d").to_string())
        )
    }
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// 追加写入的提交日志。
#[derive(Debug)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            path: config.log_file.clone(),
        }
    }

    /// 以追加模式单次写入整行。
    pub async fn append(&self, record: &AuditRecord) -> io::Result<()> {
        let line = record.to_csv_line();
        let mut file = OpenOptions::new().append(true).open(&self.path).await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }

    /// 后台追加记录，失败只写诊断日志，不影响响应。
    pub fn record_in_background(self: &Arc<Self>, record: AuditRecord) {
        let log = Arc::clone(self);
        tokio::spawn(async move {
            match log.append(&record).await {
                Ok(()) => debug!(
                    username = record.username,
                    filename = record.filename,
                    "submission logged"
                ),
                Err(err) => error!(
                    path = ?log.path,
                    username = record.username,
                    filename = record.filename,
                    error = %err,
                    "failed to append submission log"
                ),
            }
        });
    }
}

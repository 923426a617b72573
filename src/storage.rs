use std::io;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWriteExt, ErrorKind};
use tracing::info;

use crate::atomic::AtomicFile;
use crate::config::{LOG_HEADER, StorageConfig};

/// 上传目录与提交日志文件的位置。
#[derive(Clone, Debug)]
pub struct Storage {
    upload_dir: PathBuf,
    log_file: PathBuf,
}

impl Storage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
            log_file: config.log_file.clone(),
        }
    }

    /// 确保上传目录与日志文件存在，新建日志时写入表头。可重复执行。
    pub async fn initialize(&self) -> io::Result<()> {
        fs::create_dir_all(&self.upload_dir).await?;
        if let Some(parent) = self.log_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.log_file)
            .await
        {
            Ok(mut file) => {
                file.write_all(LOG_HEADER.as_bytes()).await?;
                file.sync_all().await?;
                info!(path = ?self.log_file, "created submission log");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
            Err(err) => Err(err),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }

    /// 返回存储文件名对应的完整路径。
    pub fn stored_path(&self, stored_filename: &str) -> PathBuf {
        self.upload_dir.join(stored_filename)
    }

    /// 在上传目录中创建暂存文件，完成后以 `stored_filename` 落盘。
    pub async fn stage(&self, stored_filename: &str) -> io::Result<AtomicFile> {
        AtomicFile::new(&self.stored_path(stored_filename)).await
    }

    /// 删除已落盘的存储文件（请求被拒绝时回收）。
    pub async fn discard(&self, stored_filename: &str) -> io::Result<()> {
        match fs::remove_file(self.stored_path(stored_filename)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err),
        }
    }
}

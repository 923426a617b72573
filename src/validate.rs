//! 上传策略：扩展名白名单与大小上限。

use std::path::Path;

use thiserror::Error;

use crate::config::{ALLOWED_EXTENSIONS, DEFAULT_MAX_FILE_SIZE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("invalid file type")]
    InvalidFileType,
    #[error("file exceeds {limit} bytes")]
    FileTooLarge { limit: u64 },
}

impl UploadError {
    /// 面向用户的错误标题。
    pub fn title(&self) -> &'static str {
        match self {
            UploadError::InvalidFileType => "Invalid File Type",
            UploadError::FileTooLarge { .. } => "File Too Large",
        }
    }

    /// 面向用户的错误说明。
    pub fn user_message(&self) -> String {
        match self {
            UploadError::InvalidFileType => "Only PDF, JPG, and PNG files are allowed.".into(),
            UploadError::FileTooLarge { limit } => {
                format!("File size must be less than {}.", format_limit(*limit))
            }
        }
    }
}

fn format_limit(limit: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if limit >= MIB && limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        format!("{:.2} KB", limit as f64 / 1024.0)
    }
}

/// 上传文件的类型与大小策略。
#[derive(Clone, Debug)]
pub struct UploadPolicy {
    pub max_file_size: u64,
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::with_max_size(DEFAULT_MAX_FILE_SIZE)
    }
}

impl UploadPolicy {
    pub fn with_max_size(max_file_size: u64) -> Self {
        Self {
            max_file_size,
            allowed_extensions: ALLOWED_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    /// 校验原始文件名的扩展名（忽略大小写）。
    pub fn check_extension(&self, original_filename: &str) -> Result<(), UploadError> {
        let extension = Path::new(original_filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or(UploadError::InvalidFileType)?;
        if self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            Ok(())
        } else {
            Err(UploadError::InvalidFileType)
        }
    }

    /// 校验已接收的字节数，超过上限即拒绝。
    pub fn check_size(&self, received: u64) -> Result<(), UploadError> {
        if received > self.max_file_size {
            return Err(UploadError::FileTooLarge {
                limit: self.max_file_size,
            });
        }
        Ok(())
    }

    /// 路由层的请求体上限（文件上限加 multipart 开销）。
    pub fn body_limit(&self) -> usize {
        let limit = self
            .max_file_size
            .saturating_add(crate::config::MULTIPART_OVERHEAD);
        usize::try_from(limit).unwrap_or(usize::MAX)
    }
}

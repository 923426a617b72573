//! 表单上传处理：接收、校验、落盘、记录审计并渲染结果。

use axum::extract::multipart::Field;
use axum::extract::{Extension, Multipart};
use axum::response::Html;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::audit::{AuditLog, AuditRecord};
use crate::error::{ApiError, from_multipart};
use crate::naming::stored_filename;
use crate::render::{Fragment, format_kib, render};
use crate::sanitize::sanitize_input;
use crate::storage::Storage;
use crate::validate::UploadPolicy;

pub const USERNAME_FIELD: &str = "username";
pub const FILE_FIELD: &str = "userFile";

/// 请求处理阶段，仅作为 tracing 字段标注当前进度，不驱动控制流。
#[derive(Clone, Copy, Debug)]
enum Stage {
    Receiving,
    Validating,
    Storing,
    Logging,
    Responding,
}

/// 单次请求内的提交信息，响应后即丢弃。
#[derive(Debug)]
pub struct Submission {
    pub username: String,
    pub original_filename: String,
    pub stored_filename: String,
    pub size_bytes: u64,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug)]
struct StoredUpload {
    original_filename: String,
    stored_filename: String,
    size_bytes: u64,
    submitted_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct ReceivedForm {
    username: Option<String>,
    file: Option<StoredUpload>,
}

/// 处理 `POST /upload`。
pub async fn upload_submission(
    Extension(storage): Extension<Arc<Storage>>,
    Extension(audit): Extension<Arc<AuditLog>>,
    Extension(policy): Extension<Arc<UploadPolicy>>,
    mut multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    debug!(stage = ?Stage::Receiving, "reading submission form");
    let mut form = ReceivedForm::default();
    if let Err(err) = read_fields(&storage, &policy, &mut multipart, &mut form).await {
        if let Some(file) = &form.file {
            discard_stored(&storage, file).await;
        }
        return Err(err);
    }

    debug!(stage = ?Stage::Validating, "validating submission form");
    let username = sanitize_input(form.username.as_deref().unwrap_or_default());
    if username.is_empty() {
        if let Some(file) = &form.file {
            discard_stored(&storage, file).await;
        }
        return Err(ApiError::BadRequest("Username is required.".into()));
    }
    let Some(file) = form.file else {
        return Err(ApiError::BadRequest("No file was uploaded.".into()));
    };

    let submission = Submission {
        username,
        original_filename: file.original_filename,
        stored_filename: file.stored_filename,
        size_bytes: file.size_bytes,
        submitted_at: file.submitted_at,
    };
    info!(
        username = submission.username,
        original = submission.original_filename,
        stored = submission.stored_filename,
        size = %format_kib(submission.size_bytes),
        "file uploaded"
    );

    debug!(stage = ?Stage::Logging, "queueing submission log");
    audit.record_in_background(AuditRecord::new(
        &submission.username,
        &submission.original_filename,
        submission.submitted_at,
    ));

    debug!(stage = ?Stage::Responding, "rendering submission result");
    Ok(Html(render(&Fragment::Success {
        username: &submission.username,
        filename: &submission.original_filename,
        size_bytes: submission.size_bytes,
        uploaded_at: submission.submitted_at,
    })))
}

/// 逐个读取 multipart 字段；文件字段在读取时直接写盘。
async fn read_fields(
    storage: &Storage,
    policy: &UploadPolicy,
    multipart: &mut Multipart,
    form: &mut ReceivedForm,
) -> Result<(), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| from_multipart(err, policy.max_file_size))?
    {
        let name = field.name().map(str::to_string).unwrap_or_default();
        match name.as_str() {
            USERNAME_FIELD => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| from_multipart(err, policy.max_file_size))?;
                form.username = Some(text);
            }
            FILE_FIELD => {
                let original_filename = field.file_name().unwrap_or_default().to_string();
                if original_filename.is_empty() {
                    continue;
                }
                if form.file.is_some() {
                    return Err(ApiError::BadRequest(
                        "Only one file can be uploaded per submission.".into(),
                    ));
                }
                form.file = Some(store_file(storage, policy, original_filename, field).await?);
            }
            other => debug!(field = other, "ignoring unknown form field"),
        }
    }
    Ok(())
}

/// 校验扩展名后流式写入暂存文件，超出大小上限立即中止。
async fn store_file(
    storage: &Storage,
    policy: &UploadPolicy,
    original_filename: String,
    mut field: Field<'_>,
) -> Result<StoredUpload, ApiError> {
    if let Err(err) = policy.check_extension(&original_filename) {
        warn!(original = original_filename, "rejected file type");
        return Err(err.into());
    }

    let submitted_at = Utc::now();
    let stored_filename = stored_filename(&original_filename, submitted_at.timestamp_millis());
    debug!(stage = ?Stage::Storing, stored = stored_filename, "streaming upload to disk");

    let mut staged = storage
        .stage(&stored_filename)
        .await
        .map_err(|err| ApiError::Internal(format!("create {stored_filename}: {err}")))?;
    let streamed: Result<(), ApiError> = async {
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|err| from_multipart(err, policy.max_file_size))?
        {
            policy.check_size(staged.written() + chunk.len() as u64)?;
            staged.write(&chunk).await?;
        }
        Ok(())
    }
    .await;
    if let Err(err) = streamed {
        if matches!(err, ApiError::Policy(_)) {
            warn!(
                original = original_filename,
                limit = policy.max_file_size,
                "rejected oversized upload"
            );
        }
        staged.cleanup().await;
        return Err(err);
    }

    let size_bytes = staged
        .finalize()
        .await
        .map_err(|err| ApiError::Internal(format!("persist {stored_filename}: {err}")))?;
    Ok(StoredUpload {
        original_filename,
        stored_filename,
        size_bytes,
        submitted_at,
    })
}

async fn discard_stored(storage: &Storage, file: &StoredUpload) {
    if let Err(err) = storage.discard(&file.stored_filename).await {
        warn!(stored = file.stored_filename, error = %err, "failed to discard rejected upload");
    }
}

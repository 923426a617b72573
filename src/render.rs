//! 上传结果的 HTML 片段渲染。

use chrono::{DateTime, Utc};

/// 需要渲染的响应内容。
pub enum Fragment<'a> {
    Success {
        username: &'a str,
        filename: &'a str,
        size_bytes: u64,
        uploaded_at: DateTime<Utc>,
    },
    Failure {
        title: &'a str,
        message: &'a str,
    },
}

const CONTAINER_STYLE: &str = "font-family: Arial, sans-serif; max-width: 600px; margin: 50px auto; padding: 20px; text-align: center;";

pub fn render(fragment: &Fragment<'_>) -> String {
    match fragment {
        Fragment::Success {
            username,
            filename,
            size_bytes,
            uploaded_at,
        } => format!(
            r#"<div style="{CONTAINER_STYLE}">
  <h2 style="color: #27ae60;">Success!</h2>
  <p style="font-size: 18px; margin: 20px 0;">File uploaded successfully, thank you <strong>{username}</strong>!</p>
  <div style="background: #f8f9fa; padding: 15px; border-radius: 8px; margin: 20px 0;">
    <p><strong>File:</strong> {filename}</p>
    <p><strong>Size:</strong> {size}</p>
    <p><strong>Upload Date:</strong> {date}</p>
  </div>
  <a href="/" style="background: #3498db; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px; display: inline-block; margin-top: 20px;">Upload Another File</a>
</div>
"#,
            username = escape_html(username),
            filename = escape_html(filename),
            size = format_kib(*size_bytes),
            date = uploaded_at.format("%B %-d, %Y"),
        ),
        Fragment::Failure { title, message } => format!(
            r#"<div style="{CONTAINER_STYLE}">
  <h2 style="color: #e74c3c;">{title}</h2>
  <p>{message}</p>
  <a href="/" style="color: #3498db; text-decoration: none;">&larr; Go back</a>
</div>
"#,
            title = escape_html(title),
            message = escape_html(message),
        ),
    }
}

/// 字节数格式化为两位小数的 KB。
pub fn format_kib(size_bytes: u64) -> String {
    format!("{:.2} KB", size_bytes as f64 / 1024.0)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

//! 存储文件名生成：毫秒时间戳加清洗后的原始文件名。

/// 将 `[A-Za-z0-9.-]` 之外的字符替换为 `_`。
pub fn sanitize_filename(original: &str) -> String {
    original
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '.' || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// 生成 `{timestamp_millis}_{sanitized}` 形式的存储文件名。
pub fn stored_filename(original: &str, timestamp_millis: i64) -> String {
    format!("{timestamp_millis}_{}", sanitize_filename(original))
}

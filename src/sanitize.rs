//! 用户文本输入清洗。

const UNSAFE_CHARS: [char; 5] = ['<', '>', '"', '\'', '&'];

/// 移除 HTML 敏感字符并去掉首尾空白。
pub fn sanitize_input(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !UNSAFE_CHARS.contains(ch))
        .collect::<String>()
        .trim()
        .to_string()
}

/// ASCII 空白字符
pub const WHITESPACES: &[char] = &[' ', '\t', '\n', '\x0c', '\r'];

/// 可能承载下拉选项的元素名（自定义下拉菜单）
pub const CUSTOM_OPTION_TAGS: &[&str] = &["li", "a", "div"];

/// 小写化并去掉首尾空白
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

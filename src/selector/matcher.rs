//! 韩国名称匹配
//!
//! 先做关键词包含匹配，再按顺序尝试正则。匹配是纯函数，没有副作用。
//!
//! 关键词按子串包含匹配，因此 "Republic of Korea (South)" 这类组合写法也能命中。
//! 但 `kr`、`kor` 这样的短代码只有作为完整词出现时才算，否则 "milkround"
//! 之类的普通单词也会被误判。

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::parsers::html::normalize_text;

use super::constants::{KOREA_KEYWORDS, KOREA_PATTERNS, NORTH_KOREA_MARKERS, SHORT_CODE_MAX_LEN};

/// 命中原因，用于调试日志
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchReason {
    /// 与关键词完全相同
    Exact(String),
    /// 包含关键词
    Keyword(String),
    /// 命中第 n 个正则
    Pattern(usize),
}

/// 关键词集合与正则列表
pub struct KoreaMatcher {
    keywords: HashSet<String>,
    phrases: Vec<String>,
    short_codes: Vec<String>,
    patterns: Vec<Regex>,
    exclusions: Vec<String>,
}

impl KoreaMatcher {
    /// 由给定列表构建匹配器
    pub fn new(keywords: &[&str], patterns: &[&str], exclusions: &[&str]) -> Result<Self, regex::Error> {
        let keywords: HashSet<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

        let mut phrases = Vec::new();
        let mut short_codes = Vec::new();
        for keyword in &keywords {
            if is_short_code(keyword) {
                short_codes.push(keyword.clone());
            } else {
                phrases.push(keyword.clone());
            }
        }
        // HashSet 无序，排序后日志输出稳定
        phrases.sort();
        short_codes.sort();

        let patterns = patterns
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            keywords,
            phrases,
            short_codes,
            patterns,
            exclusions: exclusions.iter().map(|e| e.to_lowercase()).collect(),
        })
    }

    /// 内置的韩国匹配器
    pub fn korea() -> &'static KoreaMatcher {
        static MATCHER: OnceLock<KoreaMatcher> = OnceLock::new();
        MATCHER.get_or_init(|| {
            KoreaMatcher::new(KOREA_KEYWORDS, KOREA_PATTERNS, NORTH_KOREA_MARKERS)
                .expect("built-in Korea patterns compile")
        })
    }

    /// 判断文本是否指代韩国
    pub fn is_match(&self, text: &str) -> bool {
        self.match_reason(text).is_some()
    }

    /// 返回命中原因，未命中时为 `None`
    pub fn match_reason(&self, text: &str) -> Option<MatchReason> {
        let normalized = normalize_text(text);
        if normalized.is_empty() {
            return None;
        }

        if self
            .exclusions
            .iter()
            .any(|marker| normalized.contains(marker.as_str()))
        {
            return None;
        }

        if self.keywords.contains(&normalized) {
            return Some(MatchReason::Exact(normalized));
        }

        if let Some(phrase) = self
            .phrases
            .iter()
            .find(|phrase| normalized.contains(phrase.as_str()))
        {
            return Some(MatchReason::Keyword(phrase.clone()));
        }

        if let Some(code) = self
            .short_codes
            .iter()
            .find(|code| contains_token(&normalized, code))
        {
            return Some(MatchReason::Keyword(code.clone()));
        }

        // 正则作用于未规范化的原始文本
        self.patterns
            .iter()
            .position(|pattern| pattern.is_match(text))
            .map(MatchReason::Pattern)
    }
}

/// 使用内置匹配器判断文本是否指代韩国
pub fn is_korea_match(text: &str) -> bool {
    KoreaMatcher::korea().is_match(text)
}

fn is_short_code(keyword: &str) -> bool {
    keyword.chars().count() <= SHORT_CODE_MAX_LEN
        && keyword.chars().all(|c| c.is_ascii_alphanumeric())
}

/// `needle` 作为完整词出现在 `haystack` 中（两侧不是字母或数字）
fn contains_token(haystack: &str, needle: &str) -> bool {
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

//! 自动选择统计
//!
//! 只由选择执行器写入，弹窗只读展示。

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::KoreaSelResult;

use super::storage::{Storage, STATS_KEY};

/// 最近一次选择
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastSelection {
    pub url: String,
    /// Unix 毫秒时间戳
    pub timestamp: i64,
}

/// 持久化的统计数据
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionStats {
    #[serde(default)]
    pub total_selections: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_selection: Option<LastSelection>,
}

/// 读取统计，缺失或格式不对时返回空统计
pub fn load_stats(storage: &dyn Storage) -> KoreaSelResult<SelectionStats> {
    Ok(storage
        .get(STATS_KEY)?
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default())
}

/// 记录一次成功的自动选择
pub fn record_selection(storage: &dyn Storage, url: &str) -> KoreaSelResult<SelectionStats> {
    let mut stats = load_stats(storage)?;
    stats.total_selections += 1;
    stats.last_selection = Some(LastSelection {
        url: url.to_string(),
        timestamp: Utc::now().timestamp_millis(),
    });
    storage.set(STATS_KEY, serde_json::to_value(&stats)?)?;
    Ok(stats)
}

/// 清空统计
pub fn reset_stats(storage: &dyn Storage) -> KoreaSelResult<()> {
    storage.remove(STATS_KEY)
}

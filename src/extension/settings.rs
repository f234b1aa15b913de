//! 用户偏好：启用开关与弹窗主题

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::error::{KoreaSelError, KoreaSelResult};

use super::storage::{Storage, ENABLED_KEY, THEME_KEY};

/// 弹窗主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// 已存储的主题值；`light` 以外的一律视为暗色
    fn from_stored(value: &str) -> Self {
        if value == "light" {
            Theme::Light
        } else {
            Theme::Dark
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = KoreaSelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(KoreaSelError::InvalidInput(format!(
                "unknown theme '{other}'. Use: light, dark"
            ))),
        }
    }
}

/// 读取启用开关，未设置时默认启用
///
/// 只有明确存储为 `false` 时才视为关闭。
pub fn load_enabled(storage: &dyn Storage) -> KoreaSelResult<bool> {
    Ok(!matches!(storage.get(ENABLED_KEY)?, Some(Value::Bool(false))))
}

pub fn save_enabled(storage: &dyn Storage, enabled: bool) -> KoreaSelResult<()> {
    storage.set(ENABLED_KEY, Value::Bool(enabled))
}

/// 读取主题，未设置时为浅色
pub fn load_theme(storage: &dyn Storage) -> KoreaSelResult<Theme> {
    Ok(match storage.get(THEME_KEY)? {
        Some(Value::String(theme)) if !theme.is_empty() => Theme::from_stored(&theme),
        _ => Theme::default(),
    })
}

pub fn save_theme(storage: &dyn Storage, theme: Theme) -> KoreaSelResult<()> {
    storage.set(THEME_KEY, Value::String(theme.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::storage::MemoryStorage;
    use serde_json::json;

    #[test]
    fn test_enabled_defaults_to_true() {
        let storage = MemoryStorage::new();
        assert!(load_enabled(&storage).unwrap());
        storage.set(ENABLED_KEY, json!(null)).unwrap();
        assert!(load_enabled(&storage).unwrap());
        save_enabled(&storage, false).unwrap();
        assert!(!load_enabled(&storage).unwrap());
    }

    #[test]
    fn test_theme_round_trip_and_fallbacks() {
        let storage = MemoryStorage::new();
        assert_eq!(load_theme(&storage).unwrap(), Theme::Light);
        save_theme(&storage, Theme::Dark).unwrap();
        assert_eq!(load_theme(&storage).unwrap(), Theme::Dark);
        storage.set(THEME_KEY, json!("solarized")).unwrap();
        assert_eq!(load_theme(&storage).unwrap(), Theme::Dark);
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("LIGHT".parse::<Theme>().unwrap(), Theme::Light);
        assert!("blue".parse::<Theme>().is_err());
    }
}

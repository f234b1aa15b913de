//! 键值存储
//!
//! 与扩展的 `storage.local` 对应：字符串键，JSON 值。
//! `JsonFileStorage` 每次读写都访问文件，多个进程共享同一份状态；
//! 读-改-写不是原子的，并发计数可能丢失。

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};

use crate::error::{KoreaSelError, KoreaSelResult};

/// 启用开关
pub const ENABLED_KEY: &str = "koreaSelectorEnabled";
/// 弹窗主题
pub const THEME_KEY: &str = "theme";
/// 选择统计
pub const STATS_KEY: &str = "koreaSelectorStats";

/// 键值存储接口
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> KoreaSelResult<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> KoreaSelResult<()>;
    fn remove(&self, key: &str) -> KoreaSelResult<()>;
}

/// 在弹窗、内容脚本和 CLI 之间共享的存储
pub type SharedStorage = Arc<dyn Storage>;

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 便于直接作为 `SharedStorage` 使用
    pub fn shared() -> SharedStorage {
        Arc::new(Self::new())
    }

    fn lock(&self) -> KoreaSelResult<std::sync::MutexGuard<'_, HashMap<String, Value>>> {
        self.entries
            .lock()
            .map_err(|e| KoreaSelError::Storage(format!("memory storage poisoned: {e}")))
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> KoreaSelResult<Option<Value>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> KoreaSelResult<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> KoreaSelResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// JSON 文件存储，文件内容是一个对象
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 文件是否已存在（首次安装判断）
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read_all(&self) -> KoreaSelResult<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            other => Err(KoreaSelError::Storage(format!(
                "{} does not hold a JSON object (found {})",
                self.path.display(),
                type_name(&other)
            ))),
        }
    }

    fn write_all(&self, map: Map<String, Value>) -> KoreaSelResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn modify<F>(&self, change: F) -> KoreaSelResult<()>
    where
        F: FnOnce(&mut Map<String, Value>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| KoreaSelError::Storage(format!("file storage poisoned: {e}")))?;
        let mut map = self.read_all()?;
        change(&mut map);
        self.write_all(map)
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> KoreaSelResult<Option<Value>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> KoreaSelResult<()> {
        self.modify(|map| {
            map.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> KoreaSelResult<()> {
        self.modify(|map| {
            map.remove(key);
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(ENABLED_KEY).unwrap(), None);
        storage.set(ENABLED_KEY, json!(false)).unwrap();
        assert_eq!(storage.get(ENABLED_KEY).unwrap(), Some(json!(false)));
        storage.remove(ENABLED_KEY).unwrap();
        assert_eq!(storage.get(ENABLED_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_storage_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let first = JsonFileStorage::new(&path);
        assert!(!first.exists());
        first.set(THEME_KEY, json!("dark")).unwrap();
        first.set(ENABLED_KEY, json!(true)).unwrap();

        let second = JsonFileStorage::new(&path);
        assert_eq!(second.get(THEME_KEY).unwrap(), Some(json!("dark")));
        assert_eq!(second.get(ENABLED_KEY).unwrap(), Some(json!(true)));
    }

    #[test]
    fn test_file_storage_rejects_non_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[1, 2]").unwrap();
        let storage = JsonFileStorage::new(&path);
        assert!(matches!(storage.get(THEME_KEY), Err(KoreaSelError::Storage(_))));
    }
}

//! 配置管理
//!
//! 加载顺序：`.env` 文件 → 第一个存在的配置文件 → 环境变量覆盖 → 验证。

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::env::{self, EnvVar};
use crate::error::{KoreaSelError, KoreaSelResult};
use crate::selector::wait::WaitOptions;

/// 配置文件搜索路径
pub const CONFIG_PATHS: &[&str] = &[
    "koreasel.toml",
    "~/.koreasel/config.toml",
    "~/.config/koreasel/config.toml",
];

pub const DEFAULT_STATE_FILE: &str = "~/.koreasel/storage.json";

/// 选择器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// 等待自定义下拉菜单渲染的超时
    pub option_timeout_ms: u64,
    pub poll_interval_ms: u64,
    /// 选中原生选项后是否派发 blur
    pub dispatch_blur: bool,
    pub state_file: String,
    pub log_level: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            option_timeout_ms: 500,
            poll_interval_ms: 50,
            dispatch_blur: true,
            state_file: DEFAULT_STATE_FILE.to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// 从环境变量读到的覆盖值，未设置的保持 `None`
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    pub log_level: Option<String>,
    pub state_file: Option<String>,
    pub option_timeout_ms: Option<u64>,
    pub poll_interval_ms: Option<u64>,
    pub dispatch_blur: Option<bool>,
}

impl EnvOverrides {
    pub fn from_env() -> KoreaSelResult<Self> {
        let config_err = |e: env::EnvError| KoreaSelError::Config(e.to_string());
        Ok(Self {
            log_level: env::LogLevel::lookup().map_err(config_err)?,
            state_file: env::StateFile::lookup().map_err(config_err)?,
            option_timeout_ms: env::OptionTimeoutMs::lookup().map_err(config_err)?,
            poll_interval_ms: env::PollIntervalMs::lookup().map_err(config_err)?,
            dispatch_blur: env::DispatchBlur::lookup().map_err(config_err)?,
        })
    }
}

impl SelectorConfig {
    /// 按完整顺序加载配置；`path` 指定时跳过搜索路径
    pub fn load(path: Option<&str>) -> KoreaSelResult<Self> {
        load_dotenv();

        let mut config = match path {
            Some(path) => {
                let expanded = shellexpand::tilde(path);
                tracing::info!("加载配置文件: {}", expanded);
                Self::load_from_file(Path::new(expanded.as_ref()))?
            }
            None => Self::load_from_search_paths()?,
        };

        config.apply_overrides(EnvOverrides::from_env()?);
        config.validate()?;
        Ok(config)
    }

    fn load_from_search_paths() -> KoreaSelResult<Self> {
        for path in CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            let candidate = Path::new(expanded.as_ref());
            if candidate.exists() {
                tracing::info!("加载配置文件: {}", expanded);
                return Self::load_from_file(candidate);
            }
        }

        tracing::debug!("未找到配置文件，使用默认配置");
        Ok(Self::default())
    }

    /// 从指定文件加载，`.toml` 以外按 JSON 解析
    pub fn load_from_file(path: &Path) -> KoreaSelResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            KoreaSelError::Config(format!("读取配置文件失败 {}: {}", path.display(), e))
        })?;

        if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| KoreaSelError::Config(format!("解析TOML配置失败: {}", e)))
        } else {
            serde_json::from_str(&content)
                .map_err(|e| KoreaSelError::Config(format!("解析JSON配置失败: {}", e)))
        }
    }

    pub fn apply_overrides(&mut self, overrides: EnvOverrides) {
        if let Some(level) = overrides.log_level {
            self.log_level = level;
        }
        if let Some(state_file) = overrides.state_file {
            self.state_file = state_file;
        }
        if let Some(timeout) = overrides.option_timeout_ms {
            self.option_timeout_ms = timeout;
        }
        if let Some(interval) = overrides.poll_interval_ms {
            self.poll_interval_ms = interval;
        }
        if let Some(blur) = overrides.dispatch_blur {
            self.dispatch_blur = blur;
        }
    }

    pub fn validate(&self) -> KoreaSelResult<()> {
        if self.poll_interval_ms == 0 {
            return Err(KoreaSelError::Config(
                "poll_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.poll_interval_ms > self.option_timeout_ms {
            return Err(KoreaSelError::Config(format!(
                "poll_interval_ms ({}) must not exceed option_timeout_ms ({})",
                self.poll_interval_ms, self.option_timeout_ms
            )));
        }
        env::LogLevel::parse(&self.log_level)
            .map_err(|e| KoreaSelError::Config(e.to_string()))?;
        Ok(())
    }

    pub fn wait_options(&self) -> WaitOptions {
        WaitOptions::default()
            .with_timeout(Duration::from_millis(self.option_timeout_ms))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
    }

    /// 展开 `~` 后的状态文件路径
    pub fn state_file_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.state_file).as_ref())
    }

    /// 生成示例配置文件
    pub fn generate_example_config(path: &Path) -> KoreaSelResult<()> {
        let content = toml::to_string_pretty(&Self::default())
            .map_err(|e| KoreaSelError::Config(format!("序列化配置失败: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 加载 .env 文件
fn load_dotenv() {
    let env_files = [".env.local", ".env"];

    for env_file in &env_files {
        if Path::new(env_file).exists() && dotenv::from_filename(env_file).is_ok() {
            tracing::info!("已加载环境变量文件: {}", env_file);
            break;
        }
    }
}

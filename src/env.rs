//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，配置文件加载之后再用它们覆盖。

use std::env;
use std::fmt;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 已设置时返回解析结果，未设置时返回 `None`
    fn lookup() -> EnvResult<Option<T>> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value).map(Some),
            Err(_) => Ok(None),
        }
    }

    fn get_or_default(default: T) -> T {
        Self::get().unwrap_or(default)
    }
}

/// 日志级别
pub struct LogLevel;
impl EnvVar<String> for LogLevel {
    const NAME: &'static str = "KOREASEL_LOG_LEVEL";
    const DEFAULT: Option<String> = None;
    const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

    fn get() -> EnvResult<String> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => Ok("info".to_string()),
        }
    }

    fn parse(value: &str) -> EnvResult<String> {
        match value.to_lowercase().as_str() {
            level @ ("trace" | "debug" | "info" | "warn" | "error") => Ok(level.to_string()),
            _ => Err(EnvError {
                variable: Self::NAME.to_string(),
                message: format!(
                    "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                    value
                ),
            }),
        }
    }
}

/// 状态文件路径
pub struct StateFile;
impl EnvVar<String> for StateFile {
    const NAME: &'static str = "KOREASEL_STATE_FILE";
    const DEFAULT: Option<String> = None;
    const DESCRIPTION: &'static str = "Path of the JSON file holding toggle, theme and stats";

    fn parse(value: &str) -> EnvResult<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EnvError {
                variable: Self::NAME.to_string(),
                message: "Path must not be empty".to_string(),
            });
        }
        Ok(trimmed.to_string())
    }
}

/// 等待自定义下拉菜单渲染的超时（毫秒）
pub struct OptionTimeoutMs;
impl EnvVar<u64> for OptionTimeoutMs {
    const NAME: &'static str = "KOREASEL_OPTION_TIMEOUT_MS";
    const DEFAULT: Option<u64> = Some(500);
    const DESCRIPTION: &'static str = "Milliseconds to wait for a custom dropdown menu to render";

    fn parse(value: &str) -> EnvResult<u64> {
        parse_millis(value, Self::NAME, 1, 60_000)
    }
}

/// 轮询间隔（毫秒）
pub struct PollIntervalMs;
impl EnvVar<u64> for PollIntervalMs {
    const NAME: &'static str = "KOREASEL_POLL_INTERVAL_MS";
    const DEFAULT: Option<u64> = Some(50);
    const DESCRIPTION: &'static str = "Milliseconds between menu polls";

    fn parse(value: &str) -> EnvResult<u64> {
        parse_millis(value, Self::NAME, 1, 10_000)
    }
}

/// 选择后是否派发 blur
pub struct DispatchBlur;
impl EnvVar<bool> for DispatchBlur {
    const NAME: &'static str = "KOREASEL_DISPATCH_BLUR";
    const DEFAULT: Option<bool> = Some(true);
    const DESCRIPTION: &'static str = "Dispatch a blur event after selecting a native option";

    fn parse(value: &str) -> EnvResult<bool> {
        parse_bool(value, Self::NAME)
    }
}

/// 禁用彩色输出
pub struct NoColor;
impl EnvVar<bool> for NoColor {
    const NAME: &'static str = "NO_COLOR";
    const DEFAULT: Option<bool> = Some(false);
    const DESCRIPTION: &'static str = "Disable colored terminal output";

    // 按惯例只要设置了就视为禁用
    fn parse(_value: &str) -> EnvResult<bool> {
        Ok(true)
    }
}

/// 辅助函数
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!(
                "Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off, enabled/disabled",
                value
            ),
        }),
    }
}

fn parse_millis(value: &str, var_name: &str, min: u64, max: u64) -> EnvResult<u64> {
    let num: u64 = value.trim().parse().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: "Must be a valid positive number".to_string(),
    })?;

    if num < min {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} is below minimum {}", num, min),
        });
    }

    if num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} exceeds maximum {}", num, max),
        });
    }

    Ok(num)
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: \"info\")\n",
        LogLevel::NAME,
        LogLevel::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: \"~/.koreasel/storage.json\")\n",
        StateFile::NAME,
        StateFile::DESCRIPTION
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        OptionTimeoutMs::NAME,
        OptionTimeoutMs::DESCRIPTION,
        OptionTimeoutMs::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        PollIntervalMs::NAME,
        PollIntervalMs::DESCRIPTION,
        PollIntervalMs::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        DispatchBlur::NAME,
        DispatchBlur::DESCRIPTION,
        DispatchBlur::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        NoColor::NAME,
        NoColor::DESCRIPTION,
        NoColor::DEFAULT
    ));
    docs
}

//! # KoreaSEL Library
//!
//! 在网页中识别国家选择控件并自动选中“韩国”。
//!
//! ## 模块组织
//!
//! - `core` - 单次运行：加载页面、启动选择器、输出结果
//! - `selector` - 匹配器、选择器识别、自动选择状态机
//! - `page` - 页面模型：DOM、事件、变更订阅
//! - `parsers` - HTML 解析与序列化
//! - `extension` - 存储、偏好、统计、弹窗与安装钩子
//! - `config` / `env` - 配置文件与环境变量
//! - `error` - 统一错误类型

pub mod config;
pub mod core;
pub mod env;
pub mod error;
pub mod extension;
pub mod page;
pub mod parsers;
pub mod selector;

// Re-export commonly used items for convenience
pub use config::SelectorConfig;
pub use crate::core::{run_document, KoreaSelOptions, RunSummary};
pub use error::{KoreaSelError, KoreaSelResult};
pub use page::Page;
pub use selector::{is_korea_match, AutoSelector};

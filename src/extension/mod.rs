//! # 扩展外壳
//!
//! 内容脚本之外的部分：持久化存储、用户偏好、统计、弹窗消息与安装钩子。

pub mod background;
pub mod messages;
pub mod popup;
pub mod settings;
pub mod stats;
pub mod storage;

pub use background::{on_installed, InstallReason, WELCOME_URL};
pub use messages::{parse_request, Request, Response};
pub use popup::{ControlSurface, LocalTab, NoActiveTab, PopupView, TabMessenger};
pub use settings::{load_enabled, load_theme, save_enabled, save_theme, Theme};
pub use stats::{load_stats, record_selection, reset_stats, LastSelection, SelectionStats};
pub use storage::{JsonFileStorage, MemoryStorage, SharedStorage, Storage};

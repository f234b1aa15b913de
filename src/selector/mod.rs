//! # 国家选择器识别与自动选择
//!
//! - `matcher` - 判断文本是否指向韩国
//! - `classifier` - 判断控件是否为国家选择器
//! - `applier` - 选中选项并派发兼容事件
//! - `session` - 启用/禁用状态机与 DOM 变更处理
//! - `wait` - 可取消的条件等待

pub mod applier;
pub mod classifier;
pub mod constants;
pub mod matcher;
pub mod session;
pub mod wait;

pub use applier::{find_korea_option, CustomSelection, SelectionApplier};
pub use classifier::{is_likely_country_selector, ControlDescriptor};
pub use matcher::{is_korea_match, KoreaMatcher, MatchReason};
pub use session::{AutoSelector, AutoSelectorSession, ProcessedSet};
pub use wait::{wait_for, WaitOptions, WaitOutcome};

//! 页面事件记录
//!
//! 选择器派发的事件全部记录在 `Page` 上，宿主页面的监听器是否能收到
//! 某个事件由冒泡规则决定。

use std::fmt;
use std::rc::Rc;

use markup5ever_rcdom::Handle;

use crate::parsers::html::{get_node_attr, get_node_name, is_inclusive_descendant};

/// 事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Change,
    Input,
    Blur,
    Click,
}

impl EventKind {
    /// DOM 事件名
    pub const fn name(&self) -> &'static str {
        match self {
            EventKind::Change => "change",
            EventKind::Input => "input",
            EventKind::Blur => "blur",
            EventKind::Click => "click",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 一次已派发的事件
#[derive(Clone)]
pub struct DispatchedEvent {
    pub target: Handle,
    pub kind: EventKind,
    pub bubbles: bool,
}

impl DispatchedEvent {
    /// 绑定在 `listener` 上的监听器能否观察到该事件
    pub fn reaches(&self, listener: &Handle) -> bool {
        if Rc::ptr_eq(&self.target, listener) {
            return true;
        }
        self.bubbles && is_inclusive_descendant(listener, &self.target)
    }
}

impl fmt::Debug for DispatchedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchedEvent")
            .field("target", &describe_node(&self.target))
            .field("kind", &self.kind)
            .field("bubbles", &self.bubbles)
            .finish()
    }
}

/// 用于日志的节点简述，例如 `select#country`
pub fn describe_node(node: &Handle) -> String {
    let tag = get_node_name(node).unwrap_or("#node");
    match (get_node_attr(node, "id"), get_node_attr(node, "name")) {
        (Some(id), _) if !id.is_empty() => format!("{tag}#{id}"),
        (_, Some(name)) if !name.is_empty() => format!("{tag}[name={name}]"),
        _ => tag.to_string(),
    }
}

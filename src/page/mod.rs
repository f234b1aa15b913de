//! # 页面模型
//!
//! `Page` 把解析后的 DOM 与内容脚本运行时需要的页面能力放在一起：
//!
//! - `url` - 页面地址，用于统计记录
//! - 事件派发记录（`events`）
//! - DOM 变更订阅（`observer`）
//! - 宿主页面的点击响应：点击自定义下拉框触发器后，经过一段延迟渲染菜单，
//!   再次点击则关闭菜单
//!
//! 页面是单线程对象，所有修改都通过 `&mut Page` 完成。

pub mod events;
pub mod forms;
pub mod observer;

use std::collections::HashMap;
use std::time::Duration;

use markup5ever_rcdom::{Handle, RcDom};
use tokio::time::Instant;
use url::Url;

use crate::error::{KoreaSelError, KoreaSelResult};
use crate::parsers::html::{
    append_child, find_nodes, get_child_node_by_name, get_node_attr, get_parent_node, html_to_dom,
    remove_node, select_elements, serialize_document, set_node_attr,
};

pub use events::{describe_node, DispatchedEvent, EventKind};
pub use observer::{MutationRecord, MutationWatcher};

use observer::Subscription;

/// 点击触发器后渲染的菜单
struct ClickReaction {
    menu_html: String,
    delay: Duration,
    state: MenuState,
}

enum MenuState {
    Closed,
    Opening(Instant),
    Open(Vec<Handle>),
}

/// 已加载的页面
pub struct Page {
    dom: RcDom,
    url: Url,
    encoding: String,
    events: Vec<DispatchedEvent>,
    subscriptions: Vec<Subscription>,
    reactions: HashMap<String, ClickReaction>,
}

impl Page {
    /// 从原始字节加载页面
    pub fn from_html(data: &[u8], encoding: &str, url: Url) -> KoreaSelResult<Self> {
        let dom = html_to_dom(data, encoding)?;

        Ok(Self {
            dom,
            url,
            encoding: encoding.to_string(),
            events: Vec::new(),
            subscriptions: Vec::new(),
            reactions: HashMap::new(),
        })
    }

    /// 从 UTF-8 字符串加载页面
    pub fn parse(html: &str, url: &str) -> KoreaSelResult<Self> {
        let url = Url::parse(url)
            .map_err(|e| KoreaSelError::InvalidInput(format!("invalid page URL '{url}': {e}")))?;
        Self::from_html(html.as_bytes(), "utf-8", url)
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Handle {
        &self.dom.document
    }

    /// `<body>` 元素
    pub fn body(&self) -> KoreaSelResult<Handle> {
        get_child_node_by_name(&self.dom.document, "html")
            .and_then(|html| get_child_node_by_name(&html, "body"))
            .ok_or_else(|| KoreaSelError::Dom("document has no body".to_string()))
    }

    /// 按 id 查找元素
    pub fn get_element_by_id(&self, id: &str) -> Option<Handle> {
        if id.is_empty() {
            return None;
        }
        select_elements(&self.dom.document, false, |node| {
            get_node_attr(node, "id").as_deref() == Some(id)
        })
        .into_iter()
        .next()
    }

    /// 与控件 id 关联的 `<label for=...>`
    pub fn label_for(&self, id: &str) -> Option<Handle> {
        if id.is_empty() {
            return None;
        }
        find_nodes(&self.dom.document, vec!["label"])
            .into_iter()
            .find(|label| get_node_attr(label, "for").as_deref() == Some(id))
    }

    /// 在整个文档中按条件查找元素
    pub fn query_all<F>(&self, predicate: F) -> Vec<Handle>
    where
        F: Fn(&Handle) -> bool,
    {
        select_elements(&self.dom.document, false, predicate)
    }

    /// 订阅 `root` 子树内的子节点插入
    pub fn start_watching(&mut self, root: &Handle) -> MutationWatcher {
        let (subscription, watcher) = Subscription::new(root.clone());
        self.subscriptions.push(subscription);
        watcher
    }

    /// 解析 HTML 片段并追加到 `parent` 末尾，返回新插入的顶层节点
    pub fn append_html(&mut self, parent: &Handle, html: &str) -> KoreaSelResult<Vec<Handle>> {
        let fragment = html_to_dom(html.as_bytes(), "utf-8")?;
        let fragment_body = get_child_node_by_name(&fragment.document, "html")
            .and_then(|html| get_child_node_by_name(&html, "body"))
            .ok_or_else(|| KoreaSelError::Dom("fragment has no body".to_string()))?;

        let added_nodes: Vec<Handle> = fragment_body.children.borrow_mut().drain(..).collect();
        for node in &added_nodes {
            append_child(parent, node);
        }

        if !added_nodes.is_empty() {
            self.notify(MutationRecord {
                target: parent.clone(),
                added_nodes: added_nodes.clone(),
            });
        }

        Ok(added_nodes)
    }

    /// 追加到 `<body>` 末尾
    pub fn append_to_body(&mut self, html: &str) -> KoreaSelResult<Vec<Handle>> {
        let body = self.body()?;
        self.append_html(&body, html)
    }

    fn notify(&mut self, record: MutationRecord) {
        self.subscriptions.retain(|subscription| subscription.is_alive());
        for subscription in &self.subscriptions {
            subscription.deliver(&record);
        }
    }

    /// 派发事件
    pub fn dispatch_event(&mut self, target: &Handle, kind: EventKind, bubbles: bool) {
        self.events.push(DispatchedEvent {
            target: target.clone(),
            kind,
            bubbles,
        });
    }

    /// 已派发的全部事件
    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    /// 绑定在 `listener` 上、监听 `kind` 的监听器收到的事件数
    pub fn events_reaching(&self, listener: &Handle, kind: EventKind) -> usize {
        self.events
            .iter()
            .filter(|event| event.kind == kind && event.reaches(listener))
            .count()
    }

    /// 注册点击 `element_id` 时的菜单渲染行为
    pub fn on_click(&mut self, element_id: &str, menu_html: &str, delay: Duration) {
        self.reactions.insert(
            element_id.to_string(),
            ClickReaction {
                menu_html: menu_html.to_string(),
                delay,
                state: MenuState::Closed,
            },
        );
    }

    /// 模拟用户点击
    pub fn click(&mut self, target: &Handle) -> KoreaSelResult<()> {
        self.dispatch_event(target, EventKind::Click, true);

        if get_node_attr(target, "role").as_deref() == Some("option") {
            self.mark_option_selected(target)?;
        }

        if let Some(id) = get_node_attr(target, "id") {
            self.toggle_menu(&id, target)?;
        }

        Ok(())
    }

    fn mark_option_selected(&mut self, option: &Handle) -> KoreaSelResult<()> {
        let mut listbox = get_parent_node(option);
        while let Some(node) = listbox.clone() {
            if get_node_attr(&node, "role").as_deref() == Some("listbox") {
                break;
            }
            listbox = get_parent_node(&node);
        }

        if let Some(listbox) = listbox {
            let siblings = select_elements(&listbox, false, |node| {
                get_node_attr(node, "role").as_deref() == Some("option")
            });
            for sibling in siblings {
                set_node_attr(&sibling, "aria-selected", Some("false".to_string()))?;
            }
        }

        set_node_attr(option, "aria-selected", Some("true".to_string()))
    }

    fn toggle_menu(&mut self, id: &str, trigger: &Handle) -> KoreaSelResult<()> {
        let Some(reaction) = self.reactions.get_mut(id) else {
            return Ok(());
        };

        let previous = std::mem::replace(&mut reaction.state, MenuState::Closed);
        let expanded = match previous {
            MenuState::Closed => {
                reaction.state = MenuState::Opening(Instant::now() + reaction.delay);
                true
            }
            MenuState::Opening(_) => false,
            MenuState::Open(nodes) => {
                for node in &nodes {
                    remove_node(node);
                }
                false
            }
        };

        set_node_attr(trigger, "aria-expanded", Some(expanded.to_string()))?;

        if expanded && reaction_delay_elapsed(self.reactions.get(id)) {
            self.tick()?;
        }

        Ok(())
    }

    /// 渲染到期的菜单，返回本次渲染的菜单数
    pub fn tick(&mut self) -> KoreaSelResult<usize> {
        let now = Instant::now();
        let due: Vec<(String, String)> = self
            .reactions
            .iter()
            .filter_map(|(id, reaction)| match reaction.state {
                MenuState::Opening(deadline) if deadline <= now => {
                    Some((id.clone(), reaction.menu_html.clone()))
                }
                _ => None,
            })
            .collect();

        for (id, menu_html) in &due {
            let nodes = self.append_to_body(menu_html)?;
            if let Some(reaction) = self.reactions.get_mut(id) {
                reaction.state = MenuState::Open(nodes);
            }
        }

        Ok(due.len())
    }

    /// 序列化为页面原编码
    pub fn serialize(&self) -> KoreaSelResult<Vec<u8>> {
        serialize_document(&self.dom.document, &self.encoding)
    }
}

fn reaction_delay_elapsed(reaction: Option<&ClickReaction>) -> bool {
    match reaction {
        Some(ClickReaction {
            state: MenuState::Opening(deadline),
            ..
        }) => *deadline <= Instant::now(),
        _ => false,
    }
}

//! 自动选择器
//!
//! 两个状态：`Disabled` 与 `Enabled`。启用时先对整个文档扫描一次，
//! 再订阅 `<body>` 子树的节点插入；之后每次 `pump` 处理排队的插入批次。
//!
//! 每个启用周期对应一个 `AutoSelectorSession`，持有已处理集合、变更订阅
//! 和取消标记。禁用时会话被销毁，已处理集合随之清空，重新启用会重新扫描。

use std::collections::HashMap;
use std::rc::Rc;

use markup5ever_rcdom::{Handle, Node};
use tokio_util::sync::CancellationToken;

use crate::config::SelectorConfig;
use crate::error::KoreaSelResult;
use crate::extension::messages::{Request, Response, DISABLED_MESSAGE, ENABLED_MESSAGE};
use crate::extension::settings::load_enabled;
use crate::extension::storage::SharedStorage;
use crate::page::forms::{is_option_selected, option_label, option_value, options_of};
use crate::page::{describe_node, MutationWatcher, Page};
use crate::parsers::html::{get_node_attr, get_node_name, has_class, select_elements};

use super::applier::SelectionApplier;
use super::classifier::{is_likely_country_selector, ControlDescriptor};
use super::constants::COUNTRY_SELECT_CLASS;
use super::matcher::is_korea_match;

/// 已处理控件集合，按节点身份去重
///
/// 集合持有节点引用，节点在会话期间不会被释放，地址不会被复用。
#[derive(Default)]
pub struct ProcessedSet {
    nodes: HashMap<*const Node, Handle>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, node: &Handle) -> bool {
        self.nodes.contains_key(&Rc::as_ptr(node))
    }

    /// 加入集合，已存在时返回 false
    pub fn insert(&mut self, node: &Handle) -> bool {
        self.nodes.insert(Rc::as_ptr(node), node.clone()).is_none()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// 一个启用周期内的状态
pub struct AutoSelectorSession {
    processed: ProcessedSet,
    watcher: Option<MutationWatcher>,
    cancel: CancellationToken,
}

impl AutoSelectorSession {
    fn new() -> Self {
        Self {
            processed: ProcessedSet::new(),
            watcher: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    fn replace_watcher(&mut self, watcher: MutationWatcher) {
        if let Some(mut previous) = self.watcher.replace(watcher) {
            previous.stop();
        }
    }

    fn teardown(mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            watcher.stop();
        }
        self.cancel.cancel();
    }
}

enum SelectorState {
    Disabled,
    Enabled(AutoSelectorSession),
}

/// 内容脚本的自动选择器
pub struct AutoSelector {
    state: SelectorState,
    applier: SelectionApplier,
    storage: SharedStorage,
}

impl AutoSelector {
    pub fn new(config: &SelectorConfig, storage: SharedStorage) -> Self {
        let applier = SelectionApplier::new(
            storage.clone(),
            config.dispatch_blur,
            config.wait_options(),
        );

        Self {
            state: SelectorState::Disabled,
            applier,
            storage,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, SelectorState::Enabled(_))
    }

    /// 当前会话，禁用时为 `None`
    pub fn session(&self) -> Option<&AutoSelectorSession> {
        match &self.state {
            SelectorState::Enabled(session) => Some(session),
            SelectorState::Disabled => None,
        }
    }

    /// 当前会话的取消标记，可交给其他任务在等待期间中止选择
    pub fn cancel_handle(&self) -> Option<CancellationToken> {
        self.session().map(|session| session.cancel.clone())
    }

    /// 页面加载时调用：按存储的开关决定是否启用，返回选择次数
    pub async fn start(&mut self, page: &mut Page) -> KoreaSelResult<usize> {
        let enabled = load_enabled(self.storage.as_ref())?;
        tracing::info!(enabled, url = %page.url(), "KoreaSEL 内容脚本已加载");

        if enabled {
            self.enable(page).await
        } else {
            Ok(0)
        }
    }

    /// 启用并扫描整个文档
    ///
    /// 已启用时替换原有订阅并重新扫描，已处理集合保留。
    pub async fn enable(&mut self, page: &mut Page) -> KoreaSelResult<usize> {
        let body = page.body()?;

        if let SelectorState::Disabled = self.state {
            self.state = SelectorState::Enabled(AutoSelectorSession::new());
        }

        tracing::info!("[KoreaSEL] Initial processing of all potential selectors.");
        let selections = self.find_and_process_selectors(page, &body).await;

        let watcher = page.start_watching(&body);
        if let SelectorState::Enabled(session) = &mut self.state {
            session.replace_watcher(watcher);
        }

        Ok(selections)
    }

    /// 禁用：停止订阅、取消等待、清空已处理集合
    pub fn disable(&mut self) {
        if let SelectorState::Enabled(session) =
            std::mem::replace(&mut self.state, SelectorState::Disabled)
        {
            tracing::info!(processed = session.processed.len(), "自动选择已停用");
            session.teardown();
        }
    }

    /// 处理弹窗消息
    pub async fn handle_message(&mut self, page: &mut Page, request: Request) -> Response {
        match request {
            Request::ToggleAutoSelect { enabled: true } => match self.enable(page).await {
                Ok(_) => Response::ok(ENABLED_MESSAGE),
                Err(e) => Response::failure(e.to_string()),
            },
            Request::ToggleAutoSelect { enabled: false } => {
                self.disable();
                Response::ok(DISABLED_MESSAGE)
            }
        }
    }

    /// 处理已排队的 DOM 插入，返回选择次数
    pub async fn pump(&mut self, page: &mut Page) -> usize {
        let records = match &mut self.state {
            SelectorState::Enabled(session) => match session.watcher.as_mut() {
                Some(watcher) => watcher.take_records(),
                None => return 0,
            },
            SelectorState::Disabled => return 0,
        };

        let mut selections = 0;
        for record in records {
            for node in record.added_elements() {
                selections += self.find_and_process_selectors(page, node).await;
            }
        }
        selections
    }

    /// 在 `root` 子树（含 `root` 本身）中处理原生与自定义下拉框
    pub async fn find_and_process_selectors(&mut self, page: &mut Page, root: &Handle) -> usize {
        let mut selections = 0;

        let selects = select_elements(root, true, |node| get_node_name(node) == Some("select"));
        for select in &selects {
            if self.process_select(page, select) {
                selections += 1;
            }
        }

        let triggers = select_elements(root, true, is_custom_trigger);
        for trigger in &triggers {
            if self.process_custom_dropdown(page, trigger).await {
                selections += 1;
            }
        }

        selections
    }

    fn process_select(&mut self, page: &mut Page, select: &Handle) -> bool {
        let SelectorState::Enabled(session) = &mut self.state else {
            return false;
        };
        if session.processed.contains(select) {
            return false;
        }

        let descriptor = ControlDescriptor::from_node(page, select);
        if !is_likely_country_selector(&descriptor) {
            return false;
        }

        let span = tracing::debug_span!("select", control = %describe_node(select));
        let _enter = span.enter();
        session.processed.insert(select);

        let korea_option = options_of(select).into_iter().find(|option| {
            is_korea_match(&option_label(option)) || is_korea_match(&option_value(option))
        });

        match korea_option {
            Some(option) if !is_option_selected(select, &option) => {
                tracing::debug!(option = %option_label(&option), "找到韩国选项");
                self.applier.select_native(page, select, &option)
            }
            _ => {
                tracing::debug!("Korea option not found or already selected.");
                false
            }
        }
    }

    async fn process_custom_dropdown(&mut self, page: &mut Page, trigger: &Handle) -> bool {
        let SelectorState::Enabled(session) = &mut self.state else {
            return false;
        };
        if session.processed.contains(trigger) {
            return false;
        }
        if get_node_attr(trigger, "aria-expanded").as_deref() == Some("true") {
            return false;
        }
        if get_node_name(trigger) == Some("select") {
            return false;
        }

        let descriptor = ControlDescriptor::from_node(page, trigger);
        if !is_likely_country_selector(&descriptor) {
            return false;
        }

        session.processed.insert(trigger);
        let cancel = session.cancel.clone();
        tracing::debug!(control = %describe_node(trigger), "处理自定义下拉框");

        self.applier
            .select_custom(page, trigger, &cancel)
            .await
            .is_selected()
    }
}

/// `[role="combobox"], [aria-haspopup="listbox"], .country-select`
fn is_custom_trigger(node: &Handle) -> bool {
    get_node_attr(node, "role").as_deref() == Some("combobox")
        || get_node_attr(node, "aria-haspopup").as_deref() == Some("listbox")
        || has_class(node, COUNTRY_SELECT_CLASS)
}

//! 选择执行器
//!
//! 修改控件以选中韩国选项，并派发兼容事件，让宿主页面的监听器像处理
//! 用户操作一样做出反应。成功后写入统计。
//!
//! 原生下拉框的 DOM 修改失败只记录日志，不回滚、不向上传递。

use std::rc::Rc;

use markup5ever_rcdom::Handle;
use tokio_util::sync::CancellationToken;

use crate::error::{KoreaSelError, KoreaSelResult};
use crate::extension::stats::record_selection;
use crate::extension::storage::SharedStorage;
use crate::page::forms::{option_label, set_selected_option};
use crate::page::{describe_node, EventKind, Page};
use crate::parsers::html::{
    get_node_attr, get_node_name, get_text_content, is_inclusive_descendant, select_elements,
    CUSTOM_OPTION_TAGS,
};

use super::matcher::is_korea_match;
use super::wait::{wait_for, WaitOptions, WaitOutcome};

/// 自定义下拉框的处理结果
#[derive(Clone)]
pub enum CustomSelection {
    /// 已点击匹配的选项
    Selected(Handle),
    /// 菜单中没有韩国选项，已关闭菜单
    NotFound,
    /// 等待期间会话被取消，已关闭菜单
    Cancelled,
}

impl CustomSelection {
    pub fn is_selected(&self) -> bool {
        matches!(self, CustomSelection::Selected(_))
    }
}

pub struct SelectionApplier {
    storage: SharedStorage,
    dispatch_blur: bool,
    wait: WaitOptions,
}

impl SelectionApplier {
    pub fn new(storage: SharedStorage, dispatch_blur: bool, wait: WaitOptions) -> Self {
        Self {
            storage,
            dispatch_blur,
            wait,
        }
    }

    /// 选中原生下拉框的选项，成功返回 true
    pub fn select_native(&self, page: &mut Page, select: &Handle, option: &Handle) -> bool {
        match self.try_select_native(page, select, option) {
            Ok(()) => {
                let control = describe_node(select);
                let label = option_label(option);
                tracing::info!(control = %control, option = %label, "已自动选择韩国");
                self.record(page);
                true
            }
            Err(e) => {
                tracing::warn!(control = %describe_node(select), "选择韩国选项失败: {}", e);
                false
            }
        }
    }

    fn try_select_native(
        &self,
        page: &mut Page,
        select: &Handle,
        option: &Handle,
    ) -> KoreaSelResult<()> {
        if Rc::ptr_eq(select, option) || !is_inclusive_descendant(select, option) {
            return Err(KoreaSelError::Dom(
                "option does not belong to the select element".to_string(),
            ));
        }

        set_selected_option(select, option)?;

        // change → input → blur，与用户操作的顺序一致
        page.dispatch_event(select, EventKind::Change, true);
        page.dispatch_event(select, EventKind::Input, true);
        if self.dispatch_blur {
            page.dispatch_event(select, EventKind::Blur, true);
        }

        Ok(())
    }

    /// 打开自定义下拉框并点击韩国选项
    pub async fn select_custom(
        &self,
        page: &mut Page,
        trigger: &Handle,
        cancel: &CancellationToken,
    ) -> CustomSelection {
        if let Err(e) = page.click(trigger) {
            tracing::warn!(control = %describe_node(trigger), "打开下拉菜单失败: {}", e);
            return CustomSelection::NotFound;
        }

        match wait_for(page, &self.wait, cancel, find_korea_option).await {
            WaitOutcome::Found(option) => {
                if let Err(e) = page.click(&option) {
                    tracing::warn!("点击韩国选项失败: {}", e);
                    return CustomSelection::NotFound;
                }
                let control = describe_node(trigger);
                let text = get_text_content(&option);
                tracing::info!(
                    control = %control,
                    option = %text.trim(),
                    "已在自定义下拉菜单中选择韩国"
                );
                self.record(page);
                CustomSelection::Selected(option)
            }
            WaitOutcome::TimedOut => {
                tracing::debug!(control = %describe_node(trigger), "下拉菜单中未找到韩国选项");
                self.close_menu(page, trigger);
                CustomSelection::NotFound
            }
            WaitOutcome::Cancelled => {
                tracing::debug!(control = %describe_node(trigger), "等待下拉菜单时会话已取消");
                self.close_menu(page, trigger);
                CustomSelection::Cancelled
            }
        }
    }

    fn close_menu(&self, page: &mut Page, trigger: &Handle) {
        if let Err(e) = page.click(trigger) {
            tracing::warn!(control = %describe_node(trigger), "关闭下拉菜单失败: {}", e);
        }
    }

    fn record(&self, page: &Page) {
        if let Err(e) = record_selection(self.storage.as_ref(), page.url().as_str()) {
            tracing::warn!("更新统计失败: {}", e);
        }
    }
}

fn is_custom_option(node: &Handle) -> bool {
    get_node_attr(node, "role").as_deref() == Some("option")
        || get_node_name(node).is_some_and(|tag| CUSTOM_OPTION_TAGS.contains(&tag))
}

/// 在所有 `role="listbox"` 中查找韩国选项
///
/// 外层容器的文本包含全部选项，因此同一条线上取最深的匹配元素。
pub fn find_korea_option(page: &Page) -> Option<Handle> {
    let listboxes = page.query_all(|node| get_node_attr(node, "role").as_deref() == Some("listbox"));

    listboxes.iter().find_map(|listbox| {
        let matching: Vec<Handle> = select_elements(listbox, false, is_custom_option)
            .into_iter()
            .filter(|candidate| is_korea_match(&get_text_content(candidate)))
            .collect();

        matching
            .iter()
            .find(|candidate| {
                !matching.iter().any(|other| {
                    !Rc::ptr_eq(other, candidate) && is_inclusive_descendant(candidate, other)
                })
            })
            .cloned()
    })
}

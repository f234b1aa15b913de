//! DOM 变更订阅
//!
//! `Page::start_watching` 返回一个 `MutationWatcher`。页面每次插入节点都会向
//! 覆盖插入点的活跃订阅发送一条 `MutationRecord`，订阅方按批次取出。

use std::cell::Cell;
use std::rc::Rc;

use markup5ever_rcdom::Handle;
use tokio::sync::mpsc;

use crate::parsers::html::{is_element, is_inclusive_descendant};

/// 一次子节点插入
#[derive(Clone)]
pub struct MutationRecord {
    /// 插入点（新节点的父节点）
    pub target: Handle,
    /// 新插入的节点，包括文本节点
    pub added_nodes: Vec<Handle>,
}

impl MutationRecord {
    /// 只保留元素类型的新节点
    pub fn added_elements(&self) -> impl Iterator<Item = &Handle> {
        self.added_nodes.iter().filter(|node| is_element(node))
    }
}

/// 页面一侧持有的订阅端
pub(crate) struct Subscription {
    root: Handle,
    sender: mpsc::UnboundedSender<MutationRecord>,
    active: Rc<Cell<bool>>,
}

impl Subscription {
    pub(crate) fn new(root: Handle) -> (Self, MutationWatcher) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let active = Rc::new(Cell::new(true));

        let subscription = Self {
            root,
            sender,
            active: active.clone(),
        };
        let watcher = MutationWatcher { receiver, active };

        (subscription, watcher)
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.active.get() && !self.sender.is_closed()
    }

    /// 插入点位于订阅根的子树内时转发记录
    pub(crate) fn deliver(&self, record: &MutationRecord) {
        if is_inclusive_descendant(&self.root, &record.target) {
            // 接收端已关闭时下一轮会被清理
            let _ = self.sender.send(record.clone());
        }
    }
}

/// 订阅句柄
pub struct MutationWatcher {
    receiver: mpsc::UnboundedReceiver<MutationRecord>,
    active: Rc<Cell<bool>>,
}

impl MutationWatcher {
    /// 是否仍在接收变更
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// 停止订阅并丢弃尚未取出的记录
    pub fn stop(&mut self) {
        self.active.set(false);
        self.receiver.close();
        while self.receiver.try_recv().is_ok() {}
    }

    /// 取出当前已排队的全部记录，不等待
    pub fn take_records(&mut self) -> Vec<MutationRecord> {
        let mut records = Vec::new();
        if !self.is_active() {
            return records;
        }
        while let Ok(record) = self.receiver.try_recv() {
            records.push(record);
        }
        records
    }
}

impl Drop for MutationWatcher {
    fn drop(&mut self) {
        self.active.set(false);
    }
}

// 集成测试公共模块
//
// 提供测试辅助工具和共享功能

use std::time::Duration;

use koreasel::config::SelectorConfig;
use koreasel::extension::{load_stats, MemoryStorage, SharedStorage};
use koreasel::page::forms::select_value;
use koreasel::page::Page;
use koreasel::parsers::html::get_node_attr;
use koreasel::selector::AutoSelector;

pub const PAGE_URL: &str = "https://shop.example/checkout";

/// 超过十个选项、没有国家相关属性的下拉框
pub const UNLABELED_COUNTRY_LIST: &str = "<select id='anon'>\
    <option>Choose one</option>\
    <option>Argentina</option><option>Brazil</option><option>Canada</option>\
    <option>Denmark</option><option>Egypt</option><option>France</option>\
    <option>Germany</option><option>India</option><option>Japan</option>\
    <option>Kenya</option><option>Korea, Republic of</option>\
    </select>";

/// 测试环境：内存存储、选择器、页面
pub struct TestEnvironment {
    pub storage: SharedStorage,
    pub selector: AutoSelector,
    pub page: Page,
}

impl TestEnvironment {
    pub fn new(html: &str) -> Self {
        Self::with_config(html, SelectorConfig::default())
    }

    pub fn with_config(html: &str, config: SelectorConfig) -> Self {
        let storage = MemoryStorage::shared();
        let selector = AutoSelector::new(&config, storage.clone());
        let page = Page::parse(html, PAGE_URL).expect("test page should parse");
        Self {
            storage,
            selector,
            page,
        }
    }

    pub async fn enable(&mut self) -> usize {
        self.selector
            .enable(&mut self.page)
            .await
            .expect("enable should succeed")
    }

    /// 插入片段并处理变更
    pub async fn insert(&mut self, html: &str) -> usize {
        self.page
            .append_to_body(html)
            .expect("fragment should be appended");
        self.selector.pump(&mut self.page).await
    }

    pub fn total_selections(&self) -> u64 {
        load_stats(self.storage.as_ref())
            .expect("stats should load")
            .total_selections
    }

    pub fn value_of(&self, id: &str) -> Option<String> {
        let select = self.page.get_element_by_id(id)?;
        select_value(&select)
    }

    pub fn attr_of(&self, id: &str, attr: &str) -> Option<String> {
        let node = self.page.get_element_by_id(id)?;
        get_node_attr(&node, attr)
    }
}

/// 短超时配置，便于在暂停时钟下测试
pub fn fast_config() -> SelectorConfig {
    SelectorConfig {
        option_timeout_ms: 200,
        poll_interval_ms: 20,
        ..SelectorConfig::default()
    }
}

pub fn menu_delay(ms: u64) -> Duration {
    Duration::from_millis(ms)
}

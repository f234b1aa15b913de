//! 弹窗控制面板
//!
//! 保存开关与主题，并把开关变化通知当前标签页的内容脚本。

use crate::error::{KoreaSelError, KoreaSelResult};
use crate::page::Page;
use crate::selector::AutoSelector;

use super::messages::{Request, Response};
use super::settings::{load_enabled, load_theme, save_enabled, save_theme, Theme};
use super::storage::SharedStorage;

/// 项目主页，点击版权链接时打开
pub const COPYRIGHT_URL: &str = "https://github.com/mirseo/WhereIsKorea-Extensions";

/// 当前活动标签页的消息通道
#[allow(async_fn_in_trait)]
pub trait TabMessenger {
    /// 是否存在可接收消息的标签页
    fn is_available(&self) -> bool {
        true
    }

    async fn send(&mut self, request: Request) -> KoreaSelResult<Response>;
}

/// 直接把消息交给同一进程内的选择器和页面
pub struct LocalTab<'a> {
    selector: &'a mut AutoSelector,
    page: &'a mut Page,
}

impl<'a> LocalTab<'a> {
    pub fn new(selector: &'a mut AutoSelector, page: &'a mut Page) -> Self {
        Self { selector, page }
    }
}

impl TabMessenger for LocalTab<'_> {
    async fn send(&mut self, request: Request) -> KoreaSelResult<Response> {
        let response = self.selector.handle_message(self.page, request).await;
        if response.success {
            Ok(response)
        } else {
            Err(KoreaSelError::Messaging(response.message))
        }
    }
}

/// 没有活动标签页，例如从命令行切换开关
#[derive(Debug, Default, Clone, Copy)]
pub struct NoActiveTab;

impl TabMessenger for NoActiveTab {
    fn is_available(&self) -> bool {
        false
    }

    async fn send(&mut self, _request: Request) -> KoreaSelResult<Response> {
        Err(KoreaSelError::Messaging("no active tab".to_string()))
    }
}

/// 弹窗当前显示的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupView {
    pub enabled: bool,
    pub status_text: &'static str,
    pub status_class: &'static str,
    pub theme: Theme,
    pub theme_menu_open: bool,
}

impl PopupView {
    fn new(enabled: bool, theme: Theme) -> Self {
        let mut view = Self {
            enabled,
            status_text: "",
            status_class: "",
            theme,
            theme_menu_open: false,
        };
        view.set_enabled(enabled);
        view
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        (self.status_text, self.status_class) = if enabled {
            ("Enabled", "status enabled")
        } else {
            ("Disabled", "status disabled")
        };
    }

    /// 浅色主题时 `<body>` 带 `light-theme` 类
    pub fn body_has_light_theme(&self) -> bool {
        self.theme == Theme::Light
    }
}

pub struct ControlSurface<M> {
    storage: SharedStorage,
    messenger: M,
    view: PopupView,
}

impl<M: TabMessenger> ControlSurface<M> {
    /// 打开弹窗并读取已保存的状态
    pub fn open(storage: SharedStorage, messenger: M) -> KoreaSelResult<Self> {
        let enabled = load_enabled(storage.as_ref())?;
        let theme = load_theme(storage.as_ref())?;

        Ok(Self {
            storage,
            messenger,
            view: PopupView::new(enabled, theme),
        })
    }

    pub fn view(&self) -> &PopupView {
        &self.view
    }

    /// 切换自动选择
    ///
    /// 先保存再通知内容脚本；通知失败只记录日志，保存的状态在下次加载页面时生效。
    pub async fn toggle(&mut self, enabled: bool) -> KoreaSelResult<()> {
        save_enabled(self.storage.as_ref(), enabled)?;
        self.view.set_enabled(enabled);

        if !self.messenger.is_available() {
            tracing::debug!("没有活动标签页，跳过通知");
            return Ok(());
        }

        match self.messenger.send(Request::ToggleAutoSelect { enabled }).await {
            Ok(response) => tracing::info!(enabled, "{}", response.message),
            Err(e) => tracing::warn!("Could not send message to content script: {}", e),
        }
        Ok(())
    }

    pub fn toggle_theme_menu(&mut self) {
        self.view.theme_menu_open = !self.view.theme_menu_open;
    }

    /// 点击主题菜单以外的区域
    pub fn dismiss_theme_menu(&mut self) {
        self.view.theme_menu_open = false;
    }

    /// 选择主题，保存后关闭主题菜单
    pub fn select_theme(&mut self, theme: Theme) -> KoreaSelResult<()> {
        save_theme(self.storage.as_ref(), theme)?;
        self.view.theme = theme;
        self.view.theme_menu_open = false;
        Ok(())
    }

    pub fn copyright_url(&self) -> &'static str {
        COPYRIGHT_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectorConfig;
    use crate::extension::storage::MemoryStorage;

    /// 总是失败的通道
    struct BrokenTab;

    impl TabMessenger for BrokenTab {
        async fn send(&mut self, _request: Request) -> KoreaSelResult<Response> {
            Err(KoreaSelError::Messaging("receiving end does not exist".to_string()))
        }
    }

    #[test]
    fn test_open_reads_defaults() {
        let popup = ControlSurface::open(MemoryStorage::shared(), NoActiveTab).unwrap();
        let view = popup.view();
        assert!(view.enabled);
        assert_eq!(view.status_text, "Enabled");
        assert_eq!(view.status_class, "status enabled");
        assert!(view.body_has_light_theme());
        assert_eq!(popup.copyright_url(), COPYRIGHT_URL);
    }

    #[tokio::test]
    async fn test_toggle_persists_even_when_messaging_fails() {
        let storage = MemoryStorage::shared();
        let mut popup = ControlSurface::open(storage.clone(), BrokenTab).unwrap();
        popup.toggle(false).await.unwrap();
        assert_eq!(popup.view().status_text, "Disabled");
        assert!(!load_enabled(storage.as_ref()).unwrap());
    }

    #[tokio::test]
    async fn test_toggle_reaches_local_selector() {
        let storage = MemoryStorage::shared();
        let mut selector = AutoSelector::new(&SelectorConfig::default(), storage.clone());
        let mut page = Page::parse("<p>checkout</p>", "https://shop.example/").unwrap();

        {
            let mut popup =
                ControlSurface::open(storage.clone(), LocalTab::new(&mut selector, &mut page))
                    .unwrap();
            popup.toggle(true).await.unwrap();
        }
        assert!(selector.is_enabled());

        {
            let mut popup =
                ControlSurface::open(storage.clone(), LocalTab::new(&mut selector, &mut page))
                    .unwrap();
            popup.toggle(false).await.unwrap();
        }
        assert!(!selector.is_enabled());
    }

    #[test]
    fn test_theme_menu() {
        let storage = MemoryStorage::shared();
        let mut popup = ControlSurface::open(storage.clone(), NoActiveTab).unwrap();
        popup.toggle_theme_menu();
        assert!(popup.view().theme_menu_open);
        popup.select_theme(Theme::Dark).unwrap();
        assert!(!popup.view().theme_menu_open);
        assert!(!popup.view().body_has_light_theme());
        assert_eq!(load_theme(storage.as_ref()).unwrap(), Theme::Dark);

        popup.toggle_theme_menu();
        popup.dismiss_theme_menu();
        assert!(!popup.view().theme_menu_open);
    }
}

//! 安装钩子

use std::str::FromStr;

use url::Url;

use crate::error::KoreaSelError;

/// 欢迎页
pub const WELCOME_URL: &str = "https://koreasel.mirseo.dev/welcome";

/// 扩展安装事件的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallReason {
    Install,
    Update,
    ChromeUpdate,
    SharedModuleUpdate,
}

impl FromStr for InstallReason {
    type Err = KoreaSelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "install" => Ok(InstallReason::Install),
            "update" => Ok(InstallReason::Update),
            "chrome_update" => Ok(InstallReason::ChromeUpdate),
            "shared_module_update" => Ok(InstallReason::SharedModuleUpdate),
            other => Err(KoreaSelError::InvalidInput(format!(
                "unknown install reason '{other}'"
            ))),
        }
    }
}

/// 首次安装时返回需要打开的欢迎页
pub fn on_installed(reason: InstallReason) -> Option<Url> {
    match reason {
        InstallReason::Install => Url::parse(WELCOME_URL).ok(),
        _ => None,
    }
}

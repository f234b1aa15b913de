//! 弹窗与内容脚本之间的消息

use serde::{Deserialize, Serialize};

/// 弹窗发往内容脚本的请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    /// 切换自动选择
    ToggleAutoSelect { enabled: bool },
}

/// 内容脚本的回复
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    pub message: String,
}

pub const ENABLED_MESSAGE: &str = "자동 선택이 활성화되었습니다";
pub const DISABLED_MESSAGE: &str = "자동 선택이 비활성화되었습니다";

impl Response {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// 解析原始 JSON 消息，未知动作返回失败回复
pub fn parse_request(raw: &str) -> Result<Request, Response> {
    serde_json::from_str(raw).map_err(|e| Response::failure(format!("unsupported message: {e}")))
}

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use encoding_rs::Encoding;
use url::Url;

use crate::config::SelectorConfig;
use crate::env::{EnvVar, NoColor};
use crate::error::{KoreaSelError, KoreaSelResult};
use crate::extension::storage::SharedStorage;
use crate::page::Page;
use crate::selector::AutoSelector;

const ANSI_COLOR_RED: &str = "\x1b[31m";
const ANSI_COLOR_RESET: &str = "\x1b[0m";

/// 单次运行的选项
#[derive(Debug, Default, Clone)]
pub struct KoreaSelOptions {
    /// 页面地址，缺省时使用输入文件的 `file://` 地址
    pub url: Option<String>,
    /// 输入与输出编码，缺省为 UTF-8
    pub encoding: Option<String>,
    /// 页面加载后依次插入 `<body>` 的 HTML 片段
    pub fragments: Vec<String>,
    pub config: SelectorConfig,
}

/// 运行结果
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub enabled: bool,
    /// 加载时的首次扫描中完成的选择
    pub initial_selections: usize,
    /// 插入片段后完成的选择
    pub inserted_selections: usize,
    pub processed_controls: usize,
    pub document: Vec<u8>,
}

impl RunSummary {
    pub fn total_selections(&self) -> usize {
        self.initial_selections + self.inserted_selections
    }
}

/// 加载页面、运行自动选择器、返回处理后的文档
///
/// 流程与内容脚本在浏览器里的生命周期一致：页面加载时按保存的开关启动，
/// 之后每插入一个片段就处理一次排队的 DOM 变更。
pub async fn run_document(
    input_data: &[u8],
    options: &KoreaSelOptions,
    storage: SharedStorage,
    default_url: Option<Url>,
) -> KoreaSelResult<RunSummary> {
    // 1. 验证配置
    options.config.validate()?;
    let encoding = resolve_encoding(options.encoding.as_deref())?;

    // 2. 确定页面地址
    let url = match options.url.as_deref() {
        Some(url) => Url::parse(url)
            .map_err(|e| KoreaSelError::InvalidInput(format!("Failed to parse page URL: {e}")))?,
        None => match default_url {
            Some(url) => url,
            None => Url::parse("about:blank")
                .map_err(|e| KoreaSelError::InvalidInput(e.to_string()))?,
        },
    };

    // 3. 解析页面并启动选择器
    let mut page = Page::from_html(input_data, &encoding, url)?;
    let mut selector = AutoSelector::new(&options.config, storage);
    let initial_selections = selector.start(&mut page).await?;

    // 4. 插入片段，每次插入后处理变更
    let mut inserted_selections = 0;
    for fragment in &options.fragments {
        page.append_to_body(fragment)?;
        inserted_selections += selector.pump(&mut page).await;
    }

    // 5. 序列化
    let processed_controls = selector
        .session()
        .map_or(0, |session| session.processed().len());
    let enabled = selector.is_enabled();
    selector.disable();

    Ok(RunSummary {
        enabled,
        initial_selections,
        inserted_selections,
        processed_controls,
        document: page.serialize()?,
    })
}

/// 校验编码名称，返回规范名称
pub fn resolve_encoding(label: Option<&str>) -> KoreaSelResult<String> {
    match label {
        None => Ok("utf-8".to_string()),
        Some(label) => Encoding::for_label_no_replacement(label.as_bytes())
            .map(|encoding| encoding.name().to_string())
            .ok_or_else(|| KoreaSelError::InvalidInput(format!("unknown encoding \"{label}\""))),
    }
}

/// 读取输入文档
///
/// `-` 表示标准输入；本地文件同时返回其 `file://` 地址。
pub fn read_input(target: &str) -> KoreaSelResult<(Vec<u8>, Option<Url>)> {
    if target == "-" {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        return Ok((data, None));
    }

    let path = Path::new(target);
    if !path.exists() {
        return Err(KoreaSelError::InvalidInput(format!("File not found: {target}")));
    }

    let data = fs::read(path)?;
    // 为本地文件创建file:// URL
    let file_url = fs::canonicalize(path)
        .ok()
        .and_then(|canonical_path| Url::from_file_path(canonical_path).ok());

    Ok((data, file_url))
}

/// 读取片段文件
pub fn read_fragments<P: AsRef<Path>>(paths: &[P]) -> KoreaSelResult<Vec<String>> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            fs::read_to_string(path).map_err(|e| {
                KoreaSelError::InvalidInput(format!(
                    "Failed to read fragment {}: {e}",
                    path.display()
                ))
            })
        })
        .collect()
}

fn use_color() -> bool {
    !NoColor::get_or_default(false) && atty::is(atty::Stream::Stderr)
}

/// Prints an error message to stderr
pub fn print_error_message(msg: &str) {
    if use_color() {
        eprintln!("{ANSI_COLOR_RED}{msg}{ANSI_COLOR_RESET}");
    } else {
        eprintln!("{msg}");
    }
}

/// Prints an info message to stderr
pub fn print_info_message(msg: &str) {
    eprintln!("{msg}");
}

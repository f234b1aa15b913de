//! `<select>` 与 `<option>` 的表单语义
//!
//! 静态 DOM 中没有 `value` 属性，选中状态完全由 `selected` 属性表达：
//! 没有任何选项带 `selected` 时，单选下拉框默认选中第一个选项。

use std::rc::Rc;

use markup5ever_rcdom::Handle;

use crate::error::KoreaSelResult;
use crate::parsers::html::{
    get_node_attr, get_node_name, get_text_content, select_elements, set_node_attr, WHITESPACES,
};

/// 下拉框中的全部选项（包括 `<optgroup>` 内的），按文档顺序
pub fn options_of(select: &Handle) -> Vec<Handle> {
    select_elements(select, false, |node| get_node_name(node) == Some("option"))
}

/// 选项文本，空白折叠
pub fn option_label(option: &Handle) -> String {
    get_text_content(option)
        .split(WHITESPACES)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 选项的值：有 `value` 属性时取属性，否则取文本
pub fn option_value(option: &Handle) -> String {
    get_node_attr(option, "value").unwrap_or_else(|| option_label(option))
}

fn is_multiple(select: &Handle) -> bool {
    get_node_attr(select, "multiple").is_some()
}

/// 当前选中的选项
pub fn selected_option(select: &Handle) -> Option<Handle> {
    let options = options_of(select);
    let explicit = options
        .iter()
        .find(|option| get_node_attr(option, "selected").is_some())
        .cloned();

    match explicit {
        Some(option) => Some(option),
        None if !is_multiple(select) => options.first().cloned(),
        None => None,
    }
}

/// 判断选项当前是否处于选中状态
pub fn is_option_selected(select: &Handle, option: &Handle) -> bool {
    if get_node_attr(option, "selected").is_some() {
        return true;
    }
    selected_option(select)
        .map(|selected| Rc::ptr_eq(&selected, option))
        .unwrap_or(false)
}

/// 下拉框当前的值
pub fn select_value(select: &Handle) -> Option<String> {
    selected_option(select).map(|option| option_value(&option))
}

/// 选中指定选项，单选时清除其他选项的 `selected`
pub fn set_selected_option(select: &Handle, option: &Handle) -> KoreaSelResult<()> {
    let multiple = is_multiple(select);

    for candidate in options_of(select) {
        if Rc::ptr_eq(&candidate, option) {
            set_node_attr(&candidate, "selected", Some(String::new()))?;
        } else if !multiple && get_node_attr(&candidate, "selected").is_some() {
            set_node_attr(&candidate, "selected", None)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use markup5ever_rcdom::RcDom;

    use crate::parsers::html::{find_nodes, html_to_dom};

    /// 文档被释放时会清空子节点，测试期间必须持有 `RcDom`
    fn first_select(html: &str) -> (RcDom, Handle) {
        let dom = html_to_dom(html.as_bytes(), "utf-8").unwrap();
        let select = find_nodes(&dom.document, vec!["select"])[0].clone();
        (dom, select)
    }

    #[test]
    fn test_value_falls_back_to_text() {
        let (_dom, select) = first_select("<select><option> South\n  Korea </option></select>");
        assert_eq!(select_value(&select), Some("South Korea".to_string()));
    }

    #[test]
    fn test_first_option_is_implicitly_selected() {
        let (_dom, select) = first_select(
            "<select><option value='US'>United States</option><option value='KR'>Korea</option></select>",
        );
        let options = options_of(&select);
        assert!(is_option_selected(&select, &options[0]));
        assert!(!is_option_selected(&select, &options[1]));
    }

    #[test]
    fn test_set_selected_option_moves_selection() {
        let (_dom, select) = first_select(
            "<select><option value='US' selected>United States</option><optgroup label='Asia'><option value='KR'>Korea</option></optgroup></select>",
        );
        let options = options_of(&select);
        set_selected_option(&select, &options[1]).unwrap();
        assert_eq!(select_value(&select), Some("KR".to_string()));
        assert!(get_node_attr(&options[0], "selected").is_none());
    }

    #[test]
    fn test_multiple_select_keeps_other_selections() {
        let (_dom, select) = first_select(
            "<select multiple><option value='US' selected>US</option><option value='KR'>KR</option></select>",
        );
        let options = options_of(&select);
        assert!(!is_option_selected(&select, &options[1]));
        set_selected_option(&select, &options[1]).unwrap();
        assert!(get_node_attr(&options[0], "selected").is_some());
        assert!(is_option_selected(&select, &options[1]));
    }
}

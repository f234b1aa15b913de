//! 国家选择器识别
//!
//! 判断一个表单控件是否可能是国家选择器：先看 id、name、class、placeholder、
//! aria-label 以及关联 `<label>` 的文本，再对原生下拉框的选项做抽样。

use markup5ever_rcdom::Handle;

use crate::page::forms::{option_label, options_of};
use crate::page::Page;
use crate::parsers::html::{get_node_attr, get_node_name, get_text_content};

use super::constants::{
    COUNTRY_INDICATORS, OPTION_SAMPLE_SIZE, OPTION_SAMPLE_SKIP, OPTION_SAMPLE_THRESHOLD,
    SAMPLE_COUNTRIES,
};

/// 控件的可识别特征，缺失的属性为空字符串
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlDescriptor {
    pub id: String,
    pub name: String,
    pub class_list: String,
    pub placeholder: String,
    pub aria_label: String,
    /// 通过 `for` 关联的 `<label>` 文本
    pub label_text: String,
    /// 是否为原生 `<select>`
    pub is_native_dropdown: bool,
    /// 原生下拉框的选项文本，按顺序
    pub option_texts: Vec<String>,
}

impl ControlDescriptor {
    /// 从页面中的元素提取特征
    pub fn from_node(page: &Page, node: &Handle) -> Self {
        let attr = |name: &str| get_node_attr(node, name).unwrap_or_default();

        let id = attr("id");
        let label_text = page
            .label_for(&id)
            .map(|label| get_text_content(&label))
            .unwrap_or_default();

        let is_native_dropdown = get_node_name(node) == Some("select");
        let option_texts = if is_native_dropdown {
            options_of(node).iter().map(option_label).collect()
        } else {
            Vec::new()
        };

        Self {
            name: attr("name"),
            class_list: attr("class"),
            placeholder: attr("placeholder"),
            aria_label: attr("aria-label"),
            id,
            label_text,
            is_native_dropdown,
            option_texts,
        }
    }

    /// 拼接后的小写文本
    fn haystack(&self) -> String {
        [
            self.id.as_str(),
            self.name.as_str(),
            self.class_list.as_str(),
            self.placeholder.as_str(),
            self.aria_label.as_str(),
            self.label_text.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }

    /// 抽样窗口内的选项文本
    fn sampled_options(&self) -> String {
        self.option_texts
            .iter()
            .skip(OPTION_SAMPLE_SKIP)
            .take(OPTION_SAMPLE_SIZE)
            .map(|text| text.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// 判断控件是否可能是国家选择器
pub fn is_likely_country_selector(control: &ControlDescriptor) -> bool {
    let haystack = control.haystack();
    if COUNTRY_INDICATORS
        .iter()
        .any(|indicator| haystack.contains(indicator))
    {
        return true;
    }

    if control.is_native_dropdown && control.option_texts.len() > OPTION_SAMPLE_THRESHOLD {
        let sample = control.sampled_options();
        if SAMPLE_COUNTRIES.iter().any(|country| sample.contains(country)) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dropdown(name: &str, options: &[&str]) -> ControlDescriptor {
        ControlDescriptor {
            name: name.to_string(),
            is_native_dropdown: true,
            option_texts: options.iter().map(|o| o.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_name_indicator() {
        assert!(is_likely_country_selector(&dropdown("country_code", &[])));
        assert!(is_likely_country_selector(&dropdown("billingRegion", &[])));
        assert!(!is_likely_country_selector(&dropdown("color", &["Red", "Green", "Blue"])));
    }

    #[test]
    fn test_korean_label_indicator() {
        let control = ControlDescriptor {
            id: "sel1".to_string(),
            label_text: "거주 국가".to_string(),
            ..Default::default()
        };
        assert!(is_likely_country_selector(&control));
    }

    #[test]
    fn test_option_sampling() {
        let options = [
            "Select one", "Afghanistan", "Albania", "Canada", "Denmark", "Egypt", "Finland",
            "Greece", "Hungary", "Japan", "Kenya",
        ];
        assert!(is_likely_country_selector(&dropdown("field_7", &options)));
    }

    #[test]
    fn test_sampling_needs_more_than_ten_options() {
        let options = [
            "Select one", "Japan", "Canada", "China", "United States", "Egypt", "Finland",
            "Greece", "Hungary", "Kenya",
        ];
        assert_eq!(options.len(), 10);
        assert!(!is_likely_country_selector(&dropdown("field_7", &options)));
    }

    #[test]
    fn test_sampling_window_skips_first_and_stops_after_nine() {
        // "Japan" 位于第 0 个和第 10 个，都在窗口之外
        let options = [
            "Japan", "a", "b", "c", "d", "e", "f", "g", "h", "i", "Japan", "Canada",
        ];
        assert!(!is_likely_country_selector(&dropdown("field_7", &options)));
    }

    #[test]
    fn test_custom_controls_do_not_sample() {
        let control = ControlDescriptor {
            option_texts: vec!["x".to_string(); 20],
            ..Default::default()
        };
        assert!(!is_likely_country_selector(&control));
    }

    #[test]
    fn test_from_node_reads_label() {
        let page = Page::parse(
            "<label for='c1'>Where do you live?</label><label for='c2'>Nationality</label>\
             <select id='c2' class='form-control'><option>A</option></select>",
            "https://example.com/",
        )
        .unwrap();
        let select = page.get_element_by_id("c2").unwrap();
        let descriptor = ControlDescriptor::from_node(&page, &select);
        assert_eq!(descriptor.label_text, "Nationality");
        assert_eq!(descriptor.class_list, "form-control");
        assert_eq!(descriptor.option_texts, vec!["A".to_string()]);
        assert!(is_likely_country_selector(&descriptor));
    }
}

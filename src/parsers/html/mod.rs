//! HTML解析和处理模块
//!
//! - `utils`: 基础工具函数和常量
//! - `dom`: 基础DOM操作（解析、查询、属性、树结构修改）
//! - `serializer`: 序列化功能

pub mod dom;
pub mod serializer;
pub mod utils;

pub use dom::{
    append_child, find_nodes, get_child_node_by_name, get_node_attr, get_node_name,
    get_parent_node, get_text_content, has_class, html_to_dom, is_element,
    is_inclusive_descendant, remove_node, select_elements, set_node_attr,
};
pub use serializer::serialize_document;
pub use utils::{normalize_text, CUSTOM_OPTION_TAGS, WHITESPACES};

use std::rc::Rc;

use encoding_rs::Encoding;
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::{KoreaSelError, KoreaSelResult};

use super::utils::WHITESPACES;

/// 将 HTML 字节转换为 DOM
pub fn html_to_dom(data: &[u8], document_encoding: &str) -> KoreaSelResult<RcDom> {
    let s: String;

    if let Some(encoding) = Encoding::for_label(document_encoding.as_bytes()) {
        let (string, _, _) = encoding.decode(data);
        s = string.to_string();
    } else {
        s = String::from_utf8_lossy(data).to_string();
    }

    let dom = parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut s.as_bytes())?;

    Ok(dom)
}

/// 查找指定路径的DOM节点
pub fn find_nodes(node: &Handle, node_names: Vec<&str>) -> Vec<Handle> {
    if node_names.is_empty() {
        return Vec::new();
    }

    let mut found_nodes = Vec::new();
    let node_name = node_names[0];

    if node_names.len() == 1 {
        if let NodeData::Element { ref name, .. } = node.data {
            if &*name.local == node_name {
                found_nodes.push(node.clone());
            }
        }

        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
        }
    } else if let NodeData::Element { ref name, .. } = node.data {
        if &*name.local == node_name {
            let mut new_node_names = node_names;
            new_node_names.remove(0);
            found_nodes.append(&mut find_nodes(node, new_node_names));
        } else {
            for child_node in node.children.borrow().iter() {
                found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
            }
        }
    } else {
        for child_node in node.children.borrow().iter() {
            found_nodes.append(&mut find_nodes(child_node, node_names.clone()));
        }
    }

    found_nodes
}

/// 根据名称获取子节点
pub fn get_child_node_by_name(parent: &Handle, node_name: &str) -> Option<Handle> {
    let children = parent.children.borrow();
    let matching_children = children.iter().find(|child| match child.data {
        NodeData::Element { ref name, .. } => &*name.local == node_name,
        _ => false,
    });
    matching_children.cloned()
}

/// 获取节点属性值
pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => {
            for attr in attrs.borrow().iter() {
                if &*attr.name.local == attr_name {
                    return Some(attr.value.to_string());
                }
            }
            None
        }
        _ => None,
    }
}

/// 获取节点名称
pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

/// 判断节点是否为元素
pub fn is_element(node: &Handle) -> bool {
    matches!(node.data, NodeData::Element { .. })
}

/// 获取父节点
pub fn get_parent_node(child: &Handle) -> Option<Handle> {
    // Cell 只能整体取出，读完后放回去
    let weak = child.parent.take();
    child.parent.set(weak.clone());
    weak.and_then(|node| node.upgrade())
}

/// 判断 `node` 是否位于 `ancestor` 的子树中（包括自身）
pub fn is_inclusive_descendant(ancestor: &Handle, node: &Handle) -> bool {
    let mut current = Some(node.clone());

    while let Some(candidate) = current {
        if Rc::ptr_eq(&candidate, ancestor) {
            return true;
        }
        current = get_parent_node(&candidate);
    }

    false
}

/// 设置节点属性
///
/// `attr_value` 为 `None` 时删除该属性。属性表正在被借用时返回错误。
pub fn set_node_attr(
    node: &Handle,
    attr_name: &str,
    attr_value: Option<String>,
) -> KoreaSelResult<()> {
    use html5ever::interface::{Attribute, QualName};
    use html5ever::tendril::format_tendril;
    use html5ever::{namespace_url, ns, LocalName};

    let NodeData::Element { attrs, .. } = &node.data else {
        return Err(KoreaSelError::Dom(format!(
            "cannot set attribute '{attr_name}' on a non-element node"
        )));
    };

    let mut attrs_mut = attrs
        .try_borrow_mut()
        .map_err(|e| KoreaSelError::Dom(format!("attributes are busy: {e}")))?;
    let mut i = 0;
    let mut found_existing_attr: bool = false;

    while i < attrs_mut.len() {
        if &attrs_mut[i].name.local == attr_name {
            found_existing_attr = true;

            if let Some(attr_value) = attr_value.clone() {
                attrs_mut[i].value.clear();
                attrs_mut[i].value.push_slice(attr_value.as_str());
            } else {
                // Remove attr completely if attr_value is not defined
                attrs_mut.remove(i);
                continue;
            }
        }

        i += 1;
    }

    if !found_existing_attr {
        if let Some(attr_value) = attr_value {
            let name = LocalName::from(attr_name);

            attrs_mut.push(Attribute {
                name: QualName::new(None, ns!(), name),
                value: format_tendril!("{}", attr_value),
            });
        }
    }

    Ok(())
}

/// 检查 class 属性中是否包含指定类名
pub fn has_class(node: &Handle, class_name: &str) -> bool {
    get_node_attr(node, "class")
        .map(|classes| classes.split(WHITESPACES).any(|c| c == class_name))
        .unwrap_or(false)
}

/// 收集节点的全部文本内容（等价于 `textContent`）
pub fn get_text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, buf: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        buf.push_str(&contents.borrow());
    }

    for child in node.children.borrow().iter() {
        collect_text(child, buf);
    }
}

/// 按文档顺序收集满足条件的元素
///
/// `include_root` 为 true 时根节点本身也参与匹配。
pub fn select_elements<F>(root: &Handle, include_root: bool, predicate: F) -> Vec<Handle>
where
    F: Fn(&Handle) -> bool,
{
    let mut found = Vec::new();

    if include_root && is_element(root) && predicate(root) {
        found.push(root.clone());
    }

    let mut stack: Vec<Handle> = root.children.borrow().iter().rev().cloned().collect();
    while let Some(node) = stack.pop() {
        if is_element(&node) && predicate(&node) {
            found.push(node.clone());
        }
        for child in node.children.borrow().iter().rev() {
            stack.push(child.clone());
        }
    }

    found
}

/// 将节点追加为 `parent` 的最后一个子节点
pub fn append_child(parent: &Handle, child: &Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child.clone());
}

/// 从父节点中移除节点
pub fn remove_node(node: &Handle) {
    if let Some(parent) = get_parent_node(node) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, node));
    }
    node.parent.set(None);
}

use std::collections::HashMap;

use crate::{Error, Result};

const SNIPPET_MAX_CHARS: usize = 120;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: HashMap<String, String>,
    pub(crate) value: String,
}

#[derive(Debug, Clone)]
pub(crate) struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Dom {
    pub(crate) fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: HashMap<String, String>,
    ) -> NodeId {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let element = Element {
            tag_name,
            attrs,
            value,
        };
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            // First occurrence wins, matching getElementById.
            self.id_index.entry(id_attr).or_insert(id);
        }
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    pub(crate) fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes.get(id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    pub(crate) fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag_name.as_str())
    }

    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    pub(crate) fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub(crate) fn element_by_id(&self, id_attr: &str) -> Option<NodeId> {
        self.id_index.get(id_attr).copied()
    }

    pub(crate) fn attr(&self, id: NodeId, name: &str) -> Option<String> {
        self.element(id)?.attrs.get(name).cloned()
    }

    pub(crate) fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let element = self
            .element_mut(id)
            .ok_or_else(|| Error::WidgetRuntime("attribute target is not an element".into()))?;
        element.attrs.insert(name.to_string(), value.to_string());
        if name == "value" {
            element.value = value.to_string();
        }
        Ok(())
    }

    pub(crate) fn value(&self, id: NodeId) -> Option<String> {
        self.element(id).map(|element| element.value.clone())
    }

    pub(crate) fn set_value(&mut self, id: NodeId, value: &str) -> Result<()> {
        let element = self
            .element_mut(id)
            .ok_or_else(|| Error::WidgetRuntime("value target is not an element".into()))?;
        element.value = value.to_string();
        Ok(())
    }

    pub(crate) fn has_class(&self, id: NodeId, class_name: &str) -> bool {
        self.element(id)
            .map(|element| has_class(element, class_name))
            .unwrap_or(false)
    }

    pub(crate) fn add_class(&mut self, id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(id)
            .ok_or_else(|| Error::WidgetRuntime("class target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|c| c == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn remove_class(&mut self, id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(id)
            .ok_or_else(|| Error::WidgetRuntime("class target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|c| c != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    pub(crate) fn set_class_present(
        &mut self,
        id: NodeId,
        class_name: &str,
        present: bool,
    ) -> Result<()> {
        if present {
            self.add_class(id, class_name)
        } else {
            self.remove_class(id, class_name)
        }
    }

    /// Toggles the class and returns whether it is present afterwards.
    pub(crate) fn toggle_class(&mut self, id: NodeId, class_name: &str) -> Result<bool> {
        let present = self.has_class(id, class_name);
        self.set_class_present(id, class_name, !present)?;
        Ok(!present)
    }

    pub(crate) fn style_property(&self, id: NodeId, name: &str) -> Option<String> {
        let style = self.attr(id, "style")?;
        parse_style_declarations(&style)
            .into_iter()
            .find(|(prop, _)| prop == name)
            .map(|(_, value)| value)
    }

    pub(crate) fn set_style_property(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        let style = self.attr(id, "style").unwrap_or_default();
        let mut decls = parse_style_declarations(&style);
        let name = name.to_ascii_lowercase();
        if let Some(pos) = decls.iter().position(|(prop, _)| *prop == name) {
            decls[pos].1 = value.to_string();
        } else {
            decls.push((name, value.to_string()));
        }
        let serialized = serialize_style_declarations(&decls);
        self.set_attr(id, "style", &serialized)
    }

    pub(crate) fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut stack = vec![id];
        let mut ordered = Vec::new();
        while let Some(node) = stack.pop() {
            ordered.push(node);
            for child in self.children(node).iter().rev() {
                stack.push(*child);
            }
        }
        for node in ordered {
            if let Some(NodeType::Text(text)) = self.nodes.get(node.0).map(|n| &n.node_type) {
                out.push_str(text);
            }
        }
        out
    }

    pub(crate) fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<()> {
        if !self.is_element(id) {
            return Err(Error::WidgetRuntime("text target is not an element".into()));
        }
        self.clear_children(id);
        if !text.is_empty() {
            self.create_text(id, text.to_string());
        }
        Ok(())
    }

    /// Detaches all children. The detached subtree stays allocated in the
    /// arena but is no longer reachable from the document.
    pub(crate) fn clear_children(&mut self, id: NodeId) {
        let children = std::mem::take(&mut self.nodes[id.0].children);
        for child in children {
            self.nodes[child.0].parent = None;
        }
    }

    /// All element nodes reachable from `id`, in document order, `id`
    /// excluded.
    pub(crate) fn descendant_elements(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.is_element(node) {
                out.push(node);
            }
            for child in self.children(node).iter().rev() {
                stack.push(*child);
            }
        }
        out
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        self.descendant_elements(self.root)
    }

    pub(crate) fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_node(id, &mut out);
        out
    }

    pub(crate) fn snippet(&self, id: NodeId) -> String {
        truncate_chars(&self.outer_html(id), SNIPPET_MAX_CHARS)
    }

    fn serialize_node(&self, id: NodeId, out: &mut String) {
        // Fixtures can nest arbitrarily deep; grow the stack instead of
        // overflowing on the recursion.
        stacker::maybe_grow(64 * 1024, 1024 * 1024, || {
            let Some(node) = self.nodes.get(id.0) else {
                return;
            };
            match &node.node_type {
                NodeType::Document => {
                    for child in &node.children {
                        self.serialize_node(*child, out);
                    }
                }
                NodeType::Text(text) => {
                    out.push_str(&escape_html_text(text));
                }
                NodeType::Element(element) => {
                    out.push('<');
                    out.push_str(&element.tag_name);
                    let mut names: Vec<&String> = element.attrs.keys().collect();
                    names.sort();
                    for name in names {
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        out.push_str(&escape_html_attr(&element.attrs[name]));
                        out.push('"');
                    }
                    out.push('>');
                    if is_void_tag(&element.tag_name) {
                        return;
                    }
                    for child in &node.children {
                        self.serialize_node(*child, out);
                    }
                    out.push_str("</");
                    out.push_str(&element.tag_name);
                    out.push('>');
                }
            }
        });
    }
}

pub(crate) fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

pub(crate) fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| {
            value
                .split_whitespace()
                .filter(|token| !token.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

pub(crate) fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

pub(crate) fn is_void_tag(tag: &str) -> bool {
    matches!(
        tag.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "source"
            | "track"
            | "wbr"
    )
}

fn parse_style_declarations(style_attr: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw_decl in style_attr.split(';') {
        let decl = raw_decl.trim();
        if decl.is_empty() {
            continue;
        }
        let Some((name, value)) = decl.split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim().to_string();
        if name.is_empty() {
            continue;
        }
        if let Some(pos) = out.iter().position(|(existing, _)| *existing == name) {
            out[pos].1 = value;
        } else {
            out.push((name, value));
        }
    }
    out
}

fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (idx, (name, value)) in decls.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

fn escape_html_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_html_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    let mut it = value.chars();
    let mut out = String::new();
    for _ in 0..max_chars {
        let Some(ch) = it.next() else {
            return out;
        };
        out.push(ch);
    }
    if it.next().is_some() {
        out.push_str("...");
    }
    out
}

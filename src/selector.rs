use crate::dom::{Dom, NodeId};
use crate::{Error, Result};

/// Reduced selector engine: tag names, `#id`, `.class`, `[attr]`,
/// `[attr=value]` (quoted or bare), compound steps, and the descendant
/// combinator. Anything else is [`Error::UnsupportedSelector`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrCondition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
}

pub(crate) fn parse_selector(selector: &str) -> Result<Vec<SelectorStep>> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let mut steps = Vec::new();
    for token in tokenize(trimmed)? {
        steps.push(parse_step(&token, selector)?);
    }
    if steps.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    Ok(steps)
}

fn tokenize(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut bracket_depth = 0usize;

    for ch in selector.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                bracket_depth -= 1;
                current.push(ch);
            }
            ch if ch.is_ascii_whitespace() && bracket_depth == 0 => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            '>' | '+' | '~' | ',' if bracket_depth == 0 => {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            _ => current.push(ch),
        }
    }

    if bracket_depth != 0 {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_step(part: &str, selector: &str) -> Result<SelectorStep> {
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'#' => {
                i += 1;
                let Some((id, next)) = parse_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(selector.into()));
                };
                if step.id.replace(id).is_some() {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                i = next;
            }
            b'.' => {
                i += 1;
                let Some((class_name, next)) = parse_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(selector.into()));
                };
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_attr_condition(part, i, selector)?;
                step.attrs.push(attr);
                i = next;
            }
            _ => {
                if step.tag.is_some() || step.id.is_some() || !step.classes.is_empty() {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                let Some((tag, next)) = parse_ident(part, i) else {
                    return Err(Error::UnsupportedSelector(selector.into()));
                };
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    if step.tag.is_none() && step.id.is_none() && step.classes.is_empty() && step.attrs.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    Ok(step)
}

fn parse_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_attr_condition(
    src: &str,
    open_bracket: usize,
    selector: &str,
) -> Result<(AttrCondition, usize)> {
    let bytes = src.as_bytes();
    let mut i = open_bracket + 1;

    let key_start = i;
    while i < bytes.len() && (is_ident_char(bytes[i]) || bytes[i] == b':') {
        i += 1;
    }
    if key_start == i {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    let key = src
        .get(key_start..i)
        .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?
        .to_ascii_lowercase();

    match bytes.get(i) {
        Some(b']') => return Ok((AttrCondition::Exists { key }, i + 1)),
        Some(b'=') => {}
        _ => return Err(Error::UnsupportedSelector(selector.into())),
    }
    i += 1;

    let value = if matches!(bytes.get(i), Some(b'"') | Some(b'\'')) {
        let quote = bytes[i];
        i += 1;
        let value_start = i;
        while i < bytes.len() && bytes[i] != quote {
            i += 1;
        }
        if i >= bytes.len() {
            return Err(Error::UnsupportedSelector(selector.into()));
        }
        let value = src
            .get(value_start..i)
            .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?
            .to_string();
        i += 1;
        value
    } else {
        let value_start = i;
        while i < bytes.len() && bytes[i] != b']' {
            i += 1;
        }
        src.get(value_start..i)
            .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?
            .to_string()
    };

    if bytes.get(i) != Some(&b']') {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    Ok((AttrCondition::Eq { key, value }, i + 1))
}

fn matches_step(dom: &Dom, node: NodeId, step: &SelectorStep) -> bool {
    let Some(element) = dom.element(node) else {
        return false;
    };
    if let Some(tag) = &step.tag {
        if !element.tag_name.eq_ignore_ascii_case(tag) {
            return false;
        }
    }
    if let Some(id) = &step.id {
        if element.attrs.get("id") != Some(id) {
            return false;
        }
    }
    for class_name in &step.classes {
        if !crate::dom::has_class(element, class_name) {
            return false;
        }
    }
    for cond in &step.attrs {
        match cond {
            AttrCondition::Exists { key } => {
                if !element.attrs.contains_key(key) {
                    return false;
                }
            }
            AttrCondition::Eq { key, value } => {
                if element.attrs.get(key) != Some(value) {
                    return false;
                }
            }
        }
    }
    true
}

fn matches_chain(dom: &Dom, node: NodeId, steps: &[SelectorStep]) -> bool {
    let Some((last, ancestors)) = steps.split_last() else {
        return false;
    };
    if !matches_step(dom, node, last) {
        return false;
    }

    // Each remaining step must match some strict ancestor, outermost first.
    let mut remaining = ancestors;
    let mut current = dom.parent(node);
    while let Some(step) = remaining.last() {
        let Some(candidate) = current else {
            return false;
        };
        if matches_step(dom, candidate, step) {
            remaining = &remaining[..remaining.len() - 1];
        }
        current = dom.parent(candidate);
    }
    true
}

/// All elements matching `selector`, in document order.
pub(crate) fn select_all(dom: &Dom, selector: &str) -> Result<Vec<NodeId>> {
    let steps = parse_selector(selector)?;
    Ok(dom
        .all_element_nodes()
        .into_iter()
        .filter(|node| matches_chain(dom, *node, &steps))
        .collect())
}

pub(crate) fn select_one(dom: &Dom, selector: &str) -> Result<NodeId> {
    select_all(dom, selector)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::SelectorNotFound(selector.into()))
}

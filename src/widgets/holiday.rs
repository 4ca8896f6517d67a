use unicode_normalization::UnicodeNormalization;

use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::events::EventState;
use crate::widgets::PageEffects;

pub(crate) const HOLIDAY_PLACEHOLDER: &str = "選択してください";
pub(crate) const HOLIDAY_FIELD_NAME: &str = "holiday";
const LABEL_SEPARATOR: &str = "、";
const ARROW_OPEN: &str = "▲";
const ARROW_CLOSED: &str = "▼";

/// The multi-select holiday picker.
///
/// The selection is held here as one explicit, document-ordered set of
/// option values; the display label, the `selected` classes, and the hidden
/// `name=holiday` inputs are projections recomputed from it on every
/// change, so they can never drift apart.
#[derive(Debug)]
pub(crate) struct HolidaySelector {
    box_node: NodeId,
    text_node: NodeId,
    arrow_node: Option<NodeId>,
    list_node: NodeId,
    options: Vec<NodeId>,
    hidden_container: NodeId,
    open: bool,
    selected: Vec<String>,
}

impl HolidaySelector {
    /// Installs the picker over the expected anchors, or returns `None`
    /// when any required anchor is missing. The widget is an enhancement;
    /// a page without the markup simply does not get it.
    pub(crate) fn install(dom: &mut Dom) -> Result<Option<Self>> {
        let Some(box_node) = dom.element_by_id("holiday-box") else {
            return Ok(None);
        };
        let Some(list_node) = dom.element_by_id("holiday-options") else {
            return Ok(None);
        };
        let Some(hidden_container) = dom.element_by_id("holiday-hidden-container") else {
            return Ok(None);
        };
        let Some(text_node) = dom
            .descendant_elements(box_node)
            .into_iter()
            .find(|node| dom.has_class(*node, "holiday-text"))
        else {
            return Ok(None);
        };
        let arrow_node = dom
            .descendant_elements(box_node)
            .into_iter()
            .find(|node| dom.has_class(*node, "holiday-arrow"));

        let options: Vec<NodeId> = dom
            .descendant_elements(list_node)
            .into_iter()
            .filter(|node| {
                dom.has_class(*node, "holiday-option") && dom.attr(*node, "data-value").is_some()
            })
            .collect();

        let mut widget = Self {
            box_node,
            text_node,
            arrow_node,
            list_node,
            options,
            hidden_container,
            open: !dom.has_class(list_node, "hidden"),
            selected: Vec::new(),
        };

        let initial = dom.attr(box_node, "data-initial").unwrap_or_default();
        let seed = parse_initial_values(&initial);
        // Seed only values a rendered option can represent; an unknown
        // token would otherwise produce a hidden field the control could
        // never display or deselect.
        widget.selected = widget
            .option_values(dom)
            .into_iter()
            .filter(|value| seed.iter().any(|token| token == value))
            .collect();
        widget.sync(dom)?;
        Ok(Some(widget))
    }

    pub(crate) fn on_event(
        &mut self,
        dom: &mut Dom,
        effects: &mut PageEffects,
        event: &mut EventState,
    ) -> Result<()> {
        if event.event_type != "click" {
            return Ok(());
        }
        let current = event.current_target;

        if self.options.contains(&current) {
            // An option click must never reach the box toggle.
            event.stop_propagation();
            if let Some(value) = dom.attr(current, "data-value") {
                self.toggle_value(&value);
                self.sync(dom)?;
                effects.trace(|| {
                    format!(
                        "[holiday] toggle value={value} selected={}",
                        self.selected.len()
                    )
                });
            }
            return Ok(());
        }

        if current == self.box_node {
            self.toggle_open(dom)?;
            effects.trace(|| format!("[holiday] open={}", self.open));
        }
        Ok(())
    }

    pub(crate) fn is_open(&self) -> bool {
        self.open
    }

    pub(crate) fn selected_values(&self) -> &[String] {
        &self.selected
    }

    fn toggle_open(&mut self, dom: &mut Dom) -> Result<()> {
        self.open = !self.open;
        dom.set_class_present(self.list_node, "hidden", !self.open)?;
        dom.set_class_present(self.box_node, "open", self.open)?;
        if let Some(arrow) = self.arrow_node {
            let glyph = if self.open { ARROW_OPEN } else { ARROW_CLOSED };
            dom.set_text_content(arrow, glyph)?;
        }
        Ok(())
    }

    fn toggle_value(&mut self, value: &str) {
        if let Some(pos) = self.selected.iter().position(|v| v == value) {
            self.selected.remove(pos);
        } else {
            self.selected.push(value.to_string());
        }
    }

    /// Re-projects everything derived from the selection: document-order
    /// normalization of the set itself, the `selected` classes, the display
    /// label, and a full rebuild of the hidden mirror.
    fn sync(&mut self, dom: &mut Dom) -> Result<()> {
        self.selected = self
            .option_values(dom)
            .into_iter()
            .filter(|value| self.selected.iter().any(|v| v == value))
            .collect();

        let mut labels = Vec::with_capacity(self.selected.len());
        for &option in &self.options {
            let Some(value) = dom.attr(option, "data-value") else {
                continue;
            };
            let is_selected = self.selected.iter().any(|v| *v == value);
            dom.set_class_present(option, "selected", is_selected)?;
            if is_selected {
                labels.push(dom.text_content(option).trim().to_string());
            }
        }

        let label = if labels.is_empty() {
            HOLIDAY_PLACEHOLDER.to_string()
        } else {
            labels.join(LABEL_SEPARATOR)
        };
        dom.set_text_content(self.text_node, &label)?;

        dom.clear_children(self.hidden_container);
        for value in &self.selected {
            let attrs = [
                ("type".to_string(), "hidden".to_string()),
                ("name".to_string(), HOLIDAY_FIELD_NAME.to_string()),
                ("value".to_string(), value.clone()),
            ]
            .into_iter()
            .collect();
            dom.create_element(self.hidden_container, "input".to_string(), attrs);
        }
        Ok(())
    }

    fn option_values(&self, dom: &Dom) -> Vec<String> {
        self.options
            .iter()
            .filter_map(|option| dom.attr(*option, "data-value"))
            .collect()
    }
}

/// Splits a server-provided initial value into candidate option values.
///
/// Separators are the ideographic comma `、`, the half-width comma `,`,
/// and any character that NFKC-folds to a comma (the full-width `，`,
/// U+FF0C). Only the separators are normalized; the tokens themselves are
/// kept byte-for-byte, since option values may legitimately contain
/// compatibility characters such as full-width digits. Tokens are trimmed
/// and empty ones dropped, so stray delimiters and whitespace-only entries
/// are tolerated rather than surfaced.
pub(crate) fn parse_initial_values(raw: &str) -> Vec<String> {
    raw.split(is_value_separator)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

fn is_value_separator(ch: char) -> bool {
    ch == '、' || ch == ',' || std::iter::once(ch).nfkc().eq(",".chars())
}

use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::events::EventState;
use crate::widgets::PageEffects;

pub(crate) const MAX_TAG_ROWS: usize = 3;
pub(crate) const TAG_LIMIT_ALERT: &str = "タグは最大3つまでです。";
const TAG_PLACEHOLDER: &str = "例：おしゃれ・個室など";

/// Appends tag input rows to the registration form, capped at three.
#[derive(Debug)]
pub(crate) struct TagRowAdder {
    button: NodeId,
    container: NodeId,
}

impl TagRowAdder {
    pub(crate) fn install(dom: &Dom) -> Option<Self> {
        let button = dom.element_by_id("add-tag")?;
        let container = dom.element_by_id("tag-container")?;
        Some(Self { button, container })
    }

    pub(crate) fn on_event(
        &mut self,
        dom: &mut Dom,
        effects: &mut PageEffects,
        event: &mut EventState,
    ) -> Result<()> {
        if event.event_type != "click" || event.current_target != self.button {
            return Ok(());
        }

        let current_count = dom
            .descendant_elements(self.container)
            .into_iter()
            .filter(|node| dom.has_class(*node, "tag-row"))
            .count();
        if current_count >= MAX_TAG_ROWS {
            effects.alert(TAG_LIMIT_ALERT);
            effects.trace(|| format!("[tags] rejected count={current_count}"));
            return Ok(());
        }

        self.append_row(dom);
        effects.trace(|| format!("[tags] appended count={}", current_count + 1));
        Ok(())
    }

    fn append_row(&self, dom: &mut Dom) {
        let row = dom.create_element(
            self.container,
            "div".to_string(),
            [("class".to_string(), "tag-row".to_string())]
                .into_iter()
                .collect(),
        );
        let wrapper = dom.create_element(
            row,
            "div".to_string(),
            [("class".to_string(), "input-with-arrow-tag".to_string())]
                .into_iter()
                .collect(),
        );
        let attrs = [
            ("type".to_string(), "text".to_string()),
            ("name".to_string(), "tags".to_string()),
            ("class".to_string(), "tag-input".to_string()),
            ("placeholder".to_string(), TAG_PLACEHOLDER.to_string()),
            ("list".to_string(), "tag-list".to_string()),
            ("autocomplete".to_string(), "on".to_string()),
        ]
        .into_iter()
        .collect();
        dom.create_element(wrapper, "input".to_string(), attrs);
    }
}

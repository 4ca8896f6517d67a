use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::events::EventState;
use crate::selector::select_all;
use crate::widgets::PageEffects;

/// Five-star rating control: hover previews a value, click commits it into
/// the `#rating-value` input, leaving restores the committed value.
#[derive(Debug)]
pub(crate) struct StarRating {
    stars: Vec<NodeId>,
    input: NodeId,
    committed: u32,
}

impl StarRating {
    pub(crate) fn install(dom: &mut Dom) -> Result<Option<Self>> {
        let Some(input) = dom.element_by_id("rating-value") else {
            return Ok(None);
        };
        let stars = select_all(dom, ".star")?;
        if stars.is_empty() {
            return Ok(None);
        }

        let committed = dom
            .value(input)
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(0);

        let widget = Self {
            stars,
            input,
            committed,
        };
        widget.highlight(dom, widget.committed)?;
        Ok(Some(widget))
    }

    pub(crate) fn on_event(
        &mut self,
        dom: &mut Dom,
        effects: &mut PageEffects,
        event: &mut EventState,
    ) -> Result<()> {
        let current = event.current_target;
        if !self.stars.contains(&current) {
            return Ok(());
        }

        match event.event_type.as_str() {
            "mouseenter" => {
                if let Some(value) = self.star_value(dom, current) {
                    self.highlight(dom, value)?;
                }
            }
            "mouseleave" => {
                self.highlight(dom, self.committed)?;
            }
            "click" => {
                if let Some(value) = self.star_value(dom, current) {
                    self.committed = value;
                    dom.set_value(self.input, &value.to_string())?;
                    self.highlight(dom, value)?;
                    effects.trace(|| format!("[rating] committed={value}"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub(crate) fn committed(&self) -> u32 {
        self.committed
    }

    fn star_value(&self, dom: &Dom, star: NodeId) -> Option<u32> {
        dom.attr(star, "data-value")?.trim().parse::<u32>().ok()
    }

    fn highlight(&self, dom: &mut Dom, count: u32) -> Result<()> {
        for (index, &star) in self.stars.iter().enumerate() {
            dom.set_class_present(star, "selected", (index as u32) < count)?;
        }
        Ok(())
    }
}

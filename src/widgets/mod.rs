use crate::Result;
use crate::dom::Dom;
use crate::events::EventState;

mod holiday;
mod lightbox;
mod page_setup;
mod rating;
mod tags;

pub(crate) use holiday::HolidaySelector;
#[cfg(test)]
pub(crate) use holiday::parse_initial_values;
pub(crate) use lightbox::PhotoLightbox;
pub(crate) use page_setup::{apply_autocomplete_defaults, swap_active_nav_icons};
pub(crate) use rating::StarRating;
pub(crate) use tags::TagRowAdder;

/// One installed event-driven widget. Install-time passes (autocomplete
/// defaults, nav icon swap) run once and are not represented here.
#[derive(Debug)]
pub(crate) enum WidgetKind {
    Holiday(HolidaySelector),
    Tags(TagRowAdder),
    Rating(StarRating),
    Lightbox(PhotoLightbox),
}

impl WidgetKind {
    pub(crate) fn on_event(
        &mut self,
        dom: &mut Dom,
        effects: &mut PageEffects,
        event: &mut EventState,
    ) -> Result<()> {
        match self {
            Self::Holiday(widget) => widget.on_event(dom, effects, event),
            Self::Tags(widget) => widget.on_event(dom, effects, event),
            Self::Rating(widget) => widget.on_event(dom, effects, event),
            Self::Lightbox(widget) => widget.on_event(dom, effects, event),
        }
    }
}

/// Side effects a widget can raise outside the DOM: alert dialogs and trace
/// lines. The harness owns the captured values.
#[derive(Debug, Default)]
pub(crate) struct PageEffects {
    pub(crate) alerts: Vec<String>,
    pub(crate) trace_enabled: bool,
    pub(crate) trace_lines: Vec<String>,
}

impl PageEffects {
    pub(crate) fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    pub(crate) fn trace(&mut self, line: impl FnOnce() -> String) {
        if self.trace_enabled {
            self.trace_lines.push(line());
        }
    }
}

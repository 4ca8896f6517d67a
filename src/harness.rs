use crate::dom::{Dom, NodeId};
use crate::events::{EventState, bubble_path};
use crate::html::parse_html;
use crate::selector::{select_all, select_one};
use crate::widgets::{
    HolidaySelector, PageEffects, PhotoLightbox, StarRating, TagRowAdder, WidgetKind,
    apply_autocomplete_defaults, swap_active_nav_icons,
};
use crate::{Error, Result};

/// Parses a page, installs the registration-form widgets over it, and
/// drives synthetic user events against them.
///
/// Widgets whose DOM anchors are missing are silently skipped; the harness
/// is still usable for plain DOM assertions on such pages.
#[derive(Debug)]
pub struct Harness {
    dom: Dom,
    widgets: Vec<WidgetKind>,
    effects: PageEffects,
    trace_logs: Vec<String>,
    trace_log_limit: usize,
    trace_to_stderr: bool,
}

impl Harness {
    pub fn from_html(html: &str) -> Result<Self> {
        let mut dom = parse_html(html)?;

        apply_autocomplete_defaults(&mut dom)?;
        swap_active_nav_icons(&mut dom)?;

        let mut widgets = Vec::new();
        if let Some(widget) = HolidaySelector::install(&mut dom)? {
            widgets.push(WidgetKind::Holiday(widget));
        }
        if let Some(widget) = TagRowAdder::install(&dom) {
            widgets.push(WidgetKind::Tags(widget));
        }
        if let Some(widget) = StarRating::install(&mut dom)? {
            widgets.push(WidgetKind::Rating(widget));
        }
        if let Some(widget) = PhotoLightbox::install(&dom)? {
            widgets.push(WidgetKind::Lightbox(widget));
        }

        Ok(Self {
            dom,
            widgets,
            effects: PageEffects::default(),
            trace_logs: Vec::new(),
            trace_log_limit: 10_000,
            trace_to_stderr: false,
        })
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = select_one(&self.dom, selector)?;
        if self.dom.attr(target, "disabled").is_some() {
            return Ok(());
        }
        self.dispatch(target, "click", true)
    }

    pub fn hover(&mut self, selector: &str) -> Result<()> {
        let target = select_one(&self.dom, selector)?;
        // Enter/leave events do not bubble.
        self.dispatch(target, "mouseenter", false)
    }

    pub fn unhover(&mut self, selector: &str) -> Result<()> {
        let target = select_one(&self.dom, selector)?;
        self.dispatch(target, "mouseleave", false)
    }

    fn dispatch(&mut self, target: NodeId, event_type: &str, bubble: bool) -> Result<()> {
        let description = describe_node(&self.dom, target);
        self.effects
            .trace(|| format!("[event] {event_type} target={description}"));

        let path = if bubble {
            bubble_path(&self.dom, target)
        } else {
            vec![target]
        };
        let mut event = EventState::new(event_type, target);
        let mut widgets = std::mem::take(&mut self.widgets);

        let mut outcome = Ok(());
        'path: for node in path {
            event.current_target = node;
            for widget in widgets.iter_mut() {
                if let Err(err) = widget.on_event(&mut self.dom, &mut self.effects, &mut event) {
                    outcome = Err(err);
                    break 'path;
                }
            }
            if event.propagation_stopped {
                break;
            }
        }

        self.widgets = widgets;
        self.flush_trace();
        outcome
    }

    pub fn text(&self, selector: &str) -> Result<String> {
        let target = select_one(&self.dom, selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn value(&self, selector: &str) -> Result<String> {
        let target = select_one(&self.dom, selector)?;
        self.dom.value(target).ok_or_else(|| Error::TypeMismatch {
            selector: selector.to_string(),
            expected: "element".into(),
            actual: "non-element".into(),
        })
    }

    /// Values of every `input[name=…]` in document order: what the
    /// enclosing form would submit for that field.
    pub fn form_values(&self, name: &str) -> Vec<String> {
        self.dom
            .all_element_nodes()
            .into_iter()
            .filter(|node| {
                self.dom
                    .tag_name(*node)
                    .map(|tag| tag.eq_ignore_ascii_case("input"))
                    .unwrap_or(false)
                    && self.dom.attr(*node, "name").as_deref() == Some(name)
            })
            .filter_map(|node| self.dom.value(node))
            .collect()
    }

    /// Current holiday selection in document order; empty when the holiday
    /// widget is not installed.
    pub fn holiday_selection(&self) -> Vec<String> {
        self.widgets
            .iter()
            .find_map(|widget| match widget {
                WidgetKind::Holiday(holiday) => Some(holiday.selected_values().to_vec()),
                _ => None,
            })
            .unwrap_or_default()
    }

    pub fn holiday_open(&self) -> bool {
        self.widgets
            .iter()
            .find_map(|widget| match widget {
                WidgetKind::Holiday(holiday) => Some(holiday.is_open()),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Committed star rating, when the rating widget is installed.
    pub fn rating(&self) -> Option<u32> {
        self.widgets.iter().find_map(|widget| match widget {
            WidgetKind::Rating(rating) => Some(rating.committed()),
            _ => None,
        })
    }

    pub fn alerts(&self) -> &[String] {
        &self.effects.alerts
    }

    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.effects.alerts)
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = select_one(&self.dom, selector)?;
        let actual = self.dom.text_content(target);
        if actual.trim() != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.dom.snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_value(&self, selector: &str, expected: &str) -> Result<()> {
        let target = select_one(&self.dom, selector)?;
        let actual = self.dom.value(target).unwrap_or_default();
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.dom.snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        select_one(&self.dom, selector).map(|_| ())
    }

    pub fn assert_has_class(&self, selector: &str, class_name: &str, expected: bool) -> Result<()> {
        let target = select_one(&self.dom, selector)?;
        let actual = self.dom.has_class(target, class_name);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: format!("class {class_name} present={expected}"),
                actual: format!("present={actual}"),
                dom_snippet: self.dom.snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_form_values(&self, name: &str, expected: &[&str]) -> Result<()> {
        let actual = self.form_values(name);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: format!("input[name={name}]"),
                expected: format!("{expected:?}"),
                actual: format!("{actual:?}"),
                dom_snippet: self.dom.snippet(self.dom.root),
            });
        }
        Ok(())
    }

    /// How many elements match `selector`.
    pub fn count(&self, selector: &str) -> Result<usize> {
        Ok(select_all(&self.dom, selector)?.len())
    }

    /// Inline-style property of the first match, `None` when unset.
    pub fn style_property(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = select_one(&self.dom, selector)?;
        Ok(self.dom.style_property(target, name))
    }

    /// Attribute of the first match, `None` when absent.
    pub fn attr(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let target = select_one(&self.dom, selector)?;
        Ok(self.dom.attr(target, name))
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.effects.trace_enabled = enabled;
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_logs)
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_to_stderr = enabled;
    }

    /// Caps the in-memory trace log; values below 1 are treated as 1.
    pub fn set_trace_log_limit(&mut self, max_entries: usize) {
        self.trace_log_limit = max_entries.max(1);
        while self.trace_logs.len() > self.trace_log_limit {
            self.trace_logs.remove(0);
        }
    }

    fn flush_trace(&mut self) {
        for line in std::mem::take(&mut self.effects.trace_lines) {
            if self.trace_to_stderr {
                eprintln!("{line}");
            }
            self.trace_logs.push(line);
            while self.trace_logs.len() > self.trace_log_limit {
                self.trace_logs.remove(0);
            }
        }
    }
}

fn describe_node(dom: &Dom, id: NodeId) -> String {
    let Some(tag) = dom.tag_name(id) else {
        return "#document".to_string();
    };
    match dom.attr(id, "id") {
        Some(id_attr) if !id_attr.is_empty() => format!("{tag}#{id_attr}"),
        _ => tag.to_string(),
    }
}

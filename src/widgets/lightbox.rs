use crate::Result;
use crate::dom::{Dom, NodeId};
use crate::events::EventState;
use crate::selector::select_all;
use crate::widgets::PageEffects;

const VISIT_DATE_PREFIX: &str = "訪問日：";

/// Photo lightbox: clicking a visit photo opens the modal with that photo's
/// source and visit date; the close button or a click on the backdrop
/// itself closes it again.
#[derive(Debug)]
pub(crate) struct PhotoLightbox {
    modal: NodeId,
    modal_img: NodeId,
    modal_date: NodeId,
    close_button: NodeId,
    photos: Vec<NodeId>,
}

impl PhotoLightbox {
    pub(crate) fn install(dom: &Dom) -> Result<Option<Self>> {
        let Some(modal) = dom.element_by_id("image-modal") else {
            return Ok(None);
        };
        let Some(modal_img) = dom.element_by_id("modal-img") else {
            return Ok(None);
        };
        let Some(modal_date) = dom.element_by_id("modal-date") else {
            return Ok(None);
        };
        let Some(close_button) = select_all(dom, ".close-modal")?.into_iter().next() else {
            return Ok(None);
        };
        let photos = select_all(dom, ".visit-photo")?;
        if photos.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            modal,
            modal_img,
            modal_date,
            close_button,
            photos,
        }))
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

        if self.photos.contains(&current) {
            dom.set_style_property(self.modal, "display", "flex")?;
            let src = dom.attr(current, "src").unwrap_or_default();
            dom.set_attr(self.modal_img, "src", &src)?;
            let date_text = dom
                .attr(current, "data-visit-date")
                .map(|date| format!("{VISIT_DATE_PREFIX}{date}"))
                .unwrap_or_default();
            dom.set_text_content(self.modal_date, &date_text)?;
            effects.trace(|| format!("[lightbox] open src={src}"));
            return Ok(());
        }

        if current == self.close_button {
            dom.set_style_property(self.modal, "display", "none")?;
            effects.trace(|| "[lightbox] close button".to_string());
            return Ok(());
        }

        // Backdrop click: only when the modal itself was hit, not a
        // descendant such as the enlarged image.
        if current == self.modal && event.target == self.modal {
            dom.set_style_property(self.modal, "display", "none")?;
            effects.trace(|| "[lightbox] close backdrop".to_string());
        }
        Ok(())
    }
}

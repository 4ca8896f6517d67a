use crate::Result;
use crate::dom::Dom;
use crate::selector::select_all;

/// Forces `autocomplete="on"` onto every text input so browser suggestions
/// stay enabled across the whole form.
pub(crate) fn apply_autocomplete_defaults(dom: &mut Dom) -> Result<()> {
    for input in select_all(dom, "input[type=text]")? {
        dom.set_attr(input, "autocomplete", "on")?;
    }
    Ok(())
}

/// Swaps the active bottom-nav icon to its highlighted variant: any image
/// under an active nav item takes its `data-active` source, when present.
pub(crate) fn swap_active_nav_icons(dom: &mut Dom) -> Result<()> {
    for img in select_all(dom, ".bottom-nav li.active img")? {
        if let Some(active_src) = dom.attr(img, "data-active") {
            if !active_src.is_empty() {
                dom.set_attr(img, "src", &active_src)?;
            }
        }
    }
    Ok(())
}

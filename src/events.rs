use crate::dom::{Dom, NodeId};

/// Dispatch state for one synthetic event, mirroring the subset of the DOM
/// event model the widgets rely on: bubbling from target to root and
/// `stopPropagation`.
#[derive(Debug, Clone)]
pub(crate) struct EventState {
    pub(crate) event_type: String,
    pub(crate) target: NodeId,
    pub(crate) current_target: NodeId,
    pub(crate) propagation_stopped: bool,
}

impl EventState {
    pub(crate) fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: target,
            propagation_stopped: false,
        }
    }

    pub(crate) fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// The bubble path: the target itself, then its element ancestors up to the
/// document root (the document node is excluded; no widget listens there).
pub(crate) fn bubble_path(dom: &Dom, target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut current = dom.parent(target);
    while let Some(node) = current {
        if dom.is_element(node) {
            path.push(node);
        }
        current = dom.parent(node);
    }
    path
}

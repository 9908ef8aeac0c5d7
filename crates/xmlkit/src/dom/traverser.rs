//! Depth-first visits over a [`Document`](super::Document) tree.
//!
//! Every node is offered to each [`Visitor`] when the walk enters it and
//! again when it leaves it. A [`Action::RemoveNode`] answer drops the node
//! from its parent. Removing a node on enter skips its children and its
//! leave callbacks.

use xmlkit_engine::{XmlElement, XmlNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Noop,
    RemoveNode,
}

/// Callbacks for [`Document::traverse`](super::Document::traverse). Both
/// default to [`Action::Noop`].
pub trait Visitor {
    fn on_node_enter(&self, _node: &XmlNode) -> Action {
        Action::Noop
    }

    fn on_node_leave(&self, _node: &XmlNode) -> Action {
        Action::Noop
    }
}

/// Walk `root` and return it, or `None` if a visitor removed it.
pub(crate) fn traverse_root(root: XmlElement, visitors: &[&dyn Visitor]) -> Option<XmlElement> {
    let mut node = XmlNode::Element(root);
    match visit(&mut node, visitors) {
        Action::RemoveNode => None,
        Action::Noop => match node {
            XmlNode::Element(root) => Some(root),
            _ => None,
        },
    }
}

fn visit(node: &mut XmlNode, visitors: &[&dyn Visitor]) -> Action {
    if any_removes(visitors, |visitor| visitor.on_node_enter(node)) {
        return Action::RemoveNode;
    }

    if let XmlNode::Element(element) = node {
        let children = std::mem::take(&mut element.children);
        element.children = children
            .into_iter()
            .filter_map(|mut child| match visit(&mut child, visitors) {
                Action::Noop => Some(child),
                Action::RemoveNode => None,
            })
            .collect();
    }

    if any_removes(visitors, |visitor| visitor.on_node_leave(node)) {
        Action::RemoveNode
    } else {
        Action::Noop
    }
}

// Every visitor sees the node, even after an earlier one asked to remove it.
fn any_removes(visitors: &[&dyn Visitor], call: impl Fn(&dyn Visitor) -> Action) -> bool {
    visitors
        .iter()
        .map(|visitor| call(*visitor))
        .fold(false, |remove, action| remove || action == Action::RemoveNode)
}

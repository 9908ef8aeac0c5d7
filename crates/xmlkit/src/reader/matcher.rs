//! Predicates over the reader's position.
//!
//! A matcher looks at the [`NodeSequence`] of the element the reader is on:
//! the element itself is the last entry, its ancestors come before it. Any
//! `Fn(&NodeSequence) -> bool` is a matcher, and the functions here build
//! and combine the common ones.
//!
//! ```rust
//! use xmlkit::reader::matcher::{Matcher, all, attribute_value, element_name, not};
//!
//! let active_users = all(vec![
//!     element_name("user").boxed(),
//!     not(attribute_value("state", "disabled")).boxed(),
//! ]);
//! # let _ = active_users;
//! ```

use xmlkit_engine::{AttributeNode, ElementNode, NodeSequence};

pub trait Matcher {
    fn matches(&self, sequence: &NodeSequence) -> bool;

    fn boxed<'a>(self) -> Box<dyn Matcher + 'a>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

impl<F> Matcher for F
where
    F: Fn(&NodeSequence) -> bool,
{
    fn matches(&self, sequence: &NodeSequence) -> bool {
        self(sequence)
    }
}

impl Matcher for Box<dyn Matcher + '_> {
    fn matches(&self, sequence: &NodeSequence) -> bool {
        (**self).matches(sequence)
    }
}

fn current_matches(sequence: &NodeSequence, predicate: impl Fn(&ElementNode) -> bool) -> bool {
    sequence.current().is_some_and(predicate)
}

fn any_attribute(sequence: &NodeSequence, predicate: impl Fn(&AttributeNode) -> bool) -> bool {
    current_matches(sequence, |element| element.attributes.iter().any(&predicate))
}

/// Every matcher matches. True for an empty list.
pub fn all<'a>(matchers: Vec<Box<dyn Matcher + 'a>>) -> impl Matcher + 'a {
    move |sequence: &NodeSequence| matchers.iter().all(|matcher| matcher.matches(sequence))
}

/// At least one matcher matches. False for an empty list.
pub fn any<'a>(matchers: Vec<Box<dyn Matcher + 'a>>) -> impl Matcher + 'a {
    move |sequence: &NodeSequence| matchers.iter().any(|matcher| matcher.matches(sequence))
}

pub fn not<M: Matcher>(matcher: M) -> impl Matcher {
    move |sequence: &NodeSequence| !matcher.matches(sequence)
}

/// Qualified name, prefix included (`fizz:num`).
pub fn node_name(name: impl Into<String>) -> impl Matcher {
    let name = name.into();
    move |sequence: &NodeSequence| current_matches(sequence, |element| element.name == name)
}

/// Local name, whatever the prefix.
pub fn element_name(local_name: impl Into<String>) -> impl Matcher {
    let local_name = local_name.into();
    move |sequence: &NodeSequence| {
        current_matches(sequence, |element| element.local_name == local_name)
    }
}

/// Local name within a namespace URI.
pub fn namespaced_element(
    namespace: impl Into<String>,
    local_name: impl Into<String>,
) -> impl Matcher {
    let namespace = namespace.into();
    let local_name = local_name.into();
    move |sequence: &NodeSequence| {
        current_matches(sequence, |element| {
            element.local_name == local_name
                && element.namespace.as_deref() == Some(namespace.as_str())
        })
    }
}

/// 1-based position among the parent's child elements.
pub fn element_position(position: usize) -> impl Matcher {
    move |sequence: &NodeSequence| current_matches(sequence, |element| element.position == position)
}

/// The document element.
pub fn document_element() -> impl Matcher {
    |sequence: &NodeSequence| sequence.len() == 1
}

/// Number of ancestors; the document element is at depth 0.
pub fn depth(depth: usize) -> impl Matcher {
    move |sequence: &NodeSequence| sequence.len() == depth + 1
}

/// Has an attribute with this qualified name.
pub fn attribute_name(name: impl Into<String>) -> impl Matcher {
    let name = name.into();
    move |sequence: &NodeSequence| any_attribute(sequence, |attribute| attribute.name == name)
}

/// Has an attribute with this local name, whatever the prefix.
pub fn attribute_local_name(local_name: impl Into<String>) -> impl Matcher {
    let local_name = local_name.into();
    move |sequence: &NodeSequence| {
        any_attribute(sequence, |attribute| attribute.local_name == local_name)
    }
}

/// Has an attribute with this qualified name and value.
pub fn attribute_value(name: impl Into<String>, value: impl Into<String>) -> impl Matcher {
    let name = name.into();
    let value = value.into();
    move |sequence: &NodeSequence| {
        any_attribute(sequence, |attribute| attribute.name == name && attribute.value == value)
    }
}

/// Has an attribute with this namespace, local name and value.
pub fn namespaced_attribute_value(
    namespace: impl Into<String>,
    local_name: impl Into<String>,
    value: impl Into<String>,
) -> impl Matcher {
    let namespace = namespace.into();
    let local_name = local_name.into();
    let value = value.into();
    move |sequence: &NodeSequence| {
        any_attribute(sequence, |attribute| {
            attribute.local_name == local_name
                && attribute.namespace.as_deref() == Some(namespace.as_str())
                && attribute.value == value
        })
    }
}

/// Matches a path from the document element down: the first matcher is
/// applied to the document element, the second to its child on the path,
/// and so on. The path must end at the current element.
pub fn sequence<'a>(matchers: Vec<Box<dyn Matcher + 'a>>) -> impl Matcher + 'a {
    move |sequence: &NodeSequence| {
        sequence.len() == matchers.len()
            && matchers
                .iter()
                .enumerate()
                .all(|(index, matcher)| matcher.matches(&sequence.prefix(index + 1)))
    }
}

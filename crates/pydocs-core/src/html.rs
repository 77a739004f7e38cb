//! Tag locator: required-element lookups over a parsed document.
//!
//! Every extraction routine descends into its page through [`find_tag`].
//! A missing anchor means the page changed shape, so the lookup fails loudly
//! with [`AppError::TagNotFound`] instead of returning an empty result.

use std::backtrace::Backtrace;
use std::fmt;

use regex::Regex;
use scraper::{ElementRef, Html, Node};

use crate::error::AppError;

/// How one attribute of a candidate element is matched.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Exact(String),
    Pattern(Regex),
}

impl AttrValue {
    fn matches(&self, name: &str, value: &str) -> bool {
        match self {
            AttrValue::Exact(expected) if name == "class" => {
                value == expected || value.split_whitespace().any(|c| c == expected)
            }
            AttrValue::Exact(expected) => value == expected,
            AttrValue::Pattern(re) => re.is_match(value),
        }
    }
}

/// Tag name plus an attribute filter. With no attributes it matches any
/// element with that name.
#[derive(Debug, Clone)]
pub struct TagQuery {
    name: String,
    attrs: Vec<(String, AttrValue)>,
}

impl TagQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    /// Require `name` to equal `value`. For `class`, any one class may match.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), AttrValue::Exact(value.into())));
        self
    }

    /// Require `name` to contain a match of `pattern`.
    pub fn attr_pattern(mut self, name: impl Into<String>, pattern: Regex) -> Self {
        self.attrs.push((name.into(), AttrValue::Pattern(pattern)));
        self
    }

    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        let el = element.value();
        el.name() == self.name
            && self
                .attrs
                .iter()
                .all(|(name, expected)| el.attr(name).is_some_and(|v| expected.matches(name, v)))
    }

    fn describe_attrs(&self) -> String {
        let parts: Vec<String> = self
            .attrs
            .iter()
            .map(|(name, value)| match value {
                AttrValue::Exact(v) => format!("{name}: {v:?}"),
                AttrValue::Pattern(re) => format!("{name}: /{}/", re.as_str()),
            })
            .collect();
        format!("{{{}}}", parts.join(", "))
    }
}

impl fmt::Display for TagQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.describe_attrs())
    }
}

/// Parse a full HTML document.
pub fn parse_document(text: &str) -> Html {
    Html::parse_document(text)
}

/// Every descendant of `node` (excluding `node` itself) matching `query`,
/// in document order.
pub fn find_all<'a>(node: ElementRef<'a>, query: &TagQuery) -> Vec<ElementRef<'a>> {
    node.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|el| query.matches(el))
        .collect()
}

/// First descendant of `node` matching `query`.
///
/// Logs the failed lookup together with a backtrace and returns
/// [`AppError::TagNotFound`] when nothing matches.
pub fn find_tag<'a>(node: ElementRef<'a>, query: &TagQuery) -> Result<ElementRef<'a>, AppError> {
    let found = node
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|el| query.matches(el));

    match found {
        Some(el) => Ok(el),
        None => {
            let attrs = query.describe_attrs();
            tracing::error!(
                "Tag not found: {} {}\n{}",
                query.name,
                attrs,
                Backtrace::force_capture()
            );
            Err(AppError::TagNotFound {
                tag: query.name.clone(),
                attrs,
            })
        }
    }
}

/// Read a required attribute of an element.
pub fn attr_of(element: ElementRef<'_>, attr: &str) -> Result<String, AppError> {
    element
        .value()
        .attr(attr)
        .map(str::to_string)
        .ok_or_else(|| AppError::MissingAttribute {
            tag: element.value().name().to_string(),
            attr: attr.to_string(),
        })
}

/// All text below an element, concatenated in document order.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of an arbitrary node: the node's own text, or the concatenated
/// text of an element. Other node kinds have no text.
pub fn node_text(node: ego_tree::NodeRef<'_, Node>) -> String {
    match node.value() {
        Node::Text(text) => {
            let s: &str = text;
            s.to_string()
        }
        Node::Element(_) => ElementRef::wrap(node).map(text_of).unwrap_or_default(),
        _ => String::new(),
    }
}

/// First text node below `element` whose content is exactly `needle`.
pub fn find_text_node<'a>(
    element: ElementRef<'a>,
    needle: &str,
) -> Option<ego_tree::NodeRef<'a, Node>> {
    element.descendants().find(|node| match node.value() {
        Node::Text(text) => {
            let s: &str = text;
            s == needle
        }
        _ => false,
    })
}

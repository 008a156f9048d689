//! The attribution control's content, expressed as [`lignin`] VDOM.
//!
//! Attribution texts and custom prefixes only ever become [`Node::Text`],
//! so whatever markup-like characters they contain are displayed verbatim.
//! Only the built-in branding produces elements.

use crate::attribution::Prefix;
use core::slice;
use lignin::{Attribute, Element, ElementCreationOptions, Node, ThreadBound};

/// Where the default branding links to.
pub const BRANDING_URL: &str = "https://leafletjs.com";
/// Tooltip of the default branding link.
pub const BRANDING_TITLE: &str = "A JavaScript library for interactive maps";
/// Visible label of the default branding link.
pub const BRANDING_LABEL: &str = "Leaflet";

/// Shown between the prefix and the attribution list.
pub const PREFIX_SEPARATOR: &str = "|";
/// Shown between individual attributions.
pub const ATTRIBUTION_SEPARATOR: &str = ", ";

const LINK_ATTRIBUTES: &[Attribute<'static>] = &[
	Attribute { name: "href", value: BRANDING_URL },
	Attribute { name: "title", value: BRANDING_TITLE },
];

const FLAG_ATTRIBUTES: &[Attribute<'static>] = &[
	Attribute { name: "aria-hidden", value: "true" },
	Attribute { name: "width", value: "12" },
	Attribute { name: "height", value: "8" },
	Attribute { name: "viewBox", value: "0 0 12 8" },
	Attribute { name: "class", value: "leaflet-attribution-flag" },
];

const FLAG_PATH_ATTRIBUTES: [&[Attribute<'static>]; 3] = [
	&[Attribute { name: "fill", value: "#4C7BE1" }, Attribute { name: "d", value: "M0 0h12v4H0z" }],
	&[Attribute { name: "fill", value: "#FFD500" }, Attribute { name: "d", value: "M0 4h12v3H0z" }],
	&[Attribute { name: "fill", value: "#E0BC00" }, Attribute { name: "d", value: "M0 7h12v1H0z" }],
];

const SEPARATOR_ATTRIBUTES: &[Attribute<'static>] = &[Attribute { name: "aria-hidden", value: "true" }];

fn element<'a>(name: &'a str, attributes: &'a [Attribute<'a>], content: Node<'a, ThreadBound>) -> Element<'a, ThreadBound> {
	Element {
		name,
		creation_options: ElementCreationOptions::new(),
		attributes,
		content,
		event_bindings: &[],
	}
}

fn text(text: &str) -> Node<'_, ThreadBound> {
	Node::Text { text, dom_binding: None }
}

/// Builds the content for `prefix` followed by `attributions` and hands it to `f`.
///
/// The VDOM borrows from locals, so it's only available for the duration of the call.
pub fn with_content<R>(prefix: &Prefix, attributions: &[&str], f: impl FnOnce(&[Node<'_, ThreadBound>]) -> R) -> R {
	let flag_paths: Vec<Element<ThreadBound>> = FLAG_PATH_ATTRIBUTES.iter().map(|&attributes| element("path", attributes, Node::Multi(&[]))).collect();
	let flag_path_nodes: Vec<Node<ThreadBound>> = flag_paths.iter().map(|element| Node::SvgElement { element, dom_binding: None }).collect();
	let flag = element("svg", FLAG_ATTRIBUTES, Node::Multi(&flag_path_nodes));
	let link_content = [Node::SvgElement { element: &flag, dom_binding: None }, text(BRANDING_LABEL)];
	let link = element("A", LINK_ATTRIBUTES, Node::Multi(&link_content));
	let separator = element("SPAN", SEPARATOR_ATTRIBUTES, text(PREFIX_SEPARATOR));

	let mut nodes = Vec::with_capacity(attributions.len() * 2 + 4);
	match prefix {
		Prefix::Branding => nodes.push(Node::HtmlElement { element: &link, dom_binding: None }),
		Prefix::Text(prefix) => nodes.push(text(prefix)),
		Prefix::Disabled => (),
	}
	if !nodes.is_empty() && !attributions.is_empty() {
		nodes.extend([text(" "), Node::HtmlElement { element: &separator, dom_binding: None }, text(" ")].iter().copied());
	}
	for (i, &attribution) in attributions.iter().enumerate() {
		if i > 0 {
			nodes.push(text(ATTRIBUTION_SEPARATOR));
		}
		nodes.push(text(attribution));
	}

	f(&nodes)
}

/// Concatenates all text in `vdom`, the way [***textContent***](https://developer.mozilla.org/en-US/docs/Web/API/Node/textContent) would after materialisation.
#[must_use]
pub fn text_content(vdom: &[Node<'_, ThreadBound>]) -> String {
	let mut text_content = String::new();
	append_text(&mut text_content, vdom);
	text_content
}

fn append_text(text_content: &mut String, vdom: &[Node<'_, ThreadBound>]) {
	for node in vdom {
		#[allow(unreachable_patterns)]
		match node {
			Node::Text { text, .. } => text_content.push_str(text),
			Node::HtmlElement { element, .. } | Node::SvgElement { element, .. } => append_text(text_content, slice::from_ref(&element.content)),
			Node::Multi(nodes) => append_text(text_content, nodes),
			_ => (),
		}
	}
}

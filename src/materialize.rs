//! Creates real DOM nodes from [`lignin`] VDOM.
//!
//! The attribution control rebuilds its container from scratch on every change,
//! so there's no diffing here, only creation.

use core::slice;
use lignin::{Node, ThreadBound};
use tracing::{error, instrument, trace_span, warn};
use wasm_bindgen::JsCast;

const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// Appends DOM nodes for `vdom` to `parent`'s [***childNodes***](https://developer.mozilla.org/en-US/docs/Web/API/Node/childNodes).
///
/// Nodes that fail to be created or inserted are logged and skipped.
#[instrument(skip(vdom))]
pub fn append_child_nodes(document: &web_sys::Document, parent: &web_sys::Node, vdom: &[Node<'_, ThreadBound>], depth_limit: usize) {
	if depth_limit == 0 {
		return error!("Depth limit reached");
	}

	for node in vdom {
		#[allow(unreachable_patterns)]
		match *node {
			Node::Comment { comment, dom_binding } => {
				let span = trace_span!("Creating comment", comment);
				let _enter = span.enter();
				warn_on_binding(dom_binding.is_some());
				let dom_comment = document.create_comment(comment);
				if let Err(error) = parent.append_child(dom_comment.as_ref()) {
					error!("Failed to insert comment: {:?}", error);
				}
			}

			Node::HtmlElement { element, dom_binding } => {
				let span = trace_span!("Creating HTML element", name = element.name);
				let _enter = span.enter();
				warn_on_binding(dom_binding.is_some());
				let dom_element = match match element.creation_options.is() {
					Some(is) => document.create_element_with_str(element.name, is),
					None => document.create_element(element.name),
				} {
					Ok(dom_element) => dom_element,
					Err(error) => {
						error!("Failed to create HTML element: {:?}", error);
						continue;
					}
				};
				fill_element(document, parent, &dom_element, element, depth_limit);
			}

			Node::SvgElement { element, dom_binding } => {
				let span = trace_span!("Creating SVG element", name = element.name);
				let _enter = span.enter();
				warn_on_binding(dom_binding.is_some());
				let dom_element = match match element.creation_options.is() {
					Some(is) => document.create_element_ns_with_str(Some(SVG_NAMESPACE), element.name, is),
					None => document.create_element_ns(Some(SVG_NAMESPACE), element.name),
				} {
					Ok(dom_element) => dom_element,
					Err(error) => {
						error!("Failed to create SVG element: {:?}", error);
						continue;
					}
				};
				if !dom_element.is_instance_of::<web_sys::SvgElement>() {
					warn!("Created <{}> is not a `web_sys::SvgElement`.", element.name);
				}
				fill_element(document, parent, &dom_element, element, depth_limit);
			}

			Node::Multi(nodes) => {
				let span = trace_span!("Creating multi", "nodes.len()" = nodes.len());
				let _enter = span.enter();
				// May skip `depth_limit` check one level down.
				if !nodes.is_empty() {
					append_child_nodes(document, parent, nodes, depth_limit - 1);
				}
			}

			Node::Text { text, dom_binding } => {
				let span = trace_span!("Creating text node", text = crate::loggable(text));
				let _enter = span.enter();
				warn_on_binding(dom_binding.is_some());
				let dom_text = document.create_text_node(text);
				if let Err(error) = parent.append_child(dom_text.as_ref()) {
					error!("Failed to insert text: {:?}", error);
				}
			}

			_ => warn!("Skipping VDOM node of unsupported kind."),
		}
	}
}

fn fill_element(document: &web_sys::Document, parent: &web_sys::Node, dom_element: &web_sys::Element, element: &lignin::Element<'_, ThreadBound>, depth_limit: usize) {
	for &lignin::Attribute { name, value } in element.attributes {
		if let Err(error) = dom_element.set_attribute(name, value) {
			error!("Could not add attribute {:?}={:?}: {:?}", name, value, error);
		}
	}
	if !element.event_bindings.is_empty() {
		warn!("Ignoring {} event binding(s) on <{}>.", element.event_bindings.len(), element.name);
	}
	append_child_nodes(document, dom_element.as_ref(), slice::from_ref(&element.content), depth_limit - 1);
	if let Err(error) = parent.append_child(dom_element.as_ref()) {
		error!("Failed to insert <{}>: {:?}", element.name, error);
	}
}

fn warn_on_binding(has_binding: bool) {
	if has_binding {
		warn!("DOM bindings aren't supported by attribution content and won't be called.");
	}
}

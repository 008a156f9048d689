//! The rendering surface controls are drawn on.

use crate::materialize;
use core::fmt::{self, Debug, Formatter};
use lignin::{Node, ThreadBound};
use std::rc::Rc;
use tracing::{error, instrument, trace};
use wasm_bindgen::{closure::Closure, JsCast, JsValue, UnwrapThrowExt};

/// Events that must not reach the map through a control's container.
pub const SUPPRESSED_EVENTS: &[&str] = &["click", "dblclick", "mousedown", "touchstart", "contextmenu"];

/// Content nesting is shallow (link > svg > path), this leaves ample headroom.
const DEPTH_LIMIT: usize = 16;

/// Creates and fills control containers.
pub trait Dom {
	type Container: Clone + Debug + 'static;

	/// Creates a new, detached `div` container with the given ***class*** attribute.
	fn create_container(&self, class_name: &str) -> Self::Container;

	/// Stops pointer interaction on `container` from propagating to the map beneath.
	fn disable_interaction_propagation(&self, container: &Self::Container);

	/// Discards all of `container`'s children and replaces them with `content`.
	fn replace_content(&self, container: &Self::Container, content: &[Node<'_, ThreadBound>]);
}

/// [`Dom`] implementation backed by a browser [***Document***](https://developer.mozilla.org/en-US/docs/Web/API/Document).
///
/// Clones share one event handler for propagation suppression.
/// Listeners registered through it start throwing into ***JavaScript*** once the last clone is dropped.
#[derive(Clone)]
pub struct WebDom {
	document: web_sys::Document,
	stop_propagation: Rc<Closure<dyn Fn(web_sys::Event)>>,
}
impl Debug for WebDom {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("WebDom").field("document", &self.document).finish_non_exhaustive()
	}
}
impl WebDom {
	#[must_use]
	#[instrument]
	pub fn new(document: web_sys::Document) -> Self {
		Self {
			document,
			stop_propagation: Rc::new(Closure::wrap(Box::new(|event: web_sys::Event| event.stop_propagation()) as Box<dyn Fn(web_sys::Event)>)),
		}
	}

	/// Uses the current window's document, if there is one.
	#[must_use]
	pub fn from_window() -> Option<Self> {
		web_sys::window().and_then(|window| window.document()).map(Self::new)
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}
}
impl Dom for WebDom {
	type Container = web_sys::HtmlElement;

	#[instrument]
	fn create_container(&self, class_name: &str) -> Self::Container {
		let container = self
			.document
			.create_element("DIV")
			.expect_throw("lignin-attribution: Failed to create container element.")
			.dyn_into::<web_sys::HtmlElement>()
			.unwrap_throw();
		container.set_class_name(class_name);
		container
	}

	#[instrument]
	fn disable_interaction_propagation(&self, container: &Self::Container) {
		let event_target: &web_sys::EventTarget = container.as_ref();
		let stop_propagation: &Closure<dyn Fn(web_sys::Event)> = &self.stop_propagation;
		let stop_propagation: &JsValue = stop_propagation.as_ref();
		for &name in SUPPRESSED_EVENTS {
			if let Err(error) = event_target.add_event_listener_with_callback(name, stop_propagation.unchecked_ref()) {
				error!("Failed to add event listener {:?}: {:?}", name, error);
			}
		}
	}

	#[instrument(skip(content))]
	fn replace_content(&self, container: &Self::Container, content: &[Node<'_, ThreadBound>]) {
		let node: &web_sys::Node = container.as_ref();
		node.set_text_content(None);
		materialize::append_child_nodes(&self.document, node, content, DEPTH_LIMIT);
		trace!("Container now has {} child node(s).", node.child_nodes().length());
	}
}

#![allow(dead_code)]

use core::{mem, slice};
use lignin_attribution::{
	dom::Dom,
	host::{Layer, LayerRef, ListenerId, Map, Position},
	lignin::{Node, ThreadBound},
	vdom, AttributionControl,
};
use std::{
	cell::{Cell, RefCell},
	rc::Rc,
};

/// What the last render left in a container.
#[derive(Debug, Default)]
pub struct Rendered {
	pub class_name: String,
	pub text: String,
	pub element_names: Vec<String>,
	pub propagation_disabled: bool,
	pub renders: usize,
}

pub type Container = Rc<RefCell<Rendered>>;

/// Runs after each render, the way a host surface might call back into its controls.
#[derive(Default)]
pub struct MockDom {
	render_hook: RefCell<Option<Box<dyn Fn()>>>,
}
impl Dom for MockDom {
	type Container = Container;

	fn create_container(&self, class_name: &str) -> Container {
		Rc::new(RefCell::new(Rendered {
			class_name: class_name.to_owned(),
			..Rendered::default()
		}))
	}

	fn disable_interaction_propagation(&self, container: &Container) {
		container.borrow_mut().propagation_disabled = true;
	}

	fn replace_content(&self, container: &Container, content: &[Node<'_, ThreadBound>]) {
		{
			let mut rendered = container.borrow_mut();
			rendered.text = vdom::text_content(content);
			rendered.element_names.clear();
			collect_element_names(&mut rendered.element_names, content);
			rendered.renders += 1;
		}
		if let Some(hook) = &*self.render_hook.borrow() {
			hook();
		}
	}
}

fn collect_element_names(names: &mut Vec<String>, vdom: &[Node<'_, ThreadBound>]) {
	for node in vdom {
		match node {
			Node::HtmlElement { element, .. } | Node::SvgElement { element, .. } => {
				names.push(element.name.to_owned());
				collect_element_names(names, slice::from_ref(&element.content));
			}
			Node::Multi(nodes) => collect_element_names(names, nodes),
			_ => (),
		}
	}
}

#[derive(Default)]
pub struct MockLayer {
	attribution: RefCell<Option<String>>,
	removed: RefCell<Vec<(ListenerId, Box<dyn FnOnce()>)>>,
	next_listener: Cell<u64>,
	ignores_cancellation: bool,
}
impl MockLayer {
	/// A layer whose "removed" listeners still fire after being cancelled.
	pub fn ignoring_cancellation(attribution: Option<&str>) -> Rc<Self> {
		Rc::new(Self {
			attribution: RefCell::new(attribution.map(str::to_owned)),
			ignores_cancellation: true,
			..Self::default()
		})
	}

	pub fn new(attribution: Option<&str>) -> Rc<Self> {
		Rc::new(Self {
			attribution: RefCell::new(attribution.map(str::to_owned)),
			..Self::default()
		})
	}

	pub fn set_attribution(&self, attribution: Option<&str>) {
		*self.attribution.borrow_mut() = attribution.map(str::to_owned);
	}

	pub fn pending_removed_listeners(&self) -> usize {
		self.removed.borrow().len()
	}

	fn fire_removed(&self) {
		let handlers = mem::take(&mut *self.removed.borrow_mut());
		for (_, handler) in handlers {
			handler();
		}
	}
}
impl Layer for MockLayer {
	fn attribution(&self) -> Option<String> {
		self.attribution.borrow().clone()
	}

	fn once_removed(&self, handler: Box<dyn FnOnce()>) -> ListenerId {
		let id = ListenerId(self.next_listener.get());
		self.next_listener.set(id.0 + 1);
		self.removed.borrow_mut().push((id, handler));
		id
	}

	fn off_removed(&self, listener: ListenerId) {
		if self.ignores_cancellation {
			return;
		}
		self.removed.borrow_mut().retain(|(id, _)| *id != listener);
	}
}

#[derive(Default)]
pub struct MockMap {
	dom: MockDom,
	layers: RefCell<Vec<LayerRef>>,
	layer_added: RefCell<Vec<(ListenerId, Rc<dyn Fn(&LayerRef)>)>>,
	next_listener: Cell<u64>,
	pub corners: RefCell<Vec<(Position, Container)>>,
	pub attribution_control: RefCell<Option<AttributionControl<MockMap>>>,
}
impl MockMap {
	pub fn new() -> Rc<Self> {
		Rc::new(Self::default())
	}

	pub fn add_layer(&self, layer: &Rc<MockLayer>) {
		let layer: LayerRef = layer.clone();
		self.layers.borrow_mut().push(Rc::clone(&layer));
		let handlers: Vec<_> = self.layer_added.borrow().iter().map(|(_, handler)| Rc::clone(handler)).collect();
		for handler in handlers {
			handler(&layer);
		}
	}

	pub fn remove_layer(&self, layer: &Rc<MockLayer>) {
		let target = Rc::as_ptr(layer).cast::<u8>();
		self.layers.borrow_mut().retain(|present| Rc::as_ptr(present).cast::<u8>() != target);
		layer.fire_removed();
	}

	pub fn set_render_hook(&self, hook: impl Fn() + 'static) {
		*self.dom.render_hook.borrow_mut() = Some(Box::new(hook));
	}

	pub fn layer_added_listeners(&self) -> usize {
		self.layer_added.borrow().len()
	}

	pub fn corner_of(&self, container: &Container) -> Option<Position> {
		self.corners.borrow().iter().find(|(_, placed)| Rc::ptr_eq(placed, container)).map(|&(position, _)| position)
	}
}
impl Map for MockMap {
	type Dom = MockDom;

	fn dom(&self) -> &MockDom {
		&self.dom
	}

	fn layers(&self) -> Vec<LayerRef> {
		self.layers.borrow().clone()
	}

	fn on_layer_added(&self, handler: Rc<dyn Fn(&LayerRef)>) -> ListenerId {
		let id = ListenerId(self.next_listener.get());
		self.next_listener.set(id.0 + 1);
		self.layer_added.borrow_mut().push((id, handler));
		id
	}

	fn off_layer_added(&self, listener: ListenerId) {
		self.layer_added.borrow_mut().retain(|(id, _)| *id != listener);
	}

	fn insert_control(&self, position: Position, container: &Container) {
		self.corners.borrow_mut().push((position, Rc::clone(container)));
	}

	fn remove_control(&self, container: &Container) {
		self.corners.borrow_mut().retain(|(_, placed)| !Rc::ptr_eq(placed, container));
	}

	fn set_attribution_control(&self, control: Option<AttributionControl<Self>>) {
		*self.attribution_control.borrow_mut() = control;
	}
}

/// Text currently shown by `control`, or [`None`] if it is not on a map.
pub fn shown(control: &AttributionControl<MockMap>) -> Option<String> {
	control.container().map(|container| container.borrow().text.clone())
}

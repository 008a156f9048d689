use crate::{
	dom::Dom,
	host::{Layer, LayerRef, ListenerId, Map, Position},
	loggable,
	rc_hash_map::RcHashMap,
	vdom,
};
use core::{
	fmt::{self, Debug, Formatter},
	mem,
};
use hashbrown::HashMap;
use std::{
	cell::RefCell,
	rc::{Rc, Weak},
};
use tracing::{debug, error, instrument, trace, warn};

/// ***class*** of the container element.
pub const CONTAINER_CLASS: &str = "leaflet-control leaflet-control-attribution";

/// What is shown in front of the attribution list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prefix {
	/// The built-in branding link, the only prefix rendered as markup.
	Branding,
	/// Caller-supplied text, always rendered verbatim.
	Text(String),
	/// No prefix (and no separator) at all.
	Disabled,
}
impl Default for Prefix {
	fn default() -> Self {
		Self::Branding
	}
}
impl From<&str> for Prefix {
	/// The empty string disables the prefix.
	fn from(text: &str) -> Self {
		if text.is_empty() {
			Self::Disabled
		} else {
			Self::Text(text.to_owned())
		}
	}
}
impl From<String> for Prefix {
	/// The empty string disables the prefix.
	fn from(text: String) -> Self {
		if text.is_empty() {
			Self::Disabled
		} else {
			Self::Text(text)
		}
	}
}
impl From<bool> for Prefix {
	/// `true` selects [`Prefix::Branding`], `false` [`Prefix::Disabled`].
	fn from(enabled: bool) -> Self {
		if enabled {
			Self::Branding
		} else {
			Self::Disabled
		}
	}
}

/// Construction options of an [`AttributionControl`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributionOptions {
	/// Corner the control is placed in. Defaults to [`Position::BottomRight`].
	pub position: Position,
	/// Defaults to [`Prefix::Branding`].
	pub prefix: Prefix,
}

/// The map-level option concerning attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOptions {
	/// Whether [`init_attribution_control`] adds an [`AttributionControl`]. Defaults to `true`.
	pub attribution_control: bool,
}
impl Default for MapOptions {
	fn default() -> Self {
		Self { attribution_control: true }
	}
}

/// Map initialisation hook: Creates an [`AttributionControl`] and adds it to `map`, unless disabled in `map_options`.
#[instrument(skip(map))]
pub fn init_attribution_control<M: Map>(map: &Rc<M>, map_options: &MapOptions, options: AttributionOptions) -> Option<AttributionControl<M>> {
	if !map_options.attribution_control {
		debug!("Attribution control disabled.");
		return None;
	}
	let control = AttributionControl::new(options);
	control.add_to(map);
	Some(control)
}

/// Lists the attribution texts of a map's layers, plus an optional prefix.
///
/// Texts are reference-counted: Several layers may require the same attribution,
/// which stays visible until the last of them is removed.
///
/// This is a cheap handle. Clones refer to the same control.
pub struct AttributionControl<M: Map>(Rc<RefCell<State<M>>>);

struct State<M: Map> {
	position: Position,
	prefix: Prefix,
	counts: RcHashMap<String, u32>,
	attachment: Option<Attachment<M>>,
	/// Not reset between attachments, so stale callbacks can't match newer subscriptions.
	next_subscription: u64,
	next_attachment: u64,
}

struct Attachment<M: Map> {
	id: u64,
	map: Weak<M>,
	container: <M::Dom as Dom>::Container,
	layer_added: Option<ListenerId>,
	layer_subscriptions: HashMap<u64, LayerSubscription>,
}

/// A pending one-shot "removed" listener, with the text captured when the layer was counted.
struct LayerSubscription {
	layer: Weak<dyn Layer>,
	listener: ListenerId,
	attribution: String,
}

impl<M: Map> Clone for AttributionControl<M> {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}

impl<M: Map> Default for AttributionControl<M> {
	fn default() -> Self {
		Self::new(AttributionOptions::default())
	}
}

impl<M: Map> Debug for AttributionControl<M> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self.0.try_borrow() {
			Ok(state) => f
				.debug_struct("AttributionControl")
				.field("position", &state.position)
				.field("prefix", &state.prefix)
				.field("counts", &state.counts)
				.field("container", &state.attachment.as_ref().map(|attachment| &attachment.container))
				.finish(),
			Err(_) => f.debug_struct("AttributionControl").finish_non_exhaustive(),
		}
	}
}

impl<M: Map> AttributionControl<M> {
	#[must_use]
	pub fn new(options: AttributionOptions) -> Self {
		let AttributionOptions { position, prefix } = options;
		Self(Rc::new(RefCell::new(State {
			position,
			prefix,
			counts: RcHashMap::new(),
			attachment: None,
			next_subscription: 0,
			next_attachment: 0,
		})))
	}

	/// Adds this control to `map`, removing it from its previous map first.
	#[instrument(skip(self, map))]
	pub fn add_to(&self, map: &Rc<M>) -> &Self {
		self.remove();
		let container = self.on_add(map);
		let position = self.0.borrow().position;
		map.insert_control(position, &container);
		debug!(position = position.as_str(), "Added attribution control.");
		self
	}

	/// Removes this control from its map. Does nothing if it isn't on one.
	///
	/// Pending "removed" listeners on layers are cancelled and the attributions they'd have released are released now.
	/// Attributions added directly through [`AttributionControl::add_attribution`] persist.
	#[instrument(skip(self))]
	pub fn remove(&self) -> &Self {
		let attachment = self.0.borrow_mut().attachment.take();
		let Attachment {
			map,
			container,
			layer_added,
			layer_subscriptions,
			..
		} = match attachment {
			Some(attachment) => attachment,
			None => return self,
		};

		match map.upgrade() {
			Some(map) => {
				map.remove_control(&container);
				if let Some(layer_added) = layer_added {
					map.off_layer_added(layer_added);
				}
			}
			None => warn!("Map was dropped before the attribution control was removed from it."),
		}

		let cancelled = layer_subscriptions.len();
		for (_, LayerSubscription { layer, listener, attribution }) in layer_subscriptions {
			if let Some(layer) = layer.upgrade() {
				layer.off_removed(listener);
			}
			self.0.borrow_mut().counts.weak_decrement(attribution.as_str());
		}
		let pruned = self.0.borrow_mut().counts.drain_weak().count();
		debug!(cancelled, pruned, "Removed attribution control.");
		self
	}

	fn on_add(&self, map: &Rc<M>) -> <M::Dom as Dom>::Container {
		map.set_attribution_control(Some(self.clone()));

		let dom = map.dom();
		let container = dom.create_container(CONTAINER_CLASS);
		dom.disable_interaction_propagation(&container);
		let attachment_id = {
			let mut state = self.0.borrow_mut();
			let id = state.next_attachment;
			state.next_attachment += 1;
			id
		};
		self.0.borrow_mut().attachment = Some(Attachment {
			id: attachment_id,
			map: Rc::downgrade(map),
			container: container.clone(),
			layer_added: None,
			layer_subscriptions: HashMap::new(),
		});

		for layer in map.layers() {
			self.track_layer(&layer);
		}
		self.render();

		let state = Rc::downgrade(&self.0);
		let layer_added = map.on_layer_added(Rc::new(move |layer: &LayerRef| {
			if let Some(state) = state.upgrade() {
				Self(state).on_layer_added(attachment_id, layer);
			}
		}));
		if let Some(attachment) = self.0.borrow_mut().attachment.as_mut() {
			attachment.layer_added = Some(layer_added);
		}

		container
	}

	/// Hosts may still deliver notifications to listeners that were cancelled during dispatch.
	#[instrument(skip(self, layer))]
	fn on_layer_added(&self, attachment_id: u64, layer: &LayerRef) {
		let current = self.0.borrow().attachment.as_ref().map(|attachment| attachment.id);
		if current == Some(attachment_id) {
			self.track_layer(layer);
		} else {
			warn!("Ignoring a layer-added notification that was cancelled already.");
		}
	}

	/// Counts `layer`'s attribution and arranges for it to be released again once the layer is removed.
	fn track_layer(&self, layer: &LayerRef) {
		let attribution = match layer.attribution() {
			Some(attribution) if !attribution.is_empty() => attribution,
			_ => return,
		};

		let token = {
			let mut state = self.0.borrow_mut();
			if state.attachment.is_none() {
				return;
			}
			let token = state.next_subscription;
			state.next_subscription += 1;
			token
		};
		self.add_attribution(&attribution);

		// Released by value: A layer's attribution is expected to stay the same while it's on the map.
		let state = Rc::downgrade(&self.0);
		let captured = attribution.clone();
		let listener = layer.once_removed(Box::new(move || {
			if let Some(state) = state.upgrade() {
				Self(state).on_layer_removed(token, &captured);
			}
		}));

		if let Some(attachment) = self.0.borrow_mut().attachment.as_mut() {
			attachment.layer_subscriptions.insert(
				token,
				LayerSubscription {
					layer: Rc::downgrade(layer),
					listener,
					attribution,
				},
			);
		}
	}

	#[instrument(skip(self, attribution))]
	fn on_layer_removed(&self, token: u64, attribution: &str) {
		let tracked = self
			.0
			.borrow_mut()
			.attachment
			.as_mut()
			.and_then(|attachment| attachment.layer_subscriptions.remove(&token))
			.is_some();
		if tracked {
			self.remove_attribution(attribution);
		} else {
			warn!("Ignoring a \"removed\" notification that was cancelled already.");
		}
	}

	/// Replaces the prefix and re-renders.
	///
	/// Text prefixes are displayed verbatim, even if they look like markup.
	#[instrument(skip(self, prefix))]
	pub fn set_prefix(&self, prefix: impl Into<Prefix>) -> &Self {
		let prefix = prefix.into();
		match &prefix {
			Prefix::Text(text) => trace!(text = loggable(text), "Setting text prefix."),
			other => trace!(prefix = ?other, "Setting prefix."),
		}
		self.0.borrow_mut().prefix = prefix;
		self.render();
		self
	}

	#[must_use]
	pub fn prefix(&self) -> Prefix {
		self.0.borrow().prefix.clone()
	}

	/// Adds one reference to `text` and re-renders. Empty text is ignored.
	#[instrument(skip(self, text), fields(text = loggable(text)))]
	pub fn add_attribution(&self, text: &str) -> &Self {
		if text.is_empty() {
			return self;
		}

		let incremented = self.0.borrow_mut().counts.increment_or_insert(text.to_owned());
		match incremented {
			Ok(count) => trace!(count, "Added attribution."),
			Err(error) => {
				error!("Could not add attribution: {}", error);
				return self;
			}
		}
		self.render();
		self
	}

	/// Removes one reference to `text` and re-renders.
	///
	/// Empty text, unknown text and text that isn't currently referenced are ignored.
	#[instrument(skip(self, text), fields(text = loggable(text)))]
	pub fn remove_attribution(&self, text: &str) -> &Self {
		if text.is_empty() {
			return self;
		}

		let decremented = self.0.borrow_mut().counts.weak_decrement(text);
		match decremented {
			Some(count) => {
				trace!(count, "Removed attribution.");
				self.render();
			}
			None => trace!("Attribution wasn't referenced."),
		}
		self
	}

	/// The currently visible attribution texts, in the order they were first added.
	#[must_use]
	pub fn attributions(&self) -> Vec<String> {
		self.0.borrow().counts.iter_strong().cloned().collect()
	}

	/// How many references `text` currently has.
	#[must_use]
	pub fn attribution_count(&self, text: &str) -> u32 {
		self.0.borrow().counts.count(text)
	}

	#[must_use]
	pub fn position(&self) -> Position {
		self.0.borrow().position
	}

	/// Changes the corner this control is shown in, moving it right away if it is on a map.
	#[instrument(skip(self))]
	pub fn set_position(&self, position: Position) -> &Self {
		let previous = mem::replace(&mut self.0.borrow_mut().position, position);
		if previous == position {
			return self;
		}

		let attached = self.0.borrow().attachment.as_ref().map(|attachment| (attachment.map.clone(), attachment.container.clone()));
		if let Some((map, container)) = attached {
			if let Some(map) = map.upgrade() {
				map.remove_control(&container);
				map.insert_control(position, &container);
			}
		}
		self
	}

	/// The container element, while this control is on a map.
	#[must_use]
	pub fn container(&self) -> Option<<M::Dom as Dom>::Container> {
		self.0.borrow().attachment.as_ref().map(|attachment| attachment.container.clone())
	}

	#[must_use]
	pub fn is_attached(&self) -> bool {
		self.0.borrow().attachment.is_some()
	}

	/// Copies what it needs out of the state first, so the host's [`Dom`] may call back into this control.
	fn render(&self) {
		let (map, container, prefix, attributions) = {
			let state = self.0.borrow();
			let attachment = match &state.attachment {
				Some(attachment) => attachment,
				None => return trace!("Not on a map. Skipping render."),
			};
			let map = match attachment.map.upgrade() {
				Some(map) => map,
				None => return warn!("Map was dropped while the attribution control was on it. Skipping render."),
			};
			let attributions: Vec<String> = state.counts.iter_strong().cloned().collect();
			(map, attachment.container.clone(), state.prefix.clone(), attributions)
		};

		let visible: Vec<&str> = attributions.iter().map(String::as_str).collect();
		vdom::with_content(&prefix, &visible, |content| map.dom().replace_content(&container, content));
		trace!(visible = visible.len(), "Rendered attributions.");
	}
}

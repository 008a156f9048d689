//! Contracts of the host map this crate plugs into.
//!
//! The map, its layers and its control layout live outside this crate.
//! Implement these traits on the host side to drive an [`AttributionControl`](`crate::AttributionControl`).

use crate::{dom::Dom, AttributionControl};
use std::rc::Rc;

/// Shared handle to a layer, as handed out by [`Map::layers`] and layer-added notifications.
pub type LayerRef = Rc<dyn Layer>;

/// Identifies a listener registration so that it can be cancelled later.
///
/// Values only need to be unique per emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// One of the four corners a control can be placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
	TopLeft,
	TopRight,
	BottomLeft,
	BottomRight,
}
impl Default for Position {
	fn default() -> Self {
		Self::BottomRight
	}
}
impl Position {
	/// The conventional identifier of this corner, e.g. `"bottomright"`.
	#[must_use]
	pub fn as_str(self) -> &'static str {
		match self {
			Self::TopLeft => "topleft",
			Self::TopRight => "topright",
			Self::BottomLeft => "bottomleft",
			Self::BottomRight => "bottomright",
		}
	}
}

/// A data layer that may require attribution while it is on a map.
pub trait Layer {
	/// The attribution text this layer needs displayed, if any.
	fn attribution(&self) -> Option<String> {
		None
	}

	/// Registers `handler` to run once, the next time this layer is removed from its map.
	fn once_removed(&self, handler: Box<dyn FnOnce()>) -> ListenerId;

	/// Cancels a registration made through [`Layer::once_removed`] that hasn't fired yet.
	///
	/// Unknown or already fired IDs must be ignored.
	fn off_removed(&self, listener: ListenerId);
}

/// The map an [`AttributionControl`] is added to.
pub trait Map: 'static {
	type Dom: Dom + 'static;

	/// The rendering surface this map's controls are created on.
	fn dom(&self) -> &Self::Dom;

	/// All layers currently on the map.
	fn layers(&self) -> Vec<LayerRef>;

	/// Registers `handler` to be notified about each layer added to the map from now on.
	fn on_layer_added(&self, handler: Rc<dyn Fn(&LayerRef)>) -> ListenerId;

	/// Cancels a registration made through [`Map::on_layer_added`].
	fn off_layer_added(&self, listener: ListenerId);

	/// Places a control's container into the given corner.
	fn insert_control(&self, position: Position, container: &<Self::Dom as Dom>::Container);

	/// Takes a control's container out of the map's layout.
	fn remove_control(&self, container: &<Self::Dom as Dom>::Container);

	/// Records `control` as this map's attribution control.
	fn set_attribution_control(&self, control: Option<AttributionControl<Self>>)
	where
		Self: Sized;
}

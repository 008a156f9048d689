#![doc(html_root_url = "https://docs.rs/lignin-attribution/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A map attribution control: Lists the copyright notices required by a map's layers,
//! reference-counted so that shared notices stay visible until their last layer is gone.
//!
//! Content is described as [`lignin`] VDOM and materialised into a container through a [`Dom`](`dom::Dom`).
//! The host map is reached through the traits in [`host`].

pub use lignin;

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod attribution;
pub mod dom;
pub mod host;
pub mod materialize;
pub mod rc_hash_map;
pub mod vdom;

pub use attribution::{init_attribution_control, AttributionControl, AttributionOptions, MapOptions, Prefix, CONTAINER_CLASS};

/// Attribution texts come from arbitrary layers, so they are only logged with the `"dangerous-logging"` feature enabled.
fn loggable(text: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		text
	} else {
		"[redacted]"
	}
}

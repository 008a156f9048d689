#![cfg(target_arch = "wasm32")]

use lignin_attribution::{
	dom::{Dom, WebDom},
	vdom, Prefix,
};
use std::{cell::Cell, rc::Rc};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

static mut LOG_INITIALIZED: bool = false;

fn web_dom() -> WebDom {
	unsafe {
		if !LOG_INITIALIZED {
			tracing_wasm::set_as_global_default();
			LOG_INITIALIZED = true;
		}
	}
	WebDom::from_window().unwrap()
}

#[wasm_bindgen_test]
fn branding_and_literal_text() {
	let dom = web_dom();
	let container = dom.create_container("test-container");
	vdom::with_content(&Prefix::Branding, &["<b>bold</b>"], |content| dom.replace_content(&container, content));

	assert_eq!(container.class_name(), "test-container");
	assert_eq!(container.text_content().unwrap(), "Leaflet | <b>bold</b>");
	assert!(container.query_selector("b").unwrap().is_none());

	let link = container.query_selector("a").unwrap().unwrap();
	assert_eq!(link.get_attribute("href").as_deref(), Some(vdom::BRANDING_URL));
	assert_eq!(link.get_attribute("title").as_deref(), Some(vdom::BRANDING_TITLE));

	let flag = container.query_selector("svg").unwrap().unwrap();
	assert_eq!(flag.namespace_uri().as_deref(), Some("http://www.w3.org/2000/svg"));
	assert_eq!(flag.child_element_count(), 3);
}

#[wasm_bindgen_test]
fn rerender_replaces_content() {
	let dom = web_dom();
	let container = dom.create_container("test-container");

	vdom::with_content(&Prefix::Text("Prefix".to_owned()), &["A", "B"], |content| dom.replace_content(&container, content));
	assert_eq!(container.text_content().unwrap(), "Prefix | A, B");

	vdom::with_content(&Prefix::Disabled, &["C"], |content| dom.replace_content(&container, content));
	assert_eq!(container.text_content().unwrap(), "C");
	assert_eq!(container.child_nodes().length(), 1);
}

#[wasm_bindgen_test]
fn clicks_do_not_propagate() {
	let dom = web_dom();
	let body = dom.document().body().unwrap();
	let container = dom.create_container("test-container");
	dom.disable_interaction_propagation(&container);
	body.append_child(&container).unwrap();

	let clicks = Rc::new(Cell::new(0));
	let on_click = {
		let clicks = Rc::clone(&clicks);
		Closure::wrap(Box::new(move || clicks.set(clicks.get() + 1)) as Box<dyn Fn()>)
	};
	body.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref()).unwrap();

	container.click();
	assert_eq!(clicks.get(), 0);

	body.remove_event_listener_with_callback("click", on_click.as_ref().unchecked_ref()).unwrap();
	body.remove_child(&container).unwrap();
}

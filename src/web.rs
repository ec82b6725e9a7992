//! Browser entry point: runs the slideshow against the live DOM.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlCollection, HtmlElement};

use crate::config::MarkupConfig;
use crate::controller::GalleryController;
use crate::dom::Document;
use crate::error::{Error, Result};
use crate::events::Direction;

/// [`Document`] over a `web_sys::Document`.
#[derive(Debug, Clone)]
pub struct WebDocument {
    inner: web_sys::Document,
}

impl WebDocument {
    pub fn new(inner: web_sys::Document) -> Self {
        Self { inner }
    }
}

fn js_err(err: JsValue) -> Error {
    Error::Dom(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn collect(collection: HtmlCollection) -> Vec<Element> {
    (0..collection.length())
        .filter_map(|i| collection.item(i))
        .collect()
}

impl Document for WebDocument {
    type Element = Element;

    fn elements_by_class(&self, class: &str) -> Vec<Element> {
        collect(self.inner.get_elements_by_class_name(class))
    }

    fn descendants_by_class(&self, scope: &Element, class: &str) -> Vec<Element> {
        collect(scope.get_elements_by_class_name(class))
    }

    fn children_by_class(&self, parent: &Element, class: &str) -> Vec<Element> {
        collect(parent.children())
            .into_iter()
            .filter(|child| child.class_list().contains(class))
            .collect()
    }

    fn descendants_by_tag(&self, scope: &Element, tag: &str) -> Vec<Element> {
        collect(scope.get_elements_by_tag_name(tag))
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.inner.get_element_by_id(id)
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_attribute(&mut self, element: &Element, name: &str, value: &str) -> Result<()> {
        element.set_attribute(name, value).map_err(js_err)
    }

    fn add_class(&mut self, element: &Element, class: &str) -> Result<()> {
        element.class_list().add_1(class).map_err(js_err)
    }

    fn set_style_text(&mut self, element: &Element, css: &str) -> Result<()> {
        element.set_attribute("style", css).map_err(js_err)
    }

    fn set_style_property(&mut self, element: &Element, property: &str, value: &str) -> Result<()> {
        let html = element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| Error::Dom(format!("<{}> has no inline style", element.tag_name())))?;
        html.style().set_property(property, value).map_err(js_err)
    }

    fn create_element(&mut self, tag: &str) -> Result<Element> {
        self.inner.create_element(tag).map_err(js_err)
    }

    fn set_text(&mut self, element: &Element, text: &str) -> Result<()> {
        element.set_text_content(Some(text));
        Ok(())
    }

    fn insert_before(&mut self, reference: &Element, node: &Element) -> Result<()> {
        let parent = reference
            .parent_node()
            .ok_or_else(|| Error::Dom("reference node has no parent".into()))?;
        let reference: &web_sys::Node = reference;
        parent.insert_before(node, Some(reference)).map_err(js_err)?;
        Ok(())
    }
}

struct Mounted {
    doc: WebDocument,
    controller: GalleryController<Element>,
}

/// Transform every slideshow in `document` and subscribe its controls.
/// Listeners live for the rest of the page.
pub fn mount(document: web_sys::Document, config: &MarkupConfig) -> Result<usize> {
    let mut doc = WebDocument::new(document);
    let controller = GalleryController::activate(&mut doc, config)?;
    let controls: Vec<Element> = controller
        .galleries()
        .iter()
        .flat_map(|g| Direction::ALL.map(|d| g.control(d).clone()))
        .collect();
    let count = controller.galleries().len();
    let state = Rc::new(RefCell::new(Mounted { doc, controller }));

    for control in controls {
        let state = Rc::clone(&state);
        let target = control.clone();
        EventListener::new(&control, "click", move |_event| {
            let mut guard = state.borrow_mut();
            let Mounted { doc, controller } = &mut *guard;
            match controller.click(doc, &target) {
                Ok(changed) => debug!(?changed, "slide changed"),
                Err(err) => warn!("slideshow navigation failed: {err}"),
            }
        })
        .forget();
    }
    Ok(count)
}

/// Runs once when the module is instantiated; defers to `DOMContentLoaded`
/// while the page is still parsing.
#[wasm_bindgen(start)]
pub fn start() -> std::result::Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document available"))?;

    if document.ready_state() == "loading" {
        let target = document.clone();
        EventListener::once(&document, "DOMContentLoaded", move |_event| {
            if let Err(err) = mount(target, &MarkupConfig::default()) {
                warn!("slideshow activation failed: {err}");
            }
        })
        .forget();
        return Ok(());
    }

    mount(document, &MarkupConfig::default())
        .map(|_| ())
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

//! The document surface the slideshow controller runs against.
//!
//! [`Document`] is the seam between the controller and a page: the browser
//! build implements it over `web-sys`, the native build over the in-memory
//! [`HtmlDocument`] tree.

mod html;
mod tree;

pub use tree::{HtmlDocument, NodeId};

use crate::error::Result;

/// Element queries and mutations the transformation pass and navigation need.
///
/// All queries return elements in document order.
pub trait Document {
    /// Handle to one element. Two handles compare equal iff they name the
    /// same element.
    type Element: Clone + PartialEq;

    /// Every element in the document carrying `class`.
    fn elements_by_class(&self, class: &str) -> Vec<Self::Element>;

    /// Descendants of `scope` (not `scope` itself) carrying `class`.
    fn descendants_by_class(&self, scope: &Self::Element, class: &str) -> Vec<Self::Element>;

    /// Direct children of `parent` carrying `class`.
    fn children_by_class(&self, parent: &Self::Element, class: &str) -> Vec<Self::Element>;

    /// Descendants of `scope` with the given tag name.
    fn descendants_by_tag(&self, scope: &Self::Element, tag: &str) -> Vec<Self::Element>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_attribute(&mut self, element: &Self::Element, name: &str, value: &str) -> Result<()>;

    fn add_class(&mut self, element: &Self::Element, class: &str) -> Result<()>;

    /// Replace the whole inline style declaration block.
    fn set_style_text(&mut self, element: &Self::Element, css: &str) -> Result<()>;

    /// Set one inline style property, keeping the others.
    fn set_style_property(
        &mut self,
        element: &Self::Element,
        property: &str,
        value: &str,
    ) -> Result<()>;

    /// Create a detached element; it joins the tree through [`Document::insert_before`].
    fn create_element(&mut self, tag: &str) -> Result<Self::Element>;

    fn set_text(&mut self, element: &Self::Element, text: &str) -> Result<()>;

    /// Insert `node` as the previous sibling of `reference`.
    fn insert_before(&mut self, reference: &Self::Element, node: &Self::Element) -> Result<()>;
}

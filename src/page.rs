//! A whole HTML page with its slideshows activated, for use outside a browser.

use crate::config::MarkupConfig;
use crate::controller::GalleryController;
use crate::dom::{Document, HtmlDocument, NodeId};
use crate::error::{Error, Result};
use crate::events::{NavClick, SlideChanged};

/// Parsed page plus the controller that rewrote it.
#[derive(Debug, Clone)]
pub struct SlideshowPage {
    doc: HtmlDocument,
    controller: GalleryController<NodeId>,
}

impl SlideshowPage {
    /// Parse `html` and run the transformation pass, the equivalent of the
    /// page-ready hook in a browser.
    pub fn activate(html: &str, config: &MarkupConfig) -> Result<Self> {
        let mut doc = HtmlDocument::parse(html)?;
        let controller = GalleryController::activate(&mut doc, config)?;
        Ok(Self { doc, controller })
    }

    pub fn navigate(&mut self, click: NavClick) -> Result<SlideChanged> {
        self.controller.navigate(&mut self.doc, click)
    }

    /// Click the element with the given `id`, as a user would.
    pub fn click_element(&mut self, id: &str) -> Result<SlideChanged> {
        let control = self
            .doc
            .element_by_id(id)
            .ok_or_else(|| Error::Dom(format!("no element with id '{id}'")))?;
        self.controller.click(&mut self.doc, &control)
    }

    pub fn document(&self) -> &HtmlDocument {
        &self.doc
    }

    pub fn controller(&self) -> &GalleryController<NodeId> {
        &self.controller
    }

    #[must_use]
    pub fn to_html(&self) -> String {
        self.doc.to_html()
    }
}

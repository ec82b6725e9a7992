//! Gallery discovery, the one-time markup rewrite, and click dispatch.

use tracing::{debug, info, warn};

use crate::config::MarkupConfig;
use crate::dom::Document;
use crate::error::{Error, Result};
use crate::events::{Direction, NavClick, SlideChanged};
use crate::markup;
use crate::tracker::SlidePosition;

/// One activated slideshow: its position plus direct handles to the slides
/// and controls, so navigation never looks elements up by id again.
#[derive(Debug, Clone)]
pub struct Gallery<E> {
    id: usize,
    position: SlidePosition,
    slides: Vec<E>,
    prev: E,
    next: E,
}

impl<E> Gallery<E> {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn position(&self) -> SlidePosition {
        self.position
    }

    pub fn image_count(&self) -> usize {
        self.position.count()
    }

    /// Slide elements in document order; slide `n` lives at `slides()[n - 1]`.
    pub fn slides(&self) -> &[E] {
        &self.slides
    }

    pub fn control(&self, direction: Direction) -> &E {
        match direction {
            Direction::Prev => &self.prev,
            Direction::Next => &self.next,
        }
    }

    /// The element currently shown, or `None` for a gallery without slides.
    pub fn visible_slide(&self) -> Option<&E> {
        self.slide(self.position.index())
    }

    fn slide(&self, index: usize) -> Option<&E> {
        index.checked_sub(1).and_then(|i| self.slides.get(i))
    }
}

/// Owns every slideshow on a page. Built once by [`GalleryController::activate`];
/// afterwards the page is only touched through navigation.
#[derive(Debug, Clone)]
pub struct GalleryController<E> {
    config: MarkupConfig,
    galleries: Vec<Gallery<E>>,
}

impl<E: Clone + PartialEq> GalleryController<E> {
    /// Rewrite every slideshow root in `doc` and return the controller that
    /// drives them. A page without slideshows yields an empty controller.
    pub fn activate<D>(doc: &mut D, config: &MarkupConfig) -> Result<Self>
    where
        D: Document<Element = E>,
    {
        let mut galleries = Vec::new();
        for (id, root) in doc.elements_by_class(&config.root_class).into_iter().enumerate() {
            doc.set_attribute(&root, "id", &markup::root_id(id))?;

            let mut containers = doc
                .descendants_by_class(&root, &config.container_class)
                .into_iter();
            let Some(container) = containers.next() else {
                debug!(gallery = id, "slideshow root has no gallery grid");
                continue;
            };
            let skipped = containers.count();
            if skipped > 0 {
                warn!(
                    gallery = id,
                    skipped,
                    "slideshow root holds several gallery grids; only the first is used, the rest stay fully visible"
                );
            }

            let gallery = Self::transform_container(doc, config, id, &container)?;
            debug!(
                gallery = id,
                image_count = gallery.image_count(),
                "slideshow prepared"
            );
            galleries.push(gallery);
        }
        info!(count = galleries.len(), "slideshows activated");
        Ok(Self {
            config: config.clone(),
            galleries,
        })
    }

    fn transform_container<D>(
        doc: &mut D,
        config: &MarkupConfig,
        id: usize,
        container: &E,
    ) -> Result<Gallery<E>>
    where
        D: Document<Element = E>,
    {
        doc.add_class(container, markup::CONTAINER_CLASS)?;

        let slides = doc.children_by_class(container, &config.item_class);
        for (offset, item) in slides.iter().enumerate() {
            let item_id = offset + 1;
            doc.set_attribute(item, "id", &markup::slide_id(item_id))?;
            doc.add_class(item, markup::ITEM_CLASS)?;
            doc.set_style_text(item, &config.item_margin_override)?;
            doc.set_style_property(item, "display", markup::display_value(item_id == 1))?;

            for img in doc.descendants_by_tag(item, &config.image_tag) {
                doc.add_class(&img, markup::IMAGE_CLASS)?;
                doc.set_attribute(&img, markup::DATA_SSID, &item_id.to_string())?;
                doc.set_attribute(&img, markup::DATA_LOADED, "false")?;
            }
        }

        let prev = Self::insert_control(doc, config, id, container, Direction::Prev)?;
        let next = Self::insert_control(doc, config, id, container, Direction::Next)?;

        Ok(Gallery {
            id,
            position: SlidePosition::new(slides.len()),
            slides,
            prev,
            next,
        })
    }

    fn insert_control<D>(
        doc: &mut D,
        config: &MarkupConfig,
        id: usize,
        container: &E,
        direction: Direction,
    ) -> Result<E>
    where
        D: Document<Element = E>,
    {
        let glyph = match direction {
            Direction::Prev => &config.prev_glyph,
            Direction::Next => &config.next_glyph,
        };
        let button = doc.create_element(markup::BUTTON_TAG)?;
        doc.set_attribute(&button, "id", &markup::button_id(id, direction))?;
        doc.add_class(&button, markup::BUTTON_CLASS)?;
        doc.add_class(&button, &markup::button_modifier_class(direction))?;
        doc.set_attribute(&button, markup::DATA_SSID, &id.to_string())?;
        doc.set_text(&button, glyph)?;
        doc.insert_before(container, &button)?;
        Ok(button)
    }

    pub fn config(&self) -> &MarkupConfig {
        &self.config
    }

    /// Activated slideshows in discovery order.
    pub fn galleries(&self) -> &[Gallery<E>] {
        &self.galleries
    }

    pub fn gallery(&self, id: usize) -> Option<&Gallery<E>> {
        self.index_of(id).map(|i| &self.galleries[i])
    }

    fn index_of(&self, id: usize) -> Option<usize> {
        self.galleries.binary_search_by_key(&id, |g| g.id).ok()
    }

    /// Turn a clicked element into a navigation event. Only the injected
    /// controls qualify; the gallery then comes from the control's
    /// `data-ssid`, the direction from which control it is.
    pub fn resolve_click<D>(&self, doc: &D, control: &E) -> Result<NavClick>
    where
        D: Document<Element = E>,
    {
        let (owner, direction) = self
            .galleries
            .iter()
            .find_map(|g| {
                Direction::ALL
                    .into_iter()
                    .find(|&d| g.control(d) == control)
                    .map(|d| (g.id, d))
            })
            .ok_or(Error::UnmanagedControl)?;
        let id = doc
            .attribute(control, markup::DATA_SSID)
            .as_deref()
            .and_then(markup::parse_ssid)
            .ok_or(Error::UnmanagedControl)?;
        if self.gallery(id).is_none() {
            return Err(Error::UnknownGallery(id));
        }
        if id != owner {
            return Err(Error::UnmanagedControl);
        }
        Ok(NavClick::new(id, direction))
    }

    /// Handle a click on one of the injected controls.
    pub fn click<D>(&mut self, doc: &mut D, control: &E) -> Result<SlideChanged>
    where
        D: Document<Element = E>,
    {
        let click = self.resolve_click(doc, control)?;
        self.navigate(doc, click)
    }

    /// Hide the visible slide, step the position with wraparound, and show
    /// the slide at the new position.
    pub fn navigate<D>(&mut self, doc: &mut D, click: NavClick) -> Result<SlideChanged>
    where
        D: Document<Element = E>,
    {
        let NavClick { gallery: id, direction } = click;
        let slot = self.index_of(id).ok_or(Error::UnknownGallery(id))?;
        let gallery = &mut self.galleries[slot];
        if gallery.position.is_empty() {
            return Err(Error::EmptyGallery(id));
        }

        let before = gallery.position;
        let after = before.step(direction);
        debug!(
            gallery = id,
            current = before.index(),
            %direction,
            "changing slides"
        );

        if let Some(current) = gallery.slide(before.index()) {
            doc.set_style_property(current, "display", markup::display_value(false))?;
        }
        if let Some(target) = gallery.slide(after.index()) {
            doc.set_style_property(target, "display", markup::display_value(true))?;
        }
        gallery.position = after;

        debug!(
            gallery = id,
            next = after.index(),
            image_count = after.count(),
            "slide changed"
        );
        Ok(SlideChanged {
            gallery: id,
            from: before.index(),
            to: after.index(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{HtmlDocument, NodeId};

    fn gallery_page(counts: &[usize]) -> String {
        let mut html = String::from("<body>");
        for &count in counts {
            html.push_str(r#"<figure class="wp-block-gallery wpg-slideshow"><ul class="blocks-gallery-grid">"#);
            for n in 1..=count {
                html.push_str(&format!(
                    r#"<li class="blocks-gallery-item"><figure><img src="{n}.jpg"></figure></li>"#
                ));
            }
            html.push_str("</ul></figure>");
        }
        html.push_str("</body>");
        html
    }

    fn activate(html: &str) -> (HtmlDocument, GalleryController<NodeId>) {
        let mut doc = HtmlDocument::parse(html).unwrap();
        let controller = GalleryController::activate(&mut doc, &MarkupConfig::default()).unwrap();
        (doc, controller)
    }

    fn shown(doc: &HtmlDocument, gallery: &Gallery<NodeId>) -> Vec<usize> {
        gallery
            .slides()
            .iter()
            .enumerate()
            .filter(|(_, s)| doc.style_property(**s, "display").as_deref() == Some("block"))
            .map(|(i, _)| i + 1)
            .collect()
    }

    #[test]
    fn page_without_slideshows_is_untouched() {
        let html = r#"<div class="blocks-gallery-grid"><li class="blocks-gallery-item"></li></div>"#;
        let (doc, controller) = activate(html);
        assert!(controller.galleries().is_empty());
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn first_slide_shown_rest_hidden() {
        let (doc, controller) = activate(&gallery_page(&[4]));
        let gallery = &controller.galleries()[0];
        assert_eq!(gallery.image_count(), 4);
        assert_eq!(shown(&doc, gallery), [1]);
        for slide in gallery.slides() {
            assert_eq!(
                doc.style_property(*slide, "margin-bottom").as_deref(),
                Some("0!important")
            );
        }
    }

    #[test]
    fn controls_precede_the_grid() {
        let (doc, controller) = activate(&gallery_page(&[2]));
        let gallery = &controller.galleries()[0];
        let grid = doc.elements_by_class(markup::CONTAINER_CLASS)[0];
        assert_eq!(doc.previous_element_sibling(grid), Some(*gallery.control(Direction::Next)));
        assert_eq!(
            doc.previous_element_sibling(*gallery.control(Direction::Next)),
            Some(*gallery.control(Direction::Prev))
        );
        assert_eq!(doc.text_content(*gallery.control(Direction::Prev)), "\u{276E}");
        assert_eq!(doc.text_content(*gallery.control(Direction::Next)), "\u{276F}");
    }

    #[test]
    fn clicks_resolve_through_data_ssid() {
        let (mut doc, mut controller) = activate(&gallery_page(&[2, 3]));
        let next = *controller.galleries()[1].control(Direction::Next);
        let click = controller.resolve_click(&doc, &next).unwrap();
        assert_eq!(click, NavClick::new(1, Direction::Next));

        let changed = controller.click(&mut doc, &next).unwrap();
        assert_eq!(changed, SlideChanged { gallery: 1, from: 1, to: 2 });
        assert_eq!(shown(&doc, &controller.galleries()[0]), [1]);
        assert_eq!(shown(&doc, &controller.galleries()[1]), [2]);
    }

    #[test]
    fn foreign_elements_are_not_controls() {
        let (doc, controller) = activate(&gallery_page(&[2]));
        let slide = controller.galleries()[0].slides()[0];
        assert!(matches!(
            controller.resolve_click(&doc, &slide),
            Err(Error::UnmanagedControl)
        ));
        // Images carry a data-ssid too, but it names a slide, not a control.
        for img in doc.elements_by_tag("img") {
            assert!(matches!(
                controller.resolve_click(&doc, &img),
                Err(Error::UnmanagedControl)
            ));
        }
    }

    #[test]
    fn image_ssid_matching_a_gallery_id_is_still_not_a_control() {
        // The first image of gallery 0 carries data-ssid="1", which is also a
        // live gallery id.
        let (doc, controller) = activate(&gallery_page(&[2, 2]));
        let img = doc.elements_by_tag("img")[0];
        assert_eq!(doc.attribute(&img, markup::DATA_SSID).as_deref(), Some("1"));
        assert!(controller.gallery(1).is_some());
        assert!(matches!(
            controller.resolve_click(&doc, &img),
            Err(Error::UnmanagedControl)
        ));
    }

    #[test]
    fn control_with_rewritten_ssid_is_rejected() {
        let (mut doc, controller) = activate(&gallery_page(&[2, 2]));
        let prev = *controller.galleries()[0].control(Direction::Prev);
        doc.set_attribute(&prev, markup::DATA_SSID, "9").unwrap();
        assert!(matches!(
            controller.resolve_click(&doc, &prev),
            Err(Error::UnknownGallery(9))
        ));
        doc.set_attribute(&prev, markup::DATA_SSID, "1").unwrap();
        assert!(matches!(
            controller.resolve_click(&doc, &prev),
            Err(Error::UnmanagedControl)
        ));
    }

    #[test]
    fn unknown_and_empty_galleries_are_rejected() {
        let (mut doc, mut controller) = activate(&gallery_page(&[0]));
        assert_eq!(controller.galleries()[0].image_count(), 0);
        assert!(controller.galleries()[0].visible_slide().is_none());
        assert!(matches!(
            controller.navigate(&mut doc, NavClick::new(0, Direction::Next)),
            Err(Error::EmptyGallery(0))
        ));
        assert!(matches!(
            controller.navigate(&mut doc, NavClick::new(7, Direction::Prev)),
            Err(Error::UnknownGallery(7))
        ));
    }

    #[test]
    fn only_first_grid_of_a_root_is_managed() {
        let html = r#"<div class="wpg-slideshow"><ul class="blocks-gallery-grid"><li class="blocks-gallery-item"></li></ul><ul class="blocks-gallery-grid" id="extra"><li class="blocks-gallery-item"></li></ul></div>"#;
        let (doc, controller) = activate(html);
        assert_eq!(controller.galleries().len(), 1);
        let extra = doc.element_by_id("extra").unwrap();
        assert!(!doc.has_class(extra, markup::CONTAINER_CLASS));
        let extra_item = doc.children(extra)[0];
        assert_eq!(doc.style_property(extra_item, "display"), None);
        assert!(!doc.has_class(extra_item, markup::ITEM_CLASS));
        assert_eq!(doc.elements_by_class(markup::BUTTON_CLASS).len(), 2);
    }

    #[test]
    fn root_without_grid_still_consumes_an_id() {
        let html = r#"<div class="wpg-slideshow"></div><div class="wpg-slideshow"><ul class="blocks-gallery-grid"><li class="blocks-gallery-item"></li></ul></div>"#;
        let (mut doc, mut controller) = activate(html);
        assert!(doc.element_by_id("wpg-slideshow-0").is_some());
        assert_eq!(controller.galleries().len(), 1);
        assert_eq!(controller.galleries()[0].id(), 1);
        assert!(controller.gallery(0).is_none());
        let changed = controller
            .navigate(&mut doc, NavClick::new(1, Direction::Next))
            .unwrap();
        assert_eq!((changed.from, changed.to), (1, 1));
    }
}

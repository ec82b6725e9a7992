pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod events;
pub mod markup;
pub mod page;
pub mod tracker;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use config::MarkupConfig;
pub use controller::{Gallery, GalleryController};
pub use error::{Error, Result};
pub use events::{Direction, NavClick, SlideChanged};
pub use page::SlideshowPage;
pub use tracker::SlidePosition;

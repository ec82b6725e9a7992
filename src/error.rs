use thiserror::Error;

/// Library error type for slideshow operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The page markup could not be parsed into a document tree.
    #[error("html parse error at byte {offset}: {reason}")]
    HtmlParse { offset: usize, reason: String },

    /// A navigation event named a gallery id that activation never assigned.
    #[error("no slideshow with id {0}")]
    UnknownGallery(usize),

    /// Navigation was requested on a gallery that has no slides.
    #[error("slideshow {0} has no slides to navigate")]
    EmptyGallery(usize),

    /// A click arrived on an element that is not one of the injected controls.
    #[error("element is not a slideshow navigation control")]
    UnmanagedControl,

    /// The host DOM rejected a mutation or lookup.
    #[error("dom error: {0}")]
    Dom(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

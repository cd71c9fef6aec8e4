//! Page geometry and the geometric (PDF-side) counterparts of TeX
//! paragraphs.
//!
//! The mechanism for opening a rendered document is deliberately behind the
//! [`PageBoxSource`] trait; this module only owns the lazy caching, the
//! 1-based page validation and the coordinate flip.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An axis-aligned rectangle in a bottom-left-origin coordinate system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rectangle {
    /// Minimum x coordinate
    pub min_x: f32,

    /// Minimum y coordinate
    pub min_y: f32,

    /// Maximum x coordinate
    pub max_x: f32,

    /// Maximum y coordinate
    pub max_y: f32,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Get the width of the rectangle.
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Get the height of the rectangle.
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

/// The geometric counterpart of a TeX paragraph: a rectangle on a page of
/// the rendered document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfParagraph {
    /// Page number (1-indexed)
    pub page: u32,

    /// Bounding rectangle on the page, bottom-left origin
    pub rect: Rectangle,
}

impl PdfParagraph {
    /// Create a new geometric paragraph.
    pub fn new(page: u32, rect: Rectangle) -> Self {
        Self { page, rect }
    }
}

/// A source of page bounding boxes for a rendered document.
///
/// Implementations load the boxes of *all* pages at once, in page order
/// (page 1 first). Opening failures are reported as
/// [`Error::PageGeometry`].
pub trait PageBoxSource {
    /// Load the bounding boxes of every page.
    fn load_page_boxes(&self) -> Result<Vec<Rectangle>>;
}

impl<F> PageBoxSource for F
where
    F: Fn() -> Result<Vec<Rectangle>>,
{
    fn load_page_boxes(&self) -> Result<Vec<Rectangle>> {
        self()
    }
}

/// Provides the bounding boxes of the pages of a rendered document, loading
/// them lazily from a [`PageBoxSource`] on first request and caching them
/// for subsequent lookups.
pub struct PdfPageProvider<S> {
    source: S,
    boxes: Option<Vec<Rectangle>>,
}

impl<S: PageBoxSource> PdfPageProvider<S> {
    /// Create a new provider over the given source. No pages are loaded
    /// until the first query.
    pub fn new(source: S) -> Self {
        Self {
            source,
            boxes: None,
        }
    }

    /// Get the number of pages.
    pub fn page_count(&mut self) -> Result<u32> {
        Ok(self.boxes()?.len() as u32)
    }

    /// Get the bounding box of the given page (1-indexed). Fails with
    /// [`Error::PageOutOfRange`] for page 0 or a page beyond the last.
    pub fn bounding_box(&mut self, page_num: u32) -> Result<Rectangle> {
        let boxes = self.boxes()?;
        let count = boxes.len() as u32;
        if page_num == 0 || page_num > count {
            return Err(Error::PageOutOfRange(page_num, count));
        }
        Ok(boxes[(page_num - 1) as usize])
    }

    /// Flip a rectangle given in the top-left-origin system of the rendered
    /// page into the bottom-left-origin system used by [`PdfParagraph`].
    pub fn to_bottom_left(&mut self, page_num: u32, rect: Rectangle) -> Result<Rectangle> {
        let page = self.bounding_box(page_num)?;
        Ok(Rectangle {
            min_x: rect.min_x,
            min_y: page.max_y - rect.max_y,
            max_x: rect.max_x,
            max_y: page.max_y - rect.min_y,
        })
    }

    fn boxes(&mut self) -> Result<&[Rectangle]> {
        let boxes = match self.boxes.take() {
            Some(boxes) => boxes,
            None => self.source.load_page_boxes()?,
        };
        Ok(self.boxes.insert(boxes))
    }
}

//! Ordered gallery items, for modal neighbor links.

use serde::{Deserialize, Serialize};

/// A project shown in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    /// Identifier used in `?project=` and `data-project-slug`.
    pub slug: String,
    /// Cover image.
    pub image: String,
}

impl GalleryItem {
    /// Item from its slug and cover image.
    #[must_use]
    pub fn new(slug: &str, image: &str) -> Self {
        Self {
            slug: slug.to_owned(),
            image: image.to_owned(),
        }
    }
}

/// The gallery's items in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gallery {
    items: Vec<GalleryItem>,
}

impl Gallery {
    /// Gallery of `items` in display order.
    #[must_use]
    pub fn new(items: Vec<GalleryItem>) -> Self {
        Self { items }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the gallery has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item with `slug`.
    #[must_use]
    pub fn find(&self, slug: &str) -> Option<&GalleryItem> {
        self.items.iter().find(|item| item.slug == slug)
    }

    /// Previous and next items around `slug`, wrapping at both ends.
    /// A single-item gallery is its own neighbor.
    #[must_use]
    pub fn neighbors(
        &self,
        slug: &str,
    ) -> Option<(&GalleryItem, &GalleryItem)> {
        let index = self.items.iter().position(|item| item.slug == slug)?;
        let len = self.items.len();
        let prev = self.items.get((index + len - 1) % len)?;
        let next = self.items.get((index + 1) % len)?;
        Some((prev, next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gallery() -> Gallery {
        Gallery::new(vec![
            GalleryItem::new("wedding-fm", "/img/fm.jpg"),
            GalleryItem::new("anna", "/img/anna.jpg"),
            GalleryItem::new("lifestyle", "/img/ls.jpg"),
        ])
    }

    #[test]
    fn neighbors_wrap_around() {
        let g = gallery();
        let (prev, next) = g.neighbors("wedding-fm").unwrap();
        assert_eq!(prev.slug, "lifestyle");
        assert_eq!(next.slug, "anna");
        let (prev, next) = g.neighbors("lifestyle").unwrap();
        assert_eq!(prev.slug, "anna");
        assert_eq!(next.slug, "wedding-fm");
    }

    #[test]
    fn unknown_slug_has_no_neighbors() {
        assert!(gallery().neighbors("nope").is_none());
        assert!(Gallery::default().neighbors("nope").is_none());
    }

    #[test]
    fn single_item_is_its_own_neighbor() {
        let g = Gallery::new(vec![GalleryItem::new("solo", "/s.jpg")]);
        let (prev, next) = g.neighbors("solo").unwrap();
        assert_eq!(prev.slug, "solo");
        assert_eq!(next.slug, "solo");
    }

    #[test]
    fn find_by_slug() {
        assert_eq!(gallery().find("anna").unwrap().image, "/img/anna.jpg");
        assert_eq!(gallery().len(), 3);
    }
}

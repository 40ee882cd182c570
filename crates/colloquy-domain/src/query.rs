//! Query criteria: pagination, text search and field selection

use crate::{EntityId, RelationshipSet};

/// Default page size for list endpoints
pub const DEFAULT_PER_PAGE: usize = 10;

/// Largest page a caller may request
pub const MAX_PER_PAGE: usize = 100;

/// 1-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: usize,
    per_page: usize,
}

impl Pagination {
    /// Build a window, clamping both values to at least 1 and the page
    /// size to at most [`MAX_PER_PAGE`]
    ///
    /// # Examples
    ///
    /// ```
    /// use colloquy_domain::Pagination;
    ///
    /// let p = Pagination::new(Some(3), Some(20));
    /// assert_eq!(p.offset(), 40);
    ///
    /// let p = Pagination::new(Some(0), Some(0));
    /// assert_eq!((p.page(), p.per_page()), (1, 1));
    ///
    /// let p = Pagination::new(None, Some(usize::MAX));
    /// assert_eq!(p.per_page(), colloquy_domain::MAX_PER_PAGE);
    /// ```
    pub fn new(page: Option<usize>, per_page: Option<usize>) -> Self {
        Self::with_default(page, per_page, DEFAULT_PER_PAGE)
    }

    /// Same as [`Pagination::new`] with a configurable default page size
    pub fn with_default(page: Option<usize>, per_page: Option<usize>, default_per_page: usize) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(default_per_page).clamp(1, MAX_PER_PAGE),
        }
    }

    /// Current page (1-based)
    pub fn page(&self) -> usize {
        self.page
    }

    /// Items per page
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of items to skip, saturating for absurd page numbers
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Substring search plus pagination
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring; empty matches everything
    pub text: String,
    /// Page window
    pub pagination: Pagination,
}

impl SearchQuery {
    /// Search for `text` on the first page
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pagination: Pagination::default(),
        }
    }
}

/// Criteria for listing comments under an answer
#[derive(Debug, Clone)]
pub struct CommentQuery {
    /// Question the answer belongs to
    pub question_id: EntityId,
    /// Answer being commented on
    pub answer_id: EntityId,
    /// Restrict to replies in this thread
    pub root_comment_id: Option<EntityId>,
    /// Text search and paging
    pub search: SearchQuery,
}

/// Hidden user profile fields that can be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    /// `locations`
    Locations,
    /// `business`
    Business,
    /// `employments`
    Employments,
    /// `educations`
    Educations,
}

impl ProfileField {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "locations" => Some(ProfileField::Locations),
            "business" => Some(ProfileField::Business),
            "employments" => Some(ProfileField::Employments),
            "educations" => Some(ProfileField::Educations),
            _ => None,
        }
    }
}

/// Selection of hidden fields, parsed from `fields=a;b;c`
///
/// Unknown names are ignored, as are empty segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSelector {
    profile: Vec<ProfileField>,
    relationships: Vec<RelationshipSet>,
}

impl FieldSelector {
    /// Select nothing beyond the default fields
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse a `;`-separated selector
    ///
    /// # Examples
    ///
    /// ```
    /// use colloquy_domain::{FieldSelector, ProfileField, RelationshipSet};
    ///
    /// let fields = FieldSelector::parse("locations;;following;bogus");
    /// assert!(fields.includes(ProfileField::Locations));
    /// assert_eq!(fields.relationships(), &[RelationshipSet::Following]);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let mut selector = Self::default();
        for name in raw.split(';').map(str::trim).filter(|f| !f.is_empty()) {
            if let Some(field) = ProfileField::parse(name) {
                if !selector.profile.contains(&field) {
                    selector.profile.push(field);
                }
            } else if let Some(set) = RelationshipSet::parse(name) {
                if !selector.relationships.contains(&set) {
                    selector.relationships.push(set);
                }
            }
        }
        selector
    }

    /// Whether a profile field is selected
    pub fn includes(&self, field: ProfileField) -> bool {
        self.profile.contains(&field)
    }

    /// Relationship sets to expand, in selection order
    pub fn relationships(&self) -> &[RelationshipSet] {
        &self.relationships
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any input yields a valid window whose offset is a whole number of pages
        #[test]
        fn test_pagination_is_clamped(page in proptest::option::of(0usize..10_000),
                                      per_page in proptest::option::of(0usize..1_000)) {
            let p = Pagination::new(page, per_page);
            prop_assert!(p.page() >= 1);
            prop_assert!((1..=MAX_PER_PAGE).contains(&p.per_page()));
            prop_assert_eq!(p.offset() % p.per_page(), 0);
            prop_assert_eq!(p.offset() / p.per_page(), p.page() - 1);
        }
    }
}

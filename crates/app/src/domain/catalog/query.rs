//! Product search filters, ordering and pagination.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    domain::catalog::records::{CategoryUuid, ProductRecord},
    validation::FieldErrors,
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    size: u32,
}

impl Page {
    /// Page sizes above [`MAX_PAGE_SIZE`] are clamped.
    ///
    /// # Errors
    ///
    /// Returns the rejected fields when `number` or `size` is zero.
    pub fn new(number: Option<u32>, size: Option<u32>) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let number = number.unwrap_or(1);
        let size = size.unwrap_or(DEFAULT_PAGE_SIZE);

        if number == 0 {
            errors.push("page", "Invalid page.");
        }

        if size == 0 {
            errors.push("page_size", "Ensure this value is greater than or equal to 1.");
        }

        errors.into_result()?;

        Ok(Self {
            number,
            size: size.min(MAX_PAGE_SIZE),
        })
    }

    #[must_use]
    pub const fn number(self) -> u32 {
        self.number
    }

    #[must_use]
    pub const fn size(self) -> u32 {
        self.size
    }

    #[must_use]
    pub fn offset(self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }

    #[must_use]
    pub fn limit(self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            number: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Price,
    Stock,
    CreatedAt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductOrdering {
    pub key: SortKey,
    pub descending: bool,
}

impl ProductOrdering {
    /// SQL `ORDER BY` expression for the product listing query.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match (self.key, self.descending) {
            (SortKey::Name, false) => "p.name ASC",
            (SortKey::Name, true) => "p.name DESC",
            (SortKey::Price, false) => "p.price ASC",
            (SortKey::Price, true) => "p.price DESC",
            (SortKey::Stock, false) => "p.stock ASC",
            (SortKey::Stock, true) => "p.stock DESC",
            (SortKey::CreatedAt, false) => "p.created_at ASC",
            (SortKey::CreatedAt, true) => "p.created_at DESC",
        }
    }
}

impl Default for ProductOrdering {
    fn default() -> Self {
        Self {
            key: SortKey::CreatedAt,
            descending: false,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown ordering '{0}'")]
pub struct UnknownOrdering(String);

impl FromStr for ProductOrdering {
    type Err = UnknownOrdering;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match value.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, value),
        };

        let key = match name {
            "name" => SortKey::Name,
            "price" => SortKey::Price,
            "stock" => SortKey::Stock,
            "created_at" => SortKey::CreatedAt,
            _ => return Err(UnknownOrdering(value.to_string())),
        };

        Ok(Self { key, descending })
    }
}

/// Product listing filters. All filters are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    /// Case-insensitive substring of the name or description.
    pub search: Option<String>,
    pub category: Option<CategoryUuid>,
    /// Exact price match.
    pub price: Option<Decimal>,
    pub ordering: ProductOrdering,
    pub page: Page,
}

impl ProductQuery {
    /// Trimmed search term, if one was given.
    #[must_use]
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// One page of products plus the size of the whole result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductPage {
    pub products: Vec<ProductRecord>,
    pub total: u64,
    pub page: Page,
}

impl ProductPage {
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page.number()) * u64::from(self.page.size()) < self.total
    }

    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page.number() > 1
    }
}

/// Escape `LIKE` wildcards so a search term matches literally.
pub(crate) fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());

    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }

        escaped.push(c);
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_parses_direction_prefix() {
        assert_eq!(
            "price".parse::<ProductOrdering>(),
            Ok(ProductOrdering {
                key: SortKey::Price,
                descending: false
            })
        );
        assert_eq!(
            "-created_at".parse::<ProductOrdering>(),
            Ok(ProductOrdering {
                key: SortKey::CreatedAt,
                descending: true
            })
        );
    }

    #[test]
    fn unknown_ordering_is_rejected() {
        assert!("password".parse::<ProductOrdering>().is_err());
        assert!("--name".parse::<ProductOrdering>().is_err());
    }

    #[test]
    fn page_defaults_and_clamps() -> Result<(), FieldErrors> {
        assert_eq!(Page::new(None, None)?, Page::default());
        assert_eq!(Page::new(Some(2), Some(500))?.size(), MAX_PAGE_SIZE);
        assert_eq!(Page::new(Some(3), Some(20))?.offset(), 40);

        Ok(())
    }

    #[test]
    fn zero_page_or_size_is_rejected() {
        let errors = Page::new(Some(0), Some(0)).expect_err("zero page should fail");

        assert!(errors.has("page"), "got {errors}");
        assert!(errors.has("page_size"), "got {errors}");
    }

    #[test]
    fn page_reports_neighbours() -> Result<(), FieldErrors> {
        let page = ProductPage {
            products: Vec::new(),
            total: 25,
            page: Page::new(Some(2), Some(10))?,
        };

        assert!(page.has_next());
        assert!(page.has_previous());

        let last = ProductPage {
            page: Page::new(Some(3), Some(10))?,
            ..page
        };

        assert!(!last.has_next());

        Ok(())
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = ProductQuery {
            search: Some("   ".to_string()),
            ..ProductQuery::default()
        };

        assert_eq!(query.search_term(), None);
    }

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}

//! Search filters for the public listing search.

use crate::domain::foundation::{string_enum, validation, DomainError};

use super::{ListingType, PropertyType};

string_enum! {
    /// Result ordering. Featured listings always come first.
    #[derive(Default)]
    pub enum PropertySort {
        #[default]
        Newest => "newest",
        PriceAsc => "price_asc",
        PriceDesc => "price_desc",
    }
}

/// Normalized search filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySearch {
    pub city: Option<String>,
    pub locality: Option<String>,
    /// Free text matched against title and description.
    pub q: Option<String>,
    pub property_type: Option<PropertyType>,
    pub listing_type: Option<ListingType>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub min_bedrooms: Option<i32>,
    pub sort: PropertySort,
}

impl PropertySearch {
    /// Checks the price range and trims text filters.
    pub fn normalized(mut self) -> Result<Self, DomainError> {
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(DomainError::validation(
                    "min_price",
                    "min_price cannot exceed max_price",
                ));
            }
        }
        self.city = validation::optional_text("city", self.city.as_deref(), 100)?;
        self.locality = validation::optional_text("locality", self.locality.as_deref(), 150)?;
        self.q = validation::optional_text("q", self.q.as_deref(), 200)?;
        Ok(self)
    }
}

/// Escapes `%`, `_` and `\` so user text is matched literally by `ILIKE`.
pub fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for c in text.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inverted_price_range_is_rejected() {
        let search = PropertySearch {
            min_price: Some(10),
            max_price: Some(5),
            ..Default::default()
        };
        assert!(search.normalized().is_err());
    }

    #[test]
    fn blank_text_filters_are_dropped() {
        let search = PropertySearch {
            city: Some("  ".into()),
            q: Some(" sea view ".into()),
            ..Default::default()
        }
        .normalized()
        .unwrap();
        assert_eq!(search.city, None);
        assert_eq!(search.q.as_deref(), Some("sea view"));
    }

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }
}

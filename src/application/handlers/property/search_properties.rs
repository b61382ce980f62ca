//! SearchPropertiesHandler - Public listing search.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, Page, PageRequest};
use crate::domain::property::{Property, PropertySearch};
use crate::ports::PropertyRepository;

#[derive(Debug, Clone, Default)]
pub struct SearchPropertiesQuery {
    pub search: PropertySearch,
    pub page: PageRequest,
}

pub struct SearchPropertiesHandler {
    properties: Arc<dyn PropertyRepository>,
}

impl SearchPropertiesHandler {
    pub fn new(properties: Arc<dyn PropertyRepository>) -> Self {
        Self { properties }
    }

    pub async fn handle(&self, query: SearchPropertiesQuery) -> Result<Page<Property>, DomainError> {
        let search = query.search.normalized()?;
        self.properties.search(&search, query.page).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::application::handlers::test_support::{active_property, verified_user};
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn inverted_price_range_is_rejected() {
        let store = InMemoryStore::new();
        let err = SearchPropertiesHandler::new(Arc::new(store))
            .handle(SearchPropertiesQuery {
                search: PropertySearch {
                    min_price: Some(10),
                    max_price: Some(5),
                    ..Default::default()
                },
                page: PageRequest::default(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn city_filter_is_trimmed() {
        let store = InMemoryStore::new();
        let owner = verified_user(&store, "owner@example.com").await;
        active_property(&store, &owner).await;

        let page = SearchPropertiesHandler::new(Arc::new(store.clone()))
            .handle(SearchPropertiesQuery {
                search: PropertySearch {
                    city: Some("  pune ".into()),
                    ..Default::default()
                },
                page: PageRequest::default(),
            })
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }
}

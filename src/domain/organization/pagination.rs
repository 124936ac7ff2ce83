//! Browsable organization list query and page types

use serde::{Deserialize, Serialize};

use super::entity::Organization;
use super::validation::{validate_page_params, OrganizationValidationError};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Pagination metadata returned with list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u32,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
            total: 0,
            total_pages: 0,
            has_next_page: false,
            has_prev_page: false,
        }
    }
}

/// One page of the browsable organization list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationPage {
    pub organizations: Vec<Organization>,
    pub pagination: Pagination,
}

/// Query parameters for listing organizations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationQuery {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
}

impl Default for OrganizationQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_PAGE_LIMIT,
            search: None,
        }
    }
}

impl OrganizationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set a search term; blank terms are ignored
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let trimmed = search.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), OrganizationValidationError> {
        validate_page_params(self.page, self.limit)
    }

    /// Query string pairs in the order the backend documents them
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];

        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }

        params
    }
}

//! Events accepted by the search pipeline

use crate::domain::search::{SearchBy, SearchQuery, SortSpec};

/// User intents that lead to a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Explicit search; resets paging and collapses the expanded row
    Search,
    /// Column selected for sorting; resets paging and collapses the expanded row
    SortChange(String),
    /// Pagination; touches nothing but the page index
    PageChange(u32),
}

/// Everything the worker receives, in emission order
#[derive(Debug)]
pub(crate) enum Command {
    Form(SearchForm),
    Trigger(Trigger),
    ToggleDetail(String),
    Shutdown,
}

/// Current contents of the search form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchForm {
    pub criteria: String,
    pub by: SearchBy,
    pub branches: Vec<String>,
    pub only_available: bool,
}

impl SearchForm {
    pub fn new(criteria: impl Into<String>) -> Self {
        Self {
            criteria: criteria.into(),
            ..Self::default()
        }
    }

    pub fn with_by(mut self, by: SearchBy) -> Self {
        self.by = by;
        self
    }

    pub fn with_branches<I, S>(mut self, branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.branches = branches.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_only_available(mut self, only_available: bool) -> Self {
        self.only_available = only_available;
        self
    }

    pub fn is_valid(&self, criteria_required: bool) -> bool {
        !criteria_required || !self.criteria.trim().is_empty()
    }

    /// Canonical query for this form at the given page, size and sort
    pub fn to_query(&self, page: u32, size: u32, sort: Option<SortSpec>) -> SearchQuery {
        SearchQuery {
            criteria: self.criteria.clone(),
            by: self.by,
            branches: self.branches.clone(),
            only_available: self.only_available,
            page: Some(page),
            size: Some(size),
            sort,
        }
    }
}

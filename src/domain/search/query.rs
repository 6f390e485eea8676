//! Search query description

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Page size used when a query does not carry one
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Field the free-text criteria is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchBy {
    #[default]
    PartNumber,
    SupplierSku,
    Description,
}

impl SearchBy {
    /// Name used on the wire and inside cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PartNumber => "partNumber",
            Self::SupplierSku => "supplierSku",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for SearchBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchBy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "partNumber" => Ok(Self::PartNumber),
            "supplierSku" => Ok(Self::SupplierSku),
            "description" => Ok(Self::Description),
            other => Err(DomainError::validation(format!(
                "Unknown search field '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Sort field plus direction, rendered as `field:direction`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Sort that results from selecting `field` while `current` is active.
    ///
    /// Selecting the active field flips its direction; any other field starts ascending.
    pub fn toggled(current: Option<&SortSpec>, field: &str) -> SortSpec {
        match current {
            Some(active) if active.field == field => {
                SortSpec::new(field, active.direction.flipped())
            }
            _ => SortSpec::ascending(field),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.field, self.direction.as_str())
    }
}

impl FromStr for SortSpec {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, direction)) => (field.trim(), direction.trim()),
            None => (s.trim(), "asc"),
        };

        if field.is_empty() {
            return Err(DomainError::validation("Sort field must not be empty"));
        }

        let direction = match direction {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            other => {
                return Err(DomainError::validation(format!(
                    "Unknown sort direction '{}'",
                    other
                )));
            }
        };

        Ok(SortSpec::new(field, direction))
    }
}

/// Immutable description of one search intent
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub criteria: String,
    pub by: SearchBy,
    /// Selection order is significant and duplicates are kept
    pub branches: Vec<String>,
    pub only_available: bool,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Option<SortSpec>,
}

impl SearchQuery {
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

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn page_or_default(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn size_or_default(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Request parameters for the remote search endpoint.
    ///
    /// `branches` and `sort` are omitted when unset.
    pub fn to_query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("criteria", self.criteria.clone()),
            ("by", self.by.as_str().to_string()),
        ];

        if !self.branches.is_empty() {
            params.push(("branches", self.branches.join(",")));
        }

        params.push(("onlyAvailable", self.only_available.to_string()));
        params.push(("page", self.page_or_default().to_string()));
        params.push(("size", self.size_or_default().to_string()));

        if let Some(sort) = &self.sort {
            params.push(("sort", sort.to_string()));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(&'static str, String)], name: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_query_params_defaults() {
        let params = SearchQuery::new("abc").to_query_params();

        assert_eq!(param(&params, "criteria"), Some("abc"));
        assert_eq!(param(&params, "by"), Some("partNumber"));
        assert_eq!(param(&params, "onlyAvailable"), Some("false"));
        assert_eq!(param(&params, "page"), Some("0"));
        assert_eq!(param(&params, "size"), Some("20"));
        assert_eq!(param(&params, "branches"), None);
        assert_eq!(param(&params, "sort"), None);
    }

    #[test]
    fn test_query_params_full() {
        let query = SearchQuery::new("abc")
            .with_by(SearchBy::SupplierSku)
            .with_branches(["NYC", "LA"])
            .with_only_available(true)
            .with_page(2)
            .with_size(50)
            .with_sort(SortSpec::new("availableQty", SortDirection::Desc));
        let params = query.to_query_params();

        assert_eq!(param(&params, "by"), Some("supplierSku"));
        assert_eq!(param(&params, "branches"), Some("NYC,LA"));
        assert_eq!(param(&params, "onlyAvailable"), Some("true"));
        assert_eq!(param(&params, "page"), Some("2"));
        assert_eq!(param(&params, "size"), Some("50"));
        assert_eq!(param(&params, "sort"), Some("availableQty:desc"));
    }

    #[test]
    fn test_sort_toggle() {
        let first = SortSpec::toggled(None, "partNumber");
        assert_eq!(first, SortSpec::ascending("partNumber"));

        let flipped = SortSpec::toggled(Some(&first), "partNumber");
        assert_eq!(flipped.direction, SortDirection::Desc);

        let other = SortSpec::toggled(Some(&flipped), "availableQty");
        assert_eq!(other, SortSpec::ascending("availableQty"));
    }

    #[test]
    fn test_sort_spec_parse() {
        let sort: SortSpec = "availableQty:desc".parse().unwrap();
        assert_eq!(sort, SortSpec::new("availableQty", SortDirection::Desc));

        let bare: SortSpec = "partNumber".parse().unwrap();
        assert_eq!(bare.direction, SortDirection::Asc);

        assert!("partNumber:sideways".parse::<SortSpec>().is_err());
        assert!(":asc".parse::<SortSpec>().is_err());
    }

    #[test]
    fn test_search_by_parse() {
        assert_eq!(
            "description".parse::<SearchBy>().unwrap(),
            SearchBy::Description
        );
        assert!("color".parse::<SearchBy>().is_err());
    }
}

//! Canonical cache keys for search queries

use std::fmt;

use crate::domain::search::SearchQuery;

/// Separates key components
const COMPONENT_DELIMITER: char = '|';
/// Separates sort field from direction
const SORT_DELIMITER: char = ':';
/// Separates branch filters
const LIST_DELIMITER: char = ',';
/// Separates an optional component's label from its value
const LABEL_DELIMITER: char = '=';
const ESCAPE: char = '%';

const SEARCH_NAMESPACE: &str = "search";
const AVAILABILITY_NAMESPACE: &str = "peak";

/// Normalized string uniquely identifying a query's semantics
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(String);

impl QueryKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QueryKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Percent-escapes every reserved delimiter so no value can forge a component boundary
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            ESCAPE => escaped.push_str("%25"),
            COMPONENT_DELIMITER => escaped.push_str("%7C"),
            SORT_DELIMITER => escaped.push_str("%3A"),
            LIST_DELIMITER => escaped.push_str("%2C"),
            LABEL_DELIMITER => escaped.push_str("%3D"),
            other => escaped.push(other),
        }
    }

    escaped
}

/// Ordered key components under a namespace
#[derive(Debug, Clone)]
struct KeyBuilder {
    parts: Vec<String>,
}

impl KeyBuilder {
    fn new(namespace: &str) -> Self {
        Self {
            parts: vec![namespace.to_string()],
        }
    }

    fn with_component(mut self, value: &str) -> Self {
        self.parts.push(escape(value));
        self
    }

    /// Appends `label=value`; the caller omits the call entirely when the field is absent
    fn with_labelled(mut self, label: &str, value: String) -> Self {
        self.parts
            .push(format!("{}{}{}", label, LABEL_DELIMITER, value));
        self
    }

    fn build(self) -> QueryKey {
        QueryKey(self.parts.join(&COMPONENT_DELIMITER.to_string()))
    }
}

/// Canonical key for a search query.
///
/// Criteria are trimmed and lower-cased; branch order is preserved. Absent sort
/// and empty branches leave no trace in the key. Page and size fall back to their
/// defaults, any other default inference is left to the caller.
pub fn normalize(query: &SearchQuery) -> QueryKey {
    let criteria = query.criteria.trim().to_lowercase();

    let mut builder = KeyBuilder::new(SEARCH_NAMESPACE)
        .with_component(&criteria)
        .with_component(query.by.as_str())
        .with_component(if query.only_available { "true" } else { "false" })
        .with_component(&query.page_or_default().to_string())
        .with_component(&query.size_or_default().to_string());

    if let Some(sort) = &query.sort {
        builder = builder.with_labelled(
            "s",
            format!(
                "{}{}{}",
                escape(&sort.field),
                SORT_DELIMITER,
                sort.direction.as_str()
            ),
        );
    }

    if !query.branches.is_empty() {
        let branches: Vec<String> = query.branches.iter().map(|b| escape(b)).collect();
        builder = builder.with_labelled("b", branches.join(&LIST_DELIMITER.to_string()));
    }

    builder.build()
}

/// Key for a part's peak availability lookup
pub fn availability_key(part_number: &str) -> QueryKey {
    KeyBuilder::new(AVAILABILITY_NAMESPACE)
        .with_component(part_number)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::search::{SearchBy, SortDirection, SortSpec};

    fn example(criteria: &str) -> SearchQuery {
        SearchQuery::new(criteria)
            .with_by(SearchBy::PartNumber)
            .with_branches(["NYC", "LA"])
            .with_only_available(true)
            .with_page(1)
            .with_size(10)
            .with_sort(SortSpec::new("availableQty", SortDirection::Desc))
    }

    #[test]
    fn test_criteria_case_and_whitespace_insensitive() {
        assert_eq!(normalize(&example(" ABC ")), normalize(&example("abc")));
    }

    #[test]
    fn test_branch_order_is_significant() {
        let reordered = example("abc").with_branches(["LA", "NYC"]);
        assert_ne!(normalize(&example("abc")), normalize(&reordered));
    }

    #[test]
    fn test_key_layout() {
        let key = normalize(&example(" ABC "));
        assert_eq!(
            key.as_str(),
            "search|abc|partNumber|true|1|10|s=availableQty:desc|b=NYC,LA"
        );
    }

    #[test]
    fn test_absent_fields_leave_no_trace() {
        let key = normalize(&SearchQuery::new("abc"));
        assert_eq!(key.as_str(), "search|abc|partNumber|false|0|20");
    }

    #[test]
    fn test_page_and_size_defaults_collapse() {
        let implicit = SearchQuery::new("abc");
        let explicit = SearchQuery::new("abc").with_page(0).with_size(20);
        assert_eq!(normalize(&implicit), normalize(&explicit));
    }

    #[test]
    fn test_explicit_sort_differs_from_absent_sort() {
        let unsorted = SearchQuery::new("abc");
        let sorted = SearchQuery::new("abc").with_sort(SortSpec::ascending("partNumber"));
        assert_ne!(normalize(&unsorted), normalize(&sorted));
    }

    #[test]
    fn test_every_field_changes_the_key() {
        let base = example("abc");
        let variants = vec![
            example("abd"),
            example("abc").with_by(SearchBy::Description),
            example("abc").with_branches(["NYC"]),
            example("abc").with_only_available(false),
            example("abc").with_page(2),
            example("abc").with_size(20),
            example("abc").with_sort(SortSpec::new("availableQty", SortDirection::Asc)),
            example("abc").with_sort(SortSpec::new("partNumber", SortDirection::Desc)),
        ];

        for variant in variants {
            assert_ne!(normalize(&base), normalize(&variant), "{:?}", variant);
        }
    }

    #[test]
    fn test_delimiters_in_values_cannot_collide() {
        // "a|b" as criteria must not look like criteria "a" followed by a component "b"
        let piped = SearchQuery::new("a|partNumber");
        let plain = SearchQuery::new("a");
        assert_ne!(normalize(&piped), normalize(&plain));

        let joined = SearchQuery::new("x").with_branches(["NYC,LA"]);
        let split = SearchQuery::new("x").with_branches(["NYC", "LA"]);
        assert_ne!(normalize(&joined), normalize(&split));

        let labelled = SearchQuery::new("x").with_branches(["s=f:asc"]);
        let sorted = SearchQuery::new("x").with_sort(SortSpec::ascending("f"));
        assert_ne!(normalize(&labelled), normalize(&sorted));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("a|b:c,d=e%f"), "a%7Cb%3Ac%2Cd%3De%25f");
    }

    #[test]
    fn test_availability_key() {
        assert_eq!(availability_key("ABC-1").as_str(), "peak|ABC-1");
        assert_ne!(availability_key("abc-1"), availability_key("ABC-1"));
    }
}

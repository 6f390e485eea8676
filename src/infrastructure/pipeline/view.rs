//! UI-facing state published by the pipeline

use crate::domain::search::{
    failure_message, Envelope, FetchOutcome, PartItem, PeakAvailability, SearchPage, SortSpec,
};

/// Informational notice shown when a search matched nothing
pub const NO_RESULTS_NOTICE: &str = "No parts matched your search.";

/// Expanded row showing a part's peak availability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub part_number: String,
    pub loading: bool,
    pub availability: Option<PeakAvailability>,
    pub error: Option<String>,
}

impl DetailView {
    pub(crate) fn loading(part_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            loading: true,
            availability: None,
            error: None,
        }
    }

    pub(crate) fn apply(&mut self, outcome: FetchOutcome<PeakAvailability>) {
        self.loading = false;

        match outcome {
            Ok(Envelope::Success { data }) => {
                self.availability = Some(data);
                self.error = None;
            }
            Ok(Envelope::Failure { message }) => {
                self.availability = None;
                self.error = Some(failure_message(&message));
            }
            Err(error) => {
                self.availability = None;
                self.error = Some(failure_message(&error.to_string()));
            }
        }
    }
}

/// Everything a search screen renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub loading: bool,
    pub items: Vec<PartItem>,
    pub total: u64,
    /// Failure of the latest applied search
    pub error: Option<String>,
    /// Informational message, e.g. an empty result set
    pub notice: Option<String>,
    pub page: u32,
    pub page_size: u32,
    pub sort: Option<SortSpec>,
    pub detail: Option<DetailView>,
    /// Evaluation whose result is displayed; zero before the first one lands
    pub generation: u64,
}

impl SearchView {
    pub fn new(page_size: u32) -> Self {
        Self {
            loading: false,
            items: Vec::new(),
            total: 0,
            error: None,
            notice: None,
            page: 0,
            page_size,
            sort: None,
            detail: None,
            generation: 0,
        }
    }

    pub(crate) fn begin(&mut self) {
        self.loading = true;
        self.error = None;
        self.notice = None;
    }

    pub(crate) fn apply(&mut self, generation: u64, outcome: FetchOutcome<SearchPage>) {
        self.loading = false;
        self.generation = generation;

        match outcome {
            Ok(Envelope::Success { data }) => {
                self.notice = (data.total == 0).then(|| NO_RESULTS_NOTICE.to_string());
                self.error = None;
                self.items = data.items;
                self.total = data.total;
            }
            Ok(Envelope::Failure { message }) => {
                self.fail(failure_message(&message));
            }
            Err(error) => {
                self.fail(failure_message(&error.to_string()));
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.items.clear();
        self.total = 0;
        self.notice = None;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FetchError;

    #[test]
    fn test_apply_success() {
        let mut view = SearchView::new(20);
        view.begin();
        view.apply(
            1,
            Ok(Envelope::success(SearchPage::new(
                1,
                vec![PartItem::default()],
            ))),
        );

        assert!(!view.loading);
        assert_eq!(view.total, 1);
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.generation, 1);
        assert!(view.notice.is_none());
    }

    #[test]
    fn test_apply_empty_sets_notice() {
        let mut view = SearchView::new(20);
        view.apply(1, Ok(Envelope::success(SearchPage::empty())));

        assert_eq!(view.notice.as_deref(), Some(NO_RESULTS_NOTICE));
        assert!(view.error.is_none());
    }

    #[test]
    fn test_apply_failure_clears_results() {
        let mut view = SearchView::new(20);
        view.apply(1, Ok(Envelope::success(SearchPage::new(3, vec![PartItem::default()]))));
        view.apply(2, Ok(Envelope::failure("")));

        assert!(view.items.is_empty());
        assert_eq!(view.total, 0);
        assert_eq!(view.error.as_deref(), Some("Search failed. Please try again."));
    }

    #[test]
    fn test_success_clears_error() {
        let mut view = SearchView::new(20);
        view.apply(1, Err(FetchError::transport("refused")));
        assert_eq!(view.error.as_deref(), Some("Request failed: refused"));

        view.begin();
        assert!(view.error.is_none());

        view.apply(2, Ok(Envelope::success(SearchPage::new(1, vec![PartItem::default()]))));
        assert!(view.error.is_none());
    }

    #[test]
    fn test_detail_apply() {
        let mut detail = DetailView::loading("ABC-1");
        detail.apply(Ok(Envelope::failure("No stock data")));

        assert!(!detail.loading);
        assert_eq!(detail.error.as_deref(), Some("No stock data"));
        assert!(detail.availability.is_none());
    }
}

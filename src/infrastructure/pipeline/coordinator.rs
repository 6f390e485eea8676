//! Query pipeline coordinator
//!
//! Every trigger, form edit and detail toggle travels through one ordered
//! channel to a single worker task. The worker applies state changes on
//! receipt, debounces dispatch, and tags each accepted evaluation with a
//! generation so that only the latest one ever reaches the view.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::trigger::{Command, SearchForm, Trigger};
use super::view::{DetailView, SearchView};
use crate::domain::search::{
    FetchOutcome, PeakAvailability, SearchPage, SortSpec, DEFAULT_PAGE_SIZE,
};
use crate::domain::DomainError;
use crate::infrastructure::cache::deadline_after;
use crate::infrastructure::services::SearchService;

/// Tuning for the search pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Quiet period required after the last trigger before a search is dispatched
    pub debounce: Duration,
    pub default_page_size: u32,
    /// Drop searches whose criteria are blank
    pub criteria_required: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(50),
            default_page_size: DEFAULT_PAGE_SIZE,
            criteria_required: true,
        }
    }
}

impl PipelineConfig {
    /// Sets the quiet period before dispatch
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Sets the page size used for every dispatched query
    pub fn with_default_page_size(mut self, page_size: u32) -> Self {
        self.default_page_size = page_size;
        self
    }

    /// Sets whether blank criteria are dropped
    pub fn with_criteria_required(mut self, required: bool) -> Self {
        self.criteria_required = required;
        self
    }
}

/// Cloneable sender side of the pipeline
#[derive(Debug, Clone)]
pub struct SearchHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SearchHandle {
    fn send(&self, command: Command) -> Result<(), DomainError> {
        self.commands
            .send(command)
            .map_err(|_| DomainError::PipelineClosed)
    }

    /// Replaces the form contents; does not search by itself
    pub fn update_form(&self, form: SearchForm) -> Result<(), DomainError> {
        self.send(Command::Form(form))
    }

    pub fn trigger(&self, trigger: Trigger) -> Result<(), DomainError> {
        self.send(Command::Trigger(trigger))
    }

    pub fn search(&self) -> Result<(), DomainError> {
        self.trigger(Trigger::Search)
    }

    pub fn sort_by(&self, field: impl Into<String>) -> Result<(), DomainError> {
        self.trigger(Trigger::SortChange(field.into()))
    }

    pub fn go_to_page(&self, page: u32) -> Result<(), DomainError> {
        self.trigger(Trigger::PageChange(page))
    }

    /// Expands the row for `part_number`, or collapses it if it is already expanded
    pub fn toggle_detail(&self, part_number: impl Into<String>) -> Result<(), DomainError> {
        self.send(Command::ToggleDetail(part_number.into()))
    }
}

/// Running search pipeline: a command handle, the view, and the worker task
#[derive(Debug)]
pub struct SearchPipeline {
    handle: SearchHandle,
    view: watch::Receiver<SearchView>,
    task: JoinHandle<()>,
}

impl SearchPipeline {
    /// Starts the worker on the current tokio runtime
    pub fn spawn(config: PipelineConfig, service: SearchService) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (view_tx, view_rx) = watch::channel(SearchView::new(config.default_page_size));

        let worker = PipelineWorker {
            config,
            service,
            commands: commands_rx,
            view: view_tx,
            form: SearchForm::default(),
            page: 0,
            sort: None,
            expanded: None,
            generation: 0,
            detail_generation: 0,
            deadline: None,
            in_flight: FuturesUnordered::new(),
        };

        let task = tokio::spawn(worker.run());

        Self {
            handle: SearchHandle {
                commands: commands_tx,
            },
            view: view_rx,
            task,
        }
    }

    pub fn handle(&self) -> SearchHandle {
        self.handle.clone()
    }

    /// Receiver notified on every view change
    pub fn view(&self) -> watch::Receiver<SearchView> {
        self.view.clone()
    }

    pub fn snapshot(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// Stops the worker and discards its caches
    pub async fn shutdown(self) -> Result<(), DomainError> {
        // The worker may already be gone; joining below is what matters
        let _ = self.handle.send(Command::Shutdown);

        self.task
            .await
            .map_err(|e| DomainError::internal(format!("Search pipeline task failed: {}", e)))
    }
}

enum Completion {
    Search {
        generation: u64,
        outcome: FetchOutcome<SearchPage>,
    },
    Detail {
        generation: u64,
        outcome: FetchOutcome<PeakAvailability>,
    },
}

enum Event {
    Command(Option<Command>),
    DebounceElapsed,
    Completed(Completion),
}

struct PipelineWorker {
    config: PipelineConfig,
    service: SearchService,
    commands: mpsc::UnboundedReceiver<Command>,
    view: watch::Sender<SearchView>,
    form: SearchForm,
    page: u32,
    sort: Option<SortSpec>,
    expanded: Option<String>,
    /// Last accepted search evaluation
    generation: u64,
    /// Last requested detail expansion
    detail_generation: u64,
    /// Pending dispatch, pushed back by every trigger
    deadline: Option<Instant>,
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl PipelineWorker {
    async fn run(mut self) {
        tracing::debug!("Search pipeline started");

        loop {
            let deadline = self.deadline;

            let event = tokio::select! {
                biased;
                command = self.commands.recv() => Event::Command(command),
                Some(completion) = self.in_flight.next(), if !self.in_flight.is_empty() => {
                    Event::Completed(completion)
                }
                () = wait_until(deadline), if deadline.is_some() => Event::DebounceElapsed,
            };

            match event {
                Event::Command(None) | Event::Command(Some(Command::Shutdown)) => break,
                Event::Command(Some(command)) => self.handle_command(command),
                Event::DebounceElapsed => self.dispatch(),
                Event::Completed(completion) => self.complete(completion),
            }
        }

        self.service.clear();
        tracing::debug!("Search pipeline stopped");
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Form(form) => self.form = form,
            Command::Trigger(trigger) => {
                self.apply_trigger(trigger);
                self.deadline = Some(deadline_after(Instant::now(), self.config.debounce));
            }
            Command::ToggleDetail(part_number) => self.toggle_detail(part_number),
            Command::Shutdown => {}
        }
    }

    fn apply_trigger(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::Search => {
                self.page = 0;
                self.collapse_detail();
            }
            Trigger::SortChange(field) => {
                self.sort = Some(SortSpec::toggled(self.sort.as_ref(), &field));
                self.page = 0;
                self.collapse_detail();
            }
            Trigger::PageChange(page) => {
                self.page = page;
            }
        }

        let page = self.page;
        let sort = self.sort.clone();

        self.view.send_modify(|view| {
            view.page = page;
            view.sort = sort;
        });
    }

    fn collapse_detail(&mut self) {
        self.detail_generation += 1;

        if self.expanded.take().is_some() {
            self.view.send_modify(|view| view.detail = None);
        }
    }

    fn dispatch(&mut self) {
        self.deadline = None;

        if !self.form.is_valid(self.config.criteria_required) {
            tracing::debug!("Search form invalid, dropping trigger");
            return;
        }

        self.generation += 1;
        let generation = self.generation;

        let query = self
            .form
            .to_query(self.page, self.config.default_page_size, self.sort.clone());

        tracing::debug!(
            generation,
            criteria = %query.criteria,
            by = %query.by,
            page = query.page_or_default(),
            "Dispatching search"
        );

        self.view.send_modify(SearchView::begin);

        let service = self.service.clone();
        self.in_flight.push(
            async move {
                Completion::Search {
                    generation,
                    outcome: service.search(query).await,
                }
            }
            .boxed(),
        );
    }

    fn toggle_detail(&mut self, part_number: String) {
        self.detail_generation += 1;

        if self.expanded.as_deref() == Some(part_number.as_str()) {
            self.expanded = None;
            self.view.send_modify(|view| view.detail = None);
            return;
        }

        let generation = self.detail_generation;
        self.expanded = Some(part_number.clone());
        self.view
            .send_modify(|view| view.detail = Some(DetailView::loading(part_number.clone())));

        let service = self.service.clone();
        self.in_flight.push(
            async move {
                Completion::Detail {
                    generation,
                    outcome: service.peak_availability(&part_number).await,
                }
            }
            .boxed(),
        );
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Search {
                generation,
                outcome,
            } => {
                if generation != self.generation {
                    return;
                }

                self.view.send_modify(|view| view.apply(generation, outcome));
            }
            Completion::Detail {
                generation,
                outcome,
            } => {
                if generation != self.detail_generation {
                    return;
                }

                self.view.send_modify(|view| {
                    if let Some(detail) = view.detail.as_mut() {
                        detail.apply(outcome);
                    }
                });
            }
        }
    }
}

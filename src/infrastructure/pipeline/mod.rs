//! Search pipeline - debounced, superseding query coordination

mod coordinator;
mod trigger;
mod view;

pub use coordinator::{PipelineConfig, SearchHandle, SearchPipeline};
pub use trigger::{SearchForm, Trigger};
pub use view::{DetailView, SearchView, NO_RESULTS_NOTICE};

//! Search command - runs one search through the cache and prints the envelope

use clap::Args;
use tracing::info;

use crate::build_search_service;
use crate::domain::search::WireEnvelope;
use crate::domain::{SearchBy, SearchQuery, SortSpec};

/// Arguments for the search command
#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
    /// Text to search for
    pub criteria: String,

    /// Field to match against (partNumber, supplierSku, description)
    #[arg(long, default_value_t = SearchBy::PartNumber)]
    pub by: SearchBy,

    /// Restrict to a branch; repeat for several
    #[arg(long = "branch")]
    pub branches: Vec<String>,

    /// Only parts with stock on hand
    #[arg(long)]
    pub only_available: bool,

    /// Zero-based page index
    #[arg(long)]
    pub page: Option<u32>,

    /// Page size
    #[arg(long)]
    pub size: Option<u32>,

    /// Sort as `field` or `field:asc|desc`
    #[arg(long)]
    pub sort: Option<SortSpec>,
}

impl SearchArgs {
    pub fn to_query(&self) -> SearchQuery {
        SearchQuery {
            criteria: self.criteria.clone(),
            by: self.by,
            branches: self.branches.clone(),
            only_available: self.only_available,
            page: self.page,
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

/// Run the search command
pub async fn run(args: SearchArgs, api_url: Option<String>) -> anyhow::Result<()> {
    let config = super::prepare(api_url);
    let service = build_search_service(&config)?;

    let query = args.to_query();
    info!(criteria = %query.criteria, by = %query.by, "Searching parts");

    let envelope = service.search(query).await?;
    let wire = WireEnvelope::from(envelope);

    println!("{}", serde_json::to_string_pretty(&wire)?);

    Ok(())
}

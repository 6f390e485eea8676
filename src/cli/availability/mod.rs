//! Availability command - prints branch quantities for one part, highest first

use clap::Args;
use tracing::info;

use crate::build_search_service;
use crate::domain::search::WireEnvelope;

/// Arguments for the availability command
#[derive(Args, Clone, Debug)]
pub struct AvailabilityArgs {
    /// Part number to look up
    pub part_number: String,
}

/// Run the availability command
pub async fn run(args: AvailabilityArgs, api_url: Option<String>) -> anyhow::Result<()> {
    let config = super::prepare(api_url);
    let service = build_search_service(&config)?;

    info!(part_number = %args.part_number, "Fetching peak availability");

    let envelope = service.peak_availability(&args.part_number).await?;
    let wire = WireEnvelope::from(envelope);

    println!("{}", serde_json::to_string_pretty(&wire)?);

    Ok(())
}

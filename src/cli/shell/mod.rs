//! Shell command - line-driven search session over the debounced pipeline
//!
//! Each stdin line edits the form or emits a trigger; the rendered view is
//! printed to stdout whenever it changes.

use std::fmt::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::build_search_service;
use crate::domain::{DomainError, SearchBy};
use crate::infrastructure::pipeline::{SearchForm, SearchHandle, SearchPipeline, SearchView};

const HELP: &str = "\
commands:
  criteria <text>       set the search text
  by <field>            partNumber | supplierSku | description
  branches [A,B,...]    restrict to branches (empty clears)
  available on|off      only parts with stock
  search                run the search
  sort <field>          sort by field, again to flip direction
  page <n>              go to page n (zero-based)
  detail <part>         expand or collapse peak availability
  help                  show this text
  quit                  leave the shell";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Criteria(String),
    By(SearchBy),
    Branches(Vec<String>),
    OnlyAvailable(bool),
    Search,
    Sort(String),
    Page(u32),
    Detail(String),
    Help,
    Quit,
}

/// Parses a single input line; blank lines yield `None`
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, DomainError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "criteria" => ShellCommand::Criteria(rest.to_string()),
        "by" => ShellCommand::By(rest.parse()?),
        "branches" => ShellCommand::Branches(
            rest.split(',')
                .map(str::trim)
                .filter(|b| !b.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        "available" => match rest {
            "on" | "true" | "yes" => ShellCommand::OnlyAvailable(true),
            "off" | "false" | "no" => ShellCommand::OnlyAvailable(false),
            other => {
                return Err(DomainError::validation(format!(
                    "Expected on or off, got '{}'",
                    other
                )));
            }
        },
        "search" => ShellCommand::Search,
        "sort" => ShellCommand::Sort(required(verb, rest)?),
        "page" => ShellCommand::Page(rest.parse().map_err(|_| {
            DomainError::validation(format!("Invalid page number '{}'", rest))
        })?),
        "detail" => ShellCommand::Detail(required(verb, rest)?),
        "help" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => {
            return Err(DomainError::validation(format!(
                "Unknown command '{}', try 'help'",
                other
            )));
        }
    };

    Ok(Some(command))
}

fn required(verb: &str, value: &str) -> Result<String, DomainError> {
    if value.is_empty() {
        return Err(DomainError::validation(format!("'{}' needs an argument", verb)));
    }

    Ok(value.to_string())
}

/// Text rendering of the current view
pub fn render(view: &SearchView) -> String {
    let mut out = String::new();

    let _ = write!(out, "page {} (size {})", view.page, view.page_size);
    if let Some(sort) = &view.sort {
        let _ = write!(out, " sort {}", sort);
    }
    if view.loading {
        out.push_str(" [loading]");
    }
    let _ = writeln!(out);

    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {}", error);
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "{}", notice);
    }

    if view.generation > 0 && view.error.is_none() {
        let _ = writeln!(out, "total {}", view.total);
        for item in &view.items {
            let _ = writeln!(
                out,
                "  {}  {}  {}  {}  {}",
                item.part_number, item.supplier_sku, item.description, item.branch, item.available_qty
            );
        }
    }

    if let Some(detail) = &view.detail {
        let _ = write!(out, "detail {}:", detail.part_number);
        if detail.loading {
            out.push_str(" loading");
        } else if let Some(error) = &detail.error {
            let _ = write!(out, " error: {}", error);
        } else if let Some(availability) = &detail.availability {
            for branch in &availability.branches {
                let _ = write!(out, " {}={}", branch.branch, branch.qty);
            }
        }
        let _ = writeln!(out);
    }

    out
}

/// Run the interactive shell
pub async fn run(api_url: Option<String>) -> anyhow::Result<()> {
    let config = super::prepare(api_url);
    let service = build_search_service(&config)?;

    let pipeline = SearchPipeline::spawn(config.pipeline.to_pipeline_config(), service);
    let handle = pipeline.handle();
    let mut view = pipeline.view();
    let mut form = SearchForm::default();

    info!(base_url = %config.api.base_url, "Search shell started");
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };

                match parse_line(&line) {
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => apply(&handle, &mut form, command)?,
                    Ok(None) => {}
                    Err(e) => eprintln!("{}", e),
                }
            }
            changed = view.changed() => {
                if changed.is_err() {
                    warn!("Search pipeline stopped unexpectedly");
                    break;
                }
                print!("{}", render(&view.borrow_and_update()));
            }
        }
    }

    pipeline.shutdown().await?;
    info!("Search shell closed");

    Ok(())
}

fn apply(
    handle: &SearchHandle,
    form: &mut SearchForm,
    command: ShellCommand,
) -> Result<(), DomainError> {
    match command {
        ShellCommand::Criteria(criteria) => {
            form.criteria = criteria;
            handle.update_form(form.clone())
        }
        ShellCommand::By(by) => {
            form.by = by;
            handle.update_form(form.clone())
        }
        ShellCommand::Branches(branches) => {
            form.branches = branches;
            handle.update_form(form.clone())
        }
        ShellCommand::OnlyAvailable(only_available) => {
            form.only_available = only_available;
            handle.update_form(form.clone())
        }
        ShellCommand::Search => handle.search(),
        ShellCommand::Sort(field) => handle.sort_by(field),
        ShellCommand::Page(page) => handle.go_to_page(page),
        ShellCommand::Detail(part_number) => handle.toggle_detail(part_number),
        ShellCommand::Help => {
            println!("{}", HELP);
            Ok(())
        }
        ShellCommand::Quit => Ok(()),
    }
}

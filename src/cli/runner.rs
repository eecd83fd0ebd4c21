//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, FetchArgs};
use crate::config::{PagerOptions, SourceConfig};
use crate::error::{Error, Result};
use crate::pagination::{Pager, Termination};
use crate::types::{JsonValue, StringMap};
use futures::StreamExt;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

/// Outcome of a `fetch` run
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    /// Accumulated items
    pub items: Vec<JsonValue>,
    /// Completed page fetches
    pub pages: u32,
    /// Why pagination stopped, if it reached the end
    pub termination: Option<Termination>,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch(args) => {
                let report = Self::fetch(args).await?;
                let output = if args.pretty {
                    serde_json::to_string_pretty(&report.items)?
                } else {
                    serde_json::to_string(&report.items)?
                };
                println!("{output}");
                Ok(())
            }
            Commands::Validate { source } => {
                let config = SourceConfig::from_file(source)?;
                println!(
                    "Source definition is valid: {}{}",
                    config.base_url.trim_end_matches('/'),
                    config.path
                );
                Ok(())
            }
        }
    }

    /// Page through the configured source
    pub async fn fetch(args: &FetchArgs) -> Result<FetchReport> {
        let start = Instant::now();
        let source = Self::resolve_source(args)?;
        let params: StringMap = args.params.iter().cloned().collect();

        let Pager {
            handle,
            mut outputs,
            driver,
        } = Pager::new(source.pager_config()?);
        let task = driver.spawn();

        handle.start_over(params);

        let mut pages = 0u32;
        let mut termination = None;
        loop {
            tokio::select! {
                biased;

                Some(reason) = outputs.terminations.next() => {
                    // The final completion is already queued ahead of the termination
                    while let Ok(Some(fetching)) = outputs.is_fetching.try_next() {
                        if !fetching {
                            pages += 1;
                        }
                    }
                    termination = Some(reason);
                    break;
                }
                Some(fetching) = outputs.is_fetching.next() => {
                    if fetching {
                        continue;
                    }
                    pages += 1;
                    if args.max_pages > 0 && pages >= args.max_pages {
                        info!("Reached page limit ({})", args.max_pages);
                        break;
                    }
                    handle.next_page();
                }
                else => break,
            }
        }

        // Nothing else is requested; the driver finishes once triggers close
        drop(handle);
        task.await
            .map_err(|e| Error::Other(format!("Pager task failed: {e}")))?;

        // The page limit can land on the final page; its termination is queued
        if termination.is_none() {
            termination = outputs.terminations.next().await;
        }

        let mut items = Vec::new();
        while let Some(snapshot) = outputs.data.next().await {
            items = snapshot;
        }

        if let Some(Termination::RetriesExhausted { attempts, message }) = &termination {
            warn!(
                "Pagination stopped after {} failed attempts: {}",
                attempts, message
            );
        }
        info!(
            "Fetched {} items in {} pages ({:.2}s)",
            items.len(),
            pages,
            start.elapsed().as_secs_f64()
        );

        Ok(FetchReport {
            items,
            pages,
            termination,
        })
    }

    /// Merge the source file (if any) with inline overrides
    fn resolve_source(args: &FetchArgs) -> Result<SourceConfig> {
        let mut config = match &args.source {
            Some(path) => SourceConfig::from_file(path)?,
            None => SourceConfig {
                base_url: args
                    .base_url
                    .clone()
                    .ok_or_else(|| Error::config("Specify --source or --base-url"))?,
                path: String::new(),
                items_path: String::new(),
                more_path: String::new(),
                query: HashMap::new(),
                headers: HashMap::new(),
                timeout_secs: 30,
                rate_limit: None,
                pager: PagerOptions::default(),
            },
        };

        if let Some(base_url) = &args.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(path) = &args.path {
            config.path.clone_from(path);
        }
        if let Some(items_path) = &args.items_path {
            config.items_path.clone_from(items_path);
        }
        if let Some(more_path) = &args.more_path {
            config.more_path.clone_from(more_path);
        }
        if let Some(retries) = args.max_retries {
            config.pager.max_retries = retries;
        }

        config.validate()?;
        Ok(config)
    }
}

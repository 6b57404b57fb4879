// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Command-line entry point wiring JSON files to the validation logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogConfig};
use crate::error::CatalogError;
use crate::logic::attribute_set::AttributeSetRequest;
use crate::logic::definition::validate_definition;
use crate::logic::product::{
    check_attribute_references, create_product, validate_product_attributes_with,
};
use crate::models::product::{ProductAttributeInputs, ProductDraft};
use crate::models::subcategory::Subcategory;

/// Exit status used when input was read fine but failed validation.
pub const REJECTED_EXIT_CODE: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "catattr",
    version,
    about = "Validate catalogue attribute definitions and product attributes"
)]
pub struct Cli {
    /// Optional TOML configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a single attribute definition payload.
    CheckDefinition {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Apply a create/update/delete request to a subcategory's attributes.
    SetAttributes {
        #[arg(long, value_name = "FILE")]
        subcategory: PathBuf,
        #[arg(long, value_name = "FILE")]
        request: PathBuf,
    },
    /// Validate a product attribute map against a subcategory.
    CheckProduct {
        #[arg(long, value_name = "FILE")]
        subcategory: PathBuf,
        #[arg(long, value_name = "FILE")]
        attributes: PathBuf,
    },
    /// Create a product from a draft, validating its attributes.
    CreateProduct {
        #[arg(long, value_name = "FILE")]
        subcategory: PathBuf,
        #[arg(long, value_name = "FILE")]
        product: PathBuf,
    },
}

/// Result of a command whose inputs could be read.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Accepted(Value),
    Rejected(Value),
}

/// Load config, install logging, execute the command and print its result.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;
    init_tracing(&config.log);
    debug!(command = ?cli.command, "running command");

    let outcome = execute(&cli.command, &config)?;
    let (body, code) = match &outcome {
        Outcome::Accepted(body) => (body, ExitCode::SUCCESS),
        Outcome::Rejected(body) => (body, ExitCode::from(REJECTED_EXIT_CODE)),
    };
    let text = if config.output.pretty {
        serde_json::to_string_pretty(body)?
    } else {
        serde_json::to_string(body)?
    };
    println!("{text}");
    Ok(code)
}

/// Execute one command. I/O and parse failures are errors; validation
/// failures are an [`Outcome::Rejected`] carrying the error payload.
pub fn execute(command: &Command, config: &Config) -> Result<Outcome> {
    let result = match command {
        Command::CheckDefinition { file } => {
            let raw: Value = read_json(file)?;
            validate_definition(&raw).map(serde_json::to_value)
        }
        Command::SetAttributes {
            subcategory,
            request,
        } => {
            let mut sub: Subcategory = read_json(subcategory)?;
            let request: AttributeSetRequest = read_json(request)?;
            sub.set_attributes(&request, &config.limits)
                .map(|()| serde_json::to_value(&sub))
        }
        Command::CheckProduct {
            subcategory,
            attributes,
        } => {
            let sub: Subcategory = read_json(subcategory)?;
            let inputs: ProductAttributeInputs = read_json(attributes)?;
            check_attribute_references(&sub.attributes, &inputs).and_then(|()| {
                validate_product_attributes_with(&sub.attributes, &inputs, &config.limits)
                    .map(serde_json::to_value)
                    .map_err(CatalogError::InvalidProductAttributes)
            })
        }
        Command::CreateProduct {
            subcategory,
            product,
        } => {
            let sub: Subcategory = read_json(subcategory)?;
            let draft: ProductDraft = read_json(product)?;
            create_product(&sub, draft, &config.limits).map(serde_json::to_value)
        }
    };

    match result {
        Ok(body) => Ok(Outcome::Accepted(body.context("Failed to serialize result")?)),
        Err(err) => {
            info!(status = err.status_code(), "{err}");
            Ok(Outcome::Rejected(err.to_payload()))
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON in {:?}", path))
}

/// Install the global subscriber; `RUST_LOG` wins over the configured filter.
fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so stdout stays machine-readable.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/*
 * tsview - decode, encode, and normalize table view-state links
 *
 * SPDX-FileCopyrightText: 2025-2026 Steve Schoettler
 * SPDX-License-Identifier: Apache-2.0
 */
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use tablestate::prelude::*;
use tracing::warn;
use url::Url;

use crate::output::{Output, OutputFormat};

pub mod decode;
pub mod encode;
pub mod normalize;

#[derive(Parser, Debug)]
#[command(name = "tsview")]
#[command(author, version, about = "tsview: decode, encode, and normalize table view-state links", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Write output to file (default: stdout)
    #[arg(short = 'o', long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// JSON output (default)
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Table output format
    #[arg(short, long, global = true)]
    pub table: bool,

    /// Quiet mode - suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (repeat for more: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global=true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a state token, or the state parameter of a link
    Decode {
        /// Token, href (`/items?state=...`), or absolute url
        input: String,

        #[command(flatten)]
        param: ParamArgs,
    },

    /// Encode a serialized view state (json) into a token
    Encode {
        /// Serialized view state. Reads stdin when omitted or `-`
        input: Option<String>,

        /// Print this href with the state parameter replaced, instead of the bare token
        #[arg(long, value_name = "HREF")]
        href: Option<String>,

        #[command(flatten)]
        param: ParamArgs,
    },

    /// Re-encode the state parameter of a link, dropping fields that do not decode
    Normalize {
        /// Href or absolute url
        href: String,

        #[command(flatten)]
        param: ParamArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ParamArgs {
    /// Query parameter holding the state
    #[arg(short, long, env = "TSVIEW_PARAM", default_value = DEFAULT_URL_PARAM_NAME)]
    pub param: String,
}

pub struct AppContext {
    pub output: Output,
}

pub fn run(cli: Cli) -> Result<()> {
    let ctx = AppContext {
        output: Output::new(resolve_output_format(&cli), cli.output.clone()),
    };

    match cli.command {
        Commands::Decode { input, param } => decode::handle(&ctx, &input, &param.param),
        Commands::Encode { input, href, param } => {
            encode::handle(&ctx, input.as_deref(), href.as_deref(), &param.param)
        }
        Commands::Normalize { href, param } => normalize::handle(&ctx, &href, &param.param),
    }
}

fn resolve_output_format(cli: &Cli) -> OutputFormat {
    if cli.quiet {
        OutputFormat::Quiet
    } else if cli.pretty {
        if cli.table {
            warn!("--pretty conflicts with --table. Using json pretty format");
        }
        OutputFormat::Pretty
    } else if cli.json {
        if cli.table {
            warn!("--json conflicts with --table. Using json format");
        }
        OutputFormat::Json
    } else if cli.table {
        OutputFormat::Table
    } else {
        OutputFormat::Json
    }
}

/// Tokens use the url-safe base64 alphabet, so `/`, `?` and `:` only appear in links.
pub fn looks_like_link(input: &str) -> bool {
    input.contains(['/', '?', ':'])
}

/// Value of parameter `param` in a link, or the input itself when it is a bare token.
pub fn token_from_input(input: &str, param: &str) -> Result<String> {
    let input = input.trim();
    if !looks_like_link(input) {
        return Ok(input.to_string());
    }
    match Location::parse(input).param(param) {
        Some(token) => Ok(token),
        None => bail!("no `{param}` parameter in {input}"),
    }
}

/// Returns `href` with parameter `param` set to `value`, or removed when `None`.
/// Absolute urls keep their origin and fragment.
pub fn replace_param(href: &str, param: &str, value: Option<&str>) -> String {
    let location = Location::parse(href);
    let query = location.with_param(param, value);
    match Url::parse(href) {
        Ok(mut url) => {
            url.set_query((!query.is_empty()).then_some(query.as_str()));
            url.to_string()
        }
        Err(_) => Location::new(location.path, query).href(),
    }
}

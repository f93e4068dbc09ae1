use std::io::Read as _;

use anyhow::{Context, Result};
use tablestate::{codec, prelude::*};
use tracing::debug;

use crate::cli::{AppContext, replace_param};

pub fn handle(
    ctx: &AppContext,
    input: Option<&str>,
    href: Option<&str>,
    param: &str,
) -> Result<()> {
    let text = match input {
        None | Some("-") => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading view state from stdin")?;
            text
        }
        Some(text) => text.to_string(),
    };
    let state = parse_serialized(&text)?;
    let token = codec::try_encode_serialized(&state)?;
    debug!(len = token.len(), "encoded view state");

    match href {
        Some(href) => {
            let value = (!ViewState::from(state).is_empty()).then_some(token.as_str());
            ctx.output.emit_text(&replace_param(href, param, value))
        }
        None => ctx.output.emit_text(&token),
    }
}

/// Strict parse of the wire json. Errors name the offending path (e.g. `cF[0].value`).
pub fn parse_serialized(text: &str) -> Result<SerializedViewState> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let state = serde_path_to_error::deserialize(&mut deserializer)
        .context("invalid serialized view state")?;
    Ok(state)
}

use anyhow::{Context, Result};
use tablestate::codec;
use tracing::debug;

use crate::cli::{AppContext, token_from_input};

pub fn handle(ctx: &AppContext, input: &str, param: &str) -> Result<()> {
    let token = token_from_input(input, param)?;
    debug!(len = token.len(), "decoding view-state token");
    let state = codec::try_decode_serialized(&token).context("decoding view state")?;
    ctx.output.emit_state(&state)
}

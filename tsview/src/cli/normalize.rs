use anyhow::Result;
use tablestate::{codec, prelude::*};
use tracing::{debug, info};

use crate::cli::{AppContext, replace_param};

pub fn handle(ctx: &AppContext, href: &str, param: &str) -> Result<()> {
    ctx.output.emit_text(&normalize(href, param))
}

/// Re-encodes the state parameter of `href`. Fields that do not decode are dropped;
/// a parameter that decodes to the default state is removed.
pub fn normalize(href: &str, param: &str) -> String {
    let Some(token) = Location::parse(href).param(param) else {
        debug!(param, "link has no state parameter");
        return href.to_string();
    };
    let state = codec::try_decode(&token).unwrap_or_else(|err| {
        info!(param, %err, "state parameter does not decode, removing it");
        ViewState::default()
    });
    let value = (!state.is_empty()).then(|| codec::encode(&state));
    replace_param(href, param, value.as_deref())
}

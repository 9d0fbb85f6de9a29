use fnt_client::{Tiddler, format_timestamp};
use serde_json::{Value, json};

use crate::error::FntToolError;

/// Full view of a fetched tiddler, including server metadata.
pub fn tiddler_json(tiddler: &Tiddler) -> Value {
    json!({
        "title": tiddler.title(),
        "bag": tiddler.bag(),
        "recipe": tiddler.recipe(),
        "text": tiddler.text,
        "render": tiddler.render(),
        "tags": tiddler.tags,
        "type": tiddler.tiddler_type,
        "fields": tiddler.fields,
        "modifier": tiddler.modifier(),
        "modified": tiddler.modified().map(|m| format_timestamp(&m)),
        "creator": tiddler.creator(),
        "created": tiddler.created().map(|c| format_timestamp(&c)),
        "revision": tiddler.revision()
    })
}

/// Parses a `--field key=value` argument.
pub fn parse_field(arg: &str) -> Result<(String, String), FntToolError> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(FntToolError::InvalidField(arg.to_string())),
    }
}

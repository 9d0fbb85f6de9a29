use serde::{Deserialize, Deserializer};
use serde_json::{Value, json};

use crate::error::FntError;
use crate::timestamp::parse_timestamp;
use crate::types::{Fields, Tiddler};

/// Converts a Tiddler to the document sent on PUT.
///
/// Only client-owned content goes out; authorship and revision are assigned
/// by the server and never sent.
pub fn to_json(tiddler: &Tiddler) -> Value {
    json!({
        "title": tiddler.title(),
        "text": tiddler.text,
        "tags": tiddler.tags,
        "type": tiddler.tiddler_type,
        "fields": tiddler.fields
    })
}

/// A tiddler document as returned by the server on GET.
#[derive(Debug, Deserialize)]
struct TiddlerDocument {
    text: Option<String>,
    render: Option<String>,
    tags: Option<Vec<String>>,
    #[serde(rename = "type")]
    tiddler_type: Option<String>,
    fields: Option<Fields>,
    modifier: Option<String>,
    modified: Option<String>,
    creator: Option<String>,
    created: Option<String>,
    #[serde(default, deserialize_with = "opaque_revision")]
    revision: Option<String>,
}

/// Revisions are opaque; servers send them as integers or strings.
fn opaque_revision<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "revision must be a string or number, got {}",
            other
        ))),
    }
}

/// Populates the server-owned fields of a Tiddler from a server document.
///
/// Title and addressing are left alone. Nothing is written unless the whole
/// document decodes, timestamps included.
pub fn apply_json(tiddler: &mut Tiddler, document: &Value) -> Result<(), FntError> {
    let doc =
        TiddlerDocument::deserialize(document).map_err(|e| FntError::Decode(e.to_string()))?;

    let modified = doc.modified.as_deref().map(parse_timestamp).transpose()?;
    let created = doc.created.as_deref().map(parse_timestamp).transpose()?;

    tiddler.text = doc.text;
    tiddler.render = doc.render;
    tiddler.tags = doc.tags.unwrap_or_default();
    tiddler.tiddler_type = doc.tiddler_type;
    tiddler.fields = doc.fields.unwrap_or_default();
    tiddler.modifier = doc.modifier;
    tiddler.modified = modified;
    tiddler.creator = doc.creator;
    tiddler.created = created;
    tiddler.revision = doc.revision;

    Ok(())
}

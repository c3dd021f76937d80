use serde::Deserialize;
use status_core::StatusEntry;

use crate::{FailureKind, PollFailure};

/// Entity ids arrive as opaque strings or as database integers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireId {
    Text(String),
    Number(i64),
}

impl From<WireId> for String {
    fn from(id: WireId) -> Self {
        match id {
            WireId::Text(text) => text,
            WireId::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireStatusEntry {
    id: WireId,
    status: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    last_scraped: Option<String>,
    #[serde(default)]
    product_count: Option<u64>,
}

impl From<WireStatusEntry> for StatusEntry {
    fn from(wire: WireStatusEntry) -> Self {
        StatusEntry {
            id: wire.id.into(),
            status: wire.status,
            name: wire.name,
            last_scraped: wire.last_scraped,
            product_count: wire.product_count,
        }
    }
}

/// Decode a status endpoint body: a JSON array of `{ id, status, .. }` objects.
pub fn parse_status_response(bytes: &[u8]) -> Result<Vec<StatusEntry>, PollFailure> {
    let entries: Vec<WireStatusEntry> = serde_json::from_slice(bytes)
        .map_err(|err| PollFailure::new(FailureKind::Malformed, err.to_string()))?;
    Ok(entries.into_iter().map(StatusEntry::from).collect())
}

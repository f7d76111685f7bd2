use serde::{Deserialize, Deserializer, Serialize};

use crate::models::Resource;

/// One batch of list results plus its pagination cursors
///
/// `next` and `previous` are opaque: we only care whether they are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: u32,
    #[serde(default, deserialize_with = "cursor")]
    pub next: Option<String>,
    #[serde(default, deserialize_with = "cursor")]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: 0,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

impl<T: Resource> Page<T> {
    pub fn assign_display_ids(&mut self) {
        for item in &mut self.results {
            item.assign_display_id();
        }
    }
}

// Blank cursors mean "no more pages", same as null.
fn cursor<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|c| !c.trim().is_empty()))
}

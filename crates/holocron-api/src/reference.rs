// Resource kinds, reference URLs and the short ids derived from them
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{ApiError, Result};

/// The SWAPI collections we know how to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Character,
    Planet,
    Specie,
    Starship,
    Vehicle,
    Film,
}

impl ResourceKind {
    /// Path segment of the list endpoint
    ///
    /// Characters live under `people/` on swapi.dev.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Character => "people",
            ResourceKind::Planet => "planets",
            ResourceKind::Specie => "species",
            ResourceKind::Starship => "starships",
            ResourceKind::Vehicle => "vehicles",
            ResourceKind::Film => "films",
        }
    }

    /// Folder name used by the image host
    pub fn image_category(&self) -> &'static str {
        match self {
            ResourceKind::Character => "characters",
            ResourceKind::Planet => "planets",
            ResourceKind::Specie => "species",
            ResourceKind::Starship => "starships",
            ResourceKind::Vehicle => "vehicles",
            ResourceKind::Film => "films",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Character => write!(f, "Character"),
            ResourceKind::Planet => write!(f, "Planet"),
            ResourceKind::Specie => write!(f, "Specie"),
            ResourceKind::Starship => write!(f, "Starship"),
            ResourceKind::Vehicle => write!(f, "Vehicle"),
            ResourceKind::Film => write!(f, "Film"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "character" | "characters" | "people" | "person" => Ok(ResourceKind::Character),
            "planet" | "planets" => Ok(ResourceKind::Planet),
            "specie" | "species" => Ok(ResourceKind::Specie),
            "starship" | "starships" => Ok(ResourceKind::Starship),
            "vehicle" | "vehicles" => Ok(ResourceKind::Vehicle),
            "film" | "films" => Ok(ResourceKind::Film),
            other => Err(ApiError::UnknownKind(other.to_string())),
        }
    }
}

/// Derive the short display id from a canonical resource URL
///
/// `https://swapi.dev/api/planets/12/` becomes `12`. One trailing slash is
/// dropped, then the last path segment wins.
pub fn display_id(url: &str) -> String {
    let trimmed = url.strip_suffix('/').unwrap_or(url);
    trimmed.rsplit('/').next().unwrap_or_default().to_string()
}

/// Picture for an item, keyed by its display id
pub fn image_url(image_base: &str, kind: ResourceKind, display_id: &str) -> String {
    format!(
        "{}/{}/{}.jpg",
        image_base.trim_end_matches('/'),
        kind.image_category(),
        display_id
    )
}

/// Validate a resource reference before anything goes on the wire
pub fn parse_reference(reference: &str) -> Result<reqwest::Url> {
    let url = reqwest::Url::parse(reference)
        .map_err(|e| ApiError::InvalidReference(format!("{}: {}", reference, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ApiError::InvalidReference(format!(
            "{}: unsupported scheme {}",
            reference, scheme
        ))),
    }
}

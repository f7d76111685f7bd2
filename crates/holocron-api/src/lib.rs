// Typed client for the Star Wars API (swapi.dev)
pub mod client;
pub mod error;
pub mod models;
pub mod page;
pub mod reference;
pub mod retry;

// Re-export common types
pub use client::{ClientOptions, SwapiClient, SWAPI_API_BASE};
pub use error::{ApiError, Result};
pub use models::{Character, Film, Planet, Resource, Specie, Starship, Vehicle};
pub use page::Page;
pub use reference::{display_id, image_url, parse_reference, ResourceKind};
pub use retry::RetryConfig;

// Loading logic shared by every screen: paged lists, search, detail profiles
pub mod cancel;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod profile;
pub mod source;

pub use cancel::CancelScope;
pub use config::{ApiConfig, Config, ListConfig};
pub use error::Error;
pub use filter::filter;
pub use loader::{LoadOutcome, LoadState, PagedList, SkipReason};
pub use profile::{LoadedProfile, ProfileLoader};
pub use source::EntitySource;

pub type Result<T> = std::result::Result<T, Error>;

// Character detail: one focal record plus everything it points at
use futures::future::join_all;
use holocron_api::{Character, Film, Planet, Resource, Specie, Starship, Vehicle};
use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cancel::CancelScope;
use crate::source::EntitySource;
use crate::Result;

/// A character with its related records resolved
///
/// Two profiles are equal only if they come from the same load. A fresh load
/// always gets a fresh session id, even for the same character, so a screen
/// can tell a stale result from the current one.
#[derive(Debug, Clone, Serialize)]
pub struct LoadedProfile {
    pub session_id: Uuid,
    pub character: Character,
    pub homeworld: Option<Planet>,
    pub films: Vec<Film>,
    pub species: Vec<Specie>,
    pub starships: Vec<Starship>,
    pub vehicles: Vec<Vehicle>,
}

impl PartialEq for LoadedProfile {
    fn eq(&self, other: &Self) -> bool {
        self.session_id == other.session_id
    }
}

impl Eq for LoadedProfile {}

pub struct ProfileLoader<S> {
    source: S,
}

impl<S: EntitySource> ProfileLoader<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Fetch a character and resolve its homeworld, films, species, starships and vehicles
    pub async fn load(&self, character_url: &str, cancel: &CancelScope) -> Result<LoadedProfile> {
        debug!("Loading profile for {}", character_url);
        let character: Character = self.source.fetch_entity(character_url).await?;
        cancel.check()?;
        self.resolve(character, cancel).await
    }

    /// Resolve the related records of an already-fetched character
    ///
    /// Every lookup runs concurrently and all of them are awaited, even when
    /// one fails early. Results are merged once, in reference order. If any
    /// lookup failed, the first failure in that order is returned.
    pub async fn resolve(&self, character: Character, cancel: &CancelScope) -> Result<LoadedProfile> {
        let homeworld = async {
            if character.homeworld.is_empty() {
                Ok(None)
            } else {
                self.source
                    .fetch_entity::<Planet>(&character.homeworld)
                    .await
                    .map(Some)
            }
        };
        let films = self.fetch_all::<Film>(&character.films);
        let species = self.fetch_all::<Specie>(&character.species);
        let starships = self.fetch_all::<Starship>(&character.starships);
        let vehicles = self.fetch_all::<Vehicle>(&character.vehicles);

        let (homeworld, films, species, starships, vehicles) =
            futures::join!(homeworld, films, species, starships, vehicles);

        if cancel.is_cancelled() {
            debug!("Dropping profile for {} after cancellation", character.name);
        }
        cancel.check()?;

        let profile = LoadedProfile {
            session_id: Uuid::new_v4(),
            homeworld: homeworld?,
            films: collect(films)?,
            species: collect(species)?,
            starships: collect(starships)?,
            vehicles: collect(vehicles)?,
            character,
        };

        info!(
            "Loaded profile for {}: {} films, {} species, {} starships, {} vehicles",
            profile.character.name,
            profile.films.len(),
            profile.species.len(),
            profile.starships.len(),
            profile.vehicles.len()
        );
        Ok(profile)
    }

    async fn fetch_all<T: Resource>(&self, references: &[String]) -> Vec<holocron_api::Result<T>> {
        join_all(
            references
                .iter()
                .map(|reference| self.source.fetch_entity::<T>(reference)),
        )
        .await
    }
}

fn collect<T: Resource>(results: Vec<holocron_api::Result<T>>) -> Result<Vec<T>> {
    results
        .into_iter()
        .map(|result| {
            result.map_err(|e| {
                warn!("Related {} lookup failed: {}", T::KIND, e);
                crate::Error::from(e)
            })
        })
        .collect()
}

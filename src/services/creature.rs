/// Creature provider: resolves a creature id into a name and artwork URL
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::core::round::{CreatureId, CreatureRecord};
use crate::error::ProviderError;

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";

#[async_trait]
pub trait CreatureProvider: Send + Sync {
    async fn fetch(&self, id: CreatureId) -> Result<CreatureRecord, ProviderError>;
}

#[derive(Debug, Deserialize)]
struct PokemonResponse {
    name: String,
    sprites: Sprites,
}

#[derive(Debug, Deserialize)]
struct Sprites {
    other: OtherSprites,
}

#[derive(Debug, Deserialize)]
struct OtherSprites {
    #[serde(rename = "official-artwork")]
    official_artwork: OfficialArtwork,
}

#[derive(Debug, Deserialize)]
struct OfficialArtwork {
    front_default: Option<String>,
}

/// Pull the fields a round needs out of a `/pokemon/{id}` body.
pub fn parse_creature(body: &[u8]) -> Result<CreatureRecord, ProviderError> {
    let response: PokemonResponse = serde_json::from_slice(body)?;
    let artwork_url = response
        .sprites
        .other
        .official_artwork
        .front_default
        .ok_or_else(|| ProviderError::MissingArtwork { name: response.name.clone() })?;

    Ok(CreatureRecord {
        name: response.name,
        artwork_url,
    })
}

/// PokéAPI over HTTP
pub struct PokeApiProvider {
    client: reqwest::Client,
    api_base: String,
}

impl PokeApiProvider {
    pub fn new(client: reqwest::Client, api_base: impl Into<String>) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self, id: CreatureId) -> String {
        format!("{}/pokemon/{}", self.api_base, id)
    }
}

#[async_trait]
impl CreatureProvider for PokeApiProvider {
    async fn fetch(&self, id: CreatureId) -> Result<CreatureRecord, ProviderError> {
        let url = self.endpoint(id);
        debug!(%url, "fetching creature");
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        parse_creature(&body)
    }
}

/// Shared HTTP client for every collaborator that talks to the network
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

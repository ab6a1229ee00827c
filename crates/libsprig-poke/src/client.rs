//! Content API client and random id selection

use std::time::Duration;

use rand::Rng;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use libsprig_core::{Config, FetchedContent};

use crate::error::PokeError;

/// Lowest valid resource id
pub const MIN_ID: u32 = 1;
/// Highest resource id served with a sprite set (end of generation VII)
pub const MAX_ID: u32 = 807;

/// `GET pokemon/{id}` response, reduced to the fields used
#[derive(Debug, Clone, Deserialize)]
pub struct Pokemon {
    pub name: String,
    pub sprites: Sprites,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sprites {
    pub front_default: Option<String>,
}

impl From<Pokemon> for FetchedContent {
    fn from(pokemon: Pokemon) -> Self {
        FetchedContent {
            name: pokemon.name,
            image_url: pokemon.sprites.front_default,
        }
    }
}

/// Draw a uniformly random resource id, both bounds inclusive
pub fn random_id() -> u32 {
    rand::thread_rng().gen_range(MIN_ID..=MAX_ID)
}

/// Client for the content API
#[derive(Debug, Clone)]
pub struct PokeClient {
    http: Client,
    api_root: String,
}

impl PokeClient {
    /// Build a client from the daemon configuration
    pub fn new(config: &Config) -> Result<Self, PokeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .user_agent(concat!("sprigd/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_root: config.content_api.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one resource by id
    pub async fn pokemon(&self, id: u32) -> Result<Pokemon, PokeError> {
        let url = format!("{}/pokemon/{}", self.api_root, id);
        let resp = self.http.get(&url).send().await?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PokeError::NotFound(id));
        }
        if !status.is_success() {
            return Err(PokeError::Api {
                status: status.as_u16(),
                message: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp.json().await?)
    }
}

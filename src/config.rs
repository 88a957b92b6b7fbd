use chrono::Duration;
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::engine::{ZeroResponsePolicy, DEFAULT_MIN_COMMON_QUESTIONS};
use crate::model::mongodb::ensure_indexes_exist;

/// Default number of entries shown by the similarity endpoint.
pub const DEFAULT_SIMILARITY_LIMIT: usize = 10;

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Debug, Deserialize)]
pub struct Config {
    // non-secrets
    auth_ttl: u32,
    #[serde(default = "default_min_common_questions")]
    similarity_min_common_questions: usize,
    #[serde(default = "default_similarity_limit")]
    similarity_limit: usize,
    #[serde(default)]
    zero_response_policy: ZeroResponsePolicy,
    // secrets
    jwt_secret: String,
}

fn default_min_common_questions() -> usize {
    DEFAULT_MIN_COMMON_QUESTIONS
}

fn default_similarity_limit() -> usize {
    DEFAULT_SIMILARITY_LIMIT
}

impl Config {
    /// Valid lifetime of auth token cookies in seconds.
    pub fn auth_ttl(&self) -> Duration {
        Duration::seconds(self.auth_ttl.into())
    }

    /// Secret key used to verify session JWTs.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Members sharing fewer answered questions than this are left out of
    /// similarity rankings.
    pub fn similarity_min_common_questions(&self) -> usize {
        self.similarity_min_common_questions
    }

    /// How many ranked members the similarity endpoint returns by default.
    pub fn similarity_limit(&self) -> usize {
        self.similarity_limit
    }

    /// Percentages reported for a question nobody has answered yet.
    pub fn zero_response_policy(&self) -> ZeroResponsePolicy {
        self.zero_response_policy
    }
}

/// A fairing that loads the application config and puts it in managed state.
/// This could easily be achieved using `AdHoc::config`, but is written out
/// explicitly for symmetry with the other fairings and control over error
/// messages.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        debug!(
            "Similarity needs {} common questions, zero-response policy is {:?}",
            config.similarity_min_common_questions, config.zero_response_policy
        );

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the database.
#[derive(Deserialize)]
struct DbConfig {
    // secrets
    db_uri: String,
}

/// A fairing that loads the MongoDB config, connects to the database,
/// ensures the indexes exist, and places both a `Client` and a `Database`
/// into managed state.
pub struct DatabaseFairing;

#[rocket::async_trait]
impl Fairing for DatabaseFairing {
    fn info(&self) -> Info {
        Info {
            name: "MongoDB",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<DbConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load database config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };
        info!("Loaded database config, connecting...");
        // Construct the connection.
        let client = match MongoClient::with_uri_str(config.db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(DATABASE);

        // Ensure the required indexes exist.
        if let Err(e) = ensure_indexes_exist(&db).await {
            error!("Failed to connect to database: {e}");
            return Err(rocket);
        }
        info!("...database connection online!");

        // Manage the state.
        rocket = rocket.manage(client).manage(db);
        Ok(rocket)
    }
}

/// Name of the production database.
const DATABASE: &str = "balance";

#[cfg(test)]
mod tests {
    use rocket::figment::{providers::Serialized, Figment};

    use super::*;

    #[test]
    fn optional_settings_fall_back_to_defaults() {
        let figment = Figment::from(Serialized::defaults(rocket::serde::json::json!({
            "auth_ttl": 3600,
            "jwt_secret": "secret",
        })));
        let config = figment.extract::<Config>().unwrap();

        assert_eq!(config.auth_ttl(), Duration::seconds(3600));
        assert_eq!(config.jwt_secret(), b"secret");
        assert_eq!(
            config.similarity_min_common_questions(),
            DEFAULT_MIN_COMMON_QUESTIONS
        );
        assert_eq!(config.similarity_limit(), DEFAULT_SIMILARITY_LIMIT);
        assert_eq!(config.zero_response_policy(), ZeroResponsePolicy::Zero);
    }

    #[test]
    fn even_split_policy_can_be_configured() {
        let figment = Figment::from(Serialized::defaults(rocket::serde::json::json!({
            "auth_ttl": 60,
            "jwt_secret": "secret",
            "zero_response_policy": "even-split",
            "similarity_limit": 3,
        })));
        let config = figment.extract::<Config>().unwrap();

        assert_eq!(config.zero_response_policy(), ZeroResponsePolicy::EvenSplit);
        assert_eq!(config.similarity_limit(), 3);
    }
}

use chrono::{serde::ts_seconds, DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation};
use mongodb::Database;
use rocket::{
    http::{Cookie, SameSite, Status},
    request::{FromRequest, Outcome},
    time::Duration,
    Request, State,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::model::{
    api::id::ApiId,
    db::Member,
    mongodb::{Coll, Id},
};

pub const AUTH_TOKEN_COOKIE: &str = "auth_token";

/// A session token naming a signed-in member.
///
/// Sessions are issued by the sign-in service; this service only verifies
/// them. A token is accepted only while its member exists and is active.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthToken {
    #[serde(rename = "sub")]
    member_id: ApiId,
}

impl AuthToken {
    pub fn new(member_id: Id) -> Self {
        Self {
            member_id: member_id.into(),
        }
    }

    /// The signed-in member.
    pub fn member_id(&self) -> Id {
        *self.member_id
    }

    #[allow(clippy::missing_panics_doc)]
    /// Serialize this token into a cookie, in the form the sign-in service issues.
    pub fn into_cookie(self, config: &Config) -> Cookie<'static> {
        let claims = Claims {
            token: self,
            expire_at: Utc::now() + config.auth_ttl(),
        };

        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
        .expect("JWT encoding is infallible with default settings");

        Cookie::build(AUTH_TOKEN_COOKIE, token)
            .max_age(Duration::seconds(config.auth_ttl().num_seconds()))
            .http_only(true)
            .same_site(SameSite::Strict)
            .finish()
    }

    /// Deserialize and verify a token from a cookie.
    pub fn from_cookie(cookie: &Cookie<'static>, config: &Config) -> Result<Self, Error> {
        let token = jsonwebtoken::decode(
            cookie.value(),
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::default(),
        )
        .map(|claims: TokenData<Claims>| claims.claims.token)?;
        Ok(token)
    }
}

/// Cookie claims: the token itself plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    token: AuthToken,
    #[serde(rename = "exp", with = "ts_seconds")]
    expire_at: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthToken {
    type Error = Error;

    /// Get an [`AuthToken`] from the cookie and check that its member may be signed in.
    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        // Unwrap is safe as `Config` is always managed.
        let config = req.guard::<&State<Config>>().await.unwrap();

        let Some(cookie) = req.cookies().get(AUTH_TOKEN_COOKIE) else {
            return Outcome::Failure((Status::Unauthorized, Error::AuthRequired));
        };

        let token = match Self::from_cookie(cookie, config) {
            Ok(token) => token,
            Err(e) => {
                debug!("Rejected session token: {e}");
                return Outcome::Failure((Status::Unauthorized, e));
            }
        };

        // Check the member actually exists and is active.
        let db = req.guard::<&State<Database>>().await.unwrap();
        let member = Coll::<Member>::from_db(db)
            .find_one(token.member_id().as_doc(), None)
            .await;
        match member {
            Ok(Some(member)) if member.status.is_normal() => Outcome::Success(token),
            Ok(_) => Outcome::Failure((Status::Unauthorized, Error::AuthRequired)),
            Err(e) => Outcome::Failure((Status::InternalServerError, e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use rocket::figment::{providers::Serialized, Figment};

    use super::*;

    fn config(secret: &str) -> Config {
        Figment::from(Serialized::defaults(rocket::serde::json::json!({
            "auth_ttl": 600,
            "jwt_secret": secret,
        })))
        .extract()
        .unwrap()
    }

    #[test]
    fn cookie_round_trip() {
        let config = config("secret");
        let member = Id::new();

        let cookie = AuthToken::new(member).into_cookie(&config);
        let token = AuthToken::from_cookie(&cookie, &config).unwrap();

        assert_eq!(cookie.name(), AUTH_TOKEN_COOKIE);
        assert_eq!(token.member_id(), member);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let cookie = AuthToken::new(Id::new()).into_cookie(&config("secret"));

        let result = AuthToken::from_cookie(&cookie, &config("other"));

        assert!(matches!(result, Err(Error::Jwt(_))));
    }
}

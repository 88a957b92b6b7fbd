use rocket::{http::Status, serde::json::Json, Catcher, Request, Route};

use crate::error::{ErrorBody, INTERNAL_MESSAGE};

mod common;
mod compare;
mod group_responses;
mod question_stats;
mod similarity;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(compare::routes());
    routes.extend(similarity::routes());
    routes.extend(group_responses::routes());
    routes.extend(question_stats::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![default_catcher]
}

/// Report failures that never reached a handler (guard failures, unknown
/// routes, malformed IDs) with the same body as handler errors.
#[catch(default)]
fn default_catcher(status: Status, _req: &Request) -> (Status, Json<ErrorBody>) {
    let message = match status.code {
        401 => "Authentication required",
        500..=599 => INTERNAL_MESSAGE,
        _ => status.reason().unwrap_or("Request failed"),
    };
    (status, Json(ErrorBody::new(message)))
}

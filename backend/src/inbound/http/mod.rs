//! HTTP inbound adapter exposing the link and session endpoints.

pub mod error;
pub mod health;
pub mod links;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

use actix_web::web;

pub use crate::domain::ApiResult;

/// Largest accepted JSON body. A full list at the link cap fits well inside.
pub const JSON_BODY_LIMIT: usize = 256 * 1024;

/// JSON extractor settings that report malformed bodies as domain errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(|err, _req| validation::malformed_body_error(err).into())
}

/// Register every `/api/v1` endpoint on `cfg`.
///
/// `users/me/links` is registered ahead of `users/{user_id}/links` so the
/// literal path wins.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .app_data(json_config())
            .service(users::login)
            .service(users::logout)
            .service(links::get_my_links)
            .service(links::save_my_links)
            .service(links::get_public_links),
    );
}

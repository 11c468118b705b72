//! HTTP inbound adapter exposing REST endpoints.
//!
//! Handlers translate requests into calls on the domain ports held in
//! [`state::HttpState`] and map domain errors to status codes in [`error`].

pub mod auth;
pub mod cache_control;
pub mod error;
pub mod health;
pub mod media;
pub mod profile;
pub mod properties;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint on a scope.
///
/// The caller supplies the session middleware and the shared
/// [`state::HttpState`].
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use listings::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(media::upload_payload_config())
        .service(profile::current_profile)
        .service(profile::establish_session)
        .service(profile::clear_session)
        .service(properties::list_properties)
        .service(properties::create_property)
        .service(properties::property_history)
        .service(properties::change_property_status)
        .service(properties::get_property)
        .service(media::upload_media)
        .service(media::delete_media);
}

// HTTP request handlers for session resolution
pub mod health;
pub mod login;
pub mod session;


use actix_web::http::Method;
use actix_web::web;

pub use health::health;
pub use login::{login, login_options};
pub use session::resolve_session;

/// Register every route; `login_path` is the configured login endpoint
///
/// Requests to the login path other than `POST` and `OPTIONS`, and requests to
/// any other path except `/ping`, go through identity resolution.
pub fn configure_services(cfg: &mut web::ServiceConfig, login_path: &str) {
    cfg.route("/ping", web::get().to(health))
        .service(
            web::resource(login_path)
                .route(web::post().to(login))
                .route(web::method(Method::OPTIONS).to(login_options))
                .default_service(web::to(resolve_session)),
        )
        .default_service(web::to(resolve_session));
}

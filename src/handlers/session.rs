// Identity resolution for every path without a dedicated handler
use actix_web::http::Method;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse};

use crate::models::{AccountResponse, AuthOutcome};
use crate::session::{ActixInboundRequest, SessionResolver};
use crate::utils::ResponseBuilder;

/// Resolve the caller's account or send it to the sign-in page
///
/// Authenticated requests get `200` with `{"accountId": ...}`; anonymous ones
/// get a `302` to the appliance login page. The payload is only buffered for
/// a `POST` to the login path, the one case where the body can carry a
/// session id.
pub async fn resolve_session(
    req: HttpRequest,
    payload: web::Payload,
    resolver: web::Data<SessionResolver>,
) -> HttpResponse {
    let wants_body = req.method() == Method::POST
        && resolver.is_login_request(&ActixInboundRequest::without_body(&req));
    let body = if wants_body {
        match web::Bytes::from_request(&req, &mut payload.into_inner()).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::debug!("Unable to read login request body: {e}");
                None
            }
        }
    } else {
        None
    };
    let request = match &body {
        Some(bytes) => ActixInboundRequest::new(&req, bytes),
        None => ActixInboundRequest::without_body(&req),
    };

    match resolver.resolve(&request) {
        AuthOutcome::Authenticated(account_id) => {
            ResponseBuilder::ok_json(&AccountResponse { account_id })
        }
        AuthOutcome::Anonymous => resolver.must_authenticate_response(&request),
    }
}

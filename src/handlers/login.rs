// Login submission and its CORS preflight
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::session::{ActixInboundRequest, InboundRequest, LoginOutcome, SessionResolver};
use crate::utils::ResponseBuilder;

/// Accept a client-presented session id and hand back the session cookie
///
/// `202 Accepted` with CORS headers and `Set-Cookie` when the session is
/// known, `401 Unauthorized` with an empty body otherwise.
pub async fn login(
    req: HttpRequest,
    body: web::Bytes,
    resolver: web::Data<SessionResolver>,
) -> HttpResponse {
    let request = ActixInboundRequest::new(&req, &body);

    match resolver.login(&request) {
        LoginOutcome::Accepted {
            account_id,
            set_cookie,
        } => {
            log::info!("Login accepted for account {account_id}");
            let mut builder = HttpResponse::Accepted();
            ResponseBuilder::with_login_cors(&mut builder, request.header("Origin"))
                .insert_header((header::SET_COOKIE, set_cookie))
                .finish()
        }
        LoginOutcome::Rejected => HttpResponse::Unauthorized().finish(),
    }
}

/// CORS preflight for the login endpoint
pub async fn login_options(req: HttpRequest) -> HttpResponse {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok());
    let mut builder = HttpResponse::Ok();
    ResponseBuilder::with_login_cors(&mut builder, origin).finish()
}

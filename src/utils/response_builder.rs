use actix_web::http::header;
use actix_web::{HttpResponse, HttpResponseBuilder};
use serde::Serialize;

/// Methods accepted by the login endpoint
pub const LOGIN_ALLOWED_METHODS: &str = "POST,OPTIONS";
/// Request headers a browser may send to the login endpoint
pub const LOGIN_ALLOWED_HEADERS: &str = "Content-Type, Accept";

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// `302 Found` to `location`
    #[must_use]
    pub fn redirect(location: &str) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, location))
            .finish()
    }

    /// `200 OK` with a JSON body
    #[must_use]
    pub fn ok_json<T: Serialize>(body: &T) -> HttpResponse {
        HttpResponse::Ok().json(body)
    }

    /// Add the credentialed CORS headers used by the login endpoint
    ///
    /// The allowed origin echoes the request's `Origin`; without one the header
    /// is left out.
    pub fn with_login_cors<'a>(
        builder: &'a mut HttpResponseBuilder,
        origin: Option<&str>,
    ) -> &'a mut HttpResponseBuilder {
        builder
            .insert_header((header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"))
            .insert_header((header::ACCESS_CONTROL_ALLOW_METHODS, LOGIN_ALLOWED_METHODS))
            .insert_header((header::ACCESS_CONTROL_ALLOW_HEADERS, LOGIN_ALLOWED_HEADERS));
        if let Some(origin) = origin {
            builder.insert_header((header::ACCESS_CONTROL_ALLOW_ORIGIN, origin));
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    fn header_value<'a>(response: &'a HttpResponse, name: &str) -> Option<&'a str> {
        response.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_redirect() {
        let response = ResponseBuilder::redirect("https://krista.example.com/login");
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            header_value(&response, "location"),
            Some("https://krista.example.com/login")
        );
    }

    #[test]
    fn test_login_cors_headers() {
        let mut builder = HttpResponse::Ok();
        let response =
            ResponseBuilder::with_login_cors(&mut builder, Some("https://app.example.com"))
                .finish();
        assert_eq!(
            header_value(&response, "access-control-allow-origin"),
            Some("https://app.example.com")
        );
        assert_eq!(
            header_value(&response, "access-control-allow-credentials"),
            Some("true")
        );
        assert_eq!(
            header_value(&response, "access-control-allow-methods"),
            Some(LOGIN_ALLOWED_METHODS)
        );

        let mut builder = HttpResponse::Ok();
        let response = ResponseBuilder::with_login_cors(&mut builder, None).finish();
        assert!(header_value(&response, "access-control-allow-origin").is_none());
    }
}

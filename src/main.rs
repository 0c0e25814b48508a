#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::{anyhow, Context};
use krista_authn::{
    authentication::AuthenticationServiceFactory, handlers::configure_services,
    settings::AuthnSettings,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings =
        AuthnSettings::load().map_err(|e| anyhow!("Failed to load settings: {e}"))?;
    settings
        .validate()
        .map_err(|e| anyhow!("Invalid settings: {e}"))?;

    start_server(settings)
        .await
        .context("HTTP server terminated")
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(settings: AuthnSettings) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    let resolver = web::Data::new(AuthenticationServiceFactory::create_resolver(&settings));
    let login_path = settings.session.login_path.clone();

    HttpServer::new(move || {
        let login_path = login_path.clone();
        App::new()
            .app_data(resolver.clone())
            .wrap(Logger::default())
            .configure(move |cfg| configure_services(cfg, &login_path))
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, settings: &AuthnSettings) {
    let login_path = &settings.session.login_path;
    println!("Starting Krista session resolver on http://{bind_address}");
    println!("Appliance base URL: {}", settings.routing.appliance_base_url);
    println!("Supported domains: {}", settings.policy.supported_domains);
    println!();
    println!("Endpoints:");
    println!("  POST    {login_path} - Login submission, sets the session cookie");
    println!("  OPTIONS {login_path} - CORS preflight for the login submission");
    println!("  GET     /ping - Health check");
    println!("  ANY     {{any other path}} - Resolve account or redirect to sign-in");
}

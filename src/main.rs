mod config;
mod error;
mod model;
mod web;

use actix_web::{middleware::Logger, web::Data, App, HttpServer};
use dotenv::dotenv;
use log::{info, warn};

use config::RelayConfig;
use model::OpenAiModel;
use web::routes;

// App state structure
pub struct AppState {
    config: RelayConfig,
    model: OpenAiModel,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting chat relay");

    let config = RelayConfig::from_env();
    if config.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; every request will be answered with 500");
    }
    info!("Relaying to model: {}", config.model);

    let model = OpenAiModel::new(&config)?;
    let bind_addr = (config.host.clone(), config.port);

    let app_state = Data::new(AppState { config, model });

    info!("Listening on {}:{}", bind_addr.0, bind_addr.1);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .configure(routes::configure)
    })
    .bind(bind_addr)?
    .run()
    .await?;

    Ok(())
}

use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenvy::dotenv;
use log::info;
use std::sync::Arc;

use sika_api::{app, middleware};
use sika_infra::database;
use sika_infra::gateway::arkesel::{ArkeselConfig, ArkeselGateway};
use sika_infra::{MySqlAccountRepository, MySqlMessageRepository};
use sika_shared::config::{BillingConfig, DatabaseConfig, GatewayConfig, ServerConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting SikaSMS API Server");

    // Load configuration
    let server_config = ServerConfig::from_env();
    let database_config = DatabaseConfig::from_env();
    let billing_config = BillingConfig::from_env();
    let gateway_config = GatewayConfig::from_env().expect("gateway configuration must be set");

    // Wire infrastructure
    let pool = database::create_pool(&database_config)
        .await
        .expect("database connection must succeed");
    let accounts = Arc::new(MySqlAccountRepository::new(pool.clone()));
    let messages = Arc::new(MySqlMessageRepository::new(pool));
    let gateway = Arc::new(
        ArkeselGateway::new(ArkeselConfig::from(&gateway_config))
            .expect("gateway client must build"),
    );

    let state = web::Data::new(app::AppState::new(
        accounts,
        messages,
        gateway,
        billing_config,
        gateway_config.callback_url.clone(),
    ));

    let bind_address = server_config.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(middleware::cors::create_cors())
            .app_data(state.clone())
            .configure(
                app::configure::<MySqlAccountRepository, MySqlMessageRepository, ArkeselGateway>,
            )
    })
    .bind(&bind_address)?
    .run()
    .await
}

use animal_registry::{api::{state::AppState, views::Views}, infrastructure::database::sqlite_context::SqliteContext, routes::{admin_routes, public_routes}, utils::config::AppConfig};
use actix_web::{middleware, web, App, HttpServer};

#[tokio::main]
async fn main() -> std::io::Result<()> {

    let config = AppConfig::global();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.log_filter())).init();

    let sqlite_context = match SqliteContext::init(&config.database, config.request_timeout) {
        Ok(context) => {
            log::info!("Database ready at {}", context.path().display());
            context
        },
        Err(e) => {
            log::error!("Failed to initialize the SQLite database: {}", e);
            std::process::exit(1);
        }
    };

    let views = match Views::new() {
        Ok(views) => views,
        Err(e) => {
            log::error!("Failed to compile templates: {:#}", e);
            std::process::exit(1);
        }
    };

    let app_state = AppState::new(sqlite_context, views, config);

    log::info!("Server running at http://{}", config.bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(app_state.clone()))
            .configure(public_routes)
            .configure(admin_routes)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}

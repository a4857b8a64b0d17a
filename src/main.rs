use std::{process, sync::Arc};

use telaio::{
    application::{
        access::AdminAccess,
        catalog::{
            categories::CategoryService, products::ProductService, templates::TemplateService,
        },
        error::AppError,
        media::MediaStore,
        repos::{
            CategoriesRepo, CategoriesWriteRepo, ProductsRepo, ProductsWriteRepo, TemplatesRepo,
            TemplatesWriteRepo,
        },
    },
    cache::CatalogCache,
    config,
    infra::{
        cache::RedisCacheStore,
        db::PostgresCatalog,
        error::InfraError,
        http::{self, ApiState},
        media::HttpMediaStore,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let catalog = Arc::new(init_catalog(&settings).await?);
    let cache = build_cache(&settings).await;

    let categories_repo: Arc<dyn CategoriesRepo> = catalog.clone();
    let categories_write_repo: Arc<dyn CategoriesWriteRepo> = catalog.clone();
    let products_repo: Arc<dyn ProductsRepo> = catalog.clone();
    let products_write_repo: Arc<dyn ProductsWriteRepo> = catalog.clone();
    let templates_repo: Arc<dyn TemplatesRepo> = catalog.clone();
    let templates_write_repo: Arc<dyn TemplatesWriteRepo> = catalog.clone();

    let media: Arc<dyn MediaStore> = Arc::new(HttpMediaStore::new(&settings.media)?);
    let access = Arc::new(AdminAccess::new(
        settings.admin.api_key.clone(),
        settings.admin.username.clone(),
        settings.admin.password.clone(),
    ));

    let categories = Arc::new(CategoryService::new(
        categories_repo,
        categories_write_repo,
        cache.clone(),
    ));
    let products = Arc::new(ProductService::new(
        products_repo,
        products_write_repo,
        media,
        cache.clone(),
    ));
    let templates = Arc::new(TemplateService::new(
        templates_repo,
        templates_write_repo,
    ));

    let state = ApiState {
        categories,
        products,
        templates,
        access,
        upload_body_limit: settings.media.body_limit(),
    };

    serve_http(&settings, state).await
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let database_url = require_database_url(&settings)?;

    let pool = PostgresCatalog::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err)))?;

    PostgresCatalog::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err)))?;

    info!(target = "telaio::migrate", "migrations applied");
    Ok(())
}

async fn init_catalog(settings: &config::Settings) -> Result<PostgresCatalog, AppError> {
    let database_url = require_database_url(settings)?;

    let pool = PostgresCatalog::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err)))?;

    PostgresCatalog::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err)))?;

    Ok(PostgresCatalog::new(pool))
}

fn require_database_url(settings: &config::Settings) -> Result<&str, AppError> {
    settings
        .database
        .url
        .as_deref()
        .ok_or_else(|| AppError::from(InfraError::configuration("database url is not configured")))
}

/// Connect the cache backend, degrading to a disabled cache when no URL is
/// configured or the backend is unreachable at startup.
async fn build_cache(settings: &config::Settings) -> CatalogCache {
    let Some(url) = settings.cache.url.as_deref() else {
        warn!(
            target = "telaio::cache",
            "cache url is not configured; reads go straight to the database"
        );
        return CatalogCache::disabled();
    };

    match RedisCacheStore::connect(url).await {
        Ok(store) => CatalogCache::new(Arc::new(store), settings.cache.ttl),
        Err(err) => {
            warn!(
                target = "telaio::cache",
                error = %err,
                "cache backend unreachable at startup; running without it"
            );
            CatalogCache::disabled()
        }
    }
}

async fn serve_http(settings: &config::Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(target = "telaio::server", addr = %settings.server.addr, "listening");

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    Ok(())
}

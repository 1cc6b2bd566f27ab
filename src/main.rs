use std::{future::IntoFuture, process, sync::Arc};

use polyfaq::{
    application::{
        error::AppError,
        faqs::FaqService,
        translation::{TranslationService, Translator},
    },
    cache::{CacheBackend, CacheConfig, CacheStore, MemoryStore, NullStore, RedisStore},
    config::{self, Settings, TranslationProvider},
    infra::{
        connection::{
            BackoffPolicy, ConnectionMonitor, ConnectionState, ConnectionSupervisor,
            connect_with_backoff,
        },
        db::PostgresRepositories,
        error::InfraError,
        http::{self, ApiState, HealthState},
        telemetry,
        translation::{GoogleTranslator, PassthroughTranslator},
    },
};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
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
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_migrate(settings: Settings) -> Result<(), AppError> {
    let database_url = database_url(&settings)?;
    let pool = PostgresRepositories::connect(database_url, 1, settings.database.acquire_timeout)
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;

    info!(target = "polyfaq::migrate", "migrations applied");
    Ok(())
}

async fn run_serve(settings: Settings) -> Result<(), AppError> {
    let policy = BackoffPolicy::from(&settings.connection);
    let repositories = init_repositories(&settings, &policy).await?;
    let cache_config = CacheConfig::from(&settings.cache);
    let cache = init_cache(&cache_config, &policy).await;
    let translator = init_translator(&settings)?;

    let faqs = FaqService::new(
        repositories.clone(),
        repositories.clone(),
        cache.store,
        TranslationService::new(translator),
        cache_config.ttl,
    );

    let (database_monitor, database_task) = ConnectionSupervisor::new(
        "database",
        repositories,
        policy.clone(),
        settings.connection.probe_interval,
    )
    .spawn();

    let mut supervisors = vec![database_task];
    let cache_monitor = match cache.redis {
        Some(redis) => {
            let (monitor, task) = ConnectionSupervisor::new(
                "cache",
                redis,
                policy,
                settings.connection.probe_interval,
            )
            .spawn();
            supervisors.push(task);
            Some(monitor)
        }
        None => cache.fixed_state.map(|state| ConnectionMonitor::fixed("cache", state)),
    };

    info!(
        target = "polyfaq::bootstrap",
        cache_backend = faqs.cache_backend(),
        translation = ?settings.translation.provider,
        "services ready"
    );

    let state = ApiState {
        faqs: Arc::new(faqs),
        health: HealthState {
            database: database_monitor,
            cache: cache_monitor,
        },
    };

    let result = serve_http(&settings, state).await;

    for task in supervisors {
        task.abort();
        let _ = task.await;
    }

    result
}

fn database_url(settings: &Settings) -> Result<&str, AppError> {
    settings.database.url.as_deref().ok_or_else(|| {
        AppError::validation(
            "database url is required (provide --database-url or set POLYFAQ__DATABASE__URL)",
        )
    })
}

async fn init_repositories(
    settings: &Settings,
    policy: &BackoffPolicy,
) -> Result<Arc<PostgresRepositories>, AppError> {
    let database_url = database_url(settings)?;

    let pool = connect_with_backoff("database", policy, || {
        PostgresRepositories::connect(
            database_url,
            settings.database.max_connections.get(),
            settings.database.acquire_timeout,
        )
    })
    .await
    .map_err(|err| InfraError::database(err.to_string()))?;

    PostgresRepositories::run_migrations(&pool)
        .await
        .map_err(|err| InfraError::database(err.to_string()))?;

    Ok(Arc::new(PostgresRepositories::new(pool)))
}

struct CacheHandles {
    store: Arc<dyn CacheStore>,
    /// Present when the Redis backend connected and needs supervision.
    redis: Option<Arc<RedisStore>>,
    /// State reported for backends that are not supervised; `None` when disabled.
    fixed_state: Option<ConnectionState>,
}

async fn init_cache(config: &CacheConfig, policy: &BackoffPolicy) -> CacheHandles {
    match config.backend {
        CacheBackend::Disabled => CacheHandles {
            store: Arc::new(NullStore),
            redis: None,
            fixed_state: None,
        },
        CacheBackend::Memory => CacheHandles {
            store: Arc::new(MemoryStore::new(config)),
            redis: None,
            fixed_state: Some(ConnectionState::Connected),
        },
        CacheBackend::Redis => {
            let url = config.redis_url.as_deref().unwrap_or_default();
            match connect_with_backoff("cache", policy, || RedisStore::connect(url)).await {
                Ok(store) => {
                    let store = Arc::new(store);
                    CacheHandles {
                        store: store.clone(),
                        redis: Some(store),
                        fixed_state: None,
                    }
                }
                Err(err) => {
                    warn!(
                        target = "polyfaq::bootstrap",
                        error = %err,
                        "redis unreachable, serving without a cache"
                    );
                    CacheHandles {
                        store: Arc::new(NullStore),
                        redis: None,
                        fixed_state: Some(ConnectionState::Failed),
                    }
                }
            }
        }
    }
}

fn init_translator(settings: &Settings) -> Result<Arc<dyn Translator>, AppError> {
    let translator: Arc<dyn Translator> = match settings.translation.provider {
        TranslationProvider::Google => Arc::new(GoogleTranslator::new(&settings.translation)?),
        TranslationProvider::Disabled => Arc::new(PassthroughTranslator),
    };
    Ok(translator)
}

async fn serve_http(settings: &Settings, state: ApiState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(InfraError::from)?;
    info!(
        target = "polyfaq::bootstrap",
        addr = %settings.server.addr,
        "listening"
    );

    let shutdown = Arc::new(Notify::new());
    let trigger = shutdown.clone();
    let mut server: JoinHandle<std::io::Result<()>> = tokio::spawn(
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                trigger.notify_one();
            })
            .into_future(),
    );

    let grace = settings.server.graceful_shutdown;
    tokio::select! {
        joined = &mut server => {
            joined
                .map_err(|err| AppError::unexpected(format!("server task failed: {err}")))?
                .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;
        }
        _ = async {
            shutdown.notified().await;
            tokio::time::sleep(grace).await;
        } => {
            warn!(
                target = "polyfaq::bootstrap",
                grace_seconds = grace.as_secs(),
                "graceful shutdown timed out, aborting open connections"
            );
            server.abort();
        }
    }

    info!(target = "polyfaq::bootstrap", "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!(target = "polyfaq::bootstrap", "shutdown signal received");
}

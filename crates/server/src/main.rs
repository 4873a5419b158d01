//! Reelboard server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use apalis::prelude::*;
use axum::{Router, middleware};
use reelboard_api::{middleware::AppState, router as api_router};
use reelboard_common::Config;
use reelboard_core::{
    AccountService, CategoryService, EmailService, FavoriteService, LikeService, NotifyService,
    PostService, ReviewService,
};
use reelboard_db::repositories::{
    CategoryRepository, FavoriteRepository, LikeRepository, PostImageRepository, PostRepository,
    PostVideoRepository, ReviewRepository, UserRepository,
};
use reelboard_queue::workers::{NotifyContext, notify_worker};
use reelboard_queue::{NotifyNewPostJob, RedisNotifyService};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reelboard=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting reelboard server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = reelboard_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    reelboard_db::migrate(&db).await?;
    info!("Migrations completed");

    // Connect to Redis and initialize job queue
    info!("Connecting to Redis...");
    let redis_client =
        redis::Client::open(config.redis.url.as_str()).expect("Failed to create Redis client");
    let redis_conn = redis::aio::ConnectionManager::new(redis_client)
        .await
        .expect("Failed to connect to Redis");
    let redis_storage = apalis_redis::RedisStorage::<NotifyNewPostJob>::new(redis_conn);
    info!("Connected to Redis job queue");

    // Create the new-post notification service
    let notify_service: NotifyService = Arc::new(RedisNotifyService::new(redis_storage.clone()));

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let category_repo = CategoryRepository::new(Arc::clone(&db));
    let post_repo = PostRepository::new(Arc::clone(&db));
    let image_repo = PostImageRepository::new(Arc::clone(&db));
    let video_repo = PostVideoRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let favorite_repo = FavoriteRepository::new(Arc::clone(&db));
    let like_repo = LikeRepository::new(Arc::clone(&db));

    // Initialize services
    let email_service = EmailService::new(&config.site.name, config.email.as_ref())?;

    let account_service = AccountService::new(user_repo.clone(), email_service.clone());

    let post_service = PostService::new(
        post_repo.clone(),
        image_repo,
        video_repo,
        review_repo.clone(),
        favorite_repo.clone(),
        like_repo.clone(),
        category_repo.clone(),
        user_repo.clone(),
        notify_service,
    );

    let review_service = ReviewService::new(review_repo, post_repo.clone());
    let category_service = CategoryService::new(category_repo);
    let favorite_service = FavoriteService::new(favorite_repo, post_repo.clone());
    let like_service = LikeService::new(like_repo, post_repo.clone());

    // Create app state
    let state = AppState {
        account_service,
        post_service,
        review_service,
        category_service,
        favorite_service,
        like_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api/v1", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            reelboard_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start the notification worker
    info!("Starting notification worker...");
    let notify_ctx = NotifyContext::new(post_repo, user_repo, email_service);

    tokio::spawn(async move {
        let monitor = Monitor::new().register({
            WorkerBuilder::new("notify")
                .data(notify_ctx)
                .backend(redis_storage)
                .build_fn(notify_worker)
        });

        if let Err(e) = monitor.run().await {
            tracing::error!(error = %e, "Notification worker failed");
        }
    });
    info!("Notification worker started");

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use laptop_catalog::auth::{AuthInterceptor, JwtManager, User};
use laptop_catalog::proto::auth_service_server::AuthServiceServer;
use laptop_catalog::proto::laptop_service_server::LaptopServiceServer;
use laptop_catalog::service::{CatalogService, LoginService};
use laptop_catalog::store::{DiskImageStore, LaptopStore, RatingStore, UserStore};
use tokio::signal;
use tonic::transport::Server;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Laptop catalog gRPC server", long_about = None)]
#[command(version)]
struct Args {
    /// Host to bind to
    #[arg(short = 'H', long, env = "SERVER_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "SERVER_PORT", default_value = "8080")]
    port: u16,

    /// Secret used to sign access tokens
    #[arg(long, env = "TOKEN_SECRET", default_value = "secret")]
    token_secret: String,

    /// Access token lifetime in seconds
    #[arg(long, env = "TOKEN_DURATION_SECS", default_value = "900")]
    token_duration_secs: u64,

    /// Directory where uploaded images are written
    #[arg(long, env = "IMAGE_FOLDER", default_value = "img")]
    image_folder: String,
}

async fn seed_users(user_store: &UserStore) -> laptop_catalog::Result<()> {
    for (username, password, role) in [
        ("admin", "admin", "admin"),
        ("user1", "password", "user"),
    ] {
        let user = User::new(username, password, role)?;
        user_store.save(&user).await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let user_store = UserStore::new();
    seed_users(&user_store).await?;

    let jwt_manager = Arc::new(JwtManager::new(
        args.token_secret,
        Duration::from_secs(args.token_duration_secs),
    ));
    let login_service = LoginService::new(user_store, jwt_manager.clone());

    std::fs::create_dir_all(&args.image_folder)?;
    let interceptor = Arc::new(AuthInterceptor::new(
        jwt_manager,
        AuthInterceptor::default_access_roles(),
    ));
    let catalog_service = CatalogService::new(
        LaptopStore::new(),
        DiskImageStore::new(&args.image_folder),
        RatingStore::new(),
        interceptor,
    );

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<LaptopServiceServer<CatalogService>>()
        .await;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!(%addr, image_folder = %args.image_folder, "starting laptop catalog server");

    Server::builder()
        .add_service(health_service)
        .add_service(AuthServiceServer::new(login_service))
        .add_service(LaptopServiceServer::new(catalog_service))
        .serve_with_shutdown(addr, shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Initiating graceful shutdown (allowing in-flight requests to complete)");
}

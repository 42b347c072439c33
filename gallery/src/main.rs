use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use gallery::{
    notifications::ToastBoard,
    server,
    sync::GallerySync,
    types::Environment,
};
use gallery_storage::S3ObjectStore;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(environment.tracing_level()).into())
        .from_env_lossy();

    // JSON logs for staging/production, human-readable logs for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt().json().with_env_filter(filter).init();
        }
        Environment::Development { .. } => {
            fmt().with_env_filter(filter).init();
        }
    }

    let settings = environment.store_settings();
    info!("Object store settings: {settings:?}");

    let s3_client = Arc::new(S3Client::from_conf(
        environment.s3_client_config(&settings).await,
    ));
    let store = Arc::new(S3ObjectStore::new(
        s3_client,
        settings.bucket_name,
        settings.region,
        environment.listing_mode(),
    ));

    let toasts = Arc::new(ToastBoard::new(environment.toast_duration()));
    let gallery = Arc::new(GallerySync::new(
        store,
        toasts.clone(),
        environment.listing_policy(),
    ));

    // initial load; a failure is already reported as a notification
    gallery.refresh().await;

    server::start(environment, gallery, toasts).await
}

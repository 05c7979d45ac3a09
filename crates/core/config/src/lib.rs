use std::time::Duration;

use cached::proc_macro::cached;
use config::{Config, Environment, File, FileFormat};
use futures_locks::RwLock;
use once_cell::sync::Lazy;
use serde::Deserialize;

static CONFIG_BUILDER: Lazy<RwLock<Config>> = Lazy::new(|| {
    RwLock::new({
        let mut builder = Config::builder().add_source(File::from_str(
            include_str!("../CampusFix.toml"),
            FileFormat::Toml,
        ));

        if std::path::Path::new("CampusFix.toml").exists() {
            builder = builder.add_source(File::new("CampusFix.toml", FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix("CAMPUSFIX")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build().expect("configuration sources should be readable")
    })
});

#[derive(Deserialize, Debug, Clone)]
pub struct Hosts {
    pub api: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Api {
    pub request_timeout: u64,
    pub connect_timeout: u64,
}

impl Api {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct FilesCompression {
    pub max_width: u32,
    pub max_height: u32,
    pub quality: f32,
    pub skip_below_bytes: usize,
    pub timeout: u64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Files {
    pub compression: FilesCompression,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Store {
    pub default_sort: String,
    pub refresh_timeout: u64,
}

impl Store {
    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.refresh_timeout)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct Sentry {
    pub client: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub hosts: Hosts,
    pub api: Api,
    pub files: Files,
    pub store: Store,
    pub sentry: Sentry,
}

pub async fn init() {
    log::info!(":: CampusFix Configuration ::\n{:?}", config().await);
}

pub async fn read() -> Config {
    CONFIG_BUILDER.read().await.clone()
}

#[cached(time = 30)]
pub async fn config() -> Settings {
    read()
        .await
        .try_deserialize::<Settings>()
        .expect("configuration should match the settings schema")
}

/// Configure logging and common Rust variables
pub async fn setup_logging(release: &'static str, dsn: String) -> Option<sentry::ClientInitGuard> {
    dotenv::dotenv().ok();

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }

    pretty_env_logger::init();
    log::info!("Starting {release}");

    if dsn.is_empty() {
        None
    } else {
        Some(sentry::init((
            dsn,
            sentry::ClientOptions {
                release: Some(release.into()),
                ..Default::default()
            },
        )))
    }
}

/// Log an error and forward it to Sentry (if configured)
pub fn capture_error<E: std::fmt::Debug + ?Sized>(error: &E) {
    log::error!("{error:?}");
    sentry::capture_message(&format!("{error:?}"), sentry::Level::Error);
}

#[macro_export]
macro_rules! configure {
    ($application: ident) => {
        let config = $crate::config().await;
        let _sentry = $crate::setup_logging(
            concat!(env!("CARGO_PKG_NAME"), "@", env!("CARGO_PKG_VERSION")),
            config.sentry.$application,
        )
        .await;
    };
}

#[macro_export]
macro_rules! report_internal_error {
    ( $expr: expr ) => {
        $expr
            .inspect_err(|err| {
                $crate::capture_error(err);
            })
            .map_err(|_| ::campusfix_result::create_error!(InternalError))
    };
}

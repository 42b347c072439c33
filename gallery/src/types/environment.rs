//! Environment configuration for different deployment stages

use std::env;
use std::fmt;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_credential_types::Credentials;
use gallery_storage::ListingMode;
use tracing::Level;

use crate::sync::ListingPolicy;

const LOCALSTACK_ENDPOINT: &str = "http://localhost:4566";
const DEFAULT_TOAST_DURATION_SECS: u64 = 5;

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack` unless overridden)
    Development {
        /// Optional S3 endpoint replacing `LocalStack`
        endpoint_override: Option<String>,
    },
}

/// Connection settings of the bucket
///
/// Nothing here is validated: a missing variable becomes an empty string and
/// only shows up as a failure of the first store call.
#[derive(Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Region of the bucket
    pub region: String,
    /// Access key id
    pub access_key_id: String,
    /// Secret access key
    pub secret_access_key: String,
    /// Bucket name
    pub bucket_name: String,
}

impl fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreSettings")
            .field("region", &self.region)
            .field("bucket_name", &self.bucket_name)
            .field("has_access_key_id", &!self.access_key_id.is_empty())
            .field("has_secret_access_key", &!self.secret_access_key.is_empty())
            .finish()
    }
}

fn flag(name: &str) -> bool {
    env::var(name)
        .map(|value| matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development {
                endpoint_override: env::var("S3_ENDPOINT_URL")
                    .ok()
                    .filter(|url| !url.trim().is_empty()),
            },
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Reads the bucket connection settings
    #[must_use]
    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            region: env::var("AWS_REGION").unwrap_or_default(),
            access_key_id: env::var("AWS_ACCESS_KEY_ID").unwrap_or_default(),
            secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").unwrap_or_default(),
            bucket_name: env::var("S3_BUCKET_NAME").unwrap_or_default(),
        }
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development { .. } | Self::Staging)
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            Self::Development { endpoint_override } => {
                Some(endpoint_override.as_deref().unwrap_or(LOCALSTACK_ENDPOINT))
            }
        }
    }

    /// AWS configuration with static credentials, no retries and a timeout
    pub async fn aws_config(&self, settings: &StoreSettings) -> aws_config::SdkConfig {
        let credentials = Credentials::from_keys(
            settings.access_key_id.clone(),
            settings.secret_access_key.clone(),
            None,
        );

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled())
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            loader = loader.endpoint_url(endpoint_url);
        }

        loader.load().await
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self, settings: &StoreSettings) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config(settings).await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development { .. }) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }

    /// How much of the bucket listing a refresh reads
    #[must_use]
    pub fn listing_mode(&self) -> ListingMode {
        if flag("GALLERY_LIST_ALL_PAGES") {
            ListingMode::AllPages
        } else {
            ListingMode::FirstPage
        }
    }

    /// What the gallery does with listings that land after newer changes
    #[must_use]
    pub fn listing_policy(&self) -> ListingPolicy {
        if flag("GALLERY_DISCARD_STALE_LISTINGS") {
            ListingPolicy::DiscardStale
        } else {
            ListingPolicy::LastWriterWins
        }
    }

    /// How long a notification stays visible
    #[must_use]
    pub fn toast_duration(&self) -> Duration {
        let secs = env::var("TOAST_DURATION_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TOAST_DURATION_SECS);

        Duration::from_secs(secs)
    }

    /// Default log level, overridden by `TRACING_LEVEL`
    #[must_use]
    pub fn tracing_level(&self) -> Level {
        env::var("TRACING_LEVEL")
            .ok()
            .and_then(|val| val.parse::<Level>().ok())
            .unwrap_or(match self {
                Self::Production | Self::Staging => Level::INFO,
                Self::Development { .. } => Level::DEBUG,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_gallery_env() {
        for name in [
            "APP_ENV",
            "S3_ENDPOINT_URL",
            "AWS_REGION",
            "AWS_ACCESS_KEY_ID",
            "AWS_SECRET_ACCESS_KEY",
            "S3_BUCKET_NAME",
            "GALLERY_LIST_ALL_PAGES",
            "GALLERY_DISCARD_STALE_LISTINGS",
            "TOAST_DURATION_SECS",
            "TRACING_LEVEL",
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_environment_from_env() {
        clear_gallery_env();

        // Test development (default)
        assert_eq!(
            Environment::from_env(),
            Environment::Development {
                endpoint_override: None
            }
        );

        // Test explicit development with an endpoint override
        env::set_var("APP_ENV", "Development ");
        env::set_var("S3_ENDPOINT_URL", "http://minio:9000");
        assert_eq!(
            Environment::from_env(),
            Environment::Development {
                endpoint_override: Some("http://minio:9000".to_string())
            }
        );

        // Test staging
        env::set_var("APP_ENV", "staging");
        assert_eq!(Environment::from_env(), Environment::Staging);

        // Test production
        env::set_var("APP_ENV", "production");
        assert_eq!(Environment::from_env(), Environment::Production);

        clear_gallery_env();
    }

    #[test]
    #[serial]
    #[should_panic(expected = "Invalid environment: invalid")]
    fn test_invalid_environment() {
        env::set_var("APP_ENV", "invalid");
        let _ = Environment::from_env();
    }

    #[test]
    fn test_endpoint_override() {
        assert_eq!(Environment::Production.override_aws_endpoint_url(), None);
        assert_eq!(Environment::Staging.override_aws_endpoint_url(), None);
        assert_eq!(
            Environment::Development {
                endpoint_override: None
            }
            .override_aws_endpoint_url(),
            Some(LOCALSTACK_ENDPOINT)
        );
        assert_eq!(
            Environment::Development {
                endpoint_override: Some("http://minio:9000".to_string())
            }
            .override_aws_endpoint_url(),
            Some("http://minio:9000")
        );
    }

    #[test]
    #[serial]
    fn test_missing_store_settings_are_empty() {
        clear_gallery_env();
        env::set_var("S3_BUCKET_NAME", "photos");

        let settings = Environment::Production.store_settings();

        assert_eq!(settings.bucket_name, "photos");
        assert_eq!(settings.region, "");
        assert_eq!(settings.access_key_id, "");
        assert_eq!(settings.secret_access_key, "");

        clear_gallery_env();
    }

    #[test]
    fn test_store_settings_debug_hides_credentials() {
        let settings = StoreSettings {
            region: "eu-west-1".to_string(),
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "super-secret".to_string(),
            bucket_name: "photos".to_string(),
        };

        let debug = format!("{settings:?}");
        assert!(debug.contains("eu-west-1"));
        assert!(debug.contains("has_secret_access_key: true"));
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("AKIAEXAMPLE"));
    }

    #[test]
    #[serial]
    fn test_listing_options_from_env() {
        clear_gallery_env();
        let environment = Environment::Production;

        assert_eq!(environment.listing_mode(), ListingMode::FirstPage);
        assert_eq!(environment.listing_policy(), ListingPolicy::LastWriterWins);

        env::set_var("GALLERY_LIST_ALL_PAGES", "true");
        env::set_var("GALLERY_DISCARD_STALE_LISTINGS", "1");
        assert_eq!(environment.listing_mode(), ListingMode::AllPages);
        assert_eq!(environment.listing_policy(), ListingPolicy::DiscardStale);

        env::set_var("GALLERY_LIST_ALL_PAGES", "nope");
        assert_eq!(environment.listing_mode(), ListingMode::FirstPage);

        clear_gallery_env();
    }

    #[test]
    #[serial]
    fn test_toast_duration() {
        clear_gallery_env();
        let environment = Environment::Staging;

        assert_eq!(environment.toast_duration(), Duration::from_secs(5));

        env::set_var("TOAST_DURATION_SECS", "12");
        assert_eq!(environment.toast_duration(), Duration::from_secs(12));

        // Test invalid environment variable falls back to the default
        env::set_var("TOAST_DURATION_SECS", "soon");
        assert_eq!(environment.toast_duration(), Duration::from_secs(5));

        clear_gallery_env();
    }

    #[test]
    #[serial]
    fn test_tracing_level_defaults() {
        clear_gallery_env();

        assert_eq!(Environment::Production.tracing_level(), Level::INFO);
        assert_eq!(
            Environment::Development {
                endpoint_override: None
            }
            .tracing_level(),
            Level::DEBUG
        );

        env::set_var("TRACING_LEVEL", "warn");
        assert_eq!(Environment::Production.tracing_level(), Level::WARN);

        clear_gallery_env();
    }
}

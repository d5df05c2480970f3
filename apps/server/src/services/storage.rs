//! S3 storage service for recordings and brain documents.
//!
//! Supports both AWS S3 and MinIO for development. Objects are written once;
//! an upload to an existing key fails instead of overwriting.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use secrecy::ExposeSecret;
use tracing::info;

use crate::config::StorageSettings;
use crate::error::{AppError, AppResult};

/// Cache lifetime set on every uploaded object.
pub const OBJECT_CACHE_CONTROL: &str = "max-age=3600";

/// Which bucket an object lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBucket {
    Recordings,
    Documents,
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub public_url: String,
    /// Bytes written
    pub size: u64,
}

/// Object storage used by the upload workflows.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload without overwrite. Fails with [`AppError::Storage`] carrying the store's message.
    async fn upload(
        &self,
        bucket: StorageBucket,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> AppResult<StoredObject>;

    /// Public retrieval URL for a key.
    fn public_url(&self, bucket: StorageBucket, key: &str) -> String;

    /// Remove an object.
    async fn remove(&self, bucket: StorageBucket, key: &str) -> AppResult<()>;

    /// Confirm the bucket is reachable with the configured credentials.
    async fn check_bucket(&self, bucket: StorageBucket) -> AppResult<()>;
}

/// S3 storage client wrapper.
#[derive(Clone)]
pub struct Storage {
    client: Client,
    recordings_bucket: String,
    documents_bucket: String,
    /// Base for public URLs, without trailing slash
    public_base: String,
}

impl Storage {
    /// Create a new S3 storage client from configuration.
    pub async fn new(config: &StorageSettings) -> AppResult<Self> {
        let credentials = Credentials::new(
            &config.access_key,
            config.secret_key.expose_secret(),
            None,
            None,
            "cis",
        );

        let region = Region::new(config.region.clone());

        let mut s3_config_builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(region)
            .credentials_provider(credentials)
            .force_path_style(true); // Required for MinIO

        // Use custom endpoint for MinIO in development
        if let Some(ref endpoint) = config.endpoint {
            s3_config_builder = s3_config_builder.endpoint_url(endpoint);
        }

        let client = Client::from_conf(s3_config_builder.build());

        let storage = Self {
            client,
            recordings_bucket: config.recordings_bucket.clone(),
            documents_bucket: config.documents_bucket.clone(),
            public_base: public_base(config),
        };

        storage.ensure_bucket_exists(StorageBucket::Recordings).await?;
        storage.ensure_bucket_exists(StorageBucket::Documents).await?;

        info!(
            "S3 storage initialized: recordings={}, documents={}",
            storage.recordings_bucket, storage.documents_bucket
        );

        Ok(storage)
    }

    fn bucket_name(&self, bucket: StorageBucket) -> &str {
        match bucket {
            StorageBucket::Recordings => &self.recordings_bucket,
            StorageBucket::Documents => &self.documents_bucket,
        }
    }

    /// Ensure the bucket exists, creating it if necessary.
    async fn ensure_bucket_exists(&self, bucket: StorageBucket) -> AppResult<()> {
        let name = self.bucket_name(bucket);
        match self.client.head_bucket().bucket(name).send().await {
            Ok(_) => {
                info!("S3 bucket '{}' exists", name);
                Ok(())
            }
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_not_found() {
                    info!("Creating S3 bucket '{}'", name);
                    self.client
                        .create_bucket()
                        .bucket(name)
                        .send()
                        .await
                        .map_err(|e| {
                            AppError::Storage(format!("Failed to create bucket: {}", e))
                        })?;
                    info!("S3 bucket '{}' created", name);
                    Ok(())
                } else {
                    Err(AppError::Storage(format!(
                        "Failed to access bucket '{}': {}",
                        name, service_error
                    )))
                }
            }
        }
    }
}

#[async_trait]
impl ObjectStore for Storage {
    async fn upload(
        &self,
        bucket: StorageBucket,
        key: &str,
        data: Vec<u8>,
        content_type: Option<&str>,
    ) -> AppResult<StoredObject> {
        let size = data.len() as u64;
        let body = aws_sdk_s3::primitives::ByteStream::from(data);
        let mut request = self
            .client
            .put_object()
            .bucket(self.bucket_name(bucket))
            .key(key)
            .body(body)
            .cache_control(OBJECT_CACHE_CONTROL)
            .if_none_match("*");

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request
            .send()
            .await
            .map_err(|e| AppError::Storage(e.into_service_error().to_string()))?;

        Ok(StoredObject {
            public_url: self.public_url(bucket, key),
            size,
        })
    }

    fn public_url(&self, bucket: StorageBucket, key: &str) -> String {
        object_url(&self.public_base, self.bucket_name(bucket), key)
    }

    async fn remove(&self, bucket: StorageBucket, key: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(self.bucket_name(bucket))
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::Storage(e.into_service_error().to_string()))?;

        Ok(())
    }

    async fn check_bucket(&self, bucket: StorageBucket) -> AppResult<()> {
        self.client
            .head_bucket()
            .bucket(self.bucket_name(bucket))
            .send()
            .await
            .map_err(|e| AppError::Storage(e.into_service_error().to_string()))?;

        Ok(())
    }
}

/// Public base URL: explicit setting, else the endpoint, else AWS virtual default.
fn public_base(config: &StorageSettings) -> String {
    let base = config
        .public_url
        .clone()
        .or_else(|| config.endpoint.clone())
        .unwrap_or_else(|| format!("https://s3.{}.amazonaws.com", config.region));
    base.trim_end_matches('/').to_string()
}

/// Path-style object URL. Each key segment is percent-encoded; separators are kept.
pub fn object_url(base: &str, bucket: &str, key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{}/{}/{}", base, bucket, encoded.join("/"))
}

/// Key for a recording upload: `{userId}/{epochMillis}_{name}.{ext}`.
pub fn recording_key(user_id: &uuid::Uuid, epoch_millis: i64, name: &str, ext: &str) -> String {
    format!("{}/{}_{}.{}", user_id, epoch_millis, name, ext)
}

/// Key for a brain document upload: `{userId}/{epochMillis}-{originalName}`.
pub fn document_key(user_id: &uuid::Uuid, epoch_millis: i64, original_name: &str) -> String {
    format!("{}/{}-{}", user_id, epoch_millis, original_name)
}

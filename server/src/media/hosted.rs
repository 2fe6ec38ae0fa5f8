use super::{ImageUpload, MediaError, MediaStore};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

/// Client for the external image host.
///
/// Uploads are `POST {base}/upload` (multipart, field `file`) answering
/// `{"url": ...}`; deletions are `POST {base}/destroy` with `{"url": ...}`.
/// Both use HTTP basic auth with the API key and secret.
#[derive(Debug, Clone)]
pub struct HostedMediaStore {
    client: Client,
    base_url: String,
    api_key: String,
    api_secret: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(alias = "secure_url")]
    url: String,
}

#[derive(Debug, Serialize)]
struct DestroyRequest<'a> {
    url: &'a str,
}

impl HostedMediaStore {
    pub fn new(base_url: &str, api_key: &str, api_secret: &str) -> Result<Self, MediaError> {
        let parsed = reqwest::Url::parse(base_url).map_err(|e| MediaError::Url(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MediaError::Url(format!(
                "unsupported scheme {}",
                parsed.scheme()
            )));
        }

        Ok(Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            api_secret: api_secret.to_string(),
        })
    }

    async fn check(response: Response) -> Result<Response, MediaError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(MediaError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl MediaStore for HostedMediaStore {
    async fn upload(&self, image: &ImageUpload) -> Result<String, MediaError> {
        let part = Part::bytes(image.data.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .multipart(form)
            .send()
            .await?;

        let body: UploadResponse = Self::check(response).await?.json().await?;
        tracing::debug!(url = %body.url, "uploaded recipe image");
        Ok(body.url)
    }

    async fn delete(&self, url: &str) -> Result<(), MediaError> {
        let response = self
            .client
            .post(format!("{}/destroy", self.base_url))
            .basic_auth(&self.api_key, Some(&self.api_secret))
            .json(&DestroyRequest { url })
            .send()
            .await?;

        Self::check(response).await?;
        tracing::debug!(url = %url, "deleted recipe image");
        Ok(())
    }
}

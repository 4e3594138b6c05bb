use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tracing::{debug, info, warn};
use url::Url;

use fitroom_common::error::{Error, Result};
use fitroom_common::models::garment::GarmentRef;
use fitroom_common::models::tryon::{ResultImage, TryOnRequest, TryOnResponse};
use fitroom_common::traits::FittingBackend;

use crate::models::{FittingApiConfig, HealthResponse};

const CLOTHES_PATH: &str = "/api/v1/clothes";
const TRY_ON_PATH: &str = "/api/v1/try-on";

/// HTTP client for the fitting backend.
///
/// One instance per deployment target; the base address is validated at
/// construction and never re-resolved.
pub struct FittingApiClient {
    base_url: String,
    client: Client,
}

impl FittingApiClient {
    pub fn new(config: FittingApiConfig) -> Result<Self> {
        // Reject unparsable addresses up front rather than on first call.
        Url::parse(&config.base_url)?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Backend liveness probe (`GET /`).
    pub async fn health_check(&self) -> Result<HealthResponse> {
        let response = self.client.get(self.endpoint("/")).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Server(status.as_u16()));
        }
        let text = response.text().await?;
        let health: HealthResponse = serde_json::from_str(&text)?;
        Ok(health)
    }

    /// `GET /api/v1/clothes` — the full inventory, no pagination.
    pub async fn fetch_clothes(&self) -> Result<Vec<GarmentRef>> {
        debug!("Fetching garment inventory from {}", self.base_url);
        let response = self.client.get(self.endpoint(CLOTHES_PATH)).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!("Inventory fetch failed with HTTP {}", status);
            return Err(Error::Server(status.as_u16()));
        }

        let text = response.text().await?;
        parse_garment_list(&text)
    }

    /// `POST /api/v1/clothes` — multipart upload of one garment image.
    pub async fn upload_cloth(&self, file_name: &str, image: Vec<u8>) -> Result<()> {
        info!("Uploading garment {} ({} bytes)", file_name, image.len());
        let part = Part::bytes(image).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint(CLOTHES_PATH))
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::Upload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Garment upload rejected with HTTP {}", status);
            return Err(Error::Upload(format!("HTTP {}", status.as_u16())));
        }

        // Success body shape is unspecified; only the status matters here.
        Ok(())
    }

    /// `POST /api/v1/try-on` — multipart synthesis request.
    pub async fn request_try_on(&self, request: TryOnRequest) -> Result<ResultImage> {
        info!(
            "Requesting try-on: cloth={} category={}",
            request.cloth_url, request.category
        );

        let person = Part::bytes(request.person_image).file_name(request.file_name.clone());
        let form = Form::new()
            .part("person_image", person)
            .text("cloth_url", request.cloth_url.as_str().to_string())
            .text("category", request.category.as_str());

        let response = self
            .client
            .post(self.endpoint(TRY_ON_PATH))
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Try-on request failed with HTTP {}", status);
            return Err(Error::Server(status.as_u16()));
        }

        let text = response.text().await?;
        debug!("Raw try-on response: {}", text);
        parse_try_on_body(&text)
    }
}

/// Parse the inventory body: a JSON array of locator strings.
fn parse_garment_list(body: &str) -> Result<Vec<GarmentRef>> {
    let locators: Vec<String> = serde_json::from_str(body)?;
    Ok(locators.into_iter().map(GarmentRef::new).collect())
}

/// Parse a 2xx try-on body; a missing result field is a malformed
/// response, not a success.
fn parse_try_on_body(body: &str) -> Result<ResultImage> {
    let parsed: TryOnResponse = serde_json::from_str(body)?;
    match parsed.result_image_url {
        Some(url) => Ok(ResultImage::new(url)),
        None => Err(Error::MalformedResponse(
            "response missing result_image_url".to_string(),
        )),
    }
}

#[async_trait]
impl FittingBackend for FittingApiClient {
    async fn list_garments(&self) -> Result<Vec<GarmentRef>> {
        self.fetch_clothes().await
    }

    async fn upload_garment(&self, file_name: &str, image: Vec<u8>) -> Result<()> {
        self.upload_cloth(file_name, image).await
    }

    async fn try_on(&self, request: TryOnRequest) -> Result<ResultImage> {
        self.request_try_on(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FittingApiConfig;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client =
            FittingApiClient::new(FittingApiConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(
            client.endpoint(CLOTHES_PATH),
            "http://localhost:8000/api/v1/clothes"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected_at_construction() {
        let Err(err) = FittingApiClient::new(FittingApiConfig::new("not a url")) else {
            panic!("construction should fail for an unparsable base URL");
        };
        assert!(matches!(err, Error::InvalidBaseUrl(_)));
    }

    #[test]
    fn garment_list_preserves_server_order() {
        let garments = parse_garment_list(r#"["g1", "g2", "g3"]"#).unwrap();
        let order: Vec<&str> = garments.iter().map(|g| g.as_str()).collect();
        assert_eq!(order, vec!["g1", "g2", "g3"]);
    }

    #[test]
    fn garment_list_rejects_non_array_bodies() {
        let err = parse_garment_list(r#"{"clothes": []}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn try_on_body_yields_result_locator() {
        let image = parse_try_on_body(r#"{"result_image_url": "r1"}"#).unwrap();
        assert_eq!(image.as_str(), "r1");
    }

    #[test]
    fn try_on_body_without_result_field_is_malformed() {
        let err = parse_try_on_body(r#"{"status": "success"}"#).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[test]
    fn try_on_body_with_non_json_payload_is_malformed() {
        let err = parse_try_on_body("<html>oops</html>").unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }
}

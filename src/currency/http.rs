//! Thin HTTP seam for the rate service: the production client is reqwest,
//! tests substitute scripted responses.

use async_trait::async_trait;
use serde_json::Value;

use crate::shared::error::{AppError, AppResult};

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET a URL and decode the body as JSON. Network failures and non-2xx
    /// statuses both surface as `AppError::Network`.
    async fn get_json(&self, url: &str) -> AppResult<Value>;
}

pub struct ReqwestClient {
    http: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent("omniconvert/rates")
            .build()
            .map_err(|e| AppError::Network(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_json(&self, url: &str) -> AppResult<Value> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(AppError::Network(format!(
                "Request to {} failed: {}",
                url,
                resp.status()
            )));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| AppError::Network(format!("Invalid JSON response: {}", e)))
    }
}

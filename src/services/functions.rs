//! Functions gateway service implementation
//!
//! Serverless function endpoints are invoked by name with a JSON body and
//! return a result envelope. Receipt generation and thermal-print dispatch
//! live behind this gateway; template listing is the only read and the only
//! call that gets the fixed retry budget.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::FunctionsConfig;
use crate::utils::errors::{EkklesiaError, FunctionsError, Result};
use crate::utils::{helpers, logging};

/// Result envelope returned by every function endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// Printable template descriptor returned by `list_templates`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateInfo {
    pub name: String,
    pub description: Option<String>,
}

/// Client for the serverless functions gateway
#[derive(Debug, Clone)]
pub struct FunctionsClient {
    client: Client,
    config: FunctionsConfig,
}

impl FunctionsClient {
    /// Create a new FunctionsClient instance
    pub fn new(config: FunctionsConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("Ekklesia/1.0")
            .build()
            .map_err(EkklesiaError::Http)?;

        Ok(Self { client, config })
    }

    /// Invoke a function endpoint by name with a JSON body
    pub async fn invoke(
        &self,
        function: &str,
        body: serde_json::Value,
    ) -> Result<FunctionResponse> {
        debug!(function = function, "Invoking function endpoint");

        let endpoint = format!("{}/{}", self.config.base_url.trim_end_matches('/'), function);
        let response = self
            .client
            .post(&endpoint)
            .header("x-request-id", helpers::generate_uuid())
            .json(&body)
            .send()
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                logging::log_gateway_error(function, "timeout", None);
                return Err(EkklesiaError::Functions(FunctionsError::Timeout));
            }
            Err(e) => {
                logging::log_gateway_error(function, &e.to_string(), None);
                return Err(EkklesiaError::Http(e));
            }
        };

        if !response.status().is_success() {
            let status = response.status();
            logging::log_gateway_error(function, status.as_str(), None);
            return Err(EkklesiaError::Functions(FunctionsError::RequestFailed(
                format!("{function} returned HTTP {status}"),
            )));
        }

        let envelope: FunctionResponse = response.json().await.map_err(|e| {
            EkklesiaError::Functions(FunctionsError::InvalidResponse(e.to_string()))
        })?;

        if !envelope.success {
            let reason = envelope
                .error
                .clone()
                .unwrap_or_else(|| "unspecified failure".to_string());
            warn!(function = function, reason = %reason, "Function reported failure");
            return Err(EkklesiaError::Functions(FunctionsError::RequestFailed(
                reason,
            )));
        }

        Ok(envelope)
    }

    /// Invoke a read endpoint, retrying recoverable failures within the
    /// configured budget
    async fn invoke_read(
        &self,
        function: &str,
        body: serde_json::Value,
    ) -> Result<FunctionResponse> {
        let mut attempt = 0;
        loop {
            match self.invoke(function, body.clone()).await {
                Ok(envelope) => return Ok(envelope),
                Err(e) if attempt < self.config.read_retries && e.is_recoverable() => {
                    warn!(function = function, attempt = attempt, error = %e, "Read failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Generate a payment receipt document
    pub async fn generate_receipt(
        &self,
        receipt_number: &str,
        person_name: &str,
        description: &str,
        amount_cents: i64,
    ) -> Result<serde_json::Value> {
        let envelope = self
            .invoke(
                "generate-receipt",
                serde_json::json!({
                    "receipt_number": receipt_number,
                    "person_name": person_name,
                    "description": description,
                    "amount_cents": amount_cents,
                }),
            )
            .await?;

        info!(receipt_number = receipt_number, "Receipt generated");
        envelope.data.ok_or_else(|| {
            EkklesiaError::Functions(FunctionsError::InvalidResponse(
                "receipt envelope carried no document".to_string(),
            ))
        })
    }

    /// Dispatch a document to the thermal printer queue
    pub async fn dispatch_thermal_print(&self, document: serde_json::Value) -> Result<()> {
        self.invoke("thermal-print", serde_json::json!({ "document": document }))
            .await?;

        info!("Thermal print dispatched");
        Ok(())
    }

    /// List available print templates
    pub async fn list_templates(&self) -> Result<Vec<TemplateInfo>> {
        let envelope = self
            .invoke_read("list-templates", serde_json::json!({}))
            .await?;

        let data = envelope.data.unwrap_or(serde_json::Value::Null);
        let templates: Vec<TemplateInfo> = serde_json::from_value(data).map_err(|e| {
            EkklesiaError::Functions(FunctionsError::InvalidResponse(e.to_string()))
        })?;

        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(base_url: String) -> FunctionsConfig {
        FunctionsConfig {
            base_url,
            timeout_seconds: 5,
            read_retries: 2,
        }
    }

    #[tokio::test]
    async fn invoke_unwraps_successful_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate-receipt"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": { "document": "base64..." }
            })))
            .mount(&server)
            .await;

        let client = FunctionsClient::new(test_config(server.uri())).unwrap();
        let document = client
            .generate_receipt("RCB-202503-000001", "Ana Souza", "Mensalidade", 2500)
            .await
            .unwrap();

        assert_eq!(document["document"], "base64...");
    }

    #[tokio::test]
    async fn failed_envelope_surfaces_reported_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/thermal-print"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error": "printer offline"
            })))
            .mount(&server)
            .await;

        let client = FunctionsClient::new(test_config(server.uri())).unwrap();
        let result = client
            .dispatch_thermal_print(serde_json::json!({ "lines": [] }))
            .await;

        assert_matches!(
            result,
            Err(EkklesiaError::Functions(FunctionsError::RequestFailed(reason))) if reason == "printer offline"
        );
    }

    #[tokio::test]
    async fn http_failure_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/list-templates"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = FunctionsClient::new(test_config(server.uri())).unwrap();
        assert!(client.list_templates().await.is_err());
    }

    #[tokio::test]
    async fn list_templates_parses_descriptors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/list-templates"))
            .and(body_json(serde_json::json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "data": [
                    { "name": "receipt-58mm", "description": "58mm thermal receipt" },
                    { "name": "receipt-80mm" }
                ]
            })))
            .mount(&server)
            .await;

        let client = FunctionsClient::new(test_config(server.uri())).unwrap();
        let templates = client.list_templates().await.unwrap();

        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].name, "receipt-58mm");
        assert!(templates[1].description.is_none());
    }
}

//! PokeAPI HTTP client.
//!
//! Fetches type records from `GET {base_url}/type/{name}`.

use super::{validate_type_name, FetchError, TypeSource};
use crate::config::ApiConfig;
use crate::models::TypeRecord;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Default PokeAPI v2 endpoint.
pub const DEFAULT_API_URL: &str = "https://pokeapi.co/api/v2";

/// Type source backed by the PokeAPI REST service.
pub struct PokeApiClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl PokeApiClient {
    /// Create a client from API settings.
    pub fn new(config: &ApiConfig) -> reqwest::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the type endpoint for a name.
    pub fn type_url(&self, name: &str) -> String {
        format!("{}/type/{}", self.base_url, name)
    }
}

#[async_trait]
impl TypeSource for PokeApiClient {
    async fn fetch_type(&self, name: &str) -> Result<TypeRecord, FetchError> {
        validate_type_name(name)?;

        let url = self.type_url(name);
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                name: name.to_string(),
                source,
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound {
                name: name.to_string(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                name: name.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|source| FetchError::Http {
            name: name.to_string(),
            source,
        })?;

        let record: TypeRecord =
            serde_json::from_slice(&body).map_err(|source| FetchError::Decode {
                name: name.to_string(),
                source,
            })?;

        debug!("Fetched type '{}' ({} bytes)", name, body.len());
        Ok(record)
    }

    fn describe(&self) -> String {
        format!("PokeAPI at {}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port and return its base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;

            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });

        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> PokeApiClient {
        let config = ApiConfig {
            base_url,
            timeout_seconds: 5,
            ..ApiConfig::default()
        };
        PokeApiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_missing_type_is_not_found() {
        let client = client_for(serve_once("404 Not Found", "Not Found").await);

        let err = client.fetch_type("shadow").await.unwrap_err();
        assert!(matches!(err, FetchError::NotFound { ref name } if name == "shadow"));
    }

    #[tokio::test]
    async fn test_server_error_keeps_status() {
        let client = client_for(serve_once("500 Internal Server Error", "oops").await);

        let err = client.fetch_type("fire").await.unwrap_err();
        match err {
            FetchError::Status { name, status } => {
                assert_eq!(name, "fire");
                assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
            }
            other => panic!("expected Status, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let client = client_for(serve_once("200 OK", "{nope").await);

        let err = client.fetch_type("fire").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { ref name, .. } if name == "fire"));
    }

    #[tokio::test]
    async fn test_parses_type_record() {
        let body = r#"{"name":"fire","damage_relations":{"double_damage_from":[{"name":"water","url":"https://pokeapi.co/api/v2/type/11/"}]}}"#;
        let client = client_for(serve_once("200 OK", body).await);

        let record = tokio_test::assert_ok!(client.fetch_type("fire").await);
        assert_eq!(record.name, "fire");
        assert_eq!(record.damage_relations.double_damage_from[0].name, "water");
        assert!(record.damage_relations.half_damage_to.is_empty());
    }

    #[test]
    fn test_type_url_trims_trailing_slash() {
        let config = ApiConfig {
            base_url: "https://pokeapi.co/api/v2/".to_string(),
            ..ApiConfig::default()
        };
        let client = PokeApiClient::new(&config).unwrap();
        assert_eq!(client.type_url("fire"), "https://pokeapi.co/api/v2/type/fire");
    }

    #[tokio::test]
    async fn test_rejects_invalid_name_without_request() {
        let config = ApiConfig {
            // Nothing listens here; the name check must fail first.
            base_url: "http://127.0.0.1:9".to_string(),
            ..ApiConfig::default()
        };
        let client = PokeApiClient::new(&config).unwrap();

        let err = client.fetch_type("../secret").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidName { .. }));
    }

    #[test]
    fn test_describe() {
        let client = PokeApiClient::new(&ApiConfig::default()).unwrap();
        assert_eq!(client.describe(), format!("PokeAPI at {}", DEFAULT_API_URL));
    }
}

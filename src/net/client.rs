// HTTP implementation of PacketSource
//
// Talks to the monitoring server's REST API with a blocking reqwest client.
// Every request carries the optional bearer token and the client timeout,
// so a hung server stalls the event loop for at most one timeout.

use super::{Capabilities, PacketFilters, PacketPage, PacketSource, SourceError};
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub struct HttpSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpSource {
    pub fn new(
        base_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SourceError> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("meshlog/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| SourceError::Http {
                url: base_url.clone(),
                source,
            })?;
        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, url: &str, request: RequestBuilder) -> Result<Response, SourceError> {
        let response = self
            .authorize(request)
            .send()
            .map_err(|source| SourceError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, SourceError> {
        let url = self.url(path);
        let response = self.send(&url, self.client.get(&url).query(query))?;
        let body = response.text().map_err(|source| SourceError::Http {
            url: url.clone(),
            source,
        })?;
        decode_json(&url, &body)
    }
}

/// Query parameters for one packet page
pub fn packet_query(
    offset: usize,
    limit: usize,
    filters: &PacketFilters,
) -> Vec<(&'static str, String)> {
    let mut query = vec![("offset", offset.to_string()), ("limit", limit.to_string())];
    if let Some(portnum) = filters.portnum {
        query.push(("portnum", portnum.to_string()));
    }
    if let Some(encrypted) = filters.encrypted {
        query.push(("encrypted", encrypted.to_string()));
    }
    query
}

fn decode_json<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(|source| SourceError::Decode {
        url: url.to_string(),
        source,
    })
}

/// Pull `localNodeInfo.nodeId` out of the server config document
fn own_node_from_config(config: &serde_json::Value) -> Option<String> {
    config
        .pointer("/localNodeInfo/nodeId")
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

impl PacketSource for HttpSource {
    fn fetch_packets(
        &self,
        offset: usize,
        limit: usize,
        filters: &PacketFilters,
    ) -> Result<PacketPage, SourceError> {
        let page: PacketPage =
            self.get_json("/api/packets", &packet_query(offset, limit, filters))?;
        tracing::debug!(
            count = page.packets.len(),
            total = page.total,
            max_count = page.max_count,
            "Fetched packet page"
        );
        Ok(page)
    }

    fn clear_packets(&self) -> Result<(), SourceError> {
        let url = self.url("/api/packets");
        self.send(&url, self.client.delete(&url))?;
        Ok(())
    }

    fn fetch_capabilities(&self) -> Result<Capabilities, SourceError> {
        self.get_json("/api/auth/status", &[])
    }

    fn fetch_own_node_id(&self) -> Result<Option<String>, SourceError> {
        let config: serde_json::Value = self.get_json("/api/config", &[])?;
        Ok(own_node_from_config(&config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_query_without_filters() {
        let query = packet_query(0, 100, &PacketFilters::default());
        assert_eq!(
            query,
            vec![("offset", "0".to_string()), ("limit", "100".to_string())]
        );
    }

    #[test]
    fn test_packet_query_with_filters() {
        let filters = PacketFilters {
            portnum: Some(67),
            encrypted: Some(false),
        };
        let query = packet_query(0, 100, &filters);
        assert!(query.contains(&("portnum", "67".to_string())));
        assert!(query.contains(&("encrypted", "false".to_string())));
        assert_eq!(query.len(), 4);
    }

    #[test]
    fn test_decode_error_names_url() {
        let err = decode_json::<PacketPage>("http://mesh/api/packets", "<html>").unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }));
        assert!(err.to_string().contains("http://mesh/api/packets"));
    }

    #[test]
    fn test_own_node_from_config() {
        let config = serde_json::json!({
            "meshtasticNodeIp": "192.168.1.10",
            "localNodeInfo": { "nodeId": "!a1b2c3d4", "longName": "Home" }
        });
        assert_eq!(own_node_from_config(&config).as_deref(), Some("!a1b2c3d4"));
        assert_eq!(own_node_from_config(&serde_json::json!({})), None);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let source = HttpSource::new("http://mesh:8080/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(source.url("/api/packets"), "http://mesh:8080/api/packets");
    }
}

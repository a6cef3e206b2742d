use std::fmt;

use reqwest::Url;

use crate::error::{GatewayError, GatewayResult};

/// Opaque credential for the feature service. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// One remote feature layer plus the credential used to reach it.
///
/// Built per tool invocation and never cached, so the credential travels with the
/// request instead of living in process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureLayerRef {
    url: Url,
    api_key: ApiKey,
}

impl FeatureLayerRef {
    pub fn new(url: Url, api_key: ApiKey) -> Self {
        Self { url, api_key }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    /// URL of an operation below the layer, e.g. `query` or `applyEdits`. The layer's
    /// query string is kept and its fragment dropped.
    pub fn endpoint(&self, operation: &str) -> GatewayResult<Url> {
        let mut endpoint = self.url.clone();
        endpoint.set_fragment(None);
        endpoint
            .path_segments_mut()
            .map_err(|_| {
                GatewayError::LayerUnavailable(format!("{} cannot hold operation paths", self.url))
            })?
            .pop_if_empty()
            .push(operation);
        Ok(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ApiKey, FeatureLayerRef};

    #[rstest]
    #[case(
        "https://services.arcgis.com/abc/FeatureServer/0",
        "https://services.arcgis.com/abc/FeatureServer/0/applyEdits"
    )]
    #[case(
        "https://services.arcgis.com/abc/FeatureServer/0/",
        "https://services.arcgis.com/abc/FeatureServer/0/applyEdits"
    )]
    #[case(
        "https://services.arcgis.com/abc/FeatureServer/0?f=json",
        "https://services.arcgis.com/abc/FeatureServer/0/applyEdits?f=json"
    )]
    #[case(
        "https://services.arcgis.com/abc/FeatureServer/0/#layer",
        "https://services.arcgis.com/abc/FeatureServer/0/applyEdits"
    )]
    fn test_endpoint(#[case] url: &str, #[case] expected: &str) {
        let layer = FeatureLayerRef::new(url.parse().unwrap(), ApiKey::new("key"));
        assert_eq!(expected, layer.endpoint("applyEdits").unwrap().as_str());
    }

    #[test]
    fn test_api_key_is_redacted() {
        let layer = FeatureLayerRef::new(
            "https://example.com/FeatureServer/1".parse().unwrap(),
            ApiKey::new("super-secret"),
        );
        assert!(!format!("{:?}", layer).contains("super-secret"));
    }
}

//! Request dispatcher
//!
//! One outbound request per [`Dispatcher::dispatch`] call. Headers are layered
//! in a fixed order, later layers overriding earlier ones:
//!
//! 1. the dispatcher's baseline (including the contract version, if any)
//! 2. a fresh correlation id, if enabled
//! 3. the caller's credential header
//! 4. per-call header overrides

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;
use uuid::Uuid;

use crate::error::{check_response, json_with_limit, XblError};

pub const CONTRACT_VERSION_HEADER: &str = "x-xbl-contract-version";
pub const CORRELATION_ID_HEADER: &str = "x-xblcorrelationid";

const INVALID_URL: &str = "Specified \"url\" is invalid";

/// Description of a single outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct CallConfig {
    pub method: Method,
    pub url: String,
    /// Overrides the dispatcher's default contract version.
    pub contract_version: Option<u32>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl CallConfig {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            contract_version: None,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, url).body(body)
    }

    #[must_use]
    pub const fn contract_version(mut self, version: u32) -> Self {
        self.contract_version = Some(version);
        self
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((name.into(), value.to_string()));
        self
    }

    /// Add a query parameter only when a value is present.
    #[must_use]
    pub fn query_opt<V: ToString>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Look up a query parameter by name (last one wins).
    #[must_use]
    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Credential header attached to a dispatch (layer 3).
#[derive(Clone)]
pub struct Credential {
    name: HeaderName,
    value: HeaderValue,
}

impl Credential {
    pub fn new(name: HeaderName, value: &str) -> Result<Self, XblError> {
        let mut value = HeaderValue::from_str(value)?;
        value.set_sensitive(true);
        Ok(Self { name, value })
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("name", &self.name)
            .field("value", &"<redacted>")
            .finish()
    }
}

/// Shared request executor, parameterized per upstream.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: Client,
    baseline: HeaderMap,
    allowed_hosts: Option<Arc<[String]>>,
    default_contract_version: Option<u32>,
    correlation_id: bool,
}

impl Dispatcher {
    #[must_use]
    pub fn new(client: Client, baseline: HeaderMap) -> Self {
        Self {
            client,
            baseline,
            allowed_hosts: None,
            default_contract_version: None,
            correlation_id: false,
        }
    }

    /// Restrict dispatch to these hosts and their subdomains.
    #[must_use]
    pub fn with_allowed_hosts(mut self, hosts: impl IntoIterator<Item = String>) -> Self {
        let hosts: Vec<String> = hosts
            .into_iter()
            .map(|h| h.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        self.allowed_hosts = Some(hosts.into());
        self
    }

    #[must_use]
    pub const fn with_contract_version(mut self, version: u32) -> Self {
        self.default_contract_version = Some(version);
        self
    }

    #[must_use]
    pub const fn with_correlation_id(mut self) -> Self {
        self.correlation_id = true;
        self
    }

    /// Parse the target URL and apply the host guard.
    pub fn check_url(&self, url: &str) -> Result<Url, XblError> {
        let parsed = Url::parse(url).map_err(|_| XblError::InvalidInput(INVALID_URL.to_string()))?;

        match parsed.scheme() {
            "http" | "https" => {}
            _ => return Err(XblError::InvalidInput(INVALID_URL.to_string())),
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| XblError::InvalidInput(INVALID_URL.to_string()))?
            .to_ascii_lowercase();

        if let Some(allowed) = &self.allowed_hosts {
            let permitted = allowed.iter().any(|entry| {
                host == *entry
                    || host
                        .strip_suffix(entry.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            });
            if !permitted {
                return Err(XblError::InvalidInput(INVALID_URL.to_string()));
            }
        }

        Ok(parsed)
    }

    /// Assemble the layered header map for one call.
    pub fn build_headers(
        &self,
        call: &CallConfig,
        credential: Option<&Credential>,
    ) -> Result<HeaderMap, XblError> {
        let mut headers = self.baseline.clone();

        if let Some(version) = call.contract_version.or(self.default_contract_version) {
            headers.insert(
                HeaderName::from_static(CONTRACT_VERSION_HEADER),
                HeaderValue::from(version),
            );
        }

        if self.correlation_id {
            headers.insert(
                HeaderName::from_static(CORRELATION_ID_HEADER),
                HeaderValue::from_str(&Uuid::new_v4().to_string())?,
            );
        }

        if let Some(credential) = credential {
            headers.insert(credential.name.clone(), credential.value.clone());
        }

        for (name, value) in &call.headers {
            headers.insert(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }

        Ok(headers)
    }

    /// Execute one call and decode the JSON body.
    pub async fn dispatch_json<T: DeserializeOwned>(
        &self,
        call: &CallConfig,
        credential: Option<&Credential>,
    ) -> Result<T, XblError> {
        let url = self.check_url(&call.url)?;
        let headers = self.build_headers(call, credential)?;

        debug!(
            method = %call.method,
            url = %url,
            correlation_id = headers
                .get(CORRELATION_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-"),
            "dispatching request"
        );

        let mut request = self
            .client
            .request(call.method.clone(), url)
            .headers(headers);

        if !call.query.is_empty() {
            request = request.query(&call.query);
        }
        if let Some(body) = &call.body {
            request = request.json(body);
        }

        let response = check_response(request.send().await?)?;
        json_with_limit(response).await
    }

    pub async fn dispatch(
        &self,
        call: &CallConfig,
        credential: Option<&Credential>,
    ) -> Result<Value, XblError> {
        self.dispatch_json(call, credential).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{ACCEPT, AUTHORIZATION};

    fn dispatcher() -> Dispatcher {
        let mut baseline = HeaderMap::new();
        baseline.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Dispatcher::new(Client::new(), baseline)
            .with_allowed_hosts(vec!["xboxlive.com".to_string()])
            .with_contract_version(2)
            .with_correlation_id()
    }

    #[test]
    fn test_host_guard() {
        let d = dispatcher();
        assert!(d.check_url("https://profile.xboxlive.com/users").is_ok());
        assert!(d.check_url("https://xboxlive.com/").is_ok());
        assert!(d.check_url("https://MEDIAHUB.XBOXLIVE.COM/screenshots/search").is_ok());

        for url in [
            "https://evilxboxlive.com/",
            "https://xboxlive.com.evil.org/",
            "https://example.com/",
            "ftp://profile.xboxlive.com/",
            "not a url",
            "",
        ] {
            assert_eq!(
                d.check_url(url).unwrap_err(),
                XblError::InvalidInput("Specified \"url\" is invalid".to_string()),
                "{url}"
            );
        }
    }

    #[test]
    fn test_no_allow_list_accepts_any_http_host() {
        let d = Dispatcher::new(Client::new(), HeaderMap::new());
        assert!(d.check_url("https://www.xboxreplay.net/api/v2.0/players").is_ok());
        assert!(d.check_url("file:///etc/passwd").is_err());
    }

    #[test]
    fn test_header_layering() {
        let d = dispatcher();
        let credential = Credential::new(AUTHORIZATION, "XBL3.0 x=hash;token").unwrap();

        let call = CallConfig::get("https://profile.xboxlive.com/users");
        let headers = d.build_headers(&call, Some(&credential)).unwrap();
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[CONTRACT_VERSION_HEADER], "2");
        assert_eq!(headers[AUTHORIZATION], "XBL3.0 x=hash;token");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert!(Uuid::parse_str(headers[CORRELATION_ID_HEADER].to_str().unwrap()).is_ok());

        // Per-call values win over every other layer.
        let call = CallConfig::get("https://profile.xboxlive.com/users")
            .contract_version(5)
            .header("Authorization", "override")
            .header("Accept", "text/plain");
        let headers = d.build_headers(&call, Some(&credential)).unwrap();
        assert_eq!(headers[CONTRACT_VERSION_HEADER], "5");
        assert_eq!(headers[AUTHORIZATION], "override");
        assert_eq!(headers[ACCEPT], "text/plain");
    }

    #[test]
    fn test_correlation_id_is_fresh_per_call() {
        let d = dispatcher();
        let call = CallConfig::get("https://profile.xboxlive.com/users");
        let first = d.build_headers(&call, None).unwrap();
        let second = d.build_headers(&call, None).unwrap();
        assert_ne!(first[CORRELATION_ID_HEADER], second[CORRELATION_ID_HEADER]);
    }

    #[test]
    fn test_invalid_override_header_rejected() {
        let d = dispatcher();
        let call = CallConfig::get("https://profile.xboxlive.com/users").header("bad header", "v");
        assert!(matches!(
            d.build_headers(&call, None).unwrap_err(),
            XblError::InvalidInput(_)
        ));
    }

    #[test]
    fn test_call_config_builder() {
        let call = CallConfig::get("https://avty.xboxlive.com/")
            .query("numItems", 5)
            .query_opt("contToken", None::<String>)
            .query_opt("pollingToken", Some("abc"));
        assert_eq!(call.query_value("numItems"), Some("5"));
        assert_eq!(call.query_value("contToken"), None);
        assert_eq!(call.query_value("pollingToken"), Some("abc"));
        assert_eq!(call.method, Method::GET);
    }

    #[tokio::test]
    async fn test_disallowed_host_fails_before_io() {
        let d = dispatcher();
        let call = CallConfig::get("https://unreachable.invalid/users");
        let err = d.dispatch(&call, None).await.unwrap_err();
        assert_eq!(err, XblError::InvalidInput("Specified \"url\" is invalid".to_string()));
    }
}

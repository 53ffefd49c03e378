//! Blocking Redfish client used by `manager getinfo`.
//!
//! The client only reads: it opens a session when credentials are present,
//! walks the service root and the `Managers` collection, and returns a
//! [`ManagerSnapshot`].

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::connection::{ConnectionParams, SessionMode};

pub const SERVICE_ROOT_PATH: &str = "/redfish/v1";
pub const SESSIONS_PATH: &str = "/redfish/v1/SessionService/Sessions";
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

#[derive(Debug, Error)]
pub enum RedfishError {
    #[error("Invalid manager url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("Login to {url} did not return a session token")]
    MissingToken { url: String },

    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl RedfishError {
    /// A hint for the user on how to get past this error.
    pub fn advice(&self) -> &'static str {
        match self {
            RedfishError::InvalidUrl { .. } => {
                "Check the manager url with 'config showall' and fix it with 'config modify'."
            }
            RedfishError::Transport { .. } => {
                "Check the manager is reachable. Use --insecure if it presents a self-signed certificate."
            }
            RedfishError::Status { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN =>
            {
                "Check the login and password configured for this manager."
            }
            RedfishError::Status { .. } => "Check the manager url points to a Redfish service.",
            RedfishError::MissingToken { .. } | RedfishError::Decode { .. } => {
                "The remote service does not look like a Redfish implementation."
            }
        }
    }
}

/// A reference to another Redfish resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OdataLink {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRoot {
    pub id: Option<String>,
    pub name: Option<String>,
    pub redfish_version: Option<String>,
    #[serde(rename = "UUID")]
    pub uuid: Option<String>,
    pub managers: Option<OdataLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceStatus {
    pub state: Option<String>,
    pub health: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ManagerInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    pub manager_type: Option<String>,
    pub firmware_version: Option<String>,
    pub model: Option<String>,
    #[serde(rename = "UUID")]
    pub uuid: Option<String>,
    pub status: Option<ResourceStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Collection {
    #[serde(default)]
    members: Vec<OdataLink>,
}

/// State of a remote service at the time it was queried.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManagerSnapshot {
    pub service: ServiceRoot,
    pub managers: Vec<ManagerInfo>,
}

/// Something that can produce a [`ManagerSnapshot`] from connection parameters.
pub trait RemoteManagement {
    fn fetch(&self, params: &ConnectionParams) -> Result<ManagerSnapshot, RedfishError>;
}

/// [`RemoteManagement`] over HTTP(S).
#[derive(Debug, Default, Clone)]
pub struct RedfishClient;

impl RedfishClient {
    pub fn new() -> Self {
        Self
    }
}

impl RemoteManagement for RedfishClient {
    fn fetch(&self, params: &ConnectionParams) -> Result<ManagerSnapshot, RedfishError> {
        let session = Session::open(params)?;
        let snapshot = session.snapshot();
        session.close();
        snapshot
    }
}

struct Session {
    http: Client,
    base: Url,
    token: Option<String>,
    /// Session resource returned in the login `Location` header.
    location: Option<String>,
}

impl Session {
    fn open(params: &ConnectionParams) -> Result<Self, RedfishError> {
        let mut base = Url::parse(&params.url).map_err(|source| RedfishError::InvalidUrl {
            url: params.url.clone(),
            source,
        })?;
        if params.enforce_tls && base.scheme() == "http" {
            // http -> https is always an allowed scheme change.
            let _ = base.set_scheme("https");
            log::debug!("Enforcing TLS, using {}", base);
        }

        if !params.verify_certificates {
            log::warn!("Certificate verification disabled for {}", base);
        }

        let http = Client::builder()
            .danger_accept_invalid_certs(!params.verify_certificates)
            .user_agent(concat!("redfish-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| RedfishError::Transport {
                url: base.to_string(),
                source,
            })?;

        let mut session = Self {
            http,
            base,
            token: None,
            location: None,
        };

        if params.mode == SessionMode::Authenticated {
            session.login(&params.login, &params.password)?;
        } else {
            log::info!("No credentials configured, using anonymous session");
        }

        Ok(session)
    }

    fn url_for(&self, path: &str) -> Result<Url, RedfishError> {
        self.base
            .join(path)
            .map_err(|source| RedfishError::InvalidUrl {
                url: format!("{}{}", self.base, path),
                source,
            })
    }

    fn login(&mut self, login: &str, password: &str) -> Result<(), RedfishError> {
        let url = self.url_for(SESSIONS_PATH)?;
        log::info!("Opening session on {} as {}", url, login);
        log::trace!("Session password: {}", password);

        let response = self
            .http
            .post(url.clone())
            .json(&json!({ "UserName": login, "Password": password }))
            .send()
            .map_err(|source| RedfishError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RedfishError::Status {
                url: url.to_string(),
                status,
            });
        }

        let token = response
            .headers()
            .get(AUTH_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| RedfishError::MissingToken {
                url: url.to_string(),
            })?;
        log::trace!("Session token: {}", token);
        self.token = Some(token);
        self.location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        Ok(())
    }

    /// Deletes the session resource, if the login returned one. Failures are
    /// only logged: the requested data has already been retrieved.
    fn close(self) {
        let Some(location) = &self.location else {
            return;
        };
        let url = match self.url_for(location) {
            Ok(url) => url,
            Err(e) => {
                log::debug!("Not closing session: {}", e);
                return;
            }
        };
        log::debug!("DELETE {}", url);

        match self.authorize(self.http.delete(url.clone())).send() {
            Ok(response) if response.status().is_success() => {
                log::info!("Closed session {}", url);
            }
            Ok(response) => {
                log::debug!("Closing session {} answered HTTP {}", url, response.status());
            }
            Err(e) => log::debug!("Closing session {} failed: {}", url, e),
        }
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.header(AUTH_TOKEN_HEADER, token),
            None => request,
        }
    }

    fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RedfishError> {
        let url = self.url_for(path)?;
        log::debug!("GET {}", url);

        let response = self
            .authorize(self.http.get(url.clone()))
            .send()
            .map_err(|source| RedfishError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RedfishError::Status {
                url: url.to_string(),
                status,
            });
        }

        response.json::<T>().map_err(|source| RedfishError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn snapshot(&self) -> Result<ManagerSnapshot, RedfishError> {
        let service: ServiceRoot = self.get(SERVICE_ROOT_PATH)?;

        let mut managers = Vec::new();
        if let Some(link) = &service.managers {
            let collection: Collection = self.get(&link.odata_id)?;
            for member in &collection.members {
                managers.push(self.get::<ManagerInfo>(&member.odata_id)?);
            }
        }
        log::info!("Retrieved {} managers", managers.len());

        Ok(ManagerSnapshot { service, managers })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ManagerRecord;
    use httpmock::prelude::*;

    fn anonymous(url: String) -> ConnectionParams {
        ConnectionParams {
            url,
            login: String::new(),
            password: String::new(),
            mode: SessionMode::Anonymous,
            enforce_tls: false,
            verify_certificates: false,
        }
    }

    fn mock_service(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/redfish/v1");
            then.status(200).json_body(serde_json::json!({
                "Id": "RootService",
                "Name": "Root Service",
                "RedfishVersion": "1.0.0",
                "UUID": "92384634-2938-2342-8820-489239905423",
                "Managers": { "@odata.id": "/redfish/v1/Managers" }
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/redfish/v1/Managers");
            then.status(200).json_body(serde_json::json!({
                "Members@odata.count": 1,
                "Members": [{ "@odata.id": "/redfish/v1/Managers/1" }]
            }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/redfish/v1/Managers/1");
            then.status(200).json_body(serde_json::json!({
                "Id": "1",
                "Name": "Manager",
                "ManagerType": "BMC",
                "FirmwareVersion": "2.40",
                "Model": "iLO 4",
                "Status": { "State": "Enabled", "Health": "OK" }
            }));
        });
    }

    #[test]
    fn test_anonymous_snapshot() {
        let server = MockServer::start();
        mock_service(&server);

        let snapshot = RedfishClient::new()
            .fetch(&anonymous(server.base_url()))
            .expect("fetch should succeed");

        assert_eq!(snapshot.service.redfish_version.as_deref(), Some("1.0.0"));
        assert_eq!(snapshot.managers.len(), 1);
        let manager = &snapshot.managers[0];
        assert_eq!(manager.manager_type.as_deref(), Some("BMC"));
        assert_eq!(manager.firmware_version.as_deref(), Some("2.40"));
        assert_eq!(
            manager.status.as_ref().and_then(|s| s.health.as_deref()),
            Some("OK")
        );
    }

    #[test]
    fn test_authenticated_session_sends_token() {
        let server = MockServer::start();
        let login = server.mock(|when, then| {
            when.method(POST)
                .path(SESSIONS_PATH)
                .json_body(serde_json::json!({ "UserName": "admin", "Password": "pw" }));
            then.status(201).header(AUTH_TOKEN_HEADER, "tok123");
        });
        let root = server.mock(|when, then| {
            when.method(GET)
                .path("/redfish/v1")
                .header(AUTH_TOKEN_HEADER, "tok123");
            then.status(200)
                .json_body(serde_json::json!({ "RedfishVersion": "1.6.0" }));
        });

        let params = ConnectionParams {
            login: "admin".to_string(),
            password: "pw".to_string(),
            mode: SessionMode::Authenticated,
            ..anonymous(server.base_url())
        };
        let snapshot = RedfishClient::new().fetch(&params).expect("fetch should succeed");

        login.assert();
        root.assert();
        assert_eq!(snapshot.service.redfish_version.as_deref(), Some("1.6.0"));
        assert!(snapshot.managers.is_empty());
    }

    #[test]
    fn test_session_is_deleted_after_snapshot() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(SESSIONS_PATH);
            then.status(201)
                .header(AUTH_TOKEN_HEADER, "tok123")
                .header("Location", "/redfish/v1/SessionService/Sessions/1");
        });
        server.mock(|when, then| {
            when.method(GET).path("/redfish/v1");
            then.status(200)
                .json_body(serde_json::json!({ "RedfishVersion": "1.6.0" }));
        });
        let logout = server.mock(|when, then| {
            when.method(DELETE)
                .path("/redfish/v1/SessionService/Sessions/1")
                .header(AUTH_TOKEN_HEADER, "tok123");
            then.status(204);
        });

        let params = ConnectionParams {
            login: "admin".to_string(),
            password: "pw".to_string(),
            mode: SessionMode::Authenticated,
            ..anonymous(server.base_url())
        };
        RedfishClient::new().fetch(&params).expect("fetch should succeed");

        assert_eq!(logout.hits(), 1);
    }

    #[test]
    fn test_failed_logout_keeps_snapshot() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(SESSIONS_PATH);
            then.status(201)
                .header(AUTH_TOKEN_HEADER, "tok123")
                .header("Location", "/redfish/v1/SessionService/Sessions/7");
        });
        server.mock(|when, then| {
            when.method(GET).path("/redfish/v1");
            then.status(200)
                .json_body(serde_json::json!({ "RedfishVersion": "1.6.0" }));
        });
        let logout = server.mock(|when, then| {
            when.method(DELETE).path("/redfish/v1/SessionService/Sessions/7");
            then.status(500);
        });

        let params = ConnectionParams {
            login: "admin".to_string(),
            password: "pw".to_string(),
            mode: SessionMode::Authenticated,
            ..anonymous(server.base_url())
        };
        let snapshot = RedfishClient::new().fetch(&params).expect("fetch should succeed");

        logout.assert();
        assert_eq!(snapshot.service.redfish_version.as_deref(), Some("1.6.0"));
    }

    #[test]
    fn test_credentials_upgrade_plain_http_to_https() {
        let server = MockServer::start();
        let login = server.mock(|when, then| {
            when.method(POST).path(SESSIONS_PATH);
            then.status(201).header(AUTH_TOKEN_HEADER, "tok123");
        });

        let record = ManagerRecord::new(
            server.base_url(),
            Some("a".to_string()),
            Some("b".to_string()),
        );
        let params = ConnectionParams::resolve(&record, true);
        let err = RedfishClient::new().fetch(&params).unwrap_err();

        assert_eq!(login.hits(), 0);
        match err {
            RedfishError::Transport { url, .. } => assert!(url.starts_with("https://"), "{url}"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_login_rejected() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(SESSIONS_PATH);
            then.status(401);
        });

        let params = ConnectionParams {
            login: "admin".to_string(),
            password: "wrong".to_string(),
            mode: SessionMode::Authenticated,
            ..anonymous(server.base_url())
        };
        let err = RedfishClient::new().fetch(&params).unwrap_err();

        assert!(matches!(
            err,
            RedfishError::Status { status, .. } if status == StatusCode::UNAUTHORIZED
        ));
        assert!(err.advice().contains("login and password"));
    }

    #[test]
    fn test_login_without_token() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path(SESSIONS_PATH);
            then.status(201);
        });

        let params = ConnectionParams {
            login: "admin".to_string(),
            password: "pw".to_string(),
            mode: SessionMode::Authenticated,
            ..anonymous(server.base_url())
        };

        assert!(matches!(
            RedfishClient::new().fetch(&params),
            Err(RedfishError::MissingToken { .. })
        ));
    }

    #[test]
    fn test_not_redfish() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/redfish/v1");
            then.status(200).body("<html>hello</html>");
        });

        assert!(matches!(
            RedfishClient::new().fetch(&anonymous(server.base_url())),
            Err(RedfishError::Decode { .. })
        ));
    }

    #[test]
    fn test_missing_service_root() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/redfish/v1");
            then.status(404);
        });

        assert!(matches!(
            RedfishClient::new().fetch(&anonymous(server.base_url())),
            Err(RedfishError::Status { status, .. }) if status == StatusCode::NOT_FOUND
        ));
    }

    #[test]
    fn test_invalid_url() {
        let err = RedfishClient::new()
            .fetch(&anonymous("not a url".to_string()))
            .unwrap_err();
        assert!(matches!(err, RedfishError::InvalidUrl { .. }));
    }
}

//! Derives how a manager is contacted from its stored record.
//!
//! Whether credentials are present silently decides the security posture of
//! the session, so this is kept as one pure function with its own tests.

use crate::record::ManagerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// No login configured: talk to a simulator without authenticating.
    Anonymous,
    /// Log in with the stored credentials.
    Authenticated,
}

/// Everything the remote client needs to open a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub url: String,
    pub login: String,
    pub password: String,
    pub mode: SessionMode,
    /// Upgrade plain `http://` URLs to `https://`.
    pub enforce_tls: bool,
    /// Verify the server certificate chain and host name.
    pub verify_certificates: bool,
}

impl ConnectionParams {
    /// Resolves connection parameters for `record`.
    ///
    /// `insecure` disables certificate verification in every mode. Anonymous
    /// sessions never verify certificates nor enforce TLS.
    pub fn resolve(record: &ManagerRecord, insecure: bool) -> Self {
        let mode = if record.has_credentials() {
            SessionMode::Authenticated
        } else {
            SessionMode::Anonymous
        };
        let authenticated = mode == SessionMode::Authenticated;

        Self {
            url: record.url.clone(),
            login: record.login.clone(),
            password: record.password.clone(),
            mode,
            enforce_tls: authenticated,
            verify_certificates: authenticated && !insecure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_login(login: &str) -> ManagerRecord {
        ManagerRecord::new(
            "https://bmc.example",
            Some(login.to_string()),
            Some("pw".to_string()),
        )
    }

    #[test]
    fn test_anonymous_ignores_insecure_flag() {
        let record = ManagerRecord::new("http://sim:8000", None, None);

        for insecure in [false, true] {
            let params = ConnectionParams::resolve(&record, insecure);
            assert_eq!(params.mode, SessionMode::Anonymous);
            assert!(!params.verify_certificates);
            assert!(!params.enforce_tls);
        }
    }

    #[test]
    fn test_authenticated_verifies_by_default() {
        let params = ConnectionParams::resolve(&with_login("admin"), false);

        assert_eq!(params.mode, SessionMode::Authenticated);
        assert!(params.enforce_tls);
        assert!(params.verify_certificates);
        assert_eq!(params.login, "admin");
        assert_eq!(params.password, "pw");
    }

    #[test]
    fn test_insecure_disables_verification_with_credentials() {
        let params = ConnectionParams::resolve(&with_login("admin"), true);

        assert_eq!(params.mode, SessionMode::Authenticated);
        assert!(params.enforce_tls);
        assert!(!params.verify_certificates);
    }

    #[test]
    fn test_password_alone_is_still_anonymous() {
        let record = ManagerRecord::new("https://bmc", None, Some("pw".to_string()));
        let params = ConnectionParams::resolve(&record, false);

        assert_eq!(params.mode, SessionMode::Anonymous);
        assert!(!params.verify_certificates);
    }
}

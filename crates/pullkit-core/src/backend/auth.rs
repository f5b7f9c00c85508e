//! OAuth2 access tokens for a service account (JWT bearer grant).
//!
//! An RS256-signed assertion naming the service account is posted to the
//! key's `token_uri`; the returned access token is cached until shortly
//! before it expires.

use super::credentials::ServiceAccountKey;
use super::http::{self, Request};
use super::BackendError;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use ring::rand::SystemRandom;
use ring::signature::{self, RsaKeyPair};
use serde::Deserialize;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Scopes requested for document database and object storage access.
pub const TOKEN_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/cloud-platform",
    "https://www.googleapis.com/auth/datastore",
    "https://www.googleapis.com/auth/devstorage.read_write",
    "https://www.googleapis.com/auth/firebase",
];

/// Assertion lifetime; the token endpoint caps this at one hour.
const ASSERTION_LIFETIME_SECS: u64 = 3600;

/// Tokens this close to expiry are refreshed.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: SystemTime,
}

impl AccessToken {
    fn is_fresh(&self, now: SystemTime) -> bool {
        now + REFRESH_MARGIN < self.expires_at
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// How backend requests are authorized.
pub enum Authenticator {
    /// No `Authorization` header (local emulators).
    Anonymous,
    ServiceAccount(ServiceAccountAuth),
}

impl Authenticator {
    /// Bearer token for the next request, if any.
    pub fn bearer(&self) -> Result<Option<String>, BackendError> {
        match self {
            Authenticator::Anonymous => Ok(None),
            Authenticator::ServiceAccount(auth) => auth.token().map(Some),
        }
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Authenticator::Anonymous => f.write_str("Anonymous"),
            Authenticator::ServiceAccount(auth) => f
                .debug_tuple("ServiceAccount")
                .field(&auth.client_email)
                .finish(),
        }
    }
}

pub struct ServiceAccountAuth {
    client_email: String,
    private_key_id: String,
    token_uri: String,
    signer: RsaKeyPair,
    timeout: Duration,
    cached: Mutex<Option<AccessToken>>,
}

impl ServiceAccountAuth {
    /// Parses the key's PKCS#8 private key. Fails with `InvalidCredential` if
    /// it is not a usable RSA key.
    pub fn new(key: &ServiceAccountKey, timeout: Duration) -> Result<Self, BackendError> {
        let der = pem_to_der(&key.private_key)?;
        let signer = RsaKeyPair::from_pkcs8(&der).map_err(|e| {
            BackendError::InvalidCredential(format!("private_key rejected: {}", e))
        })?;
        Ok(ServiceAccountAuth {
            client_email: key.client_email.clone(),
            private_key_id: key.private_key_id.clone(),
            token_uri: key.token_uri.clone(),
            signer,
            timeout,
            cached: Mutex::new(None),
        })
    }

    /// Builds a signed JWT assertion issued at `issued_at` (seconds since epoch).
    pub fn assertion(&self, issued_at: u64) -> Result<String, BackendError> {
        let mut header = serde_json::json!({ "alg": "RS256", "typ": "JWT" });
        if !self.private_key_id.is_empty() {
            header["kid"] = serde_json::Value::String(self.private_key_id.clone());
        }
        let claims = serde_json::json!({
            "iss": self.client_email,
            "scope": TOKEN_SCOPES.join(" "),
            "aud": self.token_uri,
            "iat": issued_at,
            "exp": issued_at + ASSERTION_LIFETIME_SECS,
        });

        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header.to_string()),
            URL_SAFE_NO_PAD.encode(claims.to_string())
        );
        let rng = SystemRandom::new();
        let mut sig = vec![0u8; self.signer.public().modulus_len()];
        self.signer
            .sign(
                &signature::RSA_PKCS1_SHA256,
                &rng,
                signing_input.as_bytes(),
                &mut sig,
            )
            .map_err(|_| BackendError::Token("failed to sign assertion".to_string()))?;

        Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(sig)))
    }

    /// Returns a cached token, or requests a new one.
    pub fn token(&self) -> Result<String, BackendError> {
        let mut cached = self.cached.lock().unwrap_or_else(|e| e.into_inner());
        let now = SystemTime::now();
        if let Some(tok) = cached.as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(tok.token.clone());
        }
        let fresh = self.request_token(now)?;
        let token = fresh.token.clone();
        *cached = Some(fresh);
        Ok(token)
    }

    fn request_token(&self, now: SystemTime) -> Result<AccessToken, BackendError> {
        let issued_at = now
            .duration_since(UNIX_EPOCH)
            .map_err(|e| BackendError::Token(format!("system clock before epoch: {}", e)))?
            .as_secs();
        let assertion = self.assertion(issued_at)?;
        let form = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("grant_type", JWT_BEARER_GRANT)
            .append_pair("assertion", &assertion)
            .finish();

        let resp = http::send(&Request {
            url: &self.token_uri,
            bearer: None,
            form: Some(&form),
            timeout: self.timeout,
        })?;
        if !resp.is_success() {
            return Err(BackendError::Token(format!(
                "{} returned HTTP {}: {}",
                self.token_uri,
                resp.status,
                String::from_utf8_lossy(&resp.body).trim()
            )));
        }
        let body: TokenResponse = resp.json(&self.token_uri)?;
        let lifetime = Duration::from_secs(body.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS));
        tracing::debug!(
            client_email = %self.client_email,
            expires_in = lifetime.as_secs(),
            "obtained access token"
        );
        Ok(AccessToken {
            token: body.access_token,
            expires_at: now + lifetime,
        })
    }
}

/// Decodes the base64 body of a PEM block.
fn pem_to_der(pem: &str) -> Result<Vec<u8>, BackendError> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("-----"))
        .collect();
    STANDARD.decode(body.as_bytes()).map_err(|e| {
        BackendError::InvalidCredential(format!("private_key is not valid PEM: {}", e))
    })
}

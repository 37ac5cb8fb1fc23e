// service/storage_service.rs
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Serialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::service::error::ServiceError;

type HmacSha256 = Hmac<Sha256>;

/// Issues time-limited signed URLs for files in the object store and checks
/// them on the way back in. Paths are owner-prefixed
/// (`<owner_id>/<category>/<file>`), which is also the listing key.
#[derive(Debug, Clone)]
pub struct StorageService {
    base_url: String,
    signing_key: Vec<u8>,
    ttl_secs: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SignedUrl {
    pub url: String,
    pub expires_at: i64,
}

impl StorageService {
    pub fn new(base_url: String, signing_key: &str, ttl_secs: i64) -> Self {
        Self {
            base_url,
            signing_key: signing_key.as_bytes().to_vec(),
            ttl_secs,
        }
    }

    fn signature(&self, path: &str, expires_at: i64) -> Result<String, ServiceError> {
        let mut mac = HmacSha256::new_from_slice(&self.signing_key)
            .map_err(|e| ServiceError::Other(e.to_string()))?;
        mac.update(path.as_bytes());
        mac.update(b"\n");
        mac.update(expires_at.to_string().as_bytes());
        let digest = mac.finalize().into_bytes();
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest))
    }

    /// Time-limited download URL for one stored file.
    pub fn signed_url(&self, path: &str) -> Result<SignedUrl, ServiceError> {
        if path.is_empty() || path.contains("..") {
            return Err(ServiceError::Validation(format!(
                "Invalid storage path: {}",
                path
            )));
        }

        let expires_at = Utc::now().timestamp() + self.ttl_secs;
        let sig = self.signature(path, expires_at)?;
        Ok(SignedUrl {
            url: format!(
                "{}/{}?expires={}&signature={}",
                self.base_url.trim_end_matches('/'),
                path,
                expires_at,
                sig
            ),
            expires_at,
        })
    }

    /// Constant-time check of a presented signature, then the expiry.
    pub fn verify(&self, path: &str, expires_at: i64, signature: &str) -> Result<(), ServiceError> {
        let expected = self.signature(path, expires_at)?;
        let matches: bool = expected
            .as_bytes()
            .ct_eq(signature.as_bytes())
            .into();
        if !matches {
            return Err(ServiceError::Validation("Invalid signature".to_string()));
        }
        if Utc::now().timestamp() > expires_at {
            return Err(ServiceError::Validation("URL has expired".to_string()));
        }
        Ok(())
    }

    /// The listing prefix for everything a user owns in one category.
    pub fn owner_prefix(&self, owner_id: uuid::Uuid, category: &str) -> String {
        format!("{}/{}/", owner_id, category)
    }

    /// Canonical path for a fresh upload inside the owner's prefix.
    pub fn object_path(&self, owner_id: uuid::Uuid, category: &str, file_name: &str) -> String {
        let sanitized: String = file_name
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        format!("{}{}", self.owner_prefix(owner_id, category), sanitized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn service() -> StorageService {
        StorageService::new("http://files.local".to_string(), "test-signing-key", 3600)
    }

    #[test]
    fn signed_urls_verify_and_tampered_ones_do_not() {
        let svc = service();
        let path = "abc/documents/id.pdf";
        let signed = svc.signed_url(path).unwrap();

        let sig = signed
            .url
            .rsplit("signature=")
            .next()
            .unwrap()
            .to_string();
        assert!(svc.verify(path, signed.expires_at, &sig).is_ok());
        assert!(svc.verify("abc/documents/other.pdf", signed.expires_at, &sig).is_err());
        assert!(svc.verify(path, signed.expires_at + 1, &sig).is_err());
    }

    #[test]
    fn expired_urls_are_rejected() {
        let svc = StorageService::new("http://files.local".to_string(), "k", -10);
        let signed = svc.signed_url("a/b/c.png").unwrap();
        let sig = signed.url.rsplit("signature=").next().unwrap().to_string();
        assert!(svc.verify("a/b/c.png", signed.expires_at, &sig).is_err());
    }

    #[test]
    fn object_paths_are_owner_prefixed_and_sanitized() {
        let svc = service();
        let owner = Uuid::nil();
        let path = svc.object_path(owner, "documents", "my résumé (1).pdf");
        assert!(path.starts_with(&format!("{}/documents/", owner)));
        assert!(!path.contains(' '));
        assert!(!path.contains('('));

        assert!(svc.signed_url("../etc/passwd").is_err());
    }
}

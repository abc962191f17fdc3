use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Time-limited signed URLs for CV objects. The object store itself is
/// external; we only mint and check the signature over `path:expiry`.

pub fn signature(secret: &str, path: &str, expires_at: i64) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("hmac accepts any key length");
    mac.update(format!("{}:{}", path, expires_at).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

pub fn verify(secret: &str, path: &str, expires_at: i64, sig: &str, now: i64) -> bool {
    if expires_at <= now {
        return false;
    }
    signature(secret, path, expires_at).eq_ignore_ascii_case(sig)
}

/// Full download URL for a stored CV, valid for the configured TTL.
pub fn signed_cv_url(path: &str, now: i64) -> (String, i64) {
    let config = crate::config::get_config();
    let expires_at = now + config.cv_url_ttl_secs;
    let sig = signature(&config.cv_signing_secret, path, expires_at);
    let url = format!(
        "{}/{}?exp={}&sig={}",
        config.storage_base_url.trim_end_matches('/'),
        path,
        expires_at,
        sig
    );
    (url, expires_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_roundtrip_verifies() {
        let sig = signature("secret", "u1/cv.pdf", 1_000);
        assert!(verify("secret", "u1/cv.pdf", 1_000, &sig, 900));
    }

    #[test]
    fn expired_urls_are_rejected() {
        let sig = signature("secret", "u1/cv.pdf", 1_000);
        assert!(!verify("secret", "u1/cv.pdf", 1_000, &sig, 1_000));
        assert!(!verify("secret", "u1/cv.pdf", 1_000, &sig, 2_000));
    }

    #[test]
    fn tampering_breaks_the_signature() {
        let sig = signature("secret", "u1/cv.pdf", 1_000);
        assert!(!verify("secret", "u2/cv.pdf", 1_000, &sig, 900));
        assert!(!verify("secret", "u1/cv.pdf", 2_000, &sig, 900));
        assert!(!verify("other", "u1/cv.pdf", 1_000, &sig, 900));
    }
}

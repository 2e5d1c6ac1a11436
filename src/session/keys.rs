use axum::extract::FromRef;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Signs and verifies cookie values as `value.base64(hmac_sha256(value))`.
#[derive(Clone)]
pub struct SessionKeys {
    secret: Vec<u8>,
}

impl FromRef<AppState> for SessionKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.config.session.secret.as_bytes())
    }
}

impl SessionKeys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            secret: secret.to_vec(),
        }
    }

    fn mac(&self) -> anyhow::Result<HmacSha256> {
        HmacSha256::new_from_slice(&self.secret).map_err(|e| anyhow::anyhow!("hmac key: {e}"))
    }

    pub fn sign(&self, value: &str) -> anyhow::Result<String> {
        let mut mac = self.mac()?;
        mac.update(value.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{value}.{signature}"))
    }

    /// Returns the original value when the signature checks out.
    pub fn verify(&self, signed: &str) -> Option<String> {
        let (value, signature) = signed.rsplit_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;
        let mut mac = self.mac().ok()?;
        mac.update(value.as_bytes());
        mac.verify_slice(&signature).ok()?;
        Some(value.to_string())
    }
}

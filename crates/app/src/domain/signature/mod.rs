//! eSewa message signing and verification.
//!
//! The gateway signs the comma-joined `name=value` rendering of an ordered
//! field list with HMAC-SHA256 and transmits the base64 digest. Both sides
//! must agree on the field order; inbound messages declare theirs in a
//! `signed_field_names` field that is itself part of the signed set.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::gateway::SecretKey;

type HmacSha256 = Hmac<Sha256>;

/// Field order eSewa mandates for outbound payment forms.
pub const OUTBOUND_SIGNED_FIELD_NAMES: &str = "total_amount,transaction_uuid,product_code";

/// Signs and verifies gateway messages with the shared merchant secret.
#[derive(Debug, Clone)]
pub struct Signer {
    secret: SecretKey,
}

impl Signer {
    #[must_use]
    pub fn new(secret: SecretKey) -> Self {
        Self { secret }
    }

    /// Sign an ordered field list.
    #[must_use]
    pub fn sign(&self, fields: &[(&str, &str)]) -> String {
        let message = fields
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(",");

        self.sign_message(&message)
    }

    /// Recompute the signature over exactly the fields named in
    /// `signed_field_names` (in the declared order) and compare it with the
    /// received value. A field the lookup cannot resolve is a mismatch.
    pub fn verify<'a, F>(&self, lookup: F, signed_field_names: &str, received: &str) -> bool
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut fields = Vec::new();

        for name in signed_field_names.split(',') {
            let name = name.trim();

            let Some(value) = lookup(name) else {
                return false;
            };

            fields.push((name, value));
        }

        self.sign(&fields) == received
    }

    fn sign_message(&self, message: &str) -> String {
        let mut mac = match HmacSha256::new_from_slice(self.secret.as_bytes()) {
            Ok(mac) => mac,
            // HMAC accepts keys of any length, so this is unreachable.
            Err(_) => return String::new(),
        };

        mac.update(message.as_bytes());

        BASE64.encode(mac.finalize().into_bytes())
    }
}

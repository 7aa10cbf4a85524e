//! eSewa gateway configuration.

use std::fmt;

use zeroize::Zeroize;

/// eSewa test-environment merchant code.
pub const TEST_MERCHANT_CODE: &str = "EPAYTEST";

/// eSewa published test-environment signing secret.
pub const TEST_SECRET_KEY: &str = "8gBm/:&EnhH.1/q";

const TEST_PAYMENT_URL: &str = "https://rc-epay.esewa.com.np/api/epay/main/v2/form";
const TEST_STATUS_URL: &str = "https://rc.esewa.com.np/api/epay/transaction/status/";
const LIVE_PAYMENT_URL: &str = "https://epay.esewa.com.np/api/epay/main/v2/form";
const LIVE_STATUS_URL: &str = "https://esewa.com.np/api/epay/transaction/status/";

/// Which eSewa environment to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EsewaEnvironment {
    /// The rc-epay sandbox with published test credentials.
    #[default]
    Test,

    /// Production eSewa, requires real merchant credentials.
    Live,
}

/// HMAC signing secret shared with the gateway.
///
/// Zeroized on drop and redacted from `Debug` output.
#[derive(Clone)]
pub struct SecretKey(String);

impl SecretKey {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(**redacted**)")
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Callback endpoints advertised to the gateway and the storefront pages
/// shoppers are redirected to after reconciliation.
#[derive(Debug, Clone)]
pub struct CallbackUrls {
    /// Endpoint eSewa calls back with the signed success payload.
    pub success_url: String,

    /// Endpoint eSewa calls back when the shopper cancels or payment fails.
    pub failure_url: String,

    /// Storefront page for completed payments.
    pub success_page_url: String,

    /// Storefront page for failed payments.
    pub failure_page_url: String,
}

/// Gateway settings resolved for one environment.
#[derive(Debug, Clone)]
pub struct EsewaConfig {
    pub environment: EsewaEnvironment,
    pub payment_url: String,
    pub status_url: String,
    pub merchant_code: String,
    pub secret_key: SecretKey,
    pub urls: CallbackUrls,

    /// Reject callbacks whose signature does not verify. On by default;
    /// turning it off restores the warn-and-continue behavior of the
    /// reference integration.
    pub strict_verification: bool,
}

impl EsewaConfig {
    /// Sandbox configuration with the published eSewa test credentials.
    #[must_use]
    pub fn test(urls: CallbackUrls) -> Self {
        Self {
            environment: EsewaEnvironment::Test,
            payment_url: TEST_PAYMENT_URL.to_owned(),
            status_url: TEST_STATUS_URL.to_owned(),
            merchant_code: TEST_MERCHANT_CODE.to_owned(),
            secret_key: SecretKey::new(TEST_SECRET_KEY),
            urls,
            strict_verification: true,
        }
    }

    /// Production configuration with real merchant credentials.
    #[must_use]
    pub fn live(merchant_code: String, secret_key: SecretKey, urls: CallbackUrls) -> Self {
        Self {
            environment: EsewaEnvironment::Live,
            payment_url: LIVE_PAYMENT_URL.to_owned(),
            status_url: LIVE_STATUS_URL.to_owned(),
            merchant_code,
            secret_key,
            urls,
            strict_verification: true,
        }
    }

    #[must_use]
    pub fn with_strict_verification(mut self, strict: bool) -> Self {
        self.strict_verification = strict;
        self
    }
}

//! eSewa Gateway Config

use clap::Args;
use thiserror::Error;

use pasal_app::gateway::{CallbackUrls, EsewaConfig, SecretKey};

/// Which eSewa environment the server signs for.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum GatewayEnvironment {
    /// rc-epay sandbox with the published test credentials.
    #[default]
    Test,

    /// Production eSewa; requires real merchant credentials.
    Live,
}

#[derive(Debug, Error)]
pub enum GatewayConfigError {
    #[error("ESEWA_MERCHANT_CODE is required when ESEWA_ENV=live")]
    MissingMerchantCode,

    #[error("ESEWA_SECRET_KEY is required when ESEWA_ENV=live")]
    MissingSecretKey,
}

/// eSewa gateway settings.
#[derive(Debug, Args)]
pub struct GatewayConfig {
    /// Gateway environment (test, live)
    #[arg(long, env = "ESEWA_ENV", value_enum, default_value_t = GatewayEnvironment::Test)]
    pub esewa_env: GatewayEnvironment,

    /// Merchant / product code registered with eSewa
    #[arg(long, env = "ESEWA_MERCHANT_CODE")]
    pub esewa_merchant_code: Option<String>,

    /// HMAC signing secret shared with eSewa
    #[arg(long, env = "ESEWA_SECRET_KEY")]
    pub esewa_secret_key: Option<String>,

    /// Callback endpoint eSewa redirects to on success
    #[arg(
        long,
        env = "SUCCESS_URL",
        default_value = "http://localhost:5005/payment/success"
    )]
    pub success_url: String,

    /// Callback endpoint eSewa redirects to on failure
    #[arg(
        long,
        env = "FAILURE_URL",
        default_value = "http://localhost:5005/payment/failure"
    )]
    pub failure_url: String,

    /// Storefront page shoppers land on after a verified payment
    #[arg(long, env = "SUCCESS_PAGE_URL", default_value = "/payment-success.html")]
    pub success_page_url: String,

    /// Storefront page shoppers land on after a failed payment
    #[arg(long, env = "FAILURE_PAGE_URL", default_value = "/payment-failed.html")]
    pub failure_page_url: String,

    /// Reject callbacks whose signature does not verify
    #[arg(long, env = "ESEWA_STRICT_VERIFICATION", default_value_t = true)]
    pub esewa_strict_verification: bool,
}

impl GatewayConfig {
    /// Resolve the gateway settings for the configured environment.
    ///
    /// # Errors
    ///
    /// Returns an error when `live` is selected without merchant
    /// credentials.
    pub fn esewa_config(&self) -> Result<EsewaConfig, GatewayConfigError> {
        let urls = CallbackUrls {
            success_url: self.success_url.clone(),
            failure_url: self.failure_url.clone(),
            success_page_url: self.success_page_url.clone(),
            failure_page_url: self.failure_page_url.clone(),
        };

        let config = match self.esewa_env {
            GatewayEnvironment::Test => EsewaConfig::test(urls),
            GatewayEnvironment::Live => {
                let merchant_code = self
                    .esewa_merchant_code
                    .clone()
                    .ok_or(GatewayConfigError::MissingMerchantCode)?;

                let secret_key = self
                    .esewa_secret_key
                    .as_deref()
                    .map(SecretKey::new)
                    .ok_or(GatewayConfigError::MissingSecretKey)?;

                EsewaConfig::live(merchant_code, secret_key, urls)
            }
        };

        Ok(config.with_strict_verification(self.esewa_strict_verification))
    }
}

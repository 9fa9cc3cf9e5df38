use serde::Deserialize;

use backoffice_core::config::{Config, comma_separated};

/// Admin service configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Comma-separated allow-list of administrator emails. Env var: `ADMIN_EMAILS`.
    #[serde(deserialize_with = "comma_separated")]
    pub admin_emails: Vec<String>,
    /// TCP port to listen on (default 3120). Env var: `ADMIN_PORT`.
    #[serde(default = "default_admin_port")]
    pub admin_port: u16,
    /// Public base URL used to build payment-provider redirect targets.
    pub app_base_url: String,
    /// Cookie `Domain` attribute. Unset yields a host-only cookie.
    #[serde(default)]
    pub cookie_domain: Option<String>,
    #[serde(default = "default_true")]
    pub cookie_secure: bool,
    pub stripe_secret_key: String,
    pub stripe_webhook_secret: String,
    #[serde(default = "default_stripe_api_base")]
    pub stripe_api_base: String,
    /// Currency for catalogue prices created at the provider.
    #[serde(default = "default_stripe_currency")]
    pub stripe_currency: String,
    /// SMTP relay host. Unset selects the log-only mailer.
    #[serde(default)]
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
    #[serde(default = "default_true")]
    pub smtp_starttls: bool,
    #[serde(default)]
    pub email_from: Option<String>,
}

impl Config for AdminConfig {}

impl AdminConfig {
    /// Sender mailbox: `EMAIL_FROM`, else the SMTP user, else a local placeholder.
    pub fn sender(&self) -> String {
        self.email_from
            .clone()
            .or_else(|| self.smtp_username.clone())
            .unwrap_or_else(|| "noreply@localhost".to_owned())
    }

    /// `app_base_url` without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.app_base_url.trim_end_matches('/')
    }
}

fn default_admin_port() -> u16 {
    3120
}

fn default_smtp_port() -> u16 {
    587
}

fn default_stripe_api_base() -> String {
    "https://api.stripe.com".to_owned()
}

fn default_stripe_currency() -> String {
    "aud".to_owned()
}

fn default_true() -> bool {
    true
}

use sea_orm::DatabaseConnection;

use backoffice_auth_types::cookie::CookieSettings;

use crate::config::AdminConfig;
use crate::domain::types::AllowList;
use crate::infra::db::{
    DbAdminRepository, DbHostingCustomerRepository, DbOneTimeCodeRepository, DbOrderRepository,
    DbPlanCatalogRepository, DbSessionRepository, DbWebhookEventRepository,
};
use crate::infra::mail::MailTransport;
use crate::infra::stripe::StripeClient;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub allow_list: AllowList,
    pub cookies: CookieSettings,
    pub app_base_url: String,
    pub webhook_secret: String,
    pub currency: String,
    pub mailer: MailTransport,
    pub stripe: StripeClient,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: &AdminConfig) -> anyhow::Result<Self> {
        Ok(Self {
            db,
            allow_list: AllowList::new(&config.admin_emails),
            cookies: CookieSettings {
                domain: config.cookie_domain.clone(),
                secure: config.cookie_secure,
            },
            app_base_url: config.base_url().to_owned(),
            webhook_secret: config.stripe_webhook_secret.clone(),
            currency: config.stripe_currency.trim().to_lowercase(),
            mailer: MailTransport::from_config(config)?,
            stripe: StripeClient::new(&config.stripe_api_base, config.stripe_secret_key.clone())?,
        })
    }

    pub fn admin_repo(&self) -> DbAdminRepository {
        DbAdminRepository {
            db: self.db.clone(),
        }
    }

    pub fn code_repo(&self) -> DbOneTimeCodeRepository {
        DbOneTimeCodeRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn hosting_repo(&self) -> DbHostingCustomerRepository {
        DbHostingCustomerRepository {
            db: self.db.clone(),
        }
    }

    pub fn webhook_event_repo(&self) -> DbWebhookEventRepository {
        DbWebhookEventRepository {
            db: self.db.clone(),
        }
    }

    pub fn plan_repo(&self) -> DbPlanCatalogRepository {
        DbPlanCatalogRepository {
            db: self.db.clone(),
        }
    }

    pub fn order_repo(&self) -> DbOrderRepository {
        DbOrderRepository {
            db: self.db.clone(),
        }
    }
}

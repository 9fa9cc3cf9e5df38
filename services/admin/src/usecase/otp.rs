use chrono::{DateTime, Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use backoffice_auth_types::token::hash_secret;
use backoffice_domain::email::EmailAddress;

use crate::domain::repository::{
    AdminRepository, Mailer, OneTimeCodeRepository, SessionRepository,
};
use crate::domain::types::{Admin, AllowList, OTP_DIGITS, OTP_TTL_SECS, OneTimeCode};
use crate::error::AdminServiceError;
use crate::templates::otp_email;

/// Uniform `000000..=999999`, zero-padded.
pub fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..10u32.pow(OTP_DIGITS as u32));
    format!("{n:0width$}", width = OTP_DIGITS)
}

fn is_well_formed_code(code: &str) -> bool {
    code.len() == OTP_DIGITS && code.bytes().all(|b| b.is_ascii_digit())
}

fn parse_email(raw: &str) -> Result<EmailAddress, AdminServiceError> {
    if raw.trim().is_empty() {
        return Err(AdminServiceError::Validation("email is required"));
    }
    EmailAddress::parse(raw).map_err(|_| AdminServiceError::Validation("invalid email address"))
}

/// Provision an admin account on first sight of an allow-listed email.
pub(crate) async fn ensure_admin<A: AdminRepository>(
    admins: &A,
    email: &EmailAddress,
    now: DateTime<Utc>,
) -> Result<Admin, AdminServiceError> {
    if let Some(admin) = admins.find_by_email(email.as_str()).await? {
        return Ok(admin);
    }
    let admin = Admin::provision(email, now);
    admins.create(&admin).await?;
    tracing::info!(admin_id = %admin.id, "provisioned admin account");
    Ok(admin)
}

// ── Request ──────────────────────────────────────────────────────────────────

pub struct RequestCodeInput {
    pub email: String,
    /// Session token currently held by the caller, if any.
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestCodeOutcome {
    /// A code was stored and emailed.
    Issued,
    /// The caller already holds a remembered session for this email.
    SkipOtp,
}

pub struct RequestCodeUseCase<A, C, S, M>
where
    A: AdminRepository,
    C: OneTimeCodeRepository,
    S: SessionRepository,
    M: Mailer,
{
    pub admins: A,
    pub codes: C,
    pub sessions: S,
    pub mailer: M,
    pub allow_list: AllowList,
}

impl<A, C, S, M> RequestCodeUseCase<A, C, S, M>
where
    A: AdminRepository,
    C: OneTimeCodeRepository,
    S: SessionRepository,
    M: Mailer,
{
    pub async fn execute(
        &self,
        input: RequestCodeInput,
    ) -> Result<RequestCodeOutcome, AdminServiceError> {
        let email = parse_email(&input.email)?;
        if !self.allow_list.contains(&email) {
            return Err(AdminServiceError::Unauthorized);
        }

        let now = Utc::now();

        if let Some(token) = input.session_token.as_deref() {
            let held = self
                .sessions
                .find_valid_by_hash(&hash_secret(token), now)
                .await?;
            if held.is_some_and(|s| s.remember_me && s.email == email.as_str()) {
                return Ok(RequestCodeOutcome::SkipOtp);
            }
        }

        ensure_admin(&self.admins, &email, now).await?;

        let purged_codes = self.codes.purge_expired(now).await?;
        let purged_sessions = self.sessions.purge_expired(now).await?;
        if purged_codes + purged_sessions > 0 {
            tracing::debug!(purged_codes, purged_sessions, "purged expired credentials");
        }

        let code = generate_code();
        let record = OneTimeCode {
            id: Uuid::now_v7(),
            email: email.as_str().to_owned(),
            code_hash: hash_secret(&code),
            created_at: now,
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
        };
        // Committed before dispatch so a delivery failure leaves a verifiable code.
        self.codes.replace_for_email(&record).await?;

        self.mailer
            .send(&otp_email(email.as_str(), &code))
            .await
            .map_err(AdminServiceError::Delivery)?;

        Ok(RequestCodeOutcome::Issued)
    }
}

// ── Verify ───────────────────────────────────────────────────────────────────

pub struct VerifyCodeInput {
    pub email: String,
    pub code: String,
}

pub struct VerifyCodeUseCase<C>
where
    C: OneTimeCodeRepository,
{
    pub codes: C,
    pub allow_list: AllowList,
}

impl<C> VerifyCodeUseCase<C>
where
    C: OneTimeCodeRepository,
{
    /// Returns the verified email on success, `None` on a wrong or expired code.
    ///
    /// The lookup matches on the code hash alone. A successful match consumes
    /// every row with that hash.
    pub async fn execute(
        &self,
        input: VerifyCodeInput,
    ) -> Result<Option<EmailAddress>, AdminServiceError> {
        let email = parse_email(&input.email)?;
        let code = input.code.trim();
        if code.is_empty() {
            return Err(AdminServiceError::Validation("code is required"));
        }
        if !is_well_formed_code(code) {
            return Err(AdminServiceError::Validation("code must be 6 digits"));
        }
        if !self.allow_list.contains(&email) {
            return Err(AdminServiceError::Unauthorized);
        }

        let code_hash = hash_secret(code);
        let Some(found) = self.codes.find_valid_by_hash(&code_hash, Utc::now()).await? else {
            return Ok(None);
        };
        self.codes.delete_by_hash(&code_hash).await?;

        if found.email != email.as_str() {
            tracing::warn!("one-time code was issued to a different email");
        }
        Ok(Some(email))
    }
}

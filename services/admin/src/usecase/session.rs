use chrono::{DateTime, Utc};
use uuid::Uuid;

use backoffice_auth_types::token::{generate_session_token, hash_secret};
use backoffice_domain::email::EmailAddress;

use crate::domain::repository::{AdminRepository, SessionRepository};
use crate::domain::types::{Admin, Session};
use crate::error::AdminServiceError;
use crate::usecase::otp::ensure_admin;

pub struct CreateSessionInput {
    pub email: EmailAddress,
    pub remember_me: bool,
}

/// Plaintext token handed to the caller, plus the stored session.
pub struct IssuedSession {
    pub token: String,
    pub session: Session,
}

impl IssuedSession {
    /// Cookie `Max-Age` matching the session TTL.
    pub fn max_age_secs(&self) -> i64 {
        (self.session.expires_at - self.session.created_at).num_seconds()
    }
}

pub struct CreateSessionUseCase<S>
where
    S: SessionRepository,
{
    pub sessions: S,
}

impl<S> CreateSessionUseCase<S>
where
    S: SessionRepository,
{
    pub async fn execute(&self, input: CreateSessionInput) -> Result<IssuedSession, AdminServiceError> {
        self.execute_at(input, Utc::now()).await
    }

    pub async fn execute_at(
        &self,
        input: CreateSessionInput,
        now: DateTime<Utc>,
    ) -> Result<IssuedSession, AdminServiceError> {
        let token = generate_session_token();
        let session = Session {
            id: Uuid::now_v7(),
            email: input.email.as_str().to_owned(),
            token_hash: hash_secret(&token),
            remember_me: input.remember_me,
            created_at: now,
            expires_at: now + Session::ttl(input.remember_me),
        };
        self.sessions.create(&session).await?;
        Ok(IssuedSession { token, session })
    }
}

/// Resolves a held token to its session. Absent or expired yields `None`.
pub struct ResolveSessionUseCase<S>
where
    S: SessionRepository,
{
    pub sessions: S,
}

impl<S> ResolveSessionUseCase<S>
where
    S: SessionRepository,
{
    pub async fn execute(&self, token: Option<&str>) -> Result<Option<Session>, AdminServiceError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        self.sessions
            .find_valid_by_hash(&hash_secret(token), Utc::now())
            .await
    }
}

pub struct DestroySessionUseCase<S>
where
    S: SessionRepository,
{
    pub sessions: S,
}

impl<S> DestroySessionUseCase<S>
where
    S: SessionRepository,
{
    /// Idempotent: a missing or unknown token is not an error.
    pub async fn execute(&self, token: Option<&str>) -> Result<(), AdminServiceError> {
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.sessions.delete_by_hash(&hash_secret(token)).await?;
        }
        Ok(())
    }
}

/// Session check: resolves the session and returns the admin profile.
pub struct CurrentAdminUseCase<A, S>
where
    A: AdminRepository,
    S: SessionRepository,
{
    pub admins: A,
    pub sessions: S,
}

impl<A, S> CurrentAdminUseCase<A, S>
where
    A: AdminRepository,
    S: SessionRepository,
{
    pub async fn execute(&self, token: Option<&str>) -> Result<Option<Admin>, AdminServiceError> {
        let Some(token) = token.filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        let now = Utc::now();
        let Some(session) = self
            .sessions
            .find_valid_by_hash(&hash_secret(token), now)
            .await?
        else {
            return Ok(None);
        };
        let email = EmailAddress::parse(&session.email)
            .map_err(|_| anyhow::anyhow!("stored session has an invalid email"))?;
        let admin = ensure_admin(&self.admins, &email, now).await?;
        Ok(Some(admin))
    }
}

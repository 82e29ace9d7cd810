use crate::error::{Error, Result};
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub mod sts;

/// Temporary AWS credentials for one role.
#[derive(Clone, PartialEq)]
pub struct Credential {
    pub(crate) access_key_id: String,
    pub(crate) secret_access_key: String,
    pub(crate) session_token: String,
    pub(crate) role_arn: String,
    pub(crate) expiration: OffsetDateTime,
}

impl Credential {
    pub fn new(
        access_key_id: String,
        secret_access_key: String,
        session_token: String,
        role_arn: String,
        expiration: OffsetDateTime,
    ) -> Credential {
        Credential {
            access_key_id,
            secret_access_key,
            session_token,
            role_arn,
            expiration,
        }
    }

    pub fn access_key_id(&self) -> String {
        self.access_key_id.clone()
    }

    pub fn secret_access_key(&self) -> String {
        self.secret_access_key.clone()
    }

    pub fn session_token(&self) -> String {
        self.session_token.clone()
    }

    pub fn role_arn(&self) -> String {
        self.role_arn.clone()
    }

    pub fn expiration(&self) -> OffsetDateTime {
        self.expiration
    }

    pub fn expiration_rfc3339(&self) -> Result<String> {
        self.expiration
            .format(&Rfc3339)
            .map_err(|e| Error::Exchange(format!("could not format expiration: {}", e)))
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("role_arn", &self.role_arn)
            .field("expiration", &self.expiration)
            .finish()
    }
}

//! Command line login to AWS through a ForgeRock (OpenAM) identity provider.
//!
//! The flow is: authenticate against the provider's callback API, fetch the
//! SAML assertion from IdP initiated SSO, pick one of the roles it offers and
//! trade it for temporary credentials with STS `AssumeRoleWithSAML`.

pub mod aws;
pub mod error;
mod http;
pub mod openam;
pub mod prompt;
pub mod saml;
pub mod settings;

pub use error::{Error, Result};

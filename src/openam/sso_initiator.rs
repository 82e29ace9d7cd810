use crate::error::{Error, Result};
use crate::openam::auth_session::{AuthSession, Status};
use log::debug;
use select::document::Document;
use select::predicate::{Attr, Child, Name, Predicate};

/// Asks the provider to start IdP-initiated SSO and returns the base64
/// `SAMLResponse` it posts back, exactly as received.
pub async fn fetch_assertion(session: &AuthSession) -> Result<String> {
    if session.status() != Status::Success {
        return Err(Error::State(String::from("user is not authenticated")));
    }

    let reply = session.api().idp_sso_init().await?;
    debug!("idpssoinit answered with HTTP {}", reply.status);

    match extract_saml_response(reply.body.as_str()) {
        Err(Error::Protocol(reason)) if reply.status != 200 => Err(Error::Protocol(format!(
            "{} (idpssoinit answered HTTP {})",
            reason, reply.status
        ))),
        result => result,
    }
}

/// Finds `html > body > form > input[name="SAMLResponse"]` and returns its value.
pub fn extract_saml_response(html: &str) -> Result<String> {
    let document = Document::from(html);
    let predicate = Child(
        Child(Child(Name("html"), Name("body")), Name("form")),
        Name("input").and(Attr("name", "SAMLResponse")),
    );

    let value = document
        .find(predicate)
        .next()
        .and_then(|node| node.attr("value"))
        .filter(|value| !value.is_empty())
        .ok_or_else(|| Error::Protocol(String::from("could not get SAMLResponse")))?;

    Ok(value.to_string())
}

//! Client side of the OpenAM (ForgeRock AM) REST authentication and IdP
//! initiated SSO endpoints.

use crate::error::{Error, Result};
use url::Url;

pub mod api_responses;
pub mod auth_session;
pub mod authenticator;
pub mod callbacks;
pub mod openam_api;
pub mod sso_initiator;

/// Where the identity provider lives and which service provider we log into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    base_uri: String,
    realm: String,
    sp_entity_id: String,
}

impl ProviderConfig {
    pub fn new(base_uri: &str, realm: &str, sp_entity_id: &str) -> Result<ProviderConfig> {
        // validate now so that building endpoint urls later cannot fail on the base
        Url::parse(base_uri)?;

        if sp_entity_id.is_empty() {
            return Err(Error::Config(String::from("SP entity id cannot be empty")));
        }

        Ok(ProviderConfig {
            base_uri: base_uri.trim_end_matches('/').to_string(),
            realm: normalize_realm(realm),
            sp_entity_id: sp_entity_id.to_string(),
        })
    }

    pub fn realm(&self) -> &str {
        &self.realm
    }

    pub fn sp_entity_id(&self) -> &str {
        &self.sp_entity_id
    }

    /// `{base}/openam/json{realm}/authenticate`
    pub fn authenticate_url(&self) -> Result<Url> {
        let url = format!("{}/openam/json{}/authenticate", self.base_uri, self.realm);

        Ok(Url::parse(url.as_str())?)
    }

    /// `{base}/openam/idpssoinit?spEntityID=..&redirected=true&metaAlias={realm}/idp`
    pub fn idp_sso_init_url(&self) -> Result<Url> {
        let mut url = Url::parse(format!("{}/openam/idpssoinit", self.base_uri).as_str())?;

        url.query_pairs_mut()
            .append_pair("spEntityID", self.sp_entity_id.as_str())
            .append_pair("redirected", "true")
            .append_pair("metaAlias", self.meta_alias().as_str());

        Ok(url)
    }

    fn meta_alias(&self) -> String {
        format!("{}/idp", self.realm)
    }
}

/// `"customers/"` becomes `"/customers"`, the root realm becomes `""`.
fn normalize_realm(realm: &str) -> String {
    let realm = realm.trim().trim_matches('/');

    if realm.is_empty() {
        String::new()
    } else {
        format!("/{}", realm)
    }
}

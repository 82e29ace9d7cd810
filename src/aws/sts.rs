use crate::aws::Credential;
use crate::error::{Error, Result};
use crate::saml::roles::RoleRecord;
use async_trait::async_trait;
use aws_sdk_sts::config::{BehaviorVersion, Region};
use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_smithy_types_convert::date_time::DateTimeExt;
use log::{debug, info};

pub const DEFAULT_REGION: &str = "us-east-1";

/// Parameters of one `AssumeRoleWithSAML` call.
pub struct AssumeRoleRequest {
    pub role_arn: String,
    pub principal_arn: String,
    pub saml_assertion: String,
    pub duration_seconds: Option<i32>,
}

#[async_trait]
pub trait StsApi: Send + Sync {
    async fn assume_role_with_saml(&self, request: AssumeRoleRequest) -> Result<Credential>;
}

/// STS over the AWS SDK. `AssumeRoleWithSAML` is an unsigned call, so the
/// client carries no credentials of its own.
pub struct Sts {
    client: aws_sdk_sts::Client,
}

impl Sts {
    pub fn new(region: &str) -> Sts {
        Sts::from_builder(Sts::config_builder(region))
    }

    /// Talks to `endpoint_url` instead of the regional STS endpoint.
    pub fn with_endpoint(region: &str, endpoint_url: &str) -> Sts {
        Sts::from_builder(Sts::config_builder(region).endpoint_url(endpoint_url))
    }

    fn config_builder(region: &str) -> aws_sdk_sts::config::Builder {
        aws_sdk_sts::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
    }

    fn from_builder(builder: aws_sdk_sts::config::Builder) -> Sts {
        Sts {
            client: aws_sdk_sts::Client::from_conf(builder.build()),
        }
    }
}

#[async_trait]
impl StsApi for Sts {
    async fn assume_role_with_saml(&self, request: AssumeRoleRequest) -> Result<Credential> {
        let response = self
            .client
            .assume_role_with_saml()
            .role_arn(request.role_arn.as_str())
            .principal_arn(request.principal_arn.as_str())
            .saml_assertion(request.saml_assertion)
            .set_duration_seconds(request.duration_seconds)
            .send()
            .await
            .map_err(|e| Error::Exchange(sdk_error_message(e)))?;

        let credentials = response
            .credentials()
            .ok_or_else(|| Error::Exchange(String::from("STS returned no credentials")))?;

        let expiration = (*credentials.expiration())
            .to_time()
            .map_err(|e| Error::Exchange(format!("invalid expiration: {}", e)))?;

        Ok(Credential {
            access_key_id: credentials.access_key_id().to_string(),
            secret_access_key: credentials.secret_access_key().to_string(),
            session_token: credentials.session_token().to_string(),
            role_arn: request.role_arn,
            expiration,
        })
    }
}

/// The provider's own words when it sent any, the whole error chain otherwise.
fn sdk_error_message<E, R>(error: SdkError<E, R>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if let Some(service_error) = error.as_service_error() {
        if let Some(message) = service_error.message() {
            return match service_error.code() {
                Some(code) => format!("{}: {}", code, message),
                None => message.to_string(),
            };
        }
    }

    DisplayErrorContext(&error).to_string()
}

/// Trades a SAML assertion and a chosen role for temporary credentials.
pub struct CredentialExchanger {
    api: Box<dyn StsApi>,
    duration_seconds: Option<i32>,
}

impl CredentialExchanger {
    pub fn new(region: &str, duration_seconds: Option<i32>) -> CredentialExchanger {
        CredentialExchanger {
            api: Box::new(Sts::new(region)),
            duration_seconds,
        }
    }

    pub fn with_api(api: Box<dyn StsApi>, duration_seconds: Option<i32>) -> CredentialExchanger {
        CredentialExchanger {
            api,
            duration_seconds,
        }
    }

    /// `raw_assertion` is sent exactly as the provider issued it.
    pub async fn exchange(&self, role: &RoleRecord, raw_assertion: &str) -> Result<Credential> {
        debug!(
            "assuming {} through {}",
            role.role_arn, role.principal_arn
        );

        let request = AssumeRoleRequest {
            role_arn: role.role_arn.clone(),
            principal_arn: role.principal_arn.clone(),
            saml_assertion: raw_assertion.to_string(),
            duration_seconds: self.duration_seconds,
        };

        let credential = self.api.assume_role_with_saml(request).await?;
        info!("received credentials for {}", credential.role_arn);

        Ok(credential)
    }
}

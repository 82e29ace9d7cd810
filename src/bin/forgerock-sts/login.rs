use crate::utils::TerminalPrompter;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use forgerock_sts::aws::sts::CredentialExchanger;
use forgerock_sts::aws::Credential;
use forgerock_sts::openam::auth_session::AuthSession;
use forgerock_sts::openam::authenticator::authenticate;
use forgerock_sts::openam::sso_initiator::fetch_assertion;
use forgerock_sts::prompt::Prompter;
use forgerock_sts::saml::assertion::SamlAssertion;
use forgerock_sts::saml::roles::{RoleCatalog, RoleRecord};
use forgerock_sts::settings::AppConfig;
use log::info;
use serde_json::json;
use time::macros::format_description;
use time::UtcOffset;

#[derive(ValueEnum, PartialEq, Debug, Clone, Copy, Default)]
enum OutputOptions {
    #[default]
    Text,
    Env,
    AwsProfile,
}

/// Logs in and prints temporary AWS credentials
#[derive(Parser)]
pub struct Login {
    /// Assume this role instead of asking which one
    #[arg(short, long)]
    role_arn: Option<String>,
    #[arg(long, value_enum, default_value_t)]
    output: OutputOptions,
}

impl Login {
    /// `local_offset` is only used to show when the credentials expire.
    pub async fn run(&self, local_offset: UtcOffset) -> Result<()> {
        let settings = AppConfig::read_config()?;
        let provider = settings.provider();
        let prompter = TerminalPrompter;

        let session = AuthSession::new(provider.provider_config()?, provider.request_timeout())?;
        let session = authenticate(session, &prompter)
            .await
            .context("error while logging into the identity provider")?;

        let encoded = fetch_assertion(&session)
            .await
            .context("error while performing SSO initialisation")?;
        let assertion = SamlAssertion::parse(encoded.as_str())
            .context("error while parsing encoded SAML response")?;

        let catalog = RoleCatalog::from_assertion(&assertion)?;
        if catalog.is_empty() {
            return Err(anyhow!("the SAML assertion does not offer any AWS role"));
        }
        info!("assertion offers {} role(s)", catalog.len());

        let role = self.choose_role(&catalog, &prompter)?;

        let exchanger = CredentialExchanger::new(
            settings.region().as_str(),
            settings.session_duration_secs(),
        );
        let credential = exchanger
            .exchange(role, assertion.raw())
            .await
            .context("error while logging into STS using role")?;

        println!("{}", render_credential(&credential, self.output, local_offset)?);

        Ok(())
    }

    fn choose_role<'a>(
        &self,
        catalog: &'a RoleCatalog,
        prompter: &dyn Prompter,
    ) -> Result<&'a RoleRecord> {
        if let Some(role_arn) = &self.role_arn {
            return Ok(catalog.find(role_arn)?);
        }

        eprintln!("Please choose the role you would like to assume:");
        for line in catalog.menu() {
            eprintln!("{}", line);
        }
        let selection = prompter.ask("Selection:")?;

        Ok(catalog.select_input(selection.as_str())?)
    }
}

fn render_credential(
    credential: &Credential,
    output: OutputOptions,
    local_offset: UtcOffset,
) -> Result<String> {
    let rendered = match output {
        OutputOptions::Text => {
            let expiration = credential.expiration().to_offset(local_offset).format(
                format_description!(
                    "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
                ),
            )?;

            format!(
                "\nAccess Key ID: {}\nSecret Access Key: {}\nSession Token: {}\n\nExpiration at {}",
                credential.access_key_id(),
                credential.secret_access_key(),
                credential.session_token(),
                expiration
            )
        }
        OutputOptions::Env => format!(
            "export AWS_ROLE_ARN=\"{}\"\nexport AWS_ACCESS_KEY_ID=\"{}\"\nexport AWS_SECRET_ACCESS_KEY=\"{}\"\nexport AWS_SESSION_TOKEN=\"{}\"",
            credential.role_arn(),
            credential.access_key_id(),
            credential.secret_access_key(),
            credential.session_token()
        ),
        OutputOptions::AwsProfile => json!({
            "Version": 1,
            "AccessKeyId" : credential.access_key_id(),
            "SecretAccessKey" : credential.secret_access_key(),
            "SessionToken" : credential.session_token(),
            "Expiration" : credential.expiration_rfc3339()?
        })
        .to_string(),
    };

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forgerock_sts::Error;
    use time::macros::{datetime, offset};

    const FOO: &str = "arn:aws:iam::111:role/Foo,arn:aws:iam::111:saml-provider/Bar";
    const BAZ: &str = "arn:aws:iam::222:role/Baz,arn:aws:iam::222:saml-provider/Bar";

    struct PrompterTest {
        answer: &'static str,
    }

    impl Prompter for PrompterTest {
        fn ask(&self, _prompt: &str) -> forgerock_sts::Result<String> {
            Ok(self.answer.to_string())
        }

        fn ask_secret(&self, _prompt: &str) -> forgerock_sts::Result<String> {
            Err(Error::State(String::from("no secret expected")))
        }
    }

    fn credential() -> Credential {
        Credential::new(
            String::from("AKIAEXAMPLE"),
            String::from("TheSecretAccessKey"),
            String::from("TheSessionToken"),
            String::from("arn:aws:iam::111:role/Foo"),
            datetime!(2026-10-18 12:30:00 UTC),
        )
    }

    fn login(role_arn: Option<&str>) -> Login {
        Login {
            role_arn: role_arn.map(String::from),
            output: OutputOptions::default(),
        }
    }

    #[test]
    fn test_render_text_uses_local_offset() {
        let text = render_credential(&credential(), OutputOptions::Text, offset!(+2)).unwrap();

        assert_eq!(
            text,
            "\nAccess Key ID: AKIAEXAMPLE\nSecret Access Key: TheSecretAccessKey\nSession Token: TheSessionToken\n\nExpiration at 2026-10-18 14:30:00 +02:00"
        );
    }

    #[test]
    fn test_render_env() {
        let env = render_credential(&credential(), OutputOptions::Env, UtcOffset::UTC).unwrap();

        assert_eq!(
            env.lines().collect::<Vec<&str>>(),
            vec![
                "export AWS_ROLE_ARN=\"arn:aws:iam::111:role/Foo\"",
                "export AWS_ACCESS_KEY_ID=\"AKIAEXAMPLE\"",
                "export AWS_SECRET_ACCESS_KEY=\"TheSecretAccessKey\"",
                "export AWS_SESSION_TOKEN=\"TheSessionToken\"",
            ]
        );
    }

    #[test]
    fn test_render_aws_profile() {
        let rendered =
            render_credential(&credential(), OutputOptions::AwsProfile, offset!(+2)).unwrap();
        let document: serde_json::Value = serde_json::from_str(rendered.as_str()).unwrap();

        assert_eq!(
            document,
            json!({
                "Version": 1,
                "AccessKeyId": "AKIAEXAMPLE",
                "SecretAccessKey": "TheSecretAccessKey",
                "SessionToken": "TheSessionToken",
                "Expiration": "2026-10-18T12:30:00Z"
            })
        );
    }

    #[test]
    fn test_choose_role_by_arn() {
        let catalog = RoleCatalog::parse_roles(&[FOO, BAZ]).unwrap();
        let prompter = PrompterTest { answer: "0" };

        let role = login(Some("arn:aws:iam::222:role/Baz"))
            .choose_role(&catalog, &prompter)
            .unwrap();

        assert_eq!(role, &catalog.roles()[1]);
    }

    #[test]
    fn test_choose_unknown_role_arn() {
        let catalog = RoleCatalog::parse_roles(&[FOO]).unwrap();
        let prompter = PrompterTest { answer: "0" };

        let result = login(Some("arn:aws:iam::333:role/Nope")).choose_role(&catalog, &prompter);

        assert!(result.is_err());
    }

    #[test]
    fn test_choose_role_from_menu() {
        let catalog = RoleCatalog::parse_roles(&[FOO, BAZ]).unwrap();
        let prompter = PrompterTest { answer: "1" };

        let role = login(None).choose_role(&catalog, &prompter).unwrap();

        assert_eq!(role.role_arn, "arn:aws:iam::222:role/Baz");
    }
}

use crate::error::{Error, Result};
use crate::saml::assertion::SamlAssertion;
use log::warn;
use std::fmt::{Display, Formatter};

/// Attribute listing the AWS roles the user may assume.
pub const ROLE_ATTRIBUTE: &str = "https://aws.amazon.com/SAML/Attributes/Role";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRecord {
    pub role_arn: String,
    pub principal_arn: String,
}

impl RoleRecord {
    fn looks_swapped(&self) -> bool {
        self.role_arn.contains(":saml-provider/") && self.principal_arn.contains(":role/")
    }
}

impl Display for RoleRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.role_arn)
    }
}

/// Roles offered by an assertion, numbered in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleCatalog {
    roles: Vec<RoleRecord>,
}

impl RoleCatalog {
    /// Parses `"<role arn>,<principal arn>"` values.
    ///
    /// The first field is taken as the role and the second as the principal,
    /// the way the provider is configured to send them. Values where that looks
    /// reversed are reported but kept as they are.
    pub fn parse_roles<S: AsRef<str>>(values: &[S]) -> Result<RoleCatalog> {
        let mut roles = vec![];

        for value in values {
            let value = value.as_ref();
            let split: Vec<&str> = value.split(',').collect();
            if split.len() < 2 {
                return Err(Error::Parse(format!("role attribute value `{}`", value)));
            }

            let role = RoleRecord {
                role_arn: split[0].to_string(),
                principal_arn: split[1].to_string(),
            };
            if role.looks_swapped() {
                warn!(
                    "role attribute `{}` lists the principal first; check the provider's attribute mapping",
                    value
                );
            }

            roles.push(role);
        }

        Ok(RoleCatalog { roles })
    }

    pub fn from_assertion(assertion: &SamlAssertion) -> Result<RoleCatalog> {
        RoleCatalog::parse_roles(assertion.all_values(ROLE_ATTRIBUTE).as_slice())
    }

    pub fn roles(&self) -> &[RoleRecord] {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    pub fn select(&self, index: i64) -> Result<&RoleRecord> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.roles.get(index))
            .ok_or_else(|| Error::Selection(format!("{} is not a listed role", index)))
    }

    /// Selects from what the user typed at the prompt.
    pub fn select_input(&self, input: &str) -> Result<&RoleRecord> {
        let index: i64 = input
            .trim()
            .parse()
            .map_err(|_| Error::Selection(format!("`{}` is not a number", input.trim())))?;

        self.select(index)
    }

    pub fn find(&self, role_arn: &str) -> Result<&RoleRecord> {
        self.roles
            .iter()
            .find(|role| role.role_arn == role_arn)
            .ok_or_else(|| Error::Selection(format!("could not find role_arn {}", role_arn)))
    }

    /// `[i] role arn` lines, the way the roles are offered to the user.
    pub fn menu(&self) -> Vec<String> {
        self.roles
            .iter()
            .enumerate()
            .map(|(index, role)| format!("[{}] {}", index, role))
            .collect()
    }
}

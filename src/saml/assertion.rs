use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq)]
struct Response {
    #[serde(rename = "Assertion")]
    assertion: Assertion,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
struct Assertion {
    #[serde(rename = "AttributeStatement")]
    attribute_statement: AttributeStatement,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
struct AttributeStatement {
    #[serde(rename = "Attribute", default)]
    attributes: Vec<Attribute>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
struct Attribute {
    #[serde(rename = "@Name")]
    name: String,
    #[serde(rename = "AttributeValue", default)]
    values: Vec<AttributeValue>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
struct AttributeValue {
    #[serde(rename = "$text", default)]
    value: String,
}

/// A decoded `samlp:Response`, reduced to the attributes of its assertion.
#[derive(Debug, Clone)]
pub struct SamlAssertion {
    raw: String,
    response: Response,
}

impl SamlAssertion {
    /// Decodes the base64 `SAMLResponse` and reads its attribute statement.
    pub fn parse(encoded: &str) -> Result<SamlAssertion> {
        // some providers wrap the base64 text over several lines
        let compact: String = encoded
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();

        let bytes = STANDARD
            .decode(compact)
            .map_err(|e| Error::Decode(e.to_string()))?;
        let xml = String::from_utf8(bytes).map_err(|e| Error::Decode(e.to_string()))?;

        let response: Response = quick_xml::de::from_str(xml.as_str())
            .map_err(|e| Error::Parse(format!("SAML response: {}", e)))?;

        Ok(SamlAssertion {
            raw: encoded.to_string(),
            response,
        })
    }

    /// The base64 text exactly as it was handed to [`SamlAssertion::parse`].
    pub fn raw(&self) -> &str {
        self.raw.as_str()
    }

    /// First value of the first attribute called `name`, or `""`.
    pub fn first_value(&self, name: &str) -> String {
        self.attributes()
            .find(|attribute| attribute.name == name)
            .and_then(|attribute| attribute.values.first())
            .map(|value| value.value.clone())
            .unwrap_or_default()
    }

    /// Every value of every attribute called `name`, in document order.
    pub fn all_values(&self, name: &str) -> Vec<String> {
        self.attributes()
            .filter(|attribute| attribute.name == name)
            .flat_map(|attribute| attribute.values.iter())
            .map(|value| value.value.clone())
            .collect()
    }

    fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.response
            .assertion
            .attribute_statement
            .attributes
            .iter()
    }
}

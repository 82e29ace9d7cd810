use crate::openam::auth_session::Status;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of every reply from the `authenticate` endpoint.
///
/// A reply in the middle of a login carries an `authId` and the callbacks that
/// still need answers. The final reply carries a `tokenId`. Rejections come back
/// as `{"code": 401, "reason": "Unauthorized", "message": "..."}`, so every field
/// is optional.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResponse {
    auth_id: Option<String>,
    token_id: Option<String>,
    #[serde(default)]
    callbacks: Vec<RawCallback>,
    code: Option<u16>,
    reason: Option<String>,
    message: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RawCallback {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub output: Vec<CallbackOutput>,
    #[serde(default)]
    pub input: Vec<CallbackInput>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CallbackOutput {
    pub name: String,
    pub value: Value,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CallbackInput {
    pub name: String,
    pub value: Value,
}

impl ProviderResponse {
    pub fn auth_id(&self) -> Option<String> {
        self.auth_id.clone().filter(|id| !id.is_empty())
    }

    pub fn token_id(&self) -> Option<String> {
        self.token_id.clone().filter(|token| !token.is_empty())
    }

    pub fn callbacks(&self) -> &[RawCallback] {
        &self.callbacks
    }

    /// Human readable reason for a rejected login, if the provider sent one.
    pub fn rejection(&self) -> Option<String> {
        match (&self.reason, &self.message) {
            (Some(reason), Some(message)) => Some(format!("{} - {}", reason, message)),
            (None, Some(message)) => Some(message.clone()),
            (Some(reason), None) => Some(reason.clone()),
            (None, None) => self.code.map(|code| format!("provider returned code {}", code)),
        }
    }

    /// Status of the session after this reply arrived with `http_status`.
    ///
    /// A non-200 status always wins over a token. A 200 without a token and
    /// without callbacks leaves nothing to answer, which is a failed login.
    pub fn evaluate(&self, http_status: u16) -> Status {
        if http_status != 200 {
            return Status::Failure;
        }

        if self.token_id().is_some() {
            Status::Success
        } else if self.callbacks.is_empty() {
            Status::Failure
        } else {
            Status::InProgress
        }
    }
}

impl RawCallback {
    /// Text of the `prompt` output, empty when the callback has none.
    pub fn prompt(&self) -> String {
        self.output
            .iter()
            .find(|output| output.name == "prompt")
            .and_then(|output| output.value.as_str())
            .unwrap_or_default()
            .to_string()
    }

    /// Name of the first input still waiting for a value.
    ///
    /// OpenAM sends pre-filled inputs next to the one the user has to answer;
    /// the unanswered one holds `""` or `"0"`.
    pub fn awaiting_input(&self) -> Option<&str> {
        self.input
            .iter()
            .find(|input| awaits_value(&input.value))
            .map(|input| input.name.as_str())
    }
}

fn awaits_value(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty() || s == "0",
        Value::Number(n) => n.as_i64() == Some(0),
        _ => false,
    }
}

/// Request body sent back to the `authenticate` endpoint.
#[derive(Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub auth_id: String,
    pub callbacks: Vec<SubmittedCallback>,
}

#[derive(Serialize, Clone, PartialEq)]
pub struct SubmittedCallback {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub input: Vec<SubmittedInput>,
}

#[derive(Serialize, Clone, PartialEq)]
pub struct SubmittedInput {
    pub name: String,
    pub value: InputValue,
}

#[derive(Serialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum InputValue {
    Text(String),
    Number(i64),
}

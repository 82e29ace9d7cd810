use crate::error::{Error, Result};
use crate::openam::api_responses::{InputValue, RawCallback, SubmittedCallback, SubmittedInput};
use std::fmt;

pub const NAME_CALLBACK: &str = "NameCallback";
pub const PASSWORD_CALLBACK: &str = "PasswordCallback";
pub const CONFIRMATION_CALLBACK: &str = "ConfirmationCallback";

/// OpenAM expects the confirmation answer under this input whatever the
/// callback declares.
pub const CONFIRMATION_FIELD: &str = "IDToken2";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackKind {
    Name,
    Password,
    Confirmation,
}

impl CallbackKind {
    pub fn from_wire(tag: &str) -> Result<CallbackKind> {
        match tag {
            NAME_CALLBACK => Ok(CallbackKind::Name),
            PASSWORD_CALLBACK => Ok(CallbackKind::Password),
            CONFIRMATION_CALLBACK => Ok(CallbackKind::Confirmation),
            other => Err(Error::UnsupportedCallbackKind(other.to_string())),
        }
    }

    pub fn wire_tag(&self) -> &'static str {
        match self {
            CallbackKind::Name => NAME_CALLBACK,
            CallbackKind::Password => PASSWORD_CALLBACK,
            CallbackKind::Confirmation => CONFIRMATION_CALLBACK,
        }
    }
}

/// What every authentication step can tell the user about itself.
pub trait Requirement {
    fn prompt(&self) -> &str;
    fn kind(&self) -> CallbackKind;
}

/// One step the provider wants answered before the login can go on.
#[derive(Clone, PartialEq)]
pub enum Callback {
    NameInput {
        field_id: String,
        prompt: String,
        value: String,
    },
    SecretInput {
        field_id: String,
        prompt: String,
        value: String,
    },
    Acknowledgement,
}

impl Callback {
    /// Decodes one callback descriptor from a provider reply.
    pub fn from_raw(raw: &RawCallback) -> Result<Callback> {
        let kind = CallbackKind::from_wire(raw.kind.as_str())?;

        let field_id = || {
            raw.awaiting_input().map(String::from).ok_or_else(|| {
                Error::Protocol(format!("{} has no input waiting for a value", raw.kind))
            })
        };

        let callback = match kind {
            CallbackKind::Name => Callback::NameInput {
                field_id: field_id()?,
                prompt: raw.prompt(),
                value: String::new(),
            },
            CallbackKind::Password => Callback::SecretInput {
                field_id: field_id()?,
                prompt: raw.prompt(),
                value: String::new(),
            },
            CallbackKind::Confirmation => Callback::Acknowledgement,
        };

        Ok(callback)
    }

    pub fn field_id(&self) -> &str {
        match self {
            Callback::NameInput { field_id, .. } | Callback::SecretInput { field_id, .. } => {
                field_id
            }
            Callback::Acknowledgement => CONFIRMATION_FIELD,
        }
    }

    /// Stores the user's answer. Acknowledgements carry no answer.
    pub fn fill(&mut self, answer: String) {
        match self {
            Callback::NameInput { value, .. } | Callback::SecretInput { value, .. } => {
                *value = answer
            }
            Callback::Acknowledgement => {}
        }
    }

    pub fn to_wire(&self) -> SubmittedCallback {
        let value = match self {
            Callback::NameInput { value, .. } | Callback::SecretInput { value, .. } => {
                InputValue::Text(value.clone())
            }
            Callback::Acknowledgement => InputValue::Number(0),
        };

        SubmittedCallback {
            kind: self.kind().wire_tag(),
            input: vec![SubmittedInput {
                name: self.field_id().to_string(),
                value,
            }],
        }
    }
}

impl Requirement for Callback {
    fn prompt(&self) -> &str {
        match self {
            Callback::NameInput { prompt, .. } | Callback::SecretInput { prompt, .. } => prompt,
            Callback::Acknowledgement => "",
        }
    }

    fn kind(&self) -> CallbackKind {
        match self {
            Callback::NameInput { .. } => CallbackKind::Name,
            Callback::SecretInput { .. } => CallbackKind::Password,
            Callback::Acknowledgement => CallbackKind::Confirmation,
        }
    }
}

// secret values stay out of logs
impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callback::NameInput {
                field_id,
                prompt,
                value,
            } => f
                .debug_struct("NameInput")
                .field("field_id", field_id)
                .field("prompt", prompt)
                .field("value", value)
                .finish(),
            Callback::SecretInput {
                field_id, prompt, ..
            } => f
                .debug_struct("SecretInput")
                .field("field_id", field_id)
                .field("prompt", prompt)
                .field("value", &"********")
                .finish(),
            Callback::Acknowledgement => f.write_str("Acknowledgement"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(json: serde_json::Value) -> RawCallback {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_decode_name_callback() {
        let callback = Callback::from_raw(&raw(json!({
            "type": "NameCallback",
            "output": [{"name": "prompt", "value": "User Name:"}],
            "input": [{"name": "IDToken1", "value": ""}]
        })))
        .unwrap();

        assert_eq!(callback.kind(), CallbackKind::Name);
        assert_eq!(callback.prompt(), "User Name:");
        assert_eq!(callback.field_id(), "IDToken1");
    }

    #[test]
    fn test_decode_password_callback() {
        let callback = Callback::from_raw(&raw(json!({
            "type": "PasswordCallback",
            "output": [{"name": "prompt", "value": "Password:"}],
            "input": [{"name": "IDToken2", "value": ""}]
        })))
        .unwrap();

        assert_eq!(callback.kind(), CallbackKind::Password);
        assert_eq!(callback.field_id(), "IDToken2");
    }

    #[test]
    fn test_confirmation_always_uses_fixed_field() {
        let callback = Callback::from_raw(&raw(json!({
            "type": "ConfirmationCallback",
            "output": [{"name": "prompt", "value": "ignored"}],
            "input": [{"name": "IDToken3", "value": 0}]
        })))
        .unwrap();

        assert_eq!(callback, Callback::Acknowledgement);
        assert_eq!(callback.field_id(), CONFIRMATION_FIELD);
        assert_eq!(callback.prompt(), "");
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let result = Callback::from_raw(&raw(json!({
            "type": "TextOutputCallback",
            "output": [{"name": "message", "value": "hello"}],
            "input": []
        })));

        assert!(matches!(
            result,
            Err(Error::UnsupportedCallbackKind(kind)) if kind == "TextOutputCallback"
        ));
    }

    #[test]
    fn test_name_callback_without_open_input_is_a_protocol_error() {
        let result = Callback::from_raw(&raw(json!({
            "type": "NameCallback",
            "output": [],
            "input": [{"name": "IDToken1", "value": "already"}]
        })));

        assert!(matches!(result, Err(Error::Protocol(_))));
    }

    #[test]
    fn test_encode_filled_callbacks() {
        let mut name = Callback::NameInput {
            field_id: String::from("IDToken1"),
            prompt: String::from("User Name:"),
            value: String::new(),
        };
        name.fill(String::from("bob"));

        assert_eq!(
            serde_json::to_value(name.to_wire()).unwrap(),
            json!({"type": "NameCallback", "input": [{"name": "IDToken1", "value": "bob"}]})
        );
        assert_eq!(
            serde_json::to_value(Callback::Acknowledgement.to_wire()).unwrap(),
            json!({"type": "ConfirmationCallback", "input": [{"name": "IDToken2", "value": 0}]})
        );
    }

    #[test]
    fn test_debug_hides_secret() {
        let mut secret = Callback::SecretInput {
            field_id: String::from("IDToken2"),
            prompt: String::from("Password:"),
            value: String::new(),
        };
        secret.fill(String::from("hunter2"));

        let debug = format!("{:?}", secret);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("IDToken2"));
    }
}

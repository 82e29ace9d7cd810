use crate::error::{Error, Result};
use crate::openam::auth_session::{AuthSession, Status};
use crate::openam::callbacks::{Callback, CallbackKind, Requirement};
use crate::prompt::Prompter;
use log::{debug, info};

/// Runs the callback round trips until the provider accepts or rejects the
/// login, asking `prompter` for every answer.
///
/// Returns the session in the `Success` state, ready for SSO.
pub async fn authenticate(session: AuthSession, prompter: &dyn Prompter) -> Result<AuthSession> {
    let mut session = session.start().await?;
    let mut round = 0;

    // keep answering until the provider has nothing more to ask
    while !session.is_done() {
        round += 1;
        let pending = session.pending_requirements()?;
        debug!("round {}: {} callback(s) to answer", round, pending.len());

        let filled = pending
            .into_iter()
            .map(|callback| answer(callback, prompter))
            .collect::<Result<Vec<Callback>>>()?;

        session = session.submit(filled).await?;
    }

    match session.status() {
        Status::Success => {
            info!("authenticated after {} round(s)", round);
            Ok(session)
        }
        Status::Failure => Err(Error::AuthenticationFailure(session.failure_reason())),
        status => Err(Error::State(format!(
            "login stopped while the session was {:?}",
            status
        ))),
    }
}

fn answer(mut callback: Callback, prompter: &dyn Prompter) -> Result<Callback> {
    match callback.kind() {
        CallbackKind::Name => {
            let value = prompter.ask(callback.prompt())?;
            callback.fill(value);
        }
        CallbackKind::Password => {
            let value = prompter.ask_secret(callback.prompt())?;
            callback.fill(value);
        }
        CallbackKind::Confirmation => {}
    }

    Ok(callback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openam::auth_session::tests::{login_challenge, OpenAmApiTest};
    use serde_json::json;
    use std::sync::Mutex;

    #[derive(Default)]
    struct PrompterTest {
        asked: Mutex<Vec<String>>,
    }

    impl Prompter for PrompterTest {
        fn ask(&self, prompt: &str) -> Result<String> {
            self.asked.lock().unwrap().push(format!("ask {}", prompt));
            Ok(String::from("bob"))
        }

        fn ask_secret(&self, prompt: &str) -> Result<String> {
            self.asked.lock().unwrap().push(format!("secret {}", prompt));
            Ok(String::from("hunter2"))
        }
    }

    #[tokio::test]
    async fn test_authenticate_with_password_and_confirmation() {
        let api = OpenAmApiTest::new(vec![
            (200, login_challenge()),
            (
                200,
                json!({
                    "authId": "A1",
                    "callbacks": [{
                        "type": "ConfirmationCallback",
                        "output": [{"name": "options", "value": ["Continue"]}],
                        "input": [{"name": "IDToken3", "value": 0}]
                    }]
                }),
            ),
            (200, json!({"tokenId": "T1", "successUrl": "/openam/console"})),
        ]);
        let submissions = api.submissions.clone();
        let prompter = PrompterTest::default();

        let session = authenticate(AuthSession::with_api(Box::new(api)), &prompter)
            .await
            .unwrap();

        assert_eq!(session.status(), Status::Success);
        assert_eq!(
            *prompter.asked.lock().unwrap(),
            vec![
                String::from("ask User Name:"),
                String::from("secret Password:")
            ]
        );
        assert_eq!(
            submissions.lock().unwrap()[1],
            json!({
                "authId": "A1",
                "callbacks": [{"type": "ConfirmationCallback", "input": [{"name": "IDToken2", "value": 0}]}]
            })
        );
    }

    #[tokio::test]
    async fn test_authenticate_rejected() {
        let api = OpenAmApiTest::new(vec![
            (200, login_challenge()),
            (
                401,
                json!({"code": 401, "reason": "Unauthorized", "message": "Authentication Failed"}),
            ),
        ]);
        let prompter = PrompterTest::default();

        let result = authenticate(AuthSession::with_api(Box::new(api)), &prompter).await;

        assert!(matches!(
            result,
            Err(Error::AuthenticationFailure(reason)) if reason == "Unauthorized - Authentication Failed"
        ));
    }

    #[tokio::test]
    async fn test_authenticate_without_callbacks_ends_terminal() {
        let api = OpenAmApiTest::new(vec![(200, json!({"authId": "A1"}))]);
        let prompter = PrompterTest::default();

        let result = authenticate(AuthSession::with_api(Box::new(api)), &prompter).await;

        assert!(matches!(result, Err(Error::AuthenticationFailure(_))));
        assert!(prompter.asked.lock().unwrap().is_empty());
    }
}

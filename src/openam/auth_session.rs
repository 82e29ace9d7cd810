use crate::error::{Error, Result};
use crate::openam::api_responses::{ProviderResponse, Submission};
use crate::openam::callbacks::Callback;
use crate::openam::openam_api::{ApiReply, OpenAm, OpenAmApi};
use crate::openam::ProviderConfig;
use log::debug;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Initial,
    InProgress,
    Success,
    Failure,
}

/// One login attempt against OpenAM.
///
/// The session walks `Initial -> InProgress -> Success | Failure`. Every
/// network step consumes the session and hands back the next one, so a caller
/// always holds the latest state:
///
/// ```no_run
/// # async fn login(session: forgerock_sts::openam::auth_session::AuthSession) -> forgerock_sts::Result<()> {
/// let mut session = session.start().await?;
/// while !session.is_done() {
///     let filled = session.pending_requirements()?;
///     session = session.submit(filled).await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct AuthSession {
    api: Box<dyn OpenAmApi>,
    auth_id: Option<String>,
    status: Status,
    doc: ProviderResponse,
    http_status: Option<u16>,
}

impl AuthSession {
    pub fn new(config: ProviderConfig, timeout: Duration) -> Result<AuthSession> {
        let api = OpenAm::new(config, timeout)?;

        Ok(AuthSession::with_api(Box::new(api)))
    }

    pub fn with_api(api: Box<dyn OpenAmApi>) -> AuthSession {
        AuthSession {
            api,
            auth_id: None,
            status: Status::Initial,
            doc: ProviderResponse::default(),
            http_status: None,
        }
    }

    /// Opens the login with an empty POST.
    ///
    /// A non-200 answer is not an error here; the provider answers the first
    /// call with a challenge and the status is judged on submission. Only a
    /// reply without any callbacks is judged right away.
    pub async fn start(mut self) -> Result<AuthSession> {
        if self.status != Status::Initial {
            return Err(Error::State(String::from("login was already started")));
        }

        let reply = self.api.authenticate(None).await?;
        self.record(reply)?;

        self.status = Status::InProgress;
        if self.doc.callbacks().is_empty() {
            self.status = self.evaluate();
        }
        debug!("login started, status {:?}", self.status);

        Ok(self)
    }

    /// Callbacks still waiting for an answer. Empty once the session is over.
    pub fn pending_requirements(&self) -> Result<Vec<Callback>> {
        if self.status != Status::InProgress {
            return Ok(vec![]);
        }

        self.doc.callbacks().iter().map(Callback::from_raw).collect()
    }

    /// Sends the answered callbacks back and moves to the next state.
    pub async fn submit(mut self, filled: Vec<Callback>) -> Result<AuthSession> {
        if self.status != Status::InProgress {
            return Err(Error::State(format!(
                "cannot submit callbacks while the session is {:?}",
                self.status
            )));
        }

        let auth_id = self
            .auth_id
            .clone()
            .ok_or_else(|| Error::Protocol(String::from("provider never sent an authId")))?;

        let submission = Submission {
            auth_id,
            callbacks: filled.iter().map(Callback::to_wire).collect(),
        };
        debug!("submitting {} callback(s)", submission.callbacks.len());

        let reply = self.api.authenticate(Some(&submission)).await?;
        self.record(reply)?;
        self.status = self.evaluate();
        debug!("submission answered, status {:?}", self.status);

        Ok(self)
    }

    /// True when there is nothing left to answer right now.
    pub fn is_done(&self) -> bool {
        self.status != Status::InProgress || self.doc.callbacks().is_empty()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn auth_id(&self) -> Option<&str> {
        self.auth_id.as_deref()
    }

    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// Best description of why the provider turned the login down.
    pub fn failure_reason(&self) -> String {
        self.doc.rejection().unwrap_or_else(|| match self.http_status {
            Some(status) if status != 200 => format!("provider answered with HTTP {}", status),
            _ => String::from("provider ended the login without a session token"),
        })
    }

    pub(crate) fn api(&self) -> &dyn OpenAmApi {
        self.api.as_ref()
    }

    fn record(&mut self, reply: ApiReply) -> Result<()> {
        let doc: ProviderResponse = serde_json::from_str(reply.body.as_str())?;

        // the first authId seen is the one the provider expects back every time
        if self.auth_id.is_none() {
            self.auth_id = doc.auth_id();
        }

        self.doc = doc;
        self.http_status = Some(reply.status);

        Ok(())
    }

    fn evaluate(&self) -> Status {
        self.doc.evaluate(self.http_status.unwrap_or_default())
    }
}

//! End-user authentication slice.

use serde::{Deserialize, Serialize};

use crate::action::{Phase, Stage};
use crate::model::RequestState;
use crate::session::Session;

pub const SIGNUP_SUCCESS_MESSAGE: &str = "Signup successful! Please verify OTP.";
pub const VERIFY_OTP_SUCCESS_MESSAGE: &str = "OTP Verified successfully. Please login now.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpForm {
    pub email: String,
    pub otp: String,
}

/// Signup accepted by the backend; an OTP was sent to `email`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupAccepted {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum AuthAction {
    Login(Phase<Credentials, Session>),
    Signup(Phase<SignupForm, SignupAccepted>),
    VerifyOtp(Phase<OtpForm, Session>),
    Logout,
    ClearError,
    ClearSuccessMessage,
}

impl AuthAction {
    pub fn operation(&self) -> &'static str {
        match self {
            AuthAction::Login(_) => "auth/login",
            AuthAction::Signup(_) => "auth/signup",
            AuthAction::VerifyOtp(_) => "auth/verifyOtp",
            AuthAction::Logout => "auth/logout",
            AuthAction::ClearError => "auth/clearError",
            AuthAction::ClearSuccessMessage => "auth/clearSuccessMessage",
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            AuthAction::Login(p) => p.stage(),
            AuthAction::Signup(p) => p.stage(),
            AuthAction::VerifyOtp(p) => p.stage(),
            _ => Stage::Plain,
        }
    }
}

/// Session partition of the end user. `request.message` holds the success
/// message shown after signup and OTP verification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<Session>,
    #[serde(flatten)]
    pub request: RequestState,
    /// Email awaiting OTP verification after signup.
    pub email: Option<String>,
    pub verified: bool,
    pub is_authenticated: bool,
}

impl AuthState {
    /// Builds the initial state from a session restored from durable storage.
    pub fn hydrate(user: Option<Session>) -> Self {
        let is_authenticated = user.as_ref().and_then(Session::token).is_some();
        Self {
            verified: user.is_some(),
            is_authenticated,
            user,
            ..Default::default()
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().and_then(Session::token)
    }
}

pub fn reduce(mut state: AuthState, action: &AuthAction) -> AuthState {
    match action {
        AuthAction::Login(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(session) => {
                state.request.succeed();
                state.user = Some(session.clone());
                state.is_authenticated = true;
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        AuthAction::Signup(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(accepted) => {
                state
                    .request
                    .succeed_with(Some(SIGNUP_SUCCESS_MESSAGE.to_string()));
                state.email = Some(accepted.email.clone());
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        AuthAction::VerifyOtp(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(session) => {
                state
                    .request
                    .succeed_with(Some(VERIFY_OTP_SUCCESS_MESSAGE.to_string()));
                state.user = Some(session.clone());
                state.verified = true;
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        AuthAction::Logout => {
            state.user = None;
            state.is_authenticated = false;
            state.email = None;
            state.verified = false;
        }
        AuthAction::ClearError => state.request.clear_error(),
        AuthAction::ClearSuccessMessage => state.request.clear_message(),
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str) -> Session {
        Session {
            name: Some("A".into()),
            role: Some("user".into()),
            token: Some(token.into()),
            ..Default::default()
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "a@example.com".into(),
            password: "secret".into(),
        }
    }

    #[test]
    fn test_login_flow() {
        let state = reduce(AuthState::default(), &AuthAction::Login(Phase::Request(credentials())));
        assert!(state.request.loading);

        let state = reduce(state, &AuthAction::Login(Phase::Success(session("t1"))));
        assert!(!state.request.loading);
        assert!(state.is_authenticated);
        assert_eq!(state.token(), Some("t1"));
    }

    #[test]
    fn test_login_failure_keeps_session() {
        let state = reduce(AuthState::default(), &AuthAction::Login(Phase::Success(session("t1"))));
        let state = reduce(state, &AuthAction::Login(Phase::Request(credentials())));
        let state = reduce(state, &AuthAction::Login(Phase::Failure("Invalid credentials.".into())));

        assert!(!state.request.loading);
        assert_eq!(state.request.error.as_deref(), Some("Invalid credentials."));
        assert_eq!(state.token(), Some("t1"));
    }

    #[test]
    fn test_signup_then_verify() {
        let state = reduce(
            AuthState::default(),
            &AuthAction::Signup(Phase::Success(SignupAccepted {
                email: "a@example.com".into(),
            })),
        );
        assert_eq!(state.email.as_deref(), Some("a@example.com"));
        assert_eq!(state.request.message.as_deref(), Some(SIGNUP_SUCCESS_MESSAGE));

        let state = reduce(state, &AuthAction::ClearSuccessMessage);
        assert!(state.request.message.is_none());

        let state = reduce(state, &AuthAction::VerifyOtp(Phase::Success(session("t2"))));
        assert!(state.verified);
        assert_eq!(state.request.message.as_deref(), Some(VERIFY_OTP_SUCCESS_MESSAGE));
    }

    #[test]
    fn test_logout_resets_identity() {
        let state = AuthState::hydrate(Some(session("t1")));
        assert!(state.is_authenticated);
        assert!(state.verified);

        let state = reduce(state, &AuthAction::Logout);
        assert!(state.user.is_none());
        assert!(!state.is_authenticated);
        assert!(!state.verified);
    }

    #[test]
    fn test_hydrate_without_token_is_not_authenticated() {
        let mut identity = session("x");
        identity.token = None;
        let state = AuthState::hydrate(Some(identity));
        assert!(state.verified);
        assert!(!state.is_authenticated);
    }
}

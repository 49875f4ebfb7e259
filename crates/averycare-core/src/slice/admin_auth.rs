use serde::{Deserialize, Serialize};

use crate::action::{Phase, Stage};
use crate::model::RequestState;
use crate::session::AdminSession;
use crate::slice::auth::Credentials;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum AdminAuthAction {
    AdminLogin(Phase<Credentials, AdminSession>),
    AdminLogout,
    ClearError,
}

impl AdminAuthAction {
    pub fn operation(&self) -> &'static str {
        match self {
            AdminAuthAction::AdminLogin(_) => "adminAuth/adminLogin",
            AdminAuthAction::AdminLogout => "adminAuth/adminLogout",
            AdminAuthAction::ClearError => "adminAuth/clearError",
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            AdminAuthAction::AdminLogin(p) => p.stage(),
            _ => Stage::Plain,
        }
    }
}

/// Session partition of the admin console operator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAuthState {
    pub email: Option<String>,
    pub token: Option<String>,
    #[serde(flatten)]
    pub request: RequestState,
    pub is_authenticated: bool,
}

impl AdminAuthState {
    pub fn hydrate(token: Option<String>, email: Option<String>) -> Self {
        let token = token.filter(|t| !t.trim().is_empty());
        Self {
            is_authenticated: token.is_some(),
            email,
            token,
            ..Default::default()
        }
    }

    pub fn session(&self) -> Option<AdminSession> {
        match (&self.email, &self.token) {
            (Some(email), Some(token)) => Some(AdminSession {
                email: email.clone(),
                token: token.clone(),
            }),
            _ => None,
        }
    }
}

pub fn reduce(mut state: AdminAuthState, action: &AdminAuthAction) -> AdminAuthState {
    match action {
        AdminAuthAction::AdminLogin(phase) => match phase {
            Phase::Request(_) => state.request.begin(),
            Phase::Success(session) => {
                state.request.succeed();
                state.email = Some(session.email.clone());
                state.token = Some(session.token.clone());
                state.is_authenticated = true;
            }
            Phase::Failure(error) => state.request.fail(error.clone()),
        },
        AdminAuthAction::AdminLogout => {
            state.email = None;
            state.token = None;
            state.is_authenticated = false;
        }
        AdminAuthAction::ClearError => state.request.clear_error(),
    }
    state
}

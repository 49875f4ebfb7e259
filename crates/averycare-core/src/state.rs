//! The root state tree and its reducer.

use serde::Serialize;

use crate::action::Action;
use crate::slice::{self, AdminAuthState, AuthState, CallState, FamilyState, UsersState};

/// Every partition of client state, one per slice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RootState {
    pub auth: AuthState,
    pub admin_auth: AdminAuthState,
    pub family: FamilyState,
    pub call: CallState,
    pub users: UsersState,
}

impl RootState {
    /// Builds the initial tree around the two restored session partitions.
    pub fn with_sessions(auth: AuthState, admin_auth: AdminAuthState) -> Self {
        Self {
            auth,
            admin_auth,
            ..Default::default()
        }
    }
}

/// Routes `action` to the slice that owns it. Other partitions are moved
/// through untouched.
pub fn reduce(state: RootState, action: &Action) -> RootState {
    let RootState {
        auth,
        admin_auth,
        family,
        call,
        users,
    } = state;

    match action {
        Action::Auth(a) => RootState {
            auth: slice::auth::reduce(auth, a),
            admin_auth,
            family,
            call,
            users,
        },
        Action::AdminAuth(a) => RootState {
            auth,
            admin_auth: slice::admin_auth::reduce(admin_auth, a),
            family,
            call,
            users,
        },
        Action::Family(a) => RootState {
            auth,
            admin_auth,
            family: slice::family::reduce(family, a),
            call,
            users,
        },
        Action::Call(a) => RootState {
            auth,
            admin_auth,
            family,
            call: slice::call::reduce(call, a),
            users,
        },
        Action::Users(a) => RootState {
            auth,
            admin_auth,
            family,
            call,
            users: slice::users::reduce(users, a),
        },
    }
}

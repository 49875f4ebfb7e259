//! State slices. Each slice owns one partition of [`crate::state::RootState`]
//! and exposes a pure `reduce` function; none of them performs I/O.

pub mod admin_auth;
pub mod auth;
pub mod call;
pub mod family;
pub mod users;

pub use admin_auth::{AdminAuthAction, AdminAuthState};
pub use auth::{AuthAction, AuthState, Credentials, OtpForm, SignupAccepted, SignupForm};
pub use call::{CallAction, CallState};
pub use family::{FamilyAction, FamilyMemberUpdate, FamilyState};
pub use users::{MemberDetail, UsersAction, UsersState};

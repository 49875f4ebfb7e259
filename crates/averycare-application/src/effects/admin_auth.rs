use averycare_core::action::Phase;
use averycare_core::api::ApiRequest;
use averycare_core::session::AdminSession;
use averycare_core::slice::{AdminAuthAction, Credentials};
use averycare_core::{AveryError, Result};
use serde_json::Value;

use super::{EffectScope, message_of, success_text};

pub(super) async fn run(scope: &EffectScope, action: AdminAuthAction) {
    if let AdminAuthAction::AdminLogin(Phase::Request(credentials)) = action {
        admin_login(scope, credentials).await;
    }
}

/// An admin session needs both `success: true` and a token; anything else
/// is an invalid login response.
fn admin_session(response_status: u16, body: &Value, email: &str) -> Result<AdminSession> {
    if !(200..300).contains(&response_status) {
        return Err(AveryError::server(Some(response_status), message_of(body)));
    }

    let success = body.get("success").and_then(Value::as_bool).unwrap_or(false);
    let token = body
        .get("token")
        .and_then(Value::as_str)
        .filter(|t| !t.trim().is_empty());

    match (success, token) {
        (true, Some(token)) => Ok(AdminSession {
            email: email.to_string(),
            token: token.to_string(),
        }),
        _ => Err(AveryError::server(
            Some(response_status),
            Some(message_of(body).unwrap_or_else(|| "Invalid login response".to_string())),
        )),
    }
}

async fn admin_login(scope: &EffectScope, credentials: Credentials) {
    let result: Result<(AdminSession, Value)> = async {
        let request = ApiRequest::post("auth/login").with_json(&credentials)?;
        let response = scope.store().transport().send(request).await?;
        let session = admin_session(response.status, &response.body, &credentials.email)?;
        Ok((session, response.body))
    }
    .await;

    match result {
        Ok((session, body)) => {
            scope.succeed(
                AdminAuthAction::AdminLogin(Phase::Success(session)),
                Some(success_text(&body, "Admin login successful!")),
            );
        }
        Err(e) => {
            scope.fail(&e, "Login failed. Please try again.", |m| {
                AdminAuthAction::AdminLogin(Phase::Failure(m))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_requires_success_and_token() {
        let session = admin_session(200, &json!({"success": true, "token": "adm"}), "ops@x").unwrap();
        assert_eq!(session.token, "adm");
        assert_eq!(session.email, "ops@x");

        let err = admin_session(200, &json!({"success": true}), "ops@x").unwrap_err();
        assert_eq!(err.user_message("Login failed"), "Invalid login response");

        let err = admin_session(200, &json!({"success": false, "message": "Not an admin"}), "ops@x")
            .unwrap_err();
        assert_eq!(err.user_message("Login failed"), "Not an admin");
    }

    #[test]
    fn test_error_status_uses_fallback() {
        let err = admin_session(500, &Value::Null, "ops@x").unwrap_err();
        assert_eq!(
            err.user_message("Login failed. Please try again."),
            "Login failed. Please try again."
        );
    }
}

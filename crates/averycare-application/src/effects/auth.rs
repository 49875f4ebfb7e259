use averycare_core::action::Phase;
use averycare_core::api::ApiRequest;
use averycare_core::session::Session;
use averycare_core::slice::{AuthAction, Credentials, OtpForm, SignupAccepted, SignupForm};
use averycare_core::Result;
use serde_json::Value;

use super::{EffectScope, success_text};

pub(super) async fn run(scope: &EffectScope, action: AuthAction) {
    match action {
        AuthAction::Login(Phase::Request(credentials)) => login(scope, credentials).await,
        AuthAction::Signup(Phase::Request(form)) => signup(scope, form).await,
        AuthAction::VerifyOtp(Phase::Request(form)) => verify_otp(scope, form).await,
        _ => {}
    }
}

async fn login(scope: &EffectScope, credentials: Credentials) {
    let result: Result<(Session, Value)> = async {
        let body = scope
            .send(ApiRequest::post("auth/login").with_json(&credentials)?)
            .await?;
        Ok((Session::from_response(&body)?, body))
    }
    .await;

    match result {
        Ok((session, body)) => {
            scope.succeed(
                AuthAction::Login(Phase::Success(session)),
                Some(success_text(&body, "Login successful")),
            );
        }
        Err(e) => {
            scope.fail(&e, "Invalid credentials.", |m| {
                AuthAction::Login(Phase::Failure(m))
            });
        }
    }
}

async fn signup(scope: &EffectScope, form: SignupForm) {
    let result: Result<Value> = async {
        scope
            .send(ApiRequest::post("auth/register").with_json(&form)?)
            .await
    }
    .await;

    match result {
        Ok(body) => {
            let accepted = SignupAccepted { email: form.email };
            scope.succeed(
                AuthAction::Signup(Phase::Success(accepted)),
                Some(success_text(&body, "Signup successful! Please verify OTP")),
            );
        }
        Err(e) => {
            scope.fail(&e, "Signup failed.", |m| AuthAction::Signup(Phase::Failure(m)));
        }
    }
}

/// Session produced by a successful OTP verification. The backend may
/// answer without any identity, in which case the verified email is used.
fn verified_session(body: &Value, email: &str) -> Session {
    let mut session = Session::from_response(body).unwrap_or_else(|_| Session {
        email: Some(email.to_string()),
        ..Default::default()
    });
    session.verified = true;
    session
}

async fn verify_otp(scope: &EffectScope, form: OtpForm) {
    let result: Result<Value> = async {
        scope
            .send(ApiRequest::post("auth/verify-otp").with_json(&form)?)
            .await
    }
    .await;

    match result {
        Ok(body) => {
            let session = verified_session(&body, &form.email);
            scope.succeed(
                AuthAction::VerifyOtp(Phase::Success(session)),
                Some(success_text(&body, "OTP verified")),
            );
        }
        Err(e) => {
            scope.fail(&e, "OTP verification failed.", |m| {
                AuthAction::VerifyOtp(Phase::Failure(m))
            });
        }
    }
}

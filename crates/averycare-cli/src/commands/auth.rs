use anyhow::Result;
use averycare_core::action::Phase;
use averycare_core::slice::{AuthAction, Credentials, OtpForm, SignupForm};
use clap::Subcommand;
use serde_json::json;

use super::Context;

#[derive(Subcommand)]
pub enum AuthCommand {
    /// Log in and store the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Register a new account; an OTP is sent by email
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        password: String,
    },
    /// Confirm the OTP received after signup
    VerifyOtp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
    },
    /// Forget the stored user session
    Logout,
    /// Show both stored sessions
    Status,
}

pub async fn run(ctx: &mut Context, command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Login { email, password } => {
            ctx.dispatch(AuthAction::Login(Phase::Request(Credentials { email, password })))
                .await;
        }
        AuthCommand::Signup {
            name,
            email,
            phone,
            password,
        } => {
            ctx.dispatch(AuthAction::Signup(Phase::Request(SignupForm {
                name,
                email,
                phone_number: phone,
                password,
            })))
            .await;
        }
        AuthCommand::VerifyOtp { email, otp } => {
            ctx.dispatch(AuthAction::VerifyOtp(Phase::Request(OtpForm { email, otp })))
                .await;
        }
        AuthCommand::Logout => ctx.dispatch(AuthAction::Logout).await,
        AuthCommand::Status => {
            let state = ctx.store().state();
            return ctx.finish(&json!({
                "auth": state.auth,
                "adminAuth": state.admin_auth,
            }));
        }
    }

    let auth = ctx.store().read(|s| s.auth.clone());
    ctx.finish(&auth)
}

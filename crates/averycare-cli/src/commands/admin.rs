use anyhow::Result;
use averycare_core::action::Phase;
use averycare_core::model::user::DEFAULT_ADMIN_LIMIT;
use averycare_core::model::{AdminCallQuery, MemberQuery, UserFilters, UserQuery, UserSearchField};
use averycare_core::slice::{AdminAuthAction, Credentials, UsersAction};
use clap::{Subcommand, ValueEnum};

use super::Context;

#[derive(Clone, Copy, ValueEnum)]
pub enum SearchBy {
    Name,
    Email,
    Phone,
}

impl From<SearchBy> for UserSearchField {
    fn from(field: SearchBy) -> Self {
        match field {
            SearchBy::Name => UserSearchField::Name,
            SearchBy::Email => UserSearchField::Email,
            SearchBy::Phone => UserSearchField::PhoneNumber,
        }
    }
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Log in to the admin console
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored admin session
    Logout,
    /// List registered users
    Users {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_ADMIN_LIMIT)]
        limit: u32,
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = SearchBy::Name)]
        search_by: SearchBy,
        /// Only verified accounts
        #[arg(long)]
        verified: bool,
        #[arg(long)]
        created_from: Option<String>,
        #[arg(long)]
        created_to: Option<String>,
    },
    /// Show one user with their family links
    User { id: String },
    /// Delete a user
    DeleteUser { id: String },
    /// List family members across all users
    Members {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Filter on whether the member has an account
        #[arg(long)]
        is_user: Option<bool>,
        #[arg(long)]
        linked_to: Option<String>,
    },
    /// Show one family member with its owning user
    Member { id: String },
    /// Delete a family member
    DeleteMember {
        id: String,
        /// Open this user's detail first so it is reloaded afterwards
        #[arg(long)]
        user: Option<String>,
    },
    /// Search the call history
    Calls {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        recipient_name: Option<String>,
        #[arg(long)]
        scheduled_by: Option<String>,
        #[arg(long)]
        scheduled_to: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a call from the history
    DeleteCall { id: String },
}

pub async fn run(ctx: &mut Context, command: AdminCommand) -> Result<()> {
    match command {
        AdminCommand::Login { email, password } => {
            ctx.dispatch(AdminAuthAction::AdminLogin(Phase::Request(Credentials {
                email,
                password,
            })))
            .await;
            let admin = ctx.store().read(|s| s.admin_auth.clone());
            return ctx.finish(&admin);
        }
        AdminCommand::Logout => {
            ctx.dispatch(AdminAuthAction::AdminLogout).await;
            let admin = ctx.store().read(|s| s.admin_auth.clone());
            return ctx.finish(&admin);
        }
        AdminCommand::Users {
            page,
            limit,
            search,
            search_by,
            verified,
            created_from,
            created_to,
        } => {
            let query = UserQuery {
                page,
                limit,
                filters: UserFilters {
                    search_type: search.as_ref().map(|_| search_by.into()),
                    search,
                    is_verified: verified.then_some(true),
                    created_at_in_between_start_date: created_from,
                    created_at_in_between_end_date: created_to,
                    ..Default::default()
                },
            };
            ctx.dispatch(UsersAction::FetchUsers(Phase::Request(query))).await;
        }
        AdminCommand::User { id } => {
            ctx.dispatch(UsersAction::FetchUserDetail(Phase::Request(id))).await;
        }
        AdminCommand::DeleteUser { id } => {
            ctx.dispatch(UsersAction::DeleteUser(Phase::Request(id))).await;
        }
        AdminCommand::Members {
            page,
            limit,
            name,
            email,
            phone,
            is_user,
            linked_to,
        } => {
            let query = MemberQuery {
                page,
                limit,
                name,
                email,
                phone_number: phone,
                is_user,
                linked_to_primary_user_name: linked_to,
                ..Default::default()
            };
            ctx.dispatch(UsersAction::FetchFamilyMembers(Phase::Request(query)))
                .await;
        }
        AdminCommand::Member { id } => {
            ctx.dispatch(UsersAction::FetchSingleFamilyMember(Phase::Request(id)))
                .await;
        }
        AdminCommand::DeleteMember { id, user } => {
            if let Some(user_id) = user {
                ctx.dispatch(UsersAction::FetchUserDetail(Phase::Request(user_id)))
                    .await;
            }
            ctx.dispatch(UsersAction::DeleteFamilyMember(Phase::Request(id)))
                .await;
        }
        AdminCommand::Calls {
            page,
            limit,
            recipient_name,
            scheduled_by,
            scheduled_to,
            status,
        } => {
            let search = AdminCallQuery {
                page,
                limit,
                recipient_name,
                scheduled_by_name: scheduled_by,
                scheduled_to_name: scheduled_to,
                status,
                ..Default::default()
            };
            ctx.dispatch(UsersAction::UpdateScheduledCallsSearchQuery(search.clone()))
                .await;
            ctx.dispatch(UsersAction::FetchScheduledCalls(Phase::Request(search)))
                .await;
        }
        AdminCommand::DeleteCall { id } => {
            ctx.dispatch(UsersAction::DeleteScheduledCall(Phase::Request(id)))
                .await;
        }
    }

    let users = ctx.store().read(|s| s.users.clone());
    ctx.finish(&users)
}

use anyhow::Result;
use averycare_core::action::Phase;
use averycare_core::model::call::DEFAULT_CALL_LIMIT;
use averycare_core::model::{
    CallQuery, CallStatus, DeleteCallPayload, ReschedulePayload, ScheduleCallPayload,
};
use averycare_core::slice::CallAction;
use chrono::{DateTime, Utc};
use clap::{Subcommand, ValueEnum};

use super::Context;

#[derive(Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Completed,
    Failed,
}

impl From<StatusArg> for CallStatus {
    fn from(status: StatusArg) -> Self {
        match status {
            StatusArg::Pending => CallStatus::Pending,
            StatusArg::Completed => CallStatus::Completed,
            StatusArg::Failed => CallStatus::Failed,
        }
    }
}

#[derive(Subcommand)]
pub enum CallsCommand {
    /// List scheduled calls
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_CALL_LIMIT)]
        limit: u32,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        /// Only calls to this family member or user id
        #[arg(long)]
        member: Option<String>,
        #[arg(long)]
        recipient_name: Option<String>,
        /// e.g. "today", "tomorrow"
        #[arg(long)]
        date_keyword: Option<String>,
        /// Calendar day, YYYY-MM-DD
        #[arg(long)]
        scheduled_at: Option<String>,
    },
    /// Schedule a call
    Schedule {
        /// Id of the family member or user to call
        #[arg(long)]
        to: String,
        /// RFC 3339 time, e.g. 2026-11-02T09:30:00Z
        #[arg(long)]
        at: DateTime<Utc>,
    },
    /// Move a call to another time
    Reschedule {
        id: String,
        #[arg(long)]
        at: DateTime<Utc>,
    },
    /// Delete a call
    Delete {
        id: String,
        /// Reload this member's calls afterwards instead of all pending ones
        #[arg(long)]
        member: Option<String>,
    },
}

pub async fn run(ctx: &mut Context, command: CallsCommand) -> Result<()> {
    let action = match command {
        CallsCommand::List {
            page,
            limit,
            status,
            member,
            recipient_name,
            date_keyword,
            scheduled_at,
        } => CallAction::FetchScheduledCalls(Phase::Request(CallQuery {
            page: Some(page),
            limit: Some(limit),
            status: status.map(CallStatus::from),
            recipient_name,
            date_keyword,
            scheduled_to_id: member,
            scheduled_at,
        })),
        CallsCommand::Schedule { to, at } => {
            CallAction::ScheduleHealthCall(Phase::Request(ScheduleCallPayload {
                scheduled_to: to,
                scheduled_at: at,
            }))
        }
        CallsCommand::Reschedule { id, at } => {
            CallAction::UpdateScheduledCall(Phase::Request(ReschedulePayload {
                id,
                scheduled_at: at,
            }))
        }
        CallsCommand::Delete { id, member } => {
            CallAction::DeleteScheduledCall(Phase::Request(DeleteCallPayload {
                call_id: id,
                scheduled_to_id: member,
            }))
        }
    };
    ctx.dispatch(action).await;

    let call = ctx.store().read(|s| s.call.clone());
    ctx.finish(&call)
}

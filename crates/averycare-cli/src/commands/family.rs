use anyhow::Result;
use averycare_core::action::Phase;
use averycare_core::model::family::DEFAULT_FAMILY_LIMIT;
use averycare_core::model::{FamilyMemberForm, PageCursor};
use averycare_core::slice::{FamilyAction, FamilyMemberUpdate};
use clap::{Args, Subcommand};
use serde_json::json;

use super::Context;

#[derive(Args)]
pub struct MemberFields {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    relationship: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

impl From<MemberFields> for FamilyMemberForm {
    fn from(fields: MemberFields) -> Self {
        Self {
            name: fields.name,
            relationship: fields.relationship,
            email: fields.email,
            phone_number: fields.phone,
        }
    }
}

#[derive(Subcommand)]
pub enum FamilyCommand {
    /// List one page of family members
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_FAMILY_LIMIT)]
        limit: u32,
    },
    /// Add a family member
    Add {
        #[command(flatten)]
        fields: MemberFields,
    },
    /// Edit a family member; only the given fields change
    Update {
        id: String,
        #[command(flatten)]
        fields: MemberFields,
    },
    /// Remove a family member
    Delete { id: String },
}

pub async fn run(ctx: &mut Context, command: FamilyCommand) -> Result<()> {
    let action = match command {
        FamilyCommand::List { page, limit } => {
            FamilyAction::FetchFamilyMembers(Phase::Request(PageCursor::new(page, limit)))
        }
        FamilyCommand::Add { fields } => FamilyAction::AddFamilyMember(Phase::Request(fields.into())),
        FamilyCommand::Update { id, fields } => {
            FamilyAction::UpdateFamilyMember(Phase::Request(FamilyMemberUpdate {
                id,
                data: fields.into(),
            }))
        }
        FamilyCommand::Delete { id } => FamilyAction::DeleteFamilyMember(Phase::Request(id)),
    };
    ctx.dispatch(action).await;

    let output = ctx.store().read(|s| {
        let family = &s.family;
        json!({
            "members": family.members().collect::<Vec<_>>(),
            "meta": family.meta,
            "totalPages": family.meta.total_pages(),
            "loading": family.request.loading,
            "error": family.request.error,
            "message": family.request.message,
        })
    });
    ctx.finish(&output)
}

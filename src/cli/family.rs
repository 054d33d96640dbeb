use std::io::Write;

use anyhow::Result;
use famplan_family::{Command, FamilyMember, MemberInput, Query};
use famplan_shared::Metadata;
use sqlx::SqlitePool;

use super::FamilyCommands;

fn describe(member: &FamilyMember) -> String {
    let mut line = member.name.to_owned();
    if let Some(role) = &member.role {
        line.push_str(&format!(" ({role})"));
    }
    if let Some(age) = member.age {
        line.push_str(&format!(", age {age}"));
    }
    if let Some(email) = &member.email {
        line.push_str(&format!(" <{email}>"));
    }
    line
}

pub async fn run(
    pool: SqlitePool,
    command: FamilyCommands,
    metadata: &Metadata,
    out: &mut impl Write,
) -> Result<()> {
    let user_id = metadata.trigger_by()?;
    let query = Query(pool.clone());
    let command_handler = Command(pool);

    match command {
        FamilyCommands::Add {
            name,
            role,
            age,
            email,
            preferences,
            notes,
        } => {
            let input = MemberInput {
                name,
                role,
                age,
                email,
                preferences,
                notes,
            };
            let id = command_handler.add(input, metadata).await?;
            writeln!(out, "{id}")?;
        }
        FamilyCommands::List => {
            let members = query.list(&user_id).await?;
            if members.is_empty() {
                writeln!(out, "No family members yet.")?;
            }
            for member in members {
                writeln!(out, "{}  {}", member.id, describe(&member))?;
                if let Some(preferences) = &member.preferences {
                    writeln!(out, "    preferences: {preferences}")?;
                }
            }
        }
        FamilyCommands::Recipients => {
            for member in query.recipients(&user_id).await? {
                if let Some(email) = &member.email {
                    writeln!(out, "{} <{email}>", member.name)?;
                }
            }
        }
        FamilyCommands::Delete { id } => {
            command_handler.delete(&id, metadata).await?;
            writeln!(out, "Deleted family member {id}")?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_member() {
        let member = FamilyMember {
            id: "1".to_owned(),
            user_id: "john".to_owned(),
            name: "Maman".to_owned(),
            role: Some("Parent".to_owned()),
            age: Some(38),
            email: Some("maman@example.com".to_owned()),
            preferences: None,
            notes: None,
        };
        assert_eq!(describe(&member), "Maman (Parent), age 38 <maman@example.com>");

        let child = FamilyMember {
            name: "Léo".to_owned(),
            role: None,
            age: None,
            email: None,
            ..member
        };
        assert_eq!(describe(&child), "Léo");
    }
}

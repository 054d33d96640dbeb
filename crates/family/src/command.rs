use famplan_db::table;
use famplan_shared::Metadata;
use sea_query::{Expr, ExprTrait, Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use sqlx::SqlitePool;
use time::OffsetDateTime;
use ulid::Ulid;
use validator::Validate;

#[derive(Clone)]
pub struct Command(pub SqlitePool);

/// A household member. Everything but the name is optional, blank values are
/// stored as absent.
#[derive(Validate, Deserialize, Clone, Debug, Default)]
pub struct MemberInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 50))]
    pub role: Option<String>,
    #[validate(range(min = 0, max = 130))]
    pub age: Option<i64>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
    pub preferences: Option<String>,
    pub notes: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl MemberInput {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_owned(),
            role: non_blank(self.role),
            age: self.age,
            email: non_blank(self.email),
            preferences: non_blank(self.preferences),
            notes: non_blank(self.notes),
        }
    }
}

impl Command {
    pub async fn add(
        &self,
        input: MemberInput,
        metadata: &Metadata,
    ) -> famplan_shared::Result<String> {
        let user_id = metadata.trigger_by()?;
        let input = input.trimmed();
        input.validate()?;

        let id = Ulid::new().to_string();
        let statement = Query::insert()
            .into_table(table::FamilyMember::Table)
            .columns([
                table::FamilyMember::Id,
                table::FamilyMember::UserId,
                table::FamilyMember::Name,
                table::FamilyMember::Role,
                table::FamilyMember::Age,
                table::FamilyMember::Email,
                table::FamilyMember::Preferences,
                table::FamilyMember::Notes,
                table::FamilyMember::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                user_id.to_owned().into(),
                input.name.to_owned().into(),
                input.role.into(),
                input.age.into(),
                input.email.into(),
                input.preferences.into(),
                input.notes.into(),
                OffsetDateTime::now_utc().unix_timestamp().into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        tracing::info!(
            member_id = %id,
            user_id = %user_id,
            name = %input.name,
            "family member added"
        );

        Ok(id)
    }

    pub async fn delete(
        &self,
        id: impl Into<String>,
        metadata: &Metadata,
    ) -> famplan_shared::Result<()> {
        let id = id.into();
        let user_id = metadata.trigger_by()?;

        let statement = Query::delete()
            .from_table(table::FamilyMember::Table)
            .and_where(Expr::col(table::FamilyMember::Id).eq(&id))
            .and_where(Expr::col(table::FamilyMember::UserId).eq(&user_id))
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        let result = sqlx::query_with(&sql, values).execute(&self.0).await?;

        if result.rows_affected() == 0 {
            famplan_shared::not_found!("family member {id}");
        }

        tracing::info!(member_id = %id, user_id = %user_id, "family member deleted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> MemberInput {
        MemberInput {
            name: " Maman ".to_owned(),
            role: Some("Parent".to_owned()),
            email: Some(" maman@example.com ".to_owned()),
            ..Default::default()
        }
    }

    #[test]
    fn test_trimmed_input_is_valid() {
        let input = input().trimmed();
        assert_eq!(input.name, "Maman");
        assert_eq!(input.email.as_deref(), Some("maman@example.com"));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_blank_optionals_become_absent() {
        let input = MemberInput {
            role: Some("  ".to_owned()),
            email: Some(String::new()),
            notes: Some(" ".to_owned()),
            ..input()
        }
        .trimmed();

        assert_eq!(input.role, None);
        assert_eq!(input.email, None);
        assert_eq!(input.notes, None);
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_invalid_fields_are_rejected() {
        let blank_name = MemberInput {
            name: "   ".to_owned(),
            ..input()
        };
        assert!(blank_name.trimmed().validate().is_err());

        let bad_email = MemberInput {
            email: Some("maman-at-example".to_owned()),
            ..input()
        };
        assert!(bad_email.trimmed().validate().is_err());

        let bad_age = MemberInput {
            age: Some(-2),
            ..input()
        };
        assert!(bad_age.trimmed().validate().is_err());
    }
}

//! PostgreSQL implementation of LeadRepository (leads and newsletter).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, LeadId, Page, PageRequest, PropertyId, UserId};
use crate::domain::marketing::{Lead, Utm};
use crate::ports::{LeadFilter, LeadRepository};

use super::support::{db_error, parse_column, total, ts};

pub struct PostgresLeadRepository {
    pool: PgPool,
}

impl PostgresLeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LeadRow {
    id: Uuid,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    source: String,
    interest: Option<String>,
    message: Option<String>,
    property_id: Option<Uuid>,
    user_id: Option<Uuid>,
    utm_source: Option<String>,
    utm_medium: Option<String>,
    utm_campaign: Option<String>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LeadRow> for Lead {
    type Error = DomainError;

    fn try_from(row: LeadRow) -> Result<Self, Self::Error> {
        Ok(Lead {
            id: LeadId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            source: parse_column("source", &row.source)?,
            interest: row.interest,
            message: row.message,
            property_id: row.property_id.map(PropertyId::from_uuid),
            user_id: row.user_id.map(UserId::from_uuid),
            utm: Utm {
                source: row.utm_source,
                medium: row.utm_medium,
                campaign: row.utm_campaign,
            },
            status: parse_column("status", &row.status)?,
            notes: row.notes,
            created_at: ts(row.created_at),
            updated_at: ts(row.updated_at),
        })
    }
}

const LEAD_COLUMNS: &str = "id, name, email, phone, source, interest, message, property_id, \
    user_id, utm_source, utm_medium, utm_campaign, status, notes, created_at, updated_at";

const LEAD_FILTER: &str = "WHERE ($1::text IS NULL OR status = $1) AND ($2::text IS NULL OR source = $2)";

#[async_trait]
impl LeadRepository for PostgresLeadRepository {
    async fn create(&self, lead: &Lead) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO marketing_leads (
                id, name, email, phone, source, interest, message, property_id, user_id,
                utm_source, utm_medium, utm_campaign, status, notes, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(lead.id.as_uuid())
        .bind(&lead.name)
        .bind(&lead.email)
        .bind(&lead.phone)
        .bind(lead.source.as_str())
        .bind(&lead.interest)
        .bind(&lead.message)
        .bind(lead.property_id.map(|id| *id.as_uuid()))
        .bind(lead.user_id.map(|id| *id.as_uuid()))
        .bind(&lead.utm.source)
        .bind(&lead.utm.medium)
        .bind(&lead.utm.campaign)
        .bind(lead.status.as_str())
        .bind(&lead.notes)
        .bind(lead.created_at.as_datetime())
        .bind(lead.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert lead"))?;

        Ok(())
    }

    async fn update(&self, lead: &Lead) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE marketing_leads SET status = $2, notes = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(lead.id.as_uuid())
        .bind(lead.status.as_str())
        .bind(&lead.notes)
        .bind(lead.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update lead"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(ErrorCode::LeadNotFound, "Lead", lead.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &LeadId) -> Result<Option<Lead>, DomainError> {
        let row: Option<LeadRow> =
            sqlx::query_as(&format!("SELECT {} FROM marketing_leads WHERE id = $1", LEAD_COLUMNS))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find lead"))?;

        row.map(Lead::try_from).transpose()
    }

    async fn list(&self, filter: &LeadFilter, page: PageRequest) -> Result<Page<Lead>, DomainError> {
        let status = filter.status.map(|s| s.as_str());
        let source = filter.source.map(|s| s.as_str());

        let (count,): (i64,) =
            sqlx::query_as(&format!("SELECT COUNT(*) FROM marketing_leads {}", LEAD_FILTER))
                .bind(status)
                .bind(source)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to count leads"))?;

        let rows: Vec<LeadRow> = sqlx::query_as(&format!(
            "SELECT {} FROM marketing_leads {} ORDER BY created_at DESC LIMIT $3 OFFSET $4",
            LEAD_COLUMNS, LEAD_FILTER
        ))
        .bind(status)
        .bind(source)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list leads"))?;

        let leads = rows.into_iter().map(Lead::try_from).collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(leads, total(count), page))
    }

    async fn subscribe(&self, email: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "INSERT INTO newsletter_subscribers (email) VALUES ($1) ON CONFLICT (email) DO NOTHING",
        )
        .bind(email)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to subscribe"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn unsubscribe(&self, email: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM newsletter_subscribers WHERE email = $1")
            .bind(email)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to unsubscribe"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::marketing::{LeadSource, LeadStatus};

    #[test]
    fn row_rebuilds_utm_and_links() {
        let now = Utc::now();
        let user = Uuid::new_v4();
        let lead = Lead::try_from(LeadRow {
            id: Uuid::new_v4(),
            name: "Vikram".into(),
            email: Some("vikram@example.com".into()),
            phone: None,
            source: "landing_page".into(),
            interest: Some("3BHK in Pune".into()),
            message: None,
            property_id: None,
            user_id: Some(user),
            utm_source: Some("google".into()),
            utm_medium: Some("cpc".into()),
            utm_campaign: None,
            status: "qualified".into(),
            notes: None,
            created_at: now,
            updated_at: now,
        })
        .unwrap();
        assert_eq!(lead.source, LeadSource::LandingPage);
        assert_eq!(lead.status, LeadStatus::Qualified);
        assert_eq!(lead.utm.medium.as_deref(), Some("cpc"));
        assert_eq!(lead.user_id, Some(UserId::from_uuid(user)));
    }
}

use crate::error::HubError;
use crate::models::core::OpportunityId;
use crate::models::opportunity::{
    NewOpportunity, Opportunity, OpportunitySummary, OpportunityUpdate,
};
use crate::repository::opportunity_repository::OpportunityRepository;
use crate::repository::sqlite::{
    count_rows, delete_row, enum_column, row_exists, timestamp, PartialUpdate,
};
use crate::repository::SharedSqliteConnection;
use log::{debug, info};
use rusqlite::{params, OptionalExtension, Row};

pub struct SqliteOpportunityRepository {
    connection: SharedSqliteConnection,
}

impl SqliteOpportunityRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `opportunities` table.
pub(crate) const CREATE_OPPORTUNITIES_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS opportunities (
    id integer primary key autoincrement not null,
    title varchar(255) not null,
    company varchar(255) not null,
    job_type varchar(16) not null check (job_type in ('job', 'internship')),
    description text not null,
    requirements text,
    location varchar(255),
    salary_range varchar(100),
    posted_by integer,
    created_at datetime not null default current_timestamp
);
";

const OPPORTUNITY_COLUMNS: &str = "o.id, o.title, o.company, o.job_type, o.description, \
     o.requirements, o.location, o.salary_range, o.posted_by, o.created_at";

fn opportunity_from_row(row: &Row<'_>) -> rusqlite::Result<Opportunity> {
    Ok(Opportunity {
        id: row.get(0)?,
        title: row.get(1)?,
        company: row.get(2)?,
        job_type: enum_column(row, 3)?,
        description: row.get(4)?,
        requirements: row.get(5)?,
        location: row.get(6)?,
        salary_range: row.get(7)?,
        posted_by: row.get(8)?,
        created_at: timestamp(row, 9)?,
    })
}

impl OpportunityRepository for SqliteOpportunityRepository {
    fn create_opportunity(
        &self,
        opportunity: &NewOpportunity,
    ) -> Result<OpportunityId, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id: OpportunityId = conn
            .query_row(
                r"INSERT INTO opportunities
                      (title, company, job_type, description, requirements, location, salary_range, posted_by)
                  VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                  RETURNING id",
                params![
                    opportunity.title,
                    opportunity.company,
                    opportunity.job_type.as_str(),
                    opportunity.description,
                    opportunity.requirements,
                    opportunity.location,
                    opportunity.salary_range,
                    opportunity.posted_by,
                ],
                |row| row.get(0),
            )
            .map_err(|e| HubError::from_write("opportunities", e))?;
        info!(
            "Posted {} '{}' at {} with id {id}",
            opportunity.job_type, opportunity.title, opportunity.company
        );
        Ok(id)
    }

    fn find_opportunity_by_id(&self, id: OpportunityId) -> Result<Opportunity, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("SELECT {OPPORTUNITY_COLUMNS} FROM opportunities o WHERE o.id = ?1");
        conn.query_row(&sql, params![id], opportunity_from_row)
            .optional()?
            .ok_or_else(|| HubError::not_found(OpportunityId::ENTITY, id))
    }

    fn find_opportunities(&self) -> Result<Vec<OpportunitySummary>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            r"SELECT {OPPORTUNITY_COLUMNS},
                  (SELECT COUNT(*) FROM applications a WHERE a.opportunity_id = o.id)
              FROM opportunities o
              ORDER BY o.created_at DESC, o.id DESC"
        );
        debug!("find_opportunities():- {sql}");
        let mut stmt = conn.prepare(&sql)?;
        let opportunities = stmt
            .query_map([], |row| {
                Ok(OpportunitySummary {
                    opportunity: opportunity_from_row(row)?,
                    application_count: row.get(10)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(opportunities)
    }

    fn update_opportunity(
        &self,
        id: OpportunityId,
        update: &OpportunityUpdate,
    ) -> Result<(), HubError> {
        let mut partial = PartialUpdate::new("opportunities", OpportunityId::ENTITY);
        partial
            .set("title", update.title.clone())
            .set("company", update.company.clone())
            .set("job_type", update.job_type.map(|t| t.as_str()))
            .set("description", update.description.clone())
            .set("requirements", update.requirements.clone())
            .set("location", update.location.clone())
            .set("salary_range", update.salary_range.clone())
            .set("posted_by", update.posted_by);
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        partial.execute(&conn, id.value())
    }

    fn delete_opportunity(&self, id: OpportunityId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "opportunities", OpportunityId::ENTITY, id.value())
    }

    fn opportunity_exists(&self, id: OpportunityId) -> Result<bool, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        row_exists(&conn, "opportunities", id.value())
    }

    fn count_opportunities(&self) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(&conn, "SELECT COUNT(*) FROM opportunities", &[])
    }
}

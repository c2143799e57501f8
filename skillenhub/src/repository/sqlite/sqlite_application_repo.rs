use crate::error::HubError;
use crate::models::application::{
    Application, ApplicationUpdate, ApplicationView, NewApplication,
};
use crate::models::core::{ApplicationId, OpportunityId, UserId};
use crate::repository::application_repository::ApplicationRepository;
use crate::repository::sqlite::{
    count_rows, delete_row, enum_column, limit_param, timestamp, PartialUpdate,
};
use crate::repository::SharedSqliteConnection;
use log::debug;
use rusqlite::{params, OptionalExtension, Row};

pub struct SqliteApplicationRepository {
    connection: SharedSqliteConnection,
}

impl SqliteApplicationRepository {
    pub(crate) fn new(connection: SharedSqliteConnection) -> Self {
        Self { connection }
    }
}

/// SQL statement to create the `applications` table.
pub(crate) const CREATE_APPLICATIONS_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS applications (
    id integer primary key autoincrement not null,
    user_id integer not null,
    opportunity_id integer not null,
    resume_file varchar(255),
    status varchar(16) not null default 'applied'
        check (status in ('applied', 'viewed', 'shortlisted', 'rejected')),
    applied_at datetime not null default current_timestamp,
    UNIQUE(user_id, opportunity_id)
);
";

const APPLICATION_COLUMNS: &str = "id, user_id, opportunity_id, resume_file, status, applied_at";

/// Applications joined with their opportunity and applicant
const APPLICATION_VIEW_SQL: &str = r"
SELECT a.id, a.user_id, a.opportunity_id, a.resume_file, a.status, a.applied_at,
       o.title, o.company, o.job_type, u.full_name, u.email
FROM applications a
INNER JOIN opportunities o ON a.opportunity_id = o.id
INNER JOIN users u ON a.user_id = u.id
";

fn application_from_row(row: &Row<'_>) -> rusqlite::Result<Application> {
    Ok(Application {
        id: row.get(0)?,
        user_id: row.get(1)?,
        opportunity_id: row.get(2)?,
        resume_file: row.get(3)?,
        status: enum_column(row, 4)?,
        applied_at: timestamp(row, 5)?,
    })
}

fn application_view_from_row(row: &Row<'_>) -> rusqlite::Result<ApplicationView> {
    Ok(ApplicationView {
        application: application_from_row(row)?,
        opportunity_title: row.get(6)?,
        company: row.get(7)?,
        job_type: enum_column(row, 8)?,
        applicant_name: row.get(9)?,
        applicant_email: row.get(10)?,
    })
}

impl ApplicationRepository for SqliteApplicationRepository {
    fn create_application(
        &self,
        application: &NewApplication,
    ) -> Result<ApplicationId, HubError> {
        debug!(
            "User {} applies to opportunity {}",
            application.user_id, application.opportunity_id
        );
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let id = match application.status {
            Some(status) => conn.query_row(
                r"INSERT INTO applications (user_id, opportunity_id, resume_file, status)
                  VALUES (?1, ?2, ?3, ?4) RETURNING id",
                params![
                    application.user_id,
                    application.opportunity_id,
                    application.resume_file,
                    status.as_str()
                ],
                |row| row.get(0),
            ),
            None => conn.query_row(
                r"INSERT INTO applications (user_id, opportunity_id, resume_file)
                  VALUES (?1, ?2, ?3) RETURNING id",
                params![
                    application.user_id,
                    application.opportunity_id,
                    application.resume_file
                ],
                |row| row.get(0),
            ),
        }
        .map_err(|e| HubError::from_write("applications", e))?;
        Ok(id)
    }

    fn find_application_by_id(&self, id: ApplicationId) -> Result<Application, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ?1");
        conn.query_row(&sql, params![id], application_from_row)
            .optional()?
            .ok_or_else(|| HubError::not_found(ApplicationId::ENTITY, id))
    }

    fn find_application(
        &self,
        user_id: UserId,
        opportunity_id: OpportunityId,
    ) -> Result<Option<Application>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE user_id = ?1 AND opportunity_id = ?2"
        );
        let application = conn
            .query_row(&sql, params![user_id, opportunity_id], application_from_row)
            .optional()?;
        Ok(application)
    }

    fn find_applications_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ApplicationView>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!(
            "{APPLICATION_VIEW_SQL} WHERE a.user_id = ?1 ORDER BY a.applied_at DESC, a.id DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let applications = stmt
            .query_map(params![user_id], application_view_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(applications)
    }

    fn find_all_applications(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<ApplicationView>, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let sql = format!("{APPLICATION_VIEW_SQL} ORDER BY a.applied_at DESC, a.id DESC LIMIT ?1");
        let mut stmt = conn.prepare(&sql)?;
        let applications = stmt
            .query_map(params![limit_param(limit)], application_view_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(applications)
    }

    fn update_application(
        &self,
        id: ApplicationId,
        update: &ApplicationUpdate,
    ) -> Result<(), HubError> {
        let mut partial = PartialUpdate::new("applications", ApplicationId::ENTITY);
        partial
            .set("resume_file", update.resume_file.clone())
            .set("status", update.status.map(|s| s.as_str()));
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        partial.execute(&conn, id.value())
    }

    fn delete_application(&self, id: ApplicationId) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        delete_row(&conn, "applications", ApplicationId::ENTITY, id.value())
    }

    fn delete_application_of_user(
        &self,
        id: ApplicationId,
        user_id: UserId,
    ) -> Result<(), HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected = conn.execute(
            "DELETE FROM applications WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        if rows_affected == 0 {
            return Err(HubError::not_found(ApplicationId::ENTITY, id));
        }
        Ok(())
    }

    fn delete_applications_for_opportunity(
        &self,
        opportunity_id: OpportunityId,
    ) -> Result<usize, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        let rows_affected = conn.execute(
            "DELETE FROM applications WHERE opportunity_id = ?1",
            params![opportunity_id],
        )?;
        debug!("Deleted {rows_affected} applications for opportunity {opportunity_id}");
        Ok(rows_affected)
    }

    fn count_applications(&self) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(&conn, "SELECT COUNT(*) FROM applications", &[])
    }

    fn count_applications_for_opportunity(
        &self,
        opportunity_id: OpportunityId,
    ) -> Result<i64, HubError> {
        let conn = self
            .connection
            .lock()
            .map_err(|_| HubError::LockPoisoned)?;
        count_rows(
            &conn,
            "SELECT COUNT(*) FROM applications WHERE opportunity_id = ?1",
            &[&opportunity_id],
        )
    }
}

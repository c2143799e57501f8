use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HubError;
use crate::models::core::{ApplicationId, OpportunityId, UserId};
use crate::models::opportunity::JobType;

/// Progress of an application.
///
/// The usual path is applied → viewed → shortlisted | rejected, but no order is
/// enforced: any value may be set at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Viewed,
    Shortlisted,
    Rejected,
}

impl ApplicationStatus {
    /// Returns the string representation used in storage and display.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "applied",
            ApplicationStatus::Viewed => "viewed",
            ApplicationStatus::Shortlisted => "shortlisted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "applied" => Ok(ApplicationStatus::Applied),
            "viewed" => Ok(ApplicationStatus::Viewed),
            "shortlisted" => Ok(ApplicationStatus::Shortlisted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(HubError::InvalidEnumValue {
                field: "applications.status",
                value: s.to_string(),
            }),
        }
    }
}

/// A row of the `applications` table. At most one exists per (user, opportunity).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub user_id: UserId,
    pub opportunity_id: OpportunityId,
    pub resume_file: Option<String>,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewApplication {
    pub user_id: UserId,
    pub opportunity_id: OpportunityId,
    pub resume_file: Option<String>,
    /// `None` lets the column default (`applied`) apply
    pub status: Option<ApplicationStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationUpdate {
    pub resume_file: Option<Option<String>>,
    pub status: Option<ApplicationStatus>,
}

/// An application joined with the opportunity and the applicant it refers to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationView {
    pub application: Application,
    pub opportunity_title: String,
    pub company: String,
    pub job_type: JobType,
    pub applicant_name: String,
    pub applicant_email: String,
}

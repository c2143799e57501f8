use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::HubError;
use crate::models::core::{OpportunityId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Job,
    Internship,
}

impl JobType {
    /// Returns the string representation used in storage and display.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::Job => "job",
            JobType::Internship => "internship",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for JobType {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "job" => Ok(JobType::Job),
            "internship" => Ok(JobType::Internship),
            _ => Err(HubError::InvalidEnumValue {
                field: "opportunities.job_type",
                value: s.to_string(),
            }),
        }
    }
}

/// A row of the `opportunities` table: a job or internship offer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: OpportunityId,
    pub title: String,
    pub company: String,
    pub job_type: JobType,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub posted_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOpportunity {
    pub title: String,
    pub company: String,
    pub job_type: JobType,
    pub description: String,
    pub requirements: Option<String>,
    pub location: Option<String>,
    pub salary_range: Option<String>,
    pub posted_by: Option<UserId>,
}

impl NewOpportunity {
    #[must_use]
    pub fn new(title: &str, company: &str, job_type: JobType, description: &str) -> Self {
        NewOpportunity {
            title: title.to_string(),
            company: company.to_string(),
            job_type,
            description: description.to_string(),
            requirements: None,
            location: None,
            salary_range: None,
            posted_by: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunityUpdate {
    pub title: Option<String>,
    pub company: Option<String>,
    pub job_type: Option<JobType>,
    pub description: Option<String>,
    pub requirements: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub salary_range: Option<Option<String>>,
    pub posted_by: Option<Option<UserId>>,
}

/// An opportunity together with the number of applications it received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpportunitySummary {
    pub opportunity: Opportunity,
    pub application_count: i64,
}

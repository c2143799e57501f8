use crate::error::HubError;
use crate::models::application::{
    ApplicationStatus, ApplicationUpdate, ApplicationView, NewApplication,
};
use crate::models::core::{ApplicationId, OpportunityId, UserId};
use crate::models::notification::NotificationKind;
use crate::models::opportunity::{
    NewOpportunity, Opportunity, OpportunitySummary, OpportunityUpdate,
};
use crate::repository::application_repository::ApplicationRepository;
use crate::repository::opportunity_repository::OpportunityRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::notification_service::NotificationService;
use crate::service::require_text;
use crate::service::user_service::ensure_user_exists;
use log::info;
use std::sync::Arc;

/// Jobs and internships, and the applications made to them
pub struct OpportunityService {
    opportunities: Arc<dyn OpportunityRepository>,
    applications: Arc<dyn ApplicationRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<NotificationService>,
}

impl OpportunityService {
    pub fn new(
        opportunities: Arc<dyn OpportunityRepository>,
        applications: Arc<dyn ApplicationRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            opportunities,
            applications,
            users,
            notifications,
        }
    }

    pub fn post_opportunity(&self, opportunity: &NewOpportunity) -> Result<OpportunityId, HubError> {
        require_text(&opportunity.title, "title")?;
        require_text(&opportunity.company, "company")?;
        require_text(&opportunity.description, "description")?;
        if let Some(poster) = opportunity.posted_by {
            ensure_user_exists(self.users.as_ref(), poster)?;
        }
        self.opportunities.create_opportunity(opportunity)
    }

    pub fn update_opportunity(
        &self,
        id: OpportunityId,
        update: &OpportunityUpdate,
    ) -> Result<(), HubError> {
        self.opportunities.update_opportunity(id, update)
    }

    /// Deletes the opportunity together with its applications.
    ///
    /// Returns the number of applications removed.
    pub fn delete_opportunity(&self, id: OpportunityId) -> Result<usize, HubError> {
        if !self.opportunities.opportunity_exists(id)? {
            return Err(HubError::not_found(OpportunityId::ENTITY, id));
        }
        let removed = self.applications.delete_applications_for_opportunity(id)?;
        self.opportunities.delete_opportunity(id)?;
        info!("Deleted opportunity {id} and {removed} applications");
        Ok(removed)
    }

    pub fn opportunity(&self, id: OpportunityId) -> Result<Opportunity, HubError> {
        self.opportunities.find_opportunity_by_id(id)
    }

    pub fn opportunities(&self) -> Result<Vec<OpportunitySummary>, HubError> {
        self.opportunities.find_opportunities()
    }

    ///
    /// Applies `application.user_id` to an opportunity and sends them a job alert.
    ///
    /// # Errors
    /// * `HubError::ReferenceNotFound` if the opportunity or the user does not exist.
    /// * `HubError::UniqueConstraintViolation` if the user already applied.
    pub fn apply(&self, application: &NewApplication) -> Result<ApplicationId, HubError> {
        let opportunity = self
            .opportunities
            .find_opportunity_by_id(application.opportunity_id)
            .map_err(|e| match e {
                HubError::NotFound { entity, id } => HubError::ReferenceNotFound { entity, id },
                other => other,
            })?;
        ensure_user_exists(self.users.as_ref(), application.user_id)?;

        if self
            .applications
            .find_application(application.user_id, application.opportunity_id)?
            .is_some()
        {
            return Err(HubError::UniqueConstraintViolation {
                table: "applications".to_string(),
                detail: format!(
                    "user {} already applied to opportunity {}",
                    application.user_id, application.opportunity_id
                ),
            });
        }

        let id = self.applications.create_application(application)?;
        self.notifications.notify(
            application.user_id,
            &format!(
                "Your application for {} at {} has been received",
                opportunity.title, opportunity.company
            ),
            NotificationKind::JobAlert,
        )?;
        Ok(id)
    }

    pub fn applications_of(&self, user_id: UserId) -> Result<Vec<ApplicationView>, HubError> {
        self.applications.find_applications_for_user(user_id)
    }

    pub fn all_applications(&self, limit: Option<usize>) -> Result<Vec<ApplicationView>, HubError> {
        self.applications.find_all_applications(limit)
    }

    pub fn set_status(&self, id: ApplicationId, status: ApplicationStatus) -> Result<(), HubError> {
        self.applications.update_application(
            id,
            &ApplicationUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    /// Withdraws an application, which only its applicant may do.
    pub fn withdraw(&self, id: ApplicationId, user_id: UserId) -> Result<(), HubError> {
        self.applications.delete_application_of_user(id, user_id)
    }
}

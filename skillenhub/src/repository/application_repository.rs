use crate::error::HubError;
use crate::models::application::{
    Application, ApplicationUpdate, ApplicationView, NewApplication,
};
use crate::models::core::{ApplicationId, OpportunityId, UserId};

pub trait ApplicationRepository: Send + Sync {
    ///
    /// # Errors
    /// * `HubError::UniqueConstraintViolation` if the user already applied to the opportunity.
    fn create_application(&self, application: &NewApplication)
        -> Result<ApplicationId, HubError>;

    fn find_application_by_id(&self, id: ApplicationId) -> Result<Application, HubError>;

    fn find_application(
        &self,
        user_id: UserId,
        opportunity_id: OpportunityId,
    ) -> Result<Option<Application>, HubError>;

    /// Applications of `user_id` joined with their opportunity, most recent first.
    fn find_applications_for_user(&self, user_id: UserId)
        -> Result<Vec<ApplicationView>, HubError>;

    /// Every application on the platform, most recent first.
    fn find_all_applications(&self, limit: Option<usize>)
        -> Result<Vec<ApplicationView>, HubError>;

    fn update_application(
        &self,
        id: ApplicationId,
        update: &ApplicationUpdate,
    ) -> Result<(), HubError>;

    fn delete_application(&self, id: ApplicationId) -> Result<(), HubError>;

    /// Deletes the application only if it belongs to `user_id`.
    fn delete_application_of_user(&self, id: ApplicationId, user_id: UserId)
        -> Result<(), HubError>;

    /// Returns the number of deleted applications.
    fn delete_applications_for_opportunity(
        &self,
        opportunity_id: OpportunityId,
    ) -> Result<usize, HubError>;

    fn count_applications(&self) -> Result<i64, HubError>;

    fn count_applications_for_opportunity(
        &self,
        opportunity_id: OpportunityId,
    ) -> Result<i64, HubError>;
}

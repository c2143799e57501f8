use crate::error::HubError;
use crate::models::core::OpportunityId;
use crate::models::opportunity::{
    NewOpportunity, Opportunity, OpportunitySummary, OpportunityUpdate,
};

pub trait OpportunityRepository: Send + Sync {
    fn create_opportunity(&self, opportunity: &NewOpportunity)
        -> Result<OpportunityId, HubError>;

    fn find_opportunity_by_id(&self, id: OpportunityId) -> Result<Opportunity, HubError>;

    /// All opportunities, newest first, with the number of applications each received.
    fn find_opportunities(&self) -> Result<Vec<OpportunitySummary>, HubError>;

    fn update_opportunity(
        &self,
        id: OpportunityId,
        update: &OpportunityUpdate,
    ) -> Result<(), HubError>;

    /// Deletes the opportunity only; applications referring to it remain.
    fn delete_opportunity(&self, id: OpportunityId) -> Result<(), HubError>;

    fn opportunity_exists(&self, id: OpportunityId) -> Result<bool, HubError>;

    fn count_opportunities(&self) -> Result<i64, HubError>;
}

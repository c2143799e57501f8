use crate::error::HubError;
use crate::models::connection::{
    Connection, ConnectionPeer, ConnectionUpdate, IncomingRequest, NewConnection,
};
use crate::models::core::{ConnectionId, UserId};

/// A trait for storing connection requests between two users.
///
/// A connection is directed (sender → receiver) while it is pending, but once
/// accepted it is shared by both participants, hence the queries that look in
/// both directions.
pub trait ConnectionRepository: Send + Sync {
    fn create_connection(&self, connection: &NewConnection) -> Result<ConnectionId, HubError>;

    fn find_connection_by_id(&self, id: ConnectionId) -> Result<Connection, HubError>;

    /// The most recent connection between the two users, regardless of who sent it.
    fn find_connection_between(
        &self,
        first: UserId,
        second: UserId,
    ) -> Result<Option<Connection>, HubError>;

    /// Pending requests addressed to `receiver`, newest first.
    fn find_incoming_requests(&self, receiver: UserId) -> Result<Vec<IncomingRequest>, HubError>;

    /// Accepted connections of `user_id`, seen from that user and sorted by the peer's name.
    fn find_accepted_peers(&self, user_id: UserId) -> Result<Vec<ConnectionPeer>, HubError>;

    fn update_connection(&self, id: ConnectionId, update: &ConnectionUpdate)
        -> Result<(), HubError>;

    fn delete_connection(&self, id: ConnectionId) -> Result<(), HubError>;

    fn count_outgoing_pending(&self, sender: UserId) -> Result<i64, HubError>;

    fn count_incoming_pending(&self, receiver: UserId) -> Result<i64, HubError>;

    /// Accepted connections, for a single user or for the whole platform.
    fn count_accepted(&self, user_id: Option<UserId>) -> Result<i64, HubError>;
}

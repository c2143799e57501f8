//! The connection handshake between two users.
//!
//! A request starts out `pending`. Only its receiver may answer it, once:
//! accepting turns it `accepted`, declining turns it `rejected`. While a
//! pending or accepted connection exists in either direction no new request
//! can be sent; a rejected one does not stand in the way.
use crate::error::HubError;
use crate::models::connection::{
    Connection, ConnectionPeer, ConnectionStatus, ConnectionUpdate, IncomingRequest,
    NewConnection,
};
use crate::models::core::{ConnectionId, UserId};
use crate::models::notification::NotificationKind;
use crate::repository::connection_repository::ConnectionRepository;
use crate::repository::user_repository::UserRepository;
use crate::service::notification_service::NotificationService;
use crate::service::user_service::ensure_user_exists;
use log::info;
use std::sync::Arc;

pub struct ConnectionService {
    connections: Arc<dyn ConnectionRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<NotificationService>,
}

impl ConnectionService {
    pub fn new(
        connections: Arc<dyn ConnectionRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            connections,
            users,
            notifications,
        }
    }

    /// Sends a connection request and notifies the receiver.
    ///
    /// # Errors
    /// * `HubError::BadInput` when a user tries to connect with themselves.
    /// * `HubError::ReferenceNotFound` if either user does not exist.
    /// * `HubError::ConnectionExists` if a pending or accepted connection is already in place.
    pub fn send_request(&self, sender: UserId, receiver: UserId) -> Result<ConnectionId, HubError> {
        if sender == receiver {
            return Err(HubError::BadInput(
                "A user cannot connect with themselves".to_string(),
            ));
        }
        ensure_user_exists(self.users.as_ref(), sender)?;
        ensure_user_exists(self.users.as_ref(), receiver)?;

        if let Some(existing) = self.connections.find_connection_between(sender, receiver)? {
            if existing.status != ConnectionStatus::Rejected {
                return Err(HubError::ConnectionExists(sender.value(), receiver.value()));
            }
        }

        let id = self.connections.create_connection(&NewConnection {
            sender_id: sender,
            receiver_id: receiver,
            status: None,
        })?;

        let sender_name = self.users.find_user_by_id(sender)?.full_name;
        self.notifications.notify(
            receiver,
            &format!("{sender_name} sent you a connection request"),
            NotificationKind::ConnectionRequest,
        )?;
        Ok(id)
    }

    /// Accepts or declines a pending request addressed to `responder`.
    ///
    /// The sender is notified when the request is accepted.
    pub fn respond(
        &self,
        id: ConnectionId,
        responder: UserId,
        accept: bool,
    ) -> Result<Connection, HubError> {
        let connection = self.connections.find_connection_by_id(id)?;
        if connection.receiver_id != responder {
            return Err(HubError::InvalidConnectionState {
                id: id.value(),
                reason: format!("user {responder} is not the receiver of this request"),
            });
        }
        if connection.status.is_terminal() {
            return Err(HubError::InvalidConnectionState {
                id: id.value(),
                reason: format!("the request is already {}", connection.status),
            });
        }

        let status = if accept {
            ConnectionStatus::Accepted
        } else {
            ConnectionStatus::Rejected
        };
        self.connections.update_connection(
            id,
            &ConnectionUpdate {
                status: Some(status),
            },
        )?;
        info!("Connection {id} is now {status}");

        if accept {
            let receiver_name = self.users.find_user_by_id(responder)?.full_name;
            self.notifications.notify(
                connection.sender_id,
                &format!("{receiver_name} accepted your connection request"),
                NotificationKind::ConnectionRequest,
            )?;
        }
        Ok(Connection {
            status,
            ..connection
        })
    }

    /// Removes a connection `user_id` takes part in, in whatever state it is.
    pub fn remove(&self, id: ConnectionId, user_id: UserId) -> Result<(), HubError> {
        let connection = self.connections.find_connection_by_id(id)?;
        if !connection.involves(user_id) {
            return Err(HubError::not_found(ConnectionId::ENTITY, id));
        }
        self.connections.delete_connection(id)
    }

    pub fn are_connected(&self, first: UserId, second: UserId) -> Result<bool, HubError> {
        Ok(self
            .connections
            .find_connection_between(first, second)?
            .is_some_and(|c| c.status == ConnectionStatus::Accepted))
    }

    pub fn connections(&self, user_id: UserId) -> Result<Vec<ConnectionPeer>, HubError> {
        self.connections.find_accepted_peers(user_id)
    }

    pub fn incoming_requests(&self, user_id: UserId) -> Result<Vec<IncomingRequest>, HubError> {
        self.connections.find_incoming_requests(user_id)
    }
}

//! Records of the twelve SkillenHub tables, the values needed to create them and
//! the partial updates that may be applied to them.

pub mod application;
pub mod comment;
pub mod connection;
pub mod core;
pub mod event;
pub mod like;
pub mod message;
pub mod notification;
pub mod opportunity;
pub mod password_reset;
pub mod post;
pub mod user;

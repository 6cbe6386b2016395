#![warn(missing_docs)]
//! # courier-core
//!
//! Core types for the Courier request orchestration client.
//!
//! This crate provides the vocabulary shared between the orchestration
//! layer (`courier`) and transport integrations:
//!
//! - **Describe** a logical request ([`RequestDescriptor`])
//! - **Identify** it canonically ([`Fingerprint`])
//! - **Carry** the exchange result ([`ClientResponse`])
//! - **Age** cached results ([`CachedResponse`])
//! - **Call** the network ([`Transport`])
//!
//! The transport itself is an external collaborator: anything that can turn
//! a [`RequestDescriptor`] into a [`ClientResponse`] (or a
//! [`TransportError`]) can sit behind the orchestrator.

pub mod descriptor;
pub mod error;
pub mod fingerprint;
pub mod response;
pub mod transport;
pub mod value;

pub use descriptor::{RequestDescriptor, RequestDescriptorBuilder};
pub use error::TransportError;
pub use fingerprint::Fingerprint;
pub use response::ClientResponse;
pub use transport::Transport;
pub use value::{CachedResponse, EntryState};

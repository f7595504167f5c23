//! Application layer for the remote.
//!
//! # What lives here?
//!
//! - **`remote_client`** – The [`RemoteClient`] capability every brand client
//!   implements, the [`ClientFactory`] that picks one for the selected brand,
//!   and the shared [`ControlError`] / [`SendOutcome`] types.
//!
//! - **`ports`** – Traits for the collaborators the router needs but does not
//!   implement itself: persistence, user notifications, haptics, and device
//!   scanning.  Concrete adapters are in the infrastructure layer.
//!
//! - **`control_router`** – [`ControlContext`], the single object an embedding
//!   application talks to.
//!
//! [`RemoteClient`]: remote_client::RemoteClient
//! [`ClientFactory`]: remote_client::ClientFactory
//! [`ControlError`]: remote_client::ControlError
//! [`SendOutcome`]: remote_client::SendOutcome
//! [`ControlContext`]: control_router::ControlContext

pub mod control_router;
pub mod ports;
pub mod remote_client;

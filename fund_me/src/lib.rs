pub mod artifacts;
pub mod client;
pub mod config;
pub mod contracts;
pub mod deploy;
pub mod deployments;
pub mod verify;

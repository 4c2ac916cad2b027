//! Test doubles for the hosted backend

pub mod mock_client;

pub use mock_client::MockBackend;

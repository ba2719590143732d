//! Incident intake and resolution.
//!
//! Tenants submit incidents, anyone may list them, and only admins may
//! resolve them. State lives in an in-process [`store::IncidentStore`];
//! the HTTP surface in [`api`] is a thin layer over [`service::IncidentService`].

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod notify;
pub mod service;
pub mod store;

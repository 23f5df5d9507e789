//! Client (reviewed business) management and public lookup.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::ClientService;


pub mod config;
pub mod db;
pub mod eligibility;
pub mod error;
pub mod import;
pub mod ledger;
pub mod models;
pub mod records;
pub mod report;
pub mod retry;
pub mod seed;
pub mod service;
pub mod store;
pub mod validation;

pub use error::{PortalError, Result};
pub use service::PortalService;

pub mod audit_service;
pub mod dispute_service;
pub mod error;
pub mod onboarding_service;
pub mod pager;
pub mod payment_service;
pub mod rating_service;
pub mod status_rules;
pub mod storage_service;

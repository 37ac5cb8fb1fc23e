pub mod audit;
pub mod auth;
pub mod catalog;
pub mod disputes;
pub mod onboarding;
pub mod payments;
pub mod tasks;
pub mod users;

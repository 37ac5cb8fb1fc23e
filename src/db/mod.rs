pub mod db;
pub mod disputedb;
pub mod onboardingdb;
pub mod paymentdb;
pub mod taskdb;
pub mod userdb;

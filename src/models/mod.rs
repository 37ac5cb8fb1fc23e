pub mod disputemodel;
pub mod onboardingmodel;
pub mod paymentmodel;
pub mod taskmodel;
pub mod usermodel;

pub mod disputedtos;
pub mod onboardingdtos;
pub mod paymentdtos;
pub mod taskdtos;
pub mod userdtos;

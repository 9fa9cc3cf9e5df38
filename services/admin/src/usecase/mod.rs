pub mod billing;
pub mod dashboard;
pub mod hosting;
pub mod orders;
pub mod otp;
pub mod plans;
pub mod reconcile;
pub mod session;

pub mod auth;
pub mod dashboard;
pub mod extract;
pub mod health;
pub mod hosting;
pub mod orders;
pub mod plans;
pub mod session;
pub mod webhook;

//! sea-orm entities owned by the admin service.

pub mod admins;
pub mod hosting_customers;
pub mod hosting_plans;
pub mod one_time_codes;
pub mod orders;
pub mod processed_webhook_events;
pub mod sessions;

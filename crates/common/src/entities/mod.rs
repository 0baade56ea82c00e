pub mod audit_logs;
pub mod certificates;
pub mod user_roles;

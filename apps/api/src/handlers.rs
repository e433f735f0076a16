pub mod access;
pub mod health;
pub mod role_assignments;

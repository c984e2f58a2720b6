pub mod error;
pub mod expense;
pub mod health;
pub mod session;

pub mod draft;
pub mod expense;
pub mod health;
pub mod session;
pub mod view;

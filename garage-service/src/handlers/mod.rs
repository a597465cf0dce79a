pub mod auth;
pub mod dashboard;
pub mod documents;
pub mod estimates;
pub mod health;
pub mod invoices;
pub mod labour;
pub mod parts;

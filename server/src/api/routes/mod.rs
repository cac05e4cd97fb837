//! API route handlers

pub mod auth;
pub mod branches;
pub mod clients;
pub mod health;
pub mod movements;
pub mod products;
pub mod stock;
pub mod users;

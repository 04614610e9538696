pub mod entities;
pub mod enums;
pub mod models;
pub mod services;
pub mod store;

#[cfg(test)]
pub mod memory;

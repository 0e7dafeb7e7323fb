pub mod error;
pub mod fixtures;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;

#[cfg(test)]
mod service_test;

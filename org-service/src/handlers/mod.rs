pub mod answer;
pub mod auth;
pub mod group;
pub mod prompt;
pub mod service;
pub mod snippet;
pub mod user;

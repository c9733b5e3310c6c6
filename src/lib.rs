pub mod config;
pub mod models;
pub mod security;
pub mod services;
pub mod state;
pub mod storage;
pub mod web;

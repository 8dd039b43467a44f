pub mod app_config;
pub mod create_user;
pub mod day;
pub mod db;
pub mod middleware;
pub mod orm;
pub mod session;
pub mod voting;
pub mod web;

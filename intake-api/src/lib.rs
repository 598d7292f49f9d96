use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod helpers;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod storage;

pub type DbConnection = Arc<Mutex<Connection>>;

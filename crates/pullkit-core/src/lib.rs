pub mod config;
pub mod logging;

pub mod backend;
pub mod fetch;
pub mod storage;
pub mod url_model;

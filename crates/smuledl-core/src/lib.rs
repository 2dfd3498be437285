pub mod config;
pub mod logging;

pub mod checksum;
pub mod downloader;
pub mod error;
pub mod extract;
pub mod http;
pub mod library;
pub mod link;
pub mod redirect;
pub mod resolver;
pub mod retry;

pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod feedback;
pub mod matcher;
pub mod scanner;
pub mod session;
pub mod upload;

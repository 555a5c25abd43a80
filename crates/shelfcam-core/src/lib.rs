pub mod capture;
pub mod catalog;
pub mod command_runner;
pub mod config;
pub mod doctor;
pub mod dropbox;
pub mod listing;
pub mod remote_path;
pub mod sanitize;
pub mod session;
#[cfg(test)]
pub(crate) mod test_support;

pub mod cli;
pub mod config;
pub mod extract;
pub mod relative;
pub mod report;
pub mod resolve;
pub mod scan;
pub mod stdlib;
pub mod util;

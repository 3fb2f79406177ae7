pub mod config_cmd;
pub mod list;
pub mod status;
pub mod watch;

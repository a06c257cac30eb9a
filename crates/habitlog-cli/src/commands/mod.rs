pub mod entries;
pub mod habits;
pub mod init;
pub mod maintenance;
pub mod misc;
pub mod settings;
pub mod stats;

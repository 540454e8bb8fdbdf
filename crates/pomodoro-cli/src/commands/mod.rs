pub mod config;
pub mod quote;
pub mod run;
pub mod settings;
pub mod timer;

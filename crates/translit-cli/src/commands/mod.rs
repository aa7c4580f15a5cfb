pub mod config_ops;
pub mod registry_ops;
pub mod run_ops;

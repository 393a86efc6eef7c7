pub mod batch;
pub mod config;
pub mod resolve;

pub use batch::run_batch;
pub use config::{init_config, load_config, show_config, show_config_path};
pub use resolve::{run_resolve, show_placeholder};

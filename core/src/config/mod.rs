mod load;
mod types;

pub use load::{
    config_candidates, get_zentao_data_dir, load_default, load_from, primary_config_path,
    save_config, save_to,
};
pub use types::{RuntimeOptions, ZentaoConfig, DEFAULT_API_VERSION, REQUEST_TIMEOUT_MS};

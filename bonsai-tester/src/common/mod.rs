pub mod scenario;
pub mod util;

pub use util::{read_config_file, split_csv};

pub mod errors;
pub mod load;
pub mod metadata;
pub mod migrate;
pub mod save;

pub use errors::{LoadError, SaveError};
pub use load::{load_preset, load_preset_file};
pub use metadata::PresetMetadata;
pub use save::{save_preset, save_preset_file, FORMAT_NAME, FORMAT_VERSION};

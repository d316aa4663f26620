//! Recording storage adapters

mod local;
mod wav_probe;

pub use local::{default_storage_dir, LocalFileStore, STORAGE_DIR_NAME};
pub use wav_probe::WavDurationProbe;

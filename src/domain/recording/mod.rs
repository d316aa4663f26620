//! Recording value objects and the catalog model

mod catalog;
mod clock;
mod duration;
mod entry;
mod file_name;
mod format;

pub use catalog::{sort_newest_first, Catalog};
pub use clock::ElapsedClock;
pub use duration::Duration;
pub use entry::{format_byte_count, RecordingEntry, RecordingId};
pub use file_name::{
    has_audio_extension, RecordingFileName, AUDIO_EXTENSION, FILE_NAME_PREFIX, MAX_NAME_ATTEMPTS,
};
pub use format::{
    AudioCodec, CaptureFormat, CHANNEL_RANGE, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE,
    SAMPLE_RATE_RANGE,
};

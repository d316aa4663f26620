//! Capture format value object

use std::fmt;

use super::AUDIO_EXTENSION;

/// Default capture sample rate (Hz)
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default capture channel count
pub const DEFAULT_CHANNELS: u16 = 2;

/// Supported sample-rate range (Hz)
pub const SAMPLE_RATE_RANGE: std::ops::RangeInclusive<u32> = 8_000..=192_000;

/// Supported channel counts
pub const CHANNEL_RANGE: std::ops::RangeInclusive<u16> = 1..=2;

/// Codec written by the capture device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AudioCodec {
    /// Uncompressed 16-bit linear PCM in a WAV container
    #[default]
    Pcm16,
}

impl AudioCodec {
    /// Identifier used in logs and config output
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pcm16 => "pcm_s16le",
        }
    }

    pub const fn bits_per_sample(&self) -> u16 {
        match self {
            Self::Pcm16 => 16,
        }
    }

    /// File extension of the container this codec is written into
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Pcm16 => AUDIO_EXTENSION,
        }
    }
}

impl fmt::Display for AudioCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested capture settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureFormat {
    pub sample_rate: u32,
    pub channels: u16,
    pub codec: AudioCodec,
}

impl CaptureFormat {
    pub const fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
            codec: AudioCodec::Pcm16,
        }
    }

    /// Bit rate implied by the settings (PCM has no independent bit rate)
    pub const fn bit_rate(&self) -> u32 {
        self.sample_rate * self.channels as u32 * self.codec.bits_per_sample() as u32
    }
}

impl Default for CaptureFormat {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, DEFAULT_CHANNELS)
    }
}

impl fmt::Display for CaptureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} Hz, {} ch, {} ({} kbit/s)",
            self.sample_rate,
            self.channels,
            self.codec,
            self.bit_rate() / 1000
        )
    }
}

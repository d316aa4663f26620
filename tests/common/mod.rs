//! Shared fakes for the integration tests: real files on disk, no audio hardware

#![allow(dead_code)]

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use hound::{SampleFormat, WavSpec, WavWriter};

use meeting_recorder::application::ports::{
    CaptureDevice, CaptureError, PermissionGate, PermissionStatus, PlaybackDevice, PlaybackError,
};
use meeting_recorder::application::{SessionConfig, SessionManager};
use meeting_recorder::domain::recording::{CaptureFormat, Duration};
use meeting_recorder::infrastructure::{LocalFileStore, WavDurationProbe};

pub type TestSession =
    SessionManager<WavCapture, LocalFileStore, WavDurationProbe, AlwaysGranted, SilentPlayer>;

/// Seconds of silence written by [`WavCapture`] on stop
pub const CAPTURED_SECS: u32 = 2;

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 14, 3, 9).unwrap()
}

pub fn session(dir: &Path) -> TestSession {
    SessionManager::new(
        WavCapture::default(),
        LocalFileStore::new(),
        WavDurationProbe::new(),
        AlwaysGranted,
        SilentPlayer::default(),
        SessionConfig {
            storage_dir: dir.to_path_buf(),
            format: CaptureFormat::new(8_000, 1),
            clock_interval: StdDuration::from_millis(20),
        },
    )
    .with_wall_clock(fixed_time)
}

/// Write a WAV file holding `secs` seconds of mono silence
pub fn write_wav(path: &Path, sample_rate: u32, secs: u32) {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for _ in 0..sample_rate * secs {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Capture device writing silence into a real WAV file
#[derive(Default)]
pub struct WavCapture {
    writer: Mutex<Option<(WavWriter<BufWriter<File>>, u32)>>,
}

#[async_trait]
impl CaptureDevice for WavCapture {
    async fn start(&self, destination: &Path, format: &CaptureFormat) -> Result<(), CaptureError> {
        let spec = WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let writer = WavWriter::create(destination, spec)
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;
        let samples = format.sample_rate * format.channels as u32;
        *self.writer.lock().unwrap() = Some((writer, samples));
        Ok(())
    }

    async fn pause(&self) -> Result<(), CaptureError> {
        Ok(())
    }

    async fn resume(&self) -> Result<(), CaptureError> {
        Ok(())
    }

    async fn stop(&self) -> Result<Duration, CaptureError> {
        let (mut writer, samples_per_sec) =
            self.writer.lock().unwrap().take().ok_or(CaptureError::NotActive)?;
        for _ in 0..samples_per_sec * CAPTURED_SECS {
            writer
                .write_sample(0i16)
                .map_err(|e| CaptureError::StopFailed(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| CaptureError::StopFailed(e.to_string()))?;
        Ok(Duration::from_secs(CAPTURED_SECS as u64))
    }

    fn is_active(&self) -> bool {
        self.writer.lock().unwrap().is_some()
    }
}

pub struct AlwaysGranted;

#[async_trait]
impl PermissionGate for AlwaysGranted {
    async fn check(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }

    async fn request(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }
}

/// Playback device that plays forever without making a sound
#[derive(Default)]
pub struct SilentPlayer {
    source: Mutex<Option<PathBuf>>,
    paused: AtomicBool,
}

#[async_trait]
impl PlaybackDevice for SilentPlayer {
    async fn play(&self, source: &Path) -> Result<(), PlaybackError> {
        if !source.exists() {
            return Err(PlaybackError::OpenFailed(source.display().to_string()));
        }
        *self.source.lock().unwrap() = Some(source.to_path_buf());
        self.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    fn stop(&self) {
        *self.source.lock().unwrap() = None;
    }

    fn is_active(&self) -> bool {
        self.source.lock().unwrap().is_some()
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    fn position(&self) -> Duration {
        Duration::ZERO
    }

    fn length(&self) -> Duration {
        Duration::ZERO
    }
}

//! Microphone capture using cpal, written to WAV with hound
//!
//! `cpal::Stream` is not `Send`, so each capture owns its stream on a
//! dedicated thread. The audio callback appends samples to a shared buffer
//! and the thread drains that buffer into the WAV writer every 100 ms.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, SampleRate, StreamConfig};
use hound::{WavSpec, WavWriter};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::application::ports::{CaptureDevice, CaptureError};
use crate::domain::recording::{CaptureFormat, Duration};

const DRAIN_INTERVAL: StdDuration = StdDuration::from_millis(100);

type Writer = WavWriter<BufWriter<File>>;

/// State shared between the handle, the capture thread and the audio callback
#[derive(Default)]
struct Shared {
    /// Interleaved samples at the output channel count, not yet written
    buffer: StdMutex<Vec<i16>>,
    running: AtomicBool,
    paused: AtomicBool,
    /// Frames written to the file so far
    frames: AtomicU64,
    /// Actual sample rate of the file
    sample_rate: AtomicU32,
}

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Capture device backed by the default input device
pub struct CpalCaptureDevice {
    shared: Arc<Shared>,
    worker: StdMutex<Option<JoinHandle<Result<u64, CaptureError>>>>,
}

impl CpalCaptureDevice {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            worker: StdMutex::new(None),
        }
    }

    fn input_device() -> Result<cpal::Device, CaptureError> {
        cpal::default_host()
            .default_input_device()
            .ok_or(CaptureError::NoInputDevice)
    }

    /// Pick the device configuration closest to the requested format.
    ///
    /// Prefers a range containing the requested rate and, among those, the
    /// requested channel count. Falls back to the device default.
    fn input_config(
        device: &cpal::Device,
        format: &CaptureFormat,
    ) -> Result<(StreamConfig, SampleFormat), CaptureError> {
        let wanted = SampleRate(format.sample_rate);
        let ranges = device
            .supported_input_configs()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to get configs: {}", e)))?;

        let mut best: Option<cpal::SupportedStreamConfigRange> = None;
        for range in ranges {
            if !matches!(range.sample_format(), SampleFormat::I16 | SampleFormat::F32) {
                continue;
            }
            if range.min_sample_rate() > wanted || range.max_sample_rate() < wanted {
                continue;
            }
            let better = match &best {
                None => true,
                Some(current) => {
                    current.channels() != format.channels && range.channels() == format.channels
                }
            };
            if better {
                best = Some(range);
            }
        }

        let supported = match best {
            Some(range) => range.with_sample_rate(wanted),
            None => {
                let fallback = device
                    .default_input_config()
                    .map_err(|e| CaptureError::StartFailed(e.to_string()))?;
                debug!(
                    "{} Hz not supported, using device default {} Hz",
                    format.sample_rate,
                    fallback.sample_rate().0
                );
                fallback
            }
        };

        let sample_format = supported.sample_format();
        Ok((supported.config(), sample_format))
    }

    /// Convert interleaved samples between channel counts.
    /// Mono output averages every input channel; stereo output from mono
    /// duplicates the sample; extra input channels are dropped.
    fn remix(samples: &[i16], from: u16, to: u16) -> Vec<i16> {
        if from == to || from == 0 {
            return samples.to_vec();
        }

        let from = from as usize;
        if to == 1 {
            return samples
                .chunks(from)
                .map(|frame| {
                    let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                    (sum / frame.len() as i32) as i16
                })
                .collect();
        }

        let to = to as usize;
        let mut out = Vec::with_capacity(samples.len() / from * to);
        for frame in samples.chunks(from) {
            for ch in 0..to {
                out.push(frame.get(ch).copied().unwrap_or(frame[0]));
            }
        }
        out
    }

    fn f32_to_i16(sample: f32) -> i16 {
        (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
    }

    fn build_stream(
        device: &cpal::Device,
        config: &StreamConfig,
        sample_format: SampleFormat,
        out_channels: u16,
        shared: Arc<Shared>,
    ) -> Result<cpal::Stream, CaptureError> {
        let in_channels = config.channels;
        let on_error = |err: cpal::StreamError| warn!("Audio input stream error: {}", err);

        let stream = match sample_format {
            SampleFormat::I16 => device.build_input_stream(
                config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    if shared.paused.load(Ordering::SeqCst) {
                        return;
                    }
                    let samples = Self::remix(data, in_channels, out_channels);
                    lock(&shared.buffer).extend_from_slice(&samples);
                },
                on_error,
                None,
            ),
            SampleFormat::F32 => device.build_input_stream(
                config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if shared.paused.load(Ordering::SeqCst) {
                        return;
                    }
                    let converted: Vec<i16> = data.iter().map(|&s| Self::f32_to_i16(s)).collect();
                    let samples = Self::remix(&converted, in_channels, out_channels);
                    lock(&shared.buffer).extend_from_slice(&samples);
                },
                on_error,
                None,
            ),
            other => {
                return Err(CaptureError::StartFailed(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        };

        stream.map_err(|e| CaptureError::StartFailed(e.to_string()))
    }

    /// Write whatever the callback buffered so far
    fn drain(shared: &Shared, writer: &mut Writer, channels: u16) -> Result<(), CaptureError> {
        let samples = std::mem::take(&mut *lock(&shared.buffer));
        if samples.is_empty() {
            return Ok(());
        }
        for sample in &samples {
            writer
                .write_sample(*sample)
                .map_err(|e| CaptureError::CaptureFailed(e.to_string()))?;
        }
        shared
            .frames
            .fetch_add((samples.len() / channels as usize) as u64, Ordering::SeqCst);
        Ok(())
    }

    /// Open the input stream and the destination file
    fn open(
        destination: &Path,
        format: &CaptureFormat,
        shared: &Arc<Shared>,
    ) -> Result<(cpal::Stream, Writer, WavSpec), CaptureError> {
        let device = Self::input_device()?;
        let (config, sample_format) = Self::input_config(&device, format)?;
        let spec = WavSpec {
            channels: format.channels,
            sample_rate: config.sample_rate.0,
            bits_per_sample: format.codec.bits_per_sample(),
            sample_format: hound::SampleFormat::Int,
        };
        let writer = WavWriter::create(destination, spec)
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;
        let stream = Self::build_stream(
            &device,
            &config,
            sample_format,
            format.channels,
            Arc::clone(shared),
        )?;
        stream
            .play()
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

        debug!(
            "Input stream: {} ch at {} Hz ({:?}), writing {} ch",
            config.channels, spec.sample_rate, sample_format, spec.channels
        );
        Ok((stream, writer, spec))
    }

    /// Body of the capture thread. Reports the start outcome through
    /// `started`, then writes until `running` is cleared.
    fn run(
        destination: PathBuf,
        format: CaptureFormat,
        shared: Arc<Shared>,
        started: oneshot::Sender<Result<(), CaptureError>>,
    ) -> Result<u64, CaptureError> {
        let (stream, mut writer, spec) = match Self::open(&destination, &format, &shared) {
            Ok(opened) => opened,
            Err(err) => {
                shared.running.store(false, Ordering::SeqCst);
                let _ = started.send(Err(err.clone()));
                return Err(err);
            }
        };
        shared.sample_rate.store(spec.sample_rate, Ordering::SeqCst);
        let _ = started.send(Ok(()));

        let mut result = Ok(());
        while shared.running.load(Ordering::SeqCst) {
            std::thread::sleep(DRAIN_INTERVAL);
            if let Err(err) = Self::drain(&shared, &mut writer, spec.channels) {
                result = Err(err);
                break;
            }
        }

        drop(stream);
        result?;
        Self::drain(&shared, &mut writer, spec.channels)?;
        writer
            .finalize()
            .map_err(|e| CaptureError::StopFailed(e.to_string()))?;

        Ok(shared.frames.load(Ordering::SeqCst))
    }
}

impl Default for CpalCaptureDevice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CaptureDevice for CpalCaptureDevice {
    async fn start(&self, destination: &Path, format: &CaptureFormat) -> Result<(), CaptureError> {
        let (started_tx, started_rx) = oneshot::channel();
        {
            let mut worker = lock(&self.worker);
            if worker.is_some() {
                return Err(CaptureError::StartFailed(
                    "Capture already in progress".to_string(),
                ));
            }

            lock(&self.shared.buffer).clear();
            self.shared.frames.store(0, Ordering::SeqCst);
            self.shared.paused.store(false, Ordering::SeqCst);
            self.shared.running.store(true, Ordering::SeqCst);

            let shared = Arc::clone(&self.shared);
            let destination = destination.to_path_buf();
            let format = *format;
            let handle = std::thread::Builder::new()
                .name("audio-capture".to_string())
                .spawn(move || Self::run(destination, format, shared, started_tx))
                .map_err(|e| CaptureError::StartFailed(e.to_string()))?;
            *worker = Some(handle);
        }

        match started_rx.await {
            Ok(Ok(())) => {
                info!("Audio capture running");
                Ok(())
            }
            Ok(Err(err)) => {
                lock(&self.worker).take();
                Err(err)
            }
            Err(_) => {
                lock(&self.worker).take();
                Err(CaptureError::StartFailed(
                    "Capture thread exited before starting".to_string(),
                ))
            }
        }
    }

    async fn pause(&self) -> Result<(), CaptureError> {
        if !self.is_active() {
            return Err(CaptureError::NotActive);
        }
        self.shared.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> Result<(), CaptureError> {
        if !self.is_active() {
            return Err(CaptureError::NotActive);
        }
        self.shared.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<Duration, CaptureError> {
        let handle = lock(&self.worker).take().ok_or(CaptureError::NotActive)?;
        self.shared.running.store(false, Ordering::SeqCst);

        let frames = tokio::task::spawn_blocking(move || handle.join())
            .await
            .map_err(|e| CaptureError::StopFailed(format!("Task join error: {}", e)))?
            .map_err(|_| CaptureError::StopFailed("Capture thread panicked".to_string()))??;

        let sample_rate = self.shared.sample_rate.load(Ordering::SeqCst);
        Ok(Duration::from_frames(frames, sample_rate))
    }

    fn is_active(&self) -> bool {
        lock(&self.worker).is_some()
    }
}

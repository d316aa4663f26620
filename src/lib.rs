//! Meeting Recorder - record meetings from the microphone
//!
//! This crate records microphone audio into WAV files, keeps a catalog of the
//! stored recordings and plays them back.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects, the session state machine, and errors
//! - **Application**: The session manager, playback coordination, and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal capture, rodio playback, local files)
//! - **CLI**: Argument parsing, the interactive console, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

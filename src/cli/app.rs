//! Interactive console runner

use std::io::BufRead;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::process::ExitCode;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::application::ports::{
    CaptureDevice, ConfigStore, FileStore, MediaProbe, PermissionGate, PlaybackDevice,
};
use crate::application::{SessionConfig, SessionError, SessionManager};
use crate::domain::config::AppConfig;
use crate::domain::recording::RecordingId;
use crate::infrastructure::{
    default_storage_dir, logging, CpalCaptureDevice, InputDevicePermission, LocalFileStore,
    RodioPlaybackDevice, WavDurationProbe, XdgConfigStore,
};

use super::console::ConsoleCommand;
use super::presenter::Presenter;
use super::signals::ShutdownListener;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// Run the interactive console until `quit`, end of input or a shutdown signal
pub async fn run_console(storage_override: Option<PathBuf>) -> ExitCode {
    let mut presenter = Presenter::new();

    let cli_config = AppConfig {
        storage_dir: storage_override.map(|dir| dir.to_string_lossy().into_owned()),
        ..Default::default()
    };
    let config = load_merged_config(cli_config, &presenter).await;

    let _log_guard = match logging::init(config.log_level_or_default()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            presenter.warn(&format!("Logging disabled: {}", e));
            None
        }
    };

    let mut shutdown = match ShutdownListener::new() {
        Ok(listener) => listener,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let session_config = SessionConfig::from_app_config(&config, default_storage_dir());
    info!(
        "Console starting: storage {}, capture {}",
        session_config.storage_dir.display(),
        session_config.format
    );

    let mut manager = SessionManager::new(
        CpalCaptureDevice::new(),
        LocalFileStore::new(),
        WavDurationProbe::new(),
        InputDevicePermission::new(),
        RodioPlaybackDevice::new(),
        session_config,
    );

    presenter.info(&format!("Recordings in {}", manager.storage_dir().display()));
    presenter.info("Type 'help' for commands");
    execute(&mut manager, &mut presenter, ConsoleCommand::Refresh).await;

    console_loop(&mut manager, &mut presenter, &mut shutdown).await;

    manager.shutdown().await;
    presenter.stop_spinner();
    info!("Console stopped");
    ExitCode::from(EXIT_SUCCESS)
}

/// Load and merge configuration: defaults < file < cli
pub async fn load_merged_config(cli_config: AppConfig, presenter: &Presenter) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|e| {
        presenter.warn(&format!("Ignoring config file: {}", e));
        AppConfig::empty()
    });

    AppConfig::defaults().merge(file_config).merge(cli_config)
}

/// Read stdin lines on a plain thread.
///
/// A blocking read cannot be cancelled, so it must not live on the runtime's
/// blocking pool or shutdown would wait for the next Enter key.
fn spawn_stdin_reader() -> mpsc::Receiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::channel(16);
    let spawned = std::thread::Builder::new()
        .name("console-input".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        });
    if let Err(e) = spawned {
        warn!("Failed to spawn console input thread: {}", e);
    }
    rx
}

async fn console_loop<C, F, M, G, P>(
    manager: &mut SessionManager<C, F, M, G, P>,
    presenter: &mut Presenter,
    shutdown: &mut ShutdownListener,
) where
    C: CaptureDevice,
    F: FileStore + 'static,
    M: MediaProbe + 'static,
    G: PermissionGate,
    P: PlaybackDevice + 'static,
{
    let mut input = spawn_stdin_reader();
    let mut changes = manager.subscribe();
    presenter.prompt();

    loop {
        tokio::select! {
            line = input.recv() => {
                let line = match line {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => {
                        presenter.error(&format!("Failed to read input: {}", e));
                        break;
                    }
                    None => break,
                };
                match ConsoleCommand::parse(&line) {
                    Ok(Some(command)) => {
                        if execute(manager, presenter, command).await.is_break() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(message) => presenter.error(&message),
                }
                presenter.prompt();
            }
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = changes.borrow_and_update().clone();
                presenter.render(&snapshot);
            }
            _ = shutdown.recv() => break,
        }
    }
}

/// Run one console command against the session
async fn execute<C, F, M, G, P>(
    manager: &mut SessionManager<C, F, M, G, P>,
    presenter: &mut Presenter,
    command: ConsoleCommand,
) -> ControlFlow<()>
where
    C: CaptureDevice,
    F: FileStore + 'static,
    M: MediaProbe + 'static,
    G: PermissionGate,
    P: PlaybackDevice + 'static,
{
    let target = match command.index() {
        Some(number) => match resolve(manager, number) {
            Some(id) => Some(id),
            None => {
                presenter.error(&format!("No recording number {}. Type 'list'.", number));
                return ControlFlow::Continue(());
            }
        },
        None => None,
    };

    match (command, target) {
        (ConsoleCommand::Start, _) => match manager.start().await {
            Ok(name) => presenter.success(&format!("Recording to {}", name)),
            Err(e) => report(presenter, &e),
        },
        (ConsoleCommand::Pause, _) => done(presenter, manager.pause().await, "Recording paused"),
        (ConsoleCommand::Resume, _) => {
            done(presenter, manager.resume().await, "Recording resumed")
        }
        (ConsoleCommand::Stop, _) => match manager.stop().await {
            Ok(entry) => presenter.success(&format!(
                "Saved {} ({}, {})",
                entry.filename(),
                entry.formatted_duration(),
                entry.formatted_size()
            )),
            Err(e) => report(presenter, &e),
        },
        (ConsoleCommand::List, _) => {
            presenter.recordings(manager.recordings(), manager.snapshot().playback.now_playing)
        }
        (ConsoleCommand::Refresh, _) => match manager.enumerate().await {
            Ok(_) => presenter
                .recordings(manager.recordings(), manager.snapshot().playback.now_playing),
            Err(e) => report(presenter, &e),
        },
        (ConsoleCommand::Play(_), Some(id)) => match manager.play(id).await {
            Ok(()) => {
                if let Some(entry) = manager.entry(id) {
                    presenter.success(&format!("Playing {}", entry.filename()));
                }
            }
            Err(e) => report(presenter, &e),
        },
        (ConsoleCommand::PausePlayback, _) => {
            done(presenter, manager.pause_playback(), "Playback paused")
        }
        (ConsoleCommand::ResumePlayback, _) => {
            done(presenter, manager.resume_playback(), "Playback resumed")
        }
        (ConsoleCommand::StopPlayback, _) => {
            done(presenter, manager.stop_playback(), "Playback stopped")
        }
        (ConsoleCommand::Delete(_), Some(id)) => {
            let name = manager.entry(id).map(|e| e.filename().to_string());
            match manager.delete(id).await {
                Ok(()) => presenter.success(&format!("Deleted {}", name.unwrap_or_default())),
                Err(e) => report(presenter, &e),
            }
        }
        (ConsoleCommand::Rename(_, new_name), Some(id)) => {
            match manager.rename(id, &new_name).await {
                Ok(entry) => presenter.success(&format!("Renamed to {}", entry.filename())),
                Err(e) => report(presenter, &e),
            }
        }
        (ConsoleCommand::Reveal(_), Some(id)) => match manager.reveal(id).await {
            Ok(()) => {}
            Err(e) => report(presenter, &e),
        },
        (ConsoleCommand::Help, _) => presenter.help(),
        (ConsoleCommand::Quit, _) => return ControlFlow::Break(()),
        // Indexed commands always resolve above
        (ConsoleCommand::Play(_), None)
        | (ConsoleCommand::Delete(_), None)
        | (ConsoleCommand::Rename(..), None)
        | (ConsoleCommand::Reveal(_), None) => {}
    }

    ControlFlow::Continue(())
}

/// Id of the recording at 1-based position `number` in the current listing
fn resolve<C, F, M, G, P>(
    manager: &SessionManager<C, F, M, G, P>,
    number: usize,
) -> Option<RecordingId>
where
    C: CaptureDevice,
    F: FileStore + 'static,
    M: MediaProbe + 'static,
    G: PermissionGate,
    P: PlaybackDevice + 'static,
{
    number
        .checked_sub(1)
        .and_then(|index| manager.recordings().get(index))
        .map(|entry| entry.id())
}

fn done(presenter: &Presenter, result: Result<(), SessionError>, message: &str) {
    match result {
        Ok(()) => presenter.success(message),
        Err(e) => report(presenter, &e),
    }
}

fn report(presenter: &Presenter, error: &SessionError) {
    presenter.error(&error.to_string());
}

//! Shutdown signal handling for the console

use colored::Colorize;
use tokio::sync::mpsc;

/// Why the console is shutting down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
}

impl ShutdownReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Interrupt => "SIGINT",
            Self::Terminate => "SIGTERM",
        }
    }
}

/// Listens for OS shutdown signals (SIGINT/SIGTERM)
pub struct ShutdownListener {
    receiver: mpsc::Receiver<ShutdownReason>,
}

impl ShutdownListener {
    /// Install the handlers and start listening
    #[cfg(unix)]
    pub fn new() -> Result<Self, std::io::Error> {
        use tokio::signal::unix::{signal, SignalKind};

        let (tx, rx) = mpsc::channel(4);

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            while sigint.recv().await.is_some() {
                if tx_int.send(ShutdownReason::Interrupt).await.is_err() {
                    break;
                }
            }
        });

        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            while sigterm.recv().await.is_some() {
                if tx.send(ShutdownReason::Terminate).await.is_err() {
                    break;
                }
            }
        });

        Ok(Self { receiver: rx })
    }

    #[cfg(not(unix))]
    pub fn new() -> Result<Self, std::io::Error> {
        let (tx, rx) = mpsc::channel(4);
        tokio::spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                if tx.send(ShutdownReason::Interrupt).await.is_err() {
                    break;
                }
            }
        });
        Ok(Self { receiver: rx })
    }

    /// Wait for the next shutdown signal
    pub async fn recv(&mut self) -> Option<ShutdownReason> {
        let reason = self.receiver.recv().await?;
        eprintln!("{} Received {} (shutdown)", "↓".cyan(), reason.as_str());
        Some(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_names() {
        assert_eq!(ShutdownReason::Interrupt.as_str(), "SIGINT");
        assert_eq!(ShutdownReason::Terminate.as_str(), "SIGTERM");
    }

    #[tokio::test]
    async fn listener_installs() {
        assert!(ShutdownListener::new().is_ok());
    }
}

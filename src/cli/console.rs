//! Interactive console commands
//!
//! Each line typed at the prompt is parsed into a [`ConsoleCommand`].
//! Recordings are addressed by their 1-based position in the last listing.

/// A parsed console line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Pause,
    Resume,
    Stop,
    List,
    Refresh,
    Play(usize),
    PausePlayback,
    ResumePlayback,
    StopPlayback,
    Delete(usize),
    Rename(usize, String),
    Reveal(usize),
    Help,
    Quit,
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let word = word.to_lowercase();

        let command = match word.as_str() {
            "start" | "record" => Self::Start,
            "pause" => Self::Pause,
            "resume" => Self::Resume,
            "stop" => Self::Stop,
            "list" | "ls" => Self::List,
            "refresh" => Self::Refresh,
            "play" => Self::Play(parse_index(rest)?),
            "play-pause" => Self::PausePlayback,
            "play-resume" => Self::ResumePlayback,
            "play-stop" => Self::StopPlayback,
            "delete" | "rm" => Self::Delete(parse_index(rest)?),
            "reveal" => Self::Reveal(parse_index(rest)?),
            "rename" => {
                let (index, name) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "Usage: rename <n> <new name>".to_string())?;
                let name = name.trim();
                if name.is_empty() {
                    return Err("Usage: rename <n> <new name>".to_string());
                }
                Self::Rename(parse_index(index)?, name.to_string())
            }
            "help" | "?" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => return Err(format!("Unknown command '{}'. Type 'help'.", other)),
        };

        Ok(Some(command))
    }

    /// Number of the recording this command addresses
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Play(n) | Self::Delete(n) | Self::Reveal(n) | Self::Rename(n, _) => Some(*n),
            _ => None,
        }
    }
}

fn parse_index(text: &str) -> Result<usize, String> {
    let text = text.trim();
    if text.is_empty() {
        return Err("Missing recording number".to_string());
    }
    match text.parse::<usize>() {
        Ok(0) | Err(_) => Err(format!("'{}' is not a recording number", text)),
        Ok(n) => Ok(n),
    }
}

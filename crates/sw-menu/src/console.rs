//! Line-oriented console abstraction shared by the menu and its handlers.

use std::io::{self, BufRead, IsTerminal, Write};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

/// Source of user input and sink for output lines.
pub trait Console {
    /// Show `prompt` and read one line without its terminator.
    ///
    /// Fails with [`io::ErrorKind::UnexpectedEof`] once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;

    /// Read a value that should not be echoed. Falls back to [`Console::read_line`].
    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        self.read_line(prompt)
    }

    /// Print one line of output.
    fn print(&mut self, line: &str) -> io::Result<()>;
}

/// Console over any buffered reader and writer.
#[derive(Debug)]
pub struct BufferConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> BufferConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Access everything written so far.
    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Console for BufferConsole<R, W> {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.output.write_all(prompt.as_bytes())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(unexpected_eof());
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(line)
    }

    fn print(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }
}

/// Console bound to the process's standard input and output.
///
/// Secrets typed at a terminal are read in raw mode and never echoed; piped input is
/// read as a plain line.
#[derive(Debug)]
pub struct StdConsole {
    inner: BufferConsole<io::StdinLock<'static>, io::Stdout>,
}

impl StdConsole {
    pub fn stdio() -> Self {
        Self {
            inner: BufferConsole::new(io::stdin().lock(), io::stdout()),
        }
    }
}

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        self.inner.read_line(prompt)
    }

    fn read_secret(&mut self, prompt: &str) -> io::Result<String> {
        if !io::stdin().is_terminal() {
            return self.inner.read_line(prompt);
        }
        let output = &mut self.inner.output;
        output.write_all(prompt.as_bytes())?;
        output.flush()?;

        let _raw = RawModeGuard::enable()?;
        let secret = read_hidden(std::iter::repeat_with(event::read));
        // raw mode leaves the cursor after the prompt
        output.write_all(b"\r\n")?;
        output.flush()?;
        secret
    }

    fn print(&mut self, line: &str) -> io::Result<()> {
        self.inner.print(line)
    }
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            tracing::warn!(error = %err, "failed to restore terminal mode");
        }
    }
}

/// Collect key presses into a line until Enter, without writing anything back.
fn read_hidden(events: impl IntoIterator<Item = io::Result<Event>>) -> io::Result<String> {
    let mut secret = String::new();
    for event in events {
        let Event::Key(key) = event? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }
        if apply_key(&mut secret, key)? {
            return Ok(secret);
        }
    }
    Err(unexpected_eof())
}

/// Update `secret` for one key press; `true` once the line is complete.
fn apply_key(secret: &mut String, key: KeyEvent) -> io::Result<bool> {
    let control = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => return Ok(true),
        KeyCode::Char('c') if control => {
            return Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled"));
        }
        KeyCode::Char('d') if control && secret.is_empty() => return Err(unexpected_eof()),
        KeyCode::Char(ch) if !control => secret.push(ch),
        KeyCode::Backspace => {
            secret.pop();
        }
        _ => {}
    }
    Ok(false)
}

fn unexpected_eof() -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "input closed while waiting for a line",
    )
}

//! Labelled-entry console menus.
//!
//! A [`Menu`] is configured once through [`MenuBuilder`] and then driven by [`Menu::run`]:
//! print the entries, read a label, hand the bound action to a [`MenuHandler`], and repeat
//! until an exit entry has been selected. Actions are opaque values, usually a small enum,
//! so the menu never depends on the controller that interprets them.

use std::collections::HashSet;
use std::fmt;
use std::io;

use thiserror::Error;

mod console;

pub use console::{BufferConsole, Console, StdConsole};

/// Prompt shown while waiting for a selection.
pub const PROMPT: &str = "? ";
/// Message printed when the input matches no entry.
pub const INVALID_SELECTION: &str = "Invalid selection. Please, try again...";

const KEY_MAX_LEN: usize = 10;
const DESCRIPTION_MAX_LEN: usize = 1000;

/// Result type for menu construction and execution.
pub type MenuResult<T> = Result<T, MenuError>;

/// Errors returned while building or running a menu.
#[derive(Debug, Error)]
pub enum MenuError {
    /// Returned when an entry label is malformed.
    #[error("invalid menu key {0:?}")]
    InvalidKey(String),
    /// Returned when a description is empty, too long or contains control characters.
    #[error("invalid menu description: {0}")]
    InvalidDescription(&'static str),
    /// Returned by the builder when two entries share a label.
    #[error("duplicate menu key {0:?}")]
    DuplicateKey(String),
    /// Returned by the builder when no entry can end the menu.
    #[error("menu has no exit entry")]
    MissingExit,
    /// Returned when reading from or writing to the console fails.
    #[error("console error: {0}")]
    Io(#[from] io::Error),
    /// Returned when a handler fails to carry out an action.
    #[error(transparent)]
    Action(#[from] anyhow::Error),
}

/// Label typed by the user to pick an entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Key {
    value: String,
}

impl Key {
    /// Create a key of 1 to 10 characters from `[0-9A-Za-z_-]`.
    pub fn new(value: impl Into<String>) -> MenuResult<Self> {
        let value = value.into();
        let valid = !value.is_empty()
            && value.chars().count() <= KEY_MAX_LEN
            && value
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-'));
        if !valid {
            return Err(MenuError::InvalidKey(value));
        }
        Ok(Self { value })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Human-readable text for a menu or an entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Description {
    value: String,
}

impl Description {
    pub fn new(value: impl Into<String>) -> MenuResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(MenuError::InvalidDescription("cannot be empty"));
        }
        if value.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(MenuError::InvalidDescription(
                "cannot be longer than 1000 characters",
            ));
        }
        if value.chars().any(char::is_control) {
            return Err(MenuError::InvalidDescription(
                "cannot contain control characters",
            ));
        }
        Ok(Self { value })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A selectable line of a menu, bound to an action.
#[derive(Clone, Debug)]
pub struct Entry<A> {
    key: Key,
    description: Description,
    action: A,
    is_exit: bool,
}

impl<A> Entry<A> {
    /// Create an entry that returns to the menu after its action runs.
    pub fn new(key: &str, description: &str, action: A) -> MenuResult<Self> {
        Ok(Self {
            key: Key::new(key)?,
            description: Description::new(description)?,
            action,
            is_exit: false,
        })
    }

    /// Create an entry that ends the menu after its action runs.
    pub fn exit(key: &str, description: &str, action: A) -> MenuResult<Self> {
        let mut entry = Self::new(key, description, action)?;
        entry.is_exit = true;
        Ok(entry)
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn is_exit(&self) -> bool {
        self.is_exit
    }
}

/// Interprets the actions bound to menu entries.
pub trait MenuHandler<A> {
    /// Carry out `action`, reading and printing through `console`.
    fn on_selected(&mut self, action: &A, console: &mut dyn Console) -> anyhow::Result<()>;
}

impl<A, F> MenuHandler<A> for F
where
    F: FnMut(&A, &mut dyn Console) -> anyhow::Result<()>,
{
    fn on_selected(&mut self, action: &A, console: &mut dyn Console) -> anyhow::Result<()> {
        self(action, console)
    }
}

/// Where a running menu stands after a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    /// Waiting for the next selection.
    AwaitingSelection,
    /// An exit entry ran; no further prompts follow.
    Terminated,
}

/// Accumulates entries for a [`Menu`].
#[derive(Debug)]
pub struct MenuBuilder<A> {
    description: Description,
    auto_select: Option<A>,
    entries: Vec<Entry<A>>,
}

impl<A> MenuBuilder<A> {
    /// Run `action` once, before the menu is first shown.
    #[must_use]
    pub fn auto_select(mut self, action: A) -> Self {
        self.auto_select = Some(action);
        self
    }

    #[must_use]
    pub fn with_entry(mut self, entry: Entry<A>) -> Self {
        self.entries.push(entry);
        self
    }

    /// Finish the menu, rejecting duplicate keys and menus without an exit entry.
    pub fn build(self) -> MenuResult<Menu<A>> {
        {
            let mut seen = HashSet::new();
            for entry in &self.entries {
                if !seen.insert(entry.key.as_str()) {
                    return Err(MenuError::DuplicateKey(entry.key.value.clone()));
                }
            }
        }
        if !self.entries.iter().any(Entry::is_exit) {
            return Err(MenuError::MissingExit);
        }
        Ok(Menu {
            description: self.description,
            auto_select: self.auto_select,
            entries: self.entries,
        })
    }
}

/// A validated menu ready to run.
#[derive(Debug)]
pub struct Menu<A> {
    description: Description,
    auto_select: Option<A>,
    entries: Vec<Entry<A>>,
}

impl<A> Menu<A> {
    pub fn builder(description: Description) -> MenuBuilder<A> {
        MenuBuilder {
            description,
            auto_select: None,
            entries: Vec::new(),
        }
    }

    pub fn description(&self) -> &Description {
        &self.description
    }

    /// Entries in registration order.
    pub fn entries(&self) -> &[Entry<A>] {
        &self.entries
    }

    /// Find the entry labelled `key`.
    pub fn entry(&self, key: &str) -> Option<&Entry<A>> {
        self.entries.iter().find(|entry| entry.key.as_str() == key)
    }

    /// Drive the menu until an exit entry has been selected.
    pub fn run<H>(&self, handler: &mut H, console: &mut dyn Console) -> MenuResult<()>
    where
        H: MenuHandler<A> + ?Sized,
    {
        if let Some(action) = &self.auto_select {
            handler.on_selected(action, console)?;
        }

        let mut state = MenuState::AwaitingSelection;
        while state == MenuState::AwaitingSelection {
            self.print(console)?;
            let entry = self.read_selection(console)?;
            state = self.dispatch(entry, handler, console)?;
        }
        Ok(())
    }

    /// Run the action bound to `entry` and report the resulting state.
    pub fn dispatch<H>(
        &self,
        entry: &Entry<A>,
        handler: &mut H,
        console: &mut dyn Console,
    ) -> MenuResult<MenuState>
    where
        H: MenuHandler<A> + ?Sized,
    {
        tracing::debug!(key = %entry.key, exit = entry.is_exit, "menu entry selected");
        handler.on_selected(&entry.action, console)?;
        Ok(if entry.is_exit {
            MenuState::Terminated
        } else {
            MenuState::AwaitingSelection
        })
    }

    fn print(&self, console: &mut dyn Console) -> io::Result<()> {
        console.print(&format!("*** {} ***", self.description))?;
        for entry in &self.entries {
            console.print(&format!("{}:\t{}", entry.key, entry.description))?;
        }
        Ok(())
    }

    fn read_selection(&self, console: &mut dyn Console) -> io::Result<&Entry<A>> {
        loop {
            let line = console.read_line(PROMPT)?;
            if let Some(entry) = self.entry(line.trim()) {
                return Ok(entry);
            }
            console.print(INVALID_SELECTION)?;
        }
    }
}

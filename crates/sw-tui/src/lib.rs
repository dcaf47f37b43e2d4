//! Interactive weather record session.
//!
//! [`App`] greets the user, logs in through a [`RecordRepository`], loads the records and
//! hands control to the record menu. Each menu entry maps to an [`Action`] that the
//! [`Session`] carries out against the repository and the local [`RecordList`].

use std::io;

use anyhow::Context;
use chrono::Local;
use thiserror::Error;

use sw_core::{
    Condition, DomainError, DomainResult, Humidity, Password, Record, RecordDate, RecordList,
    RecordRepository, RepositoryError, RepositoryResult, Temperature, Username, Wind,
};
use sw_menu::{Console, Description, Entry, Menu, MenuHandler, MenuResult};

mod sensors;
mod table;

pub use sensors::{collect_day, SensorFeed, SimulatedSensors, READINGS_PER_DAY};
pub use table::render as render_records;

/// First line printed when the app starts.
pub const TITLE: &str = "*** Your Secure Weather TUI ***";
pub const GREETING: &str = "Hello user, please enter your credentials below.";
pub const LOGIN_FAILED: &str = "Unable to login, please check your credentials...";
pub const MENU_DESCRIPTION: &str = "Secure Weather Records";

const RECORD_ADDED: &str = "Record added!";
const RECORD_REMOVED: &str = "Record removed!";
const CANCELLED: &str = "Cancelled!";
const FAREWELL: &str = "Cya!";

/// Everything the record menu can ask the session to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    PrintRecords,
    AddRecord,
    RemoveRecord,
    CollectRecords,
    SortByTemperature,
    SortByHumidity,
    SortByWind,
    SortByDate,
    FetchRecords,
    Exit,
}

/// The record menu, with printing the records as its automatic first action.
pub fn build_menu() -> MenuResult<Menu<Action>> {
    Menu::builder(Description::new(MENU_DESCRIPTION)?)
        .auto_select(Action::PrintRecords)
        .with_entry(Entry::new("1", "Add new record", Action::AddRecord)?)
        .with_entry(Entry::new("2", "Remove a record", Action::RemoveRecord)?)
        .with_entry(Entry::new(
            "3",
            "Collect records from sensors",
            Action::CollectRecords,
        )?)
        .with_entry(Entry::new(
            "4",
            "Sort by temperature",
            Action::SortByTemperature,
        )?)
        .with_entry(Entry::new("5", "Sort by humidity", Action::SortByHumidity)?)
        .with_entry(Entry::new("6", "Sort by wind", Action::SortByWind)?)
        .with_entry(Entry::new("7", "Sort by ascending date", Action::SortByDate)?)
        .with_entry(Entry::new(
            "8",
            "Fetch records from server",
            Action::FetchRecords,
        )?)
        .with_entry(Entry::exit("0", "Exit", Action::Exit)?)
        .build()
}

#[derive(Debug, Error)]
enum ActionError {
    #[error(transparent)]
    Console(#[from] io::Error),
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("record {0} has not been stored on the server yet")]
    Unsaved(usize),
}

#[derive(Clone, Copy)]
enum Echo {
    Shown,
    Hidden,
}

/// Ask for a value until `parse` accepts it, printing each rejection.
fn prompt_until_valid<T>(
    console: &mut dyn Console,
    prompt: &str,
    echo: Echo,
    parse: impl Fn(&str) -> DomainResult<T>,
) -> io::Result<T> {
    let prompt = format!("{prompt}: ");
    loop {
        let line = match echo {
            Echo::Shown => console.read_line(&prompt)?,
            Echo::Hidden => console.read_secret(&prompt)?,
        };
        match parse(line.trim()) {
            Ok(value) => return Ok(value),
            Err(err) => console.print(&err.to_string())?,
        }
    }
}

fn condition_prompt() -> String {
    let choices: Vec<String> = Condition::all()
        .map(|condition| format!("{} {}", condition.enum_value(), condition.value()))
        .collect();
    format!("Condition ({})", choices.join(", "))
}

/// State of one logged-in user: the repository, the sensor feed and the records on screen.
#[derive(Debug)]
pub struct Session<R, S> {
    repository: R,
    sensors: S,
    records: RecordList,
}

impl<R: RecordRepository, S: SensorFeed> Session<R, S> {
    pub fn new(repository: R, sensors: S) -> Self {
        Self {
            repository,
            sensors,
            records: RecordList::new(),
        }
    }

    pub fn records(&self) -> &RecordList {
        &self.records
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Prompt for credentials until the repository accepts them.
    pub fn login(&mut self, console: &mut dyn Console) -> io::Result<()> {
        loop {
            let username = prompt_until_valid(console, "Username", Echo::Shown, |text| {
                Username::new(text)
            })?;
            let password = prompt_until_valid(console, "Password", Echo::Hidden, |text| {
                Password::new(text)
            })?;
            match self.repository.login(&username, &password) {
                Ok(()) => {
                    tracing::info!(%username, "session opened");
                    return Ok(());
                }
                Err(RepositoryError::Unauthorized) => {
                    tracing::warn!(%username, "credentials rejected");
                    console.print(LOGIN_FAILED)?;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "login failed");
                    console.print(&err.to_string())?;
                    console.print(LOGIN_FAILED)?;
                }
            }
        }
    }

    /// Close the session, logging rather than failing if the repository refuses.
    pub fn logout(&mut self) {
        match self.repository.logout() {
            Ok(()) => tracing::info!("session closed"),
            Err(err) => tracing::warn!(error = %err, "logout failed"),
        }
    }

    /// Replace the local records with the repository's current contents.
    pub fn reload(&mut self) -> RepositoryResult<()> {
        let records = self.repository.list()?;
        self.records.clear();
        self.records.extend(records);
        tracing::debug!(count = self.records.len(), "records reloaded");
        Ok(())
    }

    fn perform(&mut self, action: Action, console: &mut dyn Console) -> Result<(), ActionError> {
        match action {
            Action::PrintRecords => self.print_records(console)?,
            Action::AddRecord => self.add_record(console)?,
            Action::RemoveRecord => self.remove_record(console)?,
            Action::CollectRecords => self.collect_records(console)?,
            Action::SortByTemperature => {
                self.records.sort_by_temperature();
                self.print_records(console)?;
            }
            Action::SortByHumidity => {
                self.records.sort_by_humidity();
                self.print_records(console)?;
            }
            Action::SortByWind => {
                self.records.sort_by_wind();
                self.print_records(console)?;
            }
            Action::SortByDate => {
                self.records.sort_by_ascending_date();
                self.print_records(console)?;
            }
            Action::FetchRecords => {
                self.reload()?;
                self.print_records(console)?;
            }
            Action::Exit => console.print(FAREWELL)?,
        }
        Ok(())
    }

    fn print_records(&self, console: &mut dyn Console) -> io::Result<()> {
        for line in table::render(&self.records) {
            console.print(&line)?;
        }
        Ok(())
    }

    fn add_record(&mut self, console: &mut dyn Console) -> Result<(), ActionError> {
        let temperature = prompt_until_valid(
            console,
            "Temperature",
            Echo::Shown,
            str::parse::<Temperature>,
        )?;
        let humidity =
            prompt_until_valid(console, "Humidity", Echo::Shown, str::parse::<Humidity>)?;
        let wind = prompt_until_valid(console, "Wind", Echo::Shown, str::parse::<Wind>)?;
        let condition =
            prompt_until_valid(console, &condition_prompt(), Echo::Shown, Condition::create)?;
        let record_date = prompt_until_valid(
            console,
            "Date (dd/mm/yyyy HH:MM)",
            Echo::Shown,
            RecordDate::create,
        )?;

        let record = Record::new(temperature, humidity, wind, condition, record_date);
        self.repository.create(&record)?;
        self.reload()?;
        console.print(RECORD_ADDED)?;
        Ok(())
    }

    fn remove_record(&mut self, console: &mut dyn Console) -> Result<(), ActionError> {
        let records = &self.records;
        let selected = prompt_until_valid(console, "Index (0 to cancel)", Echo::Shown, |text| {
            let position: i64 = text.parse().map_err(|_| DomainError::Parse {
                field: "index",
                input: text.to_string(),
                reason: "expected a whole number",
            })?;
            if position == 0 {
                return Ok(None);
            }
            records.index_for_position(position).map(Some)
        })?;
        let Some(index) = selected else {
            console.print(CANCELLED)?;
            return Ok(());
        };

        let id = self
            .records
            .get(index)?
            .id()
            .ok_or(ActionError::Unsaved(index + 1))?;
        self.repository.delete(id)?;
        self.reload()?;
        console.print(RECORD_REMOVED)?;
        Ok(())
    }

    fn collect_records(&mut self, console: &mut dyn Console) -> Result<(), ActionError> {
        let today = Local::now().date_naive();
        let readings = collect_day(&mut self.sensors, today)?;
        let stored = readings
            .iter()
            .try_for_each(|record| self.repository.create(record));
        // some readings may have been stored before a failure
        self.reload()?;
        stored?;
        console.print(&format!("{} records collected!", readings.len()))?;
        Ok(())
    }
}

impl<R: RecordRepository, S: SensorFeed> MenuHandler<Action> for Session<R, S> {
    fn on_selected(&mut self, action: &Action, console: &mut dyn Console) -> anyhow::Result<()> {
        match self.perform(*action, console) {
            Ok(()) => Ok(()),
            Err(ActionError::Console(err)) => Err(err.into()),
            Err(err) => {
                tracing::warn!(?action, error = %err, "action failed");
                console.print(&err.to_string())?;
                Ok(())
            }
        }
    }
}

/// The whole interactive program: greeting, login, record menu and logout.
#[derive(Debug)]
pub struct App<R, S> {
    menu: Menu<Action>,
    session: Session<R, S>,
}

impl<R: RecordRepository, S: SensorFeed> App<R, S> {
    pub fn new(repository: R, sensors: S) -> MenuResult<Self> {
        Ok(Self {
            menu: build_menu()?,
            session: Session::new(repository, sensors),
        })
    }

    pub fn session(&self) -> &Session<R, S> {
        &self.session
    }

    /// Run one session to completion. Console failures end it early with an error.
    pub fn run(&mut self, console: &mut dyn Console) -> anyhow::Result<()> {
        console.print(TITLE)?;
        console.print(GREETING)?;
        self.session.login(console)?;

        if let Err(err) = self.session.reload() {
            tracing::warn!(error = %err, "initial fetch failed");
            console.print(&err.to_string())?;
        }

        let outcome = self.menu.run(&mut self.session, console);
        self.session.logout();
        outcome.context("record menu stopped")
    }
}

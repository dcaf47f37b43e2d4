//! Sources of automatic readings for the "collect" menu entry.

use chrono::{Duration, NaiveDate, NaiveTime};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use sw_core::{Condition, DomainResult, Humidity, Record, RecordDate, Temperature, Wind};

/// Readings collected per day, one per hour.
pub const READINGS_PER_DAY: u32 = 24;

/// Produces a record for a given point in time.
pub trait SensorFeed {
    fn read(&mut self, at: RecordDate) -> DomainResult<Record>;
}

/// Pseudo-random sensor values, reproducible for a fixed seed.
#[derive(Debug, Clone)]
pub struct SimulatedSensors {
    rng: ChaCha8Rng,
}

impl SimulatedSensors {
    /// Sensors seeded from a fresh random id.
    pub fn new() -> Self {
        Self::with_seed(Uuid::new_v4().as_u64_pair().0)
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for SimulatedSensors {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorFeed for SimulatedSensors {
    fn read(&mut self, at: RecordDate) -> DomainResult<Record> {
        let temperature = Temperature::new(self.rng.random_range(-10..=35))?;
        let humidity = Humidity::new(self.rng.random_range(20..=100))?;
        let wind = Wind::new(self.rng.random_range(0..=80))?;
        let code: u8 = self.rng.random_range(1..=4);
        let condition = Condition::create(&code.to_string())?;
        Ok(Record::new(temperature, humidity, wind, condition, at))
    }
}

/// Read the feed once per hour of `day`, starting at midnight.
pub fn collect_day(feed: &mut dyn SensorFeed, day: NaiveDate) -> DomainResult<Vec<Record>> {
    let midnight = day.and_time(NaiveTime::MIN);
    (0..READINGS_PER_DAY)
        .map(|hour| {
            let at = RecordDate::from_datetime(midnight + Duration::hours(i64::from(hour)))?;
            feed.read(at)
        })
        .collect()
}

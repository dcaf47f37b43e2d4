use crate::{Condition, DomainError, DomainResult, Humidity, Id, RecordDate, Temperature, Wind};

/// One weather observation.
///
/// Equality and the derived ordering follow field order: temperature, humidity, wind,
/// condition, date, then id.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Record {
    temperature: Temperature,
    humidity: Humidity,
    wind: Wind,
    condition: Condition,
    record_date: RecordDate,
    id: Option<Id>,
}

impl Record {
    /// Create a record that has not been stored by the service yet.
    pub fn new(
        temperature: Temperature,
        humidity: Humidity,
        wind: Wind,
        condition: Condition,
        record_date: RecordDate,
    ) -> Self {
        Self {
            temperature,
            humidity,
            wind,
            condition,
            record_date,
            id: None,
        }
    }

    /// Attach the identifier assigned by the service.
    #[must_use]
    pub fn with_id(mut self, id: Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Temperature in degrees Celsius.
    pub fn temperature(&self) -> Temperature {
        self.temperature
    }

    /// Relative humidity percentage.
    pub fn humidity(&self) -> Humidity {
        self.humidity
    }

    /// Wind speed in km/h.
    pub fn wind(&self) -> Wind {
        self.wind
    }

    /// Sky condition.
    pub fn condition(&self) -> Condition {
        self.condition
    }

    /// When the observation was taken.
    pub fn record_date(&self) -> RecordDate {
        self.record_date
    }

    /// Service identifier, `None` until the record has been stored.
    pub fn id(&self) -> Option<Id> {
        self.id
    }
}

/// Ordered, index-addressable collection of records.
///
/// Indexes are zero-based; [`RecordList::index_for_position`] converts the one-based
/// positions shown to users.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordList {
    records: Vec<Record>,
}

impl RecordList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// `true` when no records are held.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up the record at a zero-based index.
    pub fn get(&self, index: usize) -> DomainResult<&Record> {
        self.records
            .get(index)
            .ok_or_else(|| self.index_error(i64::try_from(index).unwrap_or(i64::MAX)))
    }

    /// Convert a one-based position into a zero-based index, checking bounds.
    pub fn index_for_position(&self, position: i64) -> DomainResult<usize> {
        position
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .filter(|index| *index < self.records.len())
            .ok_or_else(|| self.index_error(position.saturating_sub(1)))
    }

    /// Append a record, keeping insertion order.
    pub fn add(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Remove and return the record at a zero-based index.
    pub fn remove(&mut self, index: usize) -> DomainResult<Record> {
        if index >= self.records.len() {
            return Err(self.index_error(i64::try_from(index).unwrap_or(i64::MAX)));
        }
        Ok(self.records.remove(index))
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Iterate in current order.
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Stable sort, coldest first.
    pub fn sort_by_temperature(&mut self) {
        self.records.sort_by_key(Record::temperature);
    }

    /// Stable sort, driest first.
    pub fn sort_by_humidity(&mut self) {
        self.records.sort_by_key(Record::humidity);
    }

    /// Stable sort, calmest first.
    pub fn sort_by_wind(&mut self) {
        self.records.sort_by_key(Record::wind);
    }

    /// Stable sort, oldest first.
    pub fn sort_by_ascending_date(&mut self) {
        self.records.sort_by_key(Record::record_date);
    }

    fn index_error(&self, index: i64) -> DomainError {
        DomainError::IndexOutOfRange {
            index,
            len: self.records.len(),
        }
    }
}

impl FromIterator<Record> for RecordList {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl Extend<Record> for RecordList {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl<'a> IntoIterator for &'a RecordList {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationKind;

    fn record(temperature: i32, humidity: i32, wind: i32, condition: &str, date: &str) -> Record {
        Record::new(
            Temperature::new(temperature).unwrap(),
            Humidity::new(humidity).unwrap(),
            Wind::new(wind).unwrap(),
            Condition::create(condition).unwrap(),
            RecordDate::create(date).unwrap(),
        )
    }

    fn sample() -> Vec<Record> {
        vec![
            record(17, 25, 5, "1", "29/02/2000 10:00"),
            record(21, 87, 110, "3", "20/10/2022 11:54"),
            record(36, 40, 0, "1", "05/08/2023 13:00"),
            record(-5, 4, 20, "4", "09/09/2000 21:12"),
        ]
    }

    fn temperatures(list: &RecordList) -> Vec<i32> {
        list.iter().map(|record| record.temperature().value()).collect()
    }

    #[test]
    fn record_exposes_its_fields() {
        let record = record(18, 26, 10, "3", "29/03/2000 15:10").with_id(Id::new(45).unwrap());
        assert_eq!(record.temperature().to_string(), "18");
        assert_eq!(record.humidity().to_string(), "26");
        assert_eq!(record.wind().to_string(), "10");
        assert_eq!(record.condition().value(), "RAINY");
        assert_eq!(record.record_date().value(), "29/03/2000 at 15:10");
        assert_eq!(record.id(), Some(Id::new(45).unwrap()));
    }

    #[test]
    fn records_compare_structurally() {
        let first = record(17, 25, 5, "1", "29/02/2000 10:00");
        let same = record(17, 25, 5, "1", "29/02/2000 10:00");
        assert_eq!(first, same);
        assert_ne!(first, same.clone().with_id(Id::new(1).unwrap()));
        assert!(record(17, 25, 5, "1", "29/02/2000 10:00") < record(17, 26, 0, "1", "01/01/2000 00:00"));
    }

    #[test]
    fn list_keeps_insertion_order() {
        let records = sample();
        let mut list = RecordList::new();
        for record in &records {
            list.add(record.clone());
        }
        assert_eq!(list.len(), records.len());
        for (index, record) in records.iter().enumerate() {
            assert_eq!(list.get(index).unwrap(), record);
        }
    }

    #[test]
    fn get_rejects_indexes_past_the_end() {
        let list: RecordList = sample().into_iter().collect();
        let err = list.get(list.len()).unwrap_err();
        assert_eq!(err.validation_kind(), Some(ValidationKind::IndexOutOfRange));
        assert!(list.get(99).is_err());
        assert!(RecordList::new().get(0).is_err());
    }

    #[test]
    fn positions_are_one_based() {
        let list: RecordList = sample().into_iter().collect();
        assert_eq!(list.index_for_position(1).unwrap(), 0);
        assert_eq!(list.index_for_position(4).unwrap(), 3);
        for position in [0, -1, 5, i64::MIN, i64::MAX] {
            let err = list.index_for_position(position).unwrap_err();
            assert_eq!(err.validation_kind(), Some(ValidationKind::IndexOutOfRange));
        }
    }

    #[test]
    fn sort_by_temperature_orders_ascending() {
        let mut list: RecordList = sample().into_iter().collect();
        list.sort_by_temperature();
        assert_eq!(temperatures(&list), vec![-5, 17, 21, 36]);
    }

    #[test]
    fn sorts_are_stable_for_equal_keys() {
        let mut list: RecordList = vec![
            record(20, 50, 3, "1", "01/01/2020 10:00"),
            record(10, 50, 3, "2", "01/01/2020 09:00"),
            record(20, 10, 3, "3", "01/01/2020 08:00"),
            record(10, 10, 3, "4", "01/01/2020 07:00"),
        ]
        .into_iter()
        .collect();

        list.sort_by_temperature();
        let codes: Vec<_> = list.iter().map(|r| r.condition().enum_value()).collect();
        assert_eq!(codes, vec!["2", "4", "1", "3"]);

        list.sort_by_wind();
        let unchanged: Vec<_> = list.iter().map(|r| r.condition().enum_value()).collect();
        assert_eq!(unchanged, codes);
    }

    #[test]
    fn sorts_by_humidity_wind_and_date() {
        let mut list: RecordList = sample().into_iter().collect();

        list.sort_by_humidity();
        let humidity: Vec<_> = list.iter().map(|r| r.humidity().value()).collect();
        assert_eq!(humidity, vec![4, 25, 40, 87]);

        list.sort_by_wind();
        let wind: Vec<_> = list.iter().map(|r| r.wind().value()).collect();
        assert_eq!(wind, vec![0, 5, 20, 110]);

        list.sort_by_ascending_date();
        assert_eq!(temperatures(&list), vec![17, -5, 21, 36]);
    }

    #[test]
    fn sort_by_date_after_parsing() {
        let parsed = |date: &str| {
            Record::new(
                Temperature::new(17).unwrap(),
                Humidity::new(25).unwrap(),
                Wind::new(5).unwrap(),
                Condition::create("1").unwrap(),
                RecordDate::parse(date).unwrap(),
            )
        };
        let march = parsed("2023-03-01T00:00:00+01:00");
        let january = parsed("2023-01-01T00:00:00+01:00");
        let february = parsed("2023-02-01T00:00:00+01:00");
        let mut list: RecordList = vec![march, january.clone(), february].into_iter().collect();
        list.sort_by_ascending_date();
        assert_eq!(list.get(0).unwrap(), &january);
    }

    #[test]
    fn clear_and_remove() {
        let mut list: RecordList = sample().into_iter().collect();
        let removed = list.remove(0).unwrap();
        assert_eq!(removed.temperature().value(), 17);
        assert_eq!(list.len(), 3);
        assert!(list.remove(3).is_err());

        list.clear();
        assert!(list.is_empty());
        assert_eq!(removed.temperature().value(), 17);
    }
}

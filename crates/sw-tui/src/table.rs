use sw_core::RecordList;

const SEPARATOR_WIDTH: usize = 100;

/// Lay out the records as a fixed-width table, one string per output line.
pub fn render(records: &RecordList) -> Vec<String> {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let mut lines = vec![
        separator.clone(),
        row(
            "#",
            "TEMPERATURE",
            "HUMIDITY",
            "WIND",
            "CONDITION",
            "DATE",
        ),
        separator.clone(),
    ];
    for (index, record) in records.iter().enumerate() {
        lines.push(row(
            &(index + 1).to_string(),
            &record.temperature().to_string(),
            &record.humidity().to_string(),
            &record.wind().to_string(),
            record.condition().value(),
            &record.record_date().value(),
        ));
    }
    lines.push(separator);
    lines
}

fn row(
    index: &str,
    temperature: &str,
    humidity: &str,
    wind: &str,
    condition: &str,
    date: &str,
) -> String {
    format!("{index:>3} {temperature:>12} {humidity:>10} {wind:>6} {condition:<10} {date}")
}

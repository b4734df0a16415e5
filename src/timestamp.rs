use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const OFFSET_FORMATS: &[&str] = &[
	"%Y-%m-%d %H:%M:%S%.f%:z",
	"%Y-%m-%d %H:%M:%S%.f%z",
	"%Y-%m-%dT%H:%M:%S%.f%z",
	"%Y-%m-%d %H:%M:%S%.f %z",
	"%Y-%m-%d %H:%M%:z",
	"%Y-%m-%dT%H:%M%:z",
];

const DATETIME_FORMATS: &[&str] = &[
	"%Y-%m-%d %H:%M:%S%.f",
	"%Y-%m-%dT%H:%M:%S%.f",
	"%Y-%m-%d %H:%M",
	"%Y-%m-%dT%H:%M",
	"%Y/%m/%d %H:%M:%S",
	"%Y/%m/%d %H:%M",
	"%d.%m.%Y %H:%M:%S",
	"%d.%m.%Y %H:%M",
	"%m/%d/%Y %H:%M:%S",
	"%m/%d/%Y %H:%M",
	"%m/%d/%Y %I:%M:%S %p",
	"%m/%d/%Y %I:%M %p",
	"%Y%m%dT%H%M%S",
];

const DATE_FORMATS: &[&str] = &[
	"%Y-%m-%d",
	"%Y/%m/%d",
	"%d.%m.%Y",
	"%m/%d/%Y",
	"%B %d, %Y",
	"%b %d, %Y",
	"%d %B %Y",
	"%d %b %Y",
	"%Y%m%d",
];

/// Parses a free-form date or date-time into UTC.
///
/// Values without an offset are taken to be UTC already, and date-only values
/// land on midnight. All-digit values are read as a Unix timestamp in seconds
/// (10 digits) or milliseconds (13 digits). Returns `None` if nothing matches.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
	let value = value.trim();
	if value.is_empty() {
		return None;
	}
	let parsed = parse_with_offset(value)
		.or_else(|| parse_epoch(value))
		.or_else(|| parse_naive(strip_utc_marker(value)).map(|dt| Utc.from_utc_datetime(&dt)));
	if parsed.is_none() {
		tracing::debug!(value, "Unrecognised timestamp");
	}
	parsed
}

fn parse_with_offset(value: &str) -> Option<DateTime<Utc>> {
	if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
		return Some(dt.with_timezone(&Utc));
	}
	if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
		return Some(dt.with_timezone(&Utc));
	}
	OFFSET_FORMATS
		.iter()
		.find_map(|format| DateTime::parse_from_str(value, format).ok())
		.map(|dt| dt.with_timezone(&Utc))
}

fn parse_epoch(value: &str) -> Option<DateTime<Utc>> {
	if !value.bytes().all(|b| b.is_ascii_digit()) {
		return None;
	}
	let number: i64 = value.parse().ok()?;
	match value.len() {
		10 => DateTime::from_timestamp(number, 0),
		13 => DateTime::from_timestamp_millis(number),
		_ => None,
	}
}

fn parse_naive(value: &str) -> Option<NaiveDateTime> {
	DATETIME_FORMATS
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
		.or_else(|| {
			DATE_FORMATS
				.iter()
				.find_map(|format| NaiveDate::parse_from_str(value, format).ok())
				.map(|date| date.and_time(NaiveTime::MIN))
		})
}

fn strip_utc_marker(value: &str) -> &str {
	let stripped = value
		.strip_suffix('Z')
		.or_else(|| value.strip_suffix('z'))
		.or_else(|| value.strip_suffix("UTC"))
		.or_else(|| value.strip_suffix("GMT"))
		.unwrap_or(value);
	stripped.trim_end()
}

#[cfg(test)]
fn ts(value: &str) -> Option<String> {
	parse_timestamp(value).map(|dt| dt.format("%Y%m%dT%H%M%SZ").to_string())
}

#[test]
fn space_separated_with_zulu() {
	assert_eq!(ts("2023-01-15 10:30:00Z").as_deref(), Some("20230115T103000Z"));
}

#[test]
fn offsets_are_converted_to_utc() {
	assert_eq!(ts("2023-01-15T12:30:00+02:00").as_deref(), Some("20230115T103000Z"));
	assert_eq!(ts("2023-01-15 05:30:00-0500").as_deref(), Some("20230115T103000Z"));
	assert_eq!(ts("Sun, 15 Jan 2023 10:30:00 +0000").as_deref(), Some("20230115T103000Z"));
}

#[test]
fn naive_values_are_utc() {
	assert_eq!(ts("2023-01-15 10:30:00").as_deref(), Some("20230115T103000Z"));
	assert_eq!(ts("2023-01-15T10:30:00.123").as_deref(), Some("20230115T103000Z"));
	assert_eq!(ts("2023-01-15 10:30 UTC").as_deref(), Some("20230115T103000Z"));
	assert_eq!(ts("01/15/2023 10:30:00").as_deref(), Some("20230115T103000Z"));
	assert_eq!(ts("15.01.2023 10:30").as_deref(), Some("20230115T103000Z"));
}

#[test]
fn dates_land_on_midnight() {
	assert_eq!(ts("2023-01-15").as_deref(), Some("20230115T000000Z"));
	assert_eq!(ts("January 15, 2023").as_deref(), Some("20230115T000000Z"));
	assert_eq!(ts("15 Jan 2023").as_deref(), Some("20230115T000000Z"));
}

#[test]
fn unix_epochs() {
	assert_eq!(ts("1673778600").as_deref(), Some("20230115T103000Z"));
	assert_eq!(ts("1673778600000").as_deref(), Some("20230115T103000Z"));
	assert_eq!(ts("12345"), None);
}

#[test]
fn garbage_is_absent() {
	assert_eq!(ts("not-a-date"), None);
	assert_eq!(ts("   "), None);
	assert_eq!(ts("2023-13-45"), None);
}

use chrono::prelude::*;
use log::{debug, info};
use std::fs::File;
use std::path::{Path, PathBuf};
pub mod error;
pub mod parts;
pub mod plot;
pub mod render;

pub use error::{PartsError, Result};
pub use parts::{Aggregate, Category, DateParts, WeekdayName};
pub use render::{display, ChartKind, Panel};

pub const VERSION: Option<&'static str> = option_env!("CARGO_PKG_VERSION");

pub const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// datetime layouts accepted for the date column, tried in order
const DT_FORMATS: [&str; 6] = [
    DT_FORMAT,
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];
const D_FORMAT: &str = "%Y-%m-%d";

/// start, number of periods and step (hours) of the synthetic demo series
pub const SYNTHETIC_START: &str = "2025-09-16 02:35:00";
pub const SYNTHETIC_PERIODS: usize = 15;
pub const SYNTHETIC_STEP_HOURS: i64 = 14;

/// header of the date column when it is not given explicitly
const DEFAULT_DATE_COLUMN: &str = "timestamp";

/// The ordered series of timestamps, one per input record
#[derive(Debug, Clone, PartialEq)]
pub struct TimeStamps {
    pub time: Vec<NaiveDateTime>,
}

impl TimeStamps {
    pub fn new(capacity: usize) -> TimeStamps {
        TimeStamps {
            time: Vec::with_capacity(capacity),
        }
    }

    /// Init TimeStamps from csv.
    /// The date column is either the given one, the only one,
    /// or the one named "timestamp".
    /// Any unparseable value fails the whole load, there is no partial output.
    pub fn from_csv(fin: &Path, column: Option<&str>) -> Result<TimeStamps> {
        let file = File::open(fin).map_err(|source| PartsError::Access {
            path: PathBuf::from(fin),
            source,
        })?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);
        let headers = reader.headers()?.clone();
        let icol = date_column_index(&headers, column)?;
        debug!(
            "using column {} ({:?}) of {}",
            icol,
            &headers[icol],
            fin.display()
        );

        let mut timestamps = TimeStamps::new(1000);
        for (i, record) in reader.records().enumerate() {
            let record = record?;
            // header is line 1
            let line = i + 2;
            let value = record.get(icol).ok_or_else(|| {
                PartsError::format(format!("line {} has no value for the date column", line))
            })?;
            let dt = parse_datetime(value).ok_or_else(|| {
                PartsError::format(format!("line {}: could not parse {:?} as a date", line, value))
            })?;
            timestamps.time.push(dt);
        }
        info!("read {} timestamps from {}", timestamps.len(), fin.display());
        Ok(timestamps)
    }

    /// synthetic series of `periods` timestamps from `start`, spaced by `step`
    pub fn periodic(start: NaiveDateTime, periods: usize, step: chrono::Duration) -> TimeStamps {
        let mut timestamps = TimeStamps::new(periods);
        let mut dt = start;
        for _ in 0..periods {
            timestamps.time.push(dt);
            dt += step;
        }
        timestamps
    }

    /// the synthetic demo series
    pub fn synthetic() -> Result<TimeStamps> {
        let start = NaiveDateTime::parse_from_str(SYNTHETIC_START, DT_FORMAT)
            .map_err(|e| PartsError::format(format!("bad synthetic start: {}", e)))?;
        Ok(TimeStamps::periodic(
            start,
            SYNTHETIC_PERIODS,
            chrono::Duration::hours(SYNTHETIC_STEP_HOURS),
        ))
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// first and last datetime covered by the series
    pub fn span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        min_and_max(&self.time[..])
    }

    /// derives the calendar parts of every timestamp
    pub fn parts(&self) -> DateParts {
        DateParts::extract(&self.time)
    }
}

fn date_column_index(headers: &csv::StringRecord, column: Option<&str>) -> Result<usize> {
    let names: Vec<&str> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}'))
        .collect();
    if let Some(c) = column {
        return names.iter().position(|h| *h == c).ok_or_else(|| {
            PartsError::format(format!("date column {:?} not found in header {:?}", c, names))
        });
    }
    match names.len() {
        0 => Err(PartsError::format("the csv file has no columns")),
        1 => Ok(0),
        _ => names
            .iter()
            .position(|h| h.eq_ignore_ascii_case(DEFAULT_DATE_COLUMN))
            .ok_or_else(|| {
                PartsError::format(format!(
                    "expected a single column or a {:?} column, found {:?}",
                    DEFAULT_DATE_COLUMN, names
                ))
            }),
    }
}

/// parses a datetime or a date (at midnight);
/// values with an offset keep their own wall-clock time
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in DT_FORMATS.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    NaiveDate::parse_from_str(s, D_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn min_and_max<T: std::cmp::PartialOrd + Copy>(s: &[T]) -> Option<(T, T)> {
    let mut self_iter = s.iter();
    let (mut min, mut max) = match self_iter.next() {
        Some(v) => (*v, *v),
        None => return None,
    };
    for es in self_iter {
        if *es > max {
            max = *es
        }
        if *es < min {
            min = *es
        }
    }
    Some((min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, DT_FORMAT).unwrap()
    }

    #[test]
    fn parses_supported_layouts() {
        assert_eq!(parse_datetime("2024-01-06 10:30:00"), Some(dt("2024-01-06 10:30:00")));
        assert_eq!(parse_datetime("2024-01-06T10:30:00"), Some(dt("2024-01-06 10:30:00")));
        assert_eq!(parse_datetime("2024-01-06 10:30"), Some(dt("2024-01-06 10:30:00")));
        assert_eq!(parse_datetime("2024-01-06"), Some(dt("2024-01-06 00:00:00")));
        assert_eq!(
            parse_datetime("2024-01-06 10:30:00.250").map(|d| d.date()),
            Some(NaiveDate::from_ymd_opt(2024, 1, 6).unwrap())
        );
        // wall clock of the offset is kept, no conversion to utc
        assert_eq!(parse_datetime("2024-01-06T23:30:00+05:00"), Some(dt("2024-01-06 23:30:00")));
        assert_eq!(parse_datetime("06/01/2024"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn reads_single_column_csv() {
        let f = csv_file("when\n2024-01-06\n2024-01-08 08:00:00\n");
        let ts = TimeStamps::from_csv(f.path(), None).unwrap();
        assert_eq!(ts.time, vec![dt("2024-01-06 00:00:00"), dt("2024-01-08 08:00:00")]);
    }

    #[test]
    fn picks_timestamp_column_among_many() {
        let f = csv_file("id,Timestamp,value\n1,2024-01-06 01:00:00,3.5\n2,2024-01-07 02:00:00,4\n");
        let ts = TimeStamps::from_csv(f.path(), None).unwrap();
        assert_eq!(ts.len(), 2);
        assert_eq!(ts.time[1], dt("2024-01-07 02:00:00"));
    }

    #[test]
    fn uses_named_column() {
        let f = csv_file("id,created\n1,2024-01-06\n");
        let ts = TimeStamps::from_csv(f.path(), Some("created")).unwrap();
        assert_eq!(ts.len(), 1);
        let err = TimeStamps::from_csv(f.path(), Some("updated")).unwrap_err();
        assert!(matches!(err, PartsError::Format(_)));
    }

    #[test]
    fn ambiguous_columns_are_a_format_error() {
        let f = csv_file("a,b\n2024-01-06,2024-01-07\n");
        let err = TimeStamps::from_csv(f.path(), None).unwrap_err();
        assert!(matches!(err, PartsError::Format(_)));
    }

    #[test]
    fn one_bad_date_fails_the_whole_load() {
        let f = csv_file("timestamp\n2024-01-06\nnot a date\n2024-01-08\n");
        let err = TimeStamps::from_csv(f.path(), None).unwrap_err();
        match err {
            PartsError::Format(msg) => assert!(msg.contains("line 3"), "{}", msg),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TimeStamps::from_csv(&dir.path().join("nope.csv"), None).unwrap_err();
        assert!(matches!(err, PartsError::Access { .. }));
    }

    #[test]
    fn header_only_csv_is_empty() {
        let f = csv_file("timestamp\n");
        let ts = TimeStamps::from_csv(f.path(), None).unwrap();
        assert!(ts.is_empty());
        assert_eq!(ts.span(), None);
    }

    #[test]
    fn synthetic_series() {
        let ts = TimeStamps::synthetic().unwrap();
        assert_eq!(ts.len(), SYNTHETIC_PERIODS);
        assert_eq!(ts.time[0], dt("2025-09-16 02:35:00"));
        assert_eq!(ts.time[1], dt("2025-09-16 16:35:00"));
        assert_eq!(
            ts.span(),
            Some((dt("2025-09-16 02:35:00"), dt("2025-09-24 06:35:00")))
        );
    }

    #[test]
    fn min_and_max_of_slice() {
        assert_eq!(min_and_max(&[3, 1, 4, 1, 5][..]), Some((1, 5)));
        assert_eq!(min_and_max::<i32>(&[][..]), None);
    }
}

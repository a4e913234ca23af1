//! Calendar parts derived from a timestamp series, and their value counts.

use chrono::prelude::*;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::PartsError;

pub trait WeekdayName {
    fn full_name(&self) -> &'static str;
    fn is_weekend(&self) -> bool;
}

impl WeekdayName for Weekday {
    /// english name of the day
    fn full_name(&self) -> &'static str {
        match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }

    /// saturday and sunday, whatever the locale
    fn is_weekend(&self) -> bool {
        matches!(self, Weekday::Sat | Weekday::Sun)
    }
}

/// The calendar parts of each record, column-wise and in input order
#[derive(Debug, Clone, PartialEq)]
pub struct DateParts {
    pub time: Vec<NaiveDateTime>,
    pub day: Vec<u32>,
    pub month: Vec<u32>,
    pub year: Vec<i32>,
    pub hour: Vec<u32>,
    pub quarter: Vec<u32>,
    /// 0 is monday, 6 is sunday
    pub weekday: Vec<u32>,
    pub weekday_name: Vec<&'static str>,
    pub is_weekend: Vec<bool>,
}

impl DateParts {
    pub fn new(capacity: usize) -> DateParts {
        DateParts {
            time: Vec::with_capacity(capacity),
            day: Vec::with_capacity(capacity),
            month: Vec::with_capacity(capacity),
            year: Vec::with_capacity(capacity),
            hour: Vec::with_capacity(capacity),
            quarter: Vec::with_capacity(capacity),
            weekday: Vec::with_capacity(capacity),
            weekday_name: Vec::with_capacity(capacity),
            is_weekend: Vec::with_capacity(capacity),
        }
    }

    pub fn extract(time: &[NaiveDateTime]) -> DateParts {
        let mut parts = DateParts::new(time.len());
        for dt in time.iter() {
            let wd = dt.weekday();
            parts.time.push(*dt);
            parts.day.push(dt.day());
            parts.month.push(dt.month());
            parts.year.push(dt.year());
            parts.hour.push(dt.hour());
            parts.quarter.push((dt.month() - 1) / 3 + 1);
            parts.weekday.push(wd.num_days_from_monday());
            parts.weekday_name.push(wd.full_name());
            parts.is_weekend.push(wd.is_weekend());
        }
        parts
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// sort key and label of record i for the given category
    fn key_label(&self, category: Category, i: usize) -> (i64, String) {
        match category {
            Category::Day => (self.day[i] as i64, self.day[i].to_string()),
            Category::Month => (self.month[i] as i64, self.month[i].to_string()),
            Category::Year => (self.year[i] as i64, self.year[i].to_string()),
            Category::Hour => (self.hour[i] as i64, self.hour[i].to_string()),
            Category::Quarter => (self.quarter[i] as i64, self.quarter[i].to_string()),
            Category::Weekday => (self.weekday[i] as i64, self.weekday[i].to_string()),
            Category::WeekdayName => (self.weekday[i] as i64, self.weekday_name[i].to_string()),
            Category::IsWeekend => {
                let w = self.is_weekend[i];
                (w as i64, weekend_label(w).to_string())
            }
        }
    }

    /// counts of records per value of the category,
    /// most frequent first, ties in calendar order
    pub fn value_counts(&self, category: Category) -> Aggregate {
        let mut by_key: BTreeMap<i64, (String, usize)> = BTreeMap::new();
        for i in 0..self.len() {
            let (key, label) = self.key_label(category, i);
            by_key.entry(key).or_insert((label, 0)).1 += 1;
        }
        let mut counts: Vec<(String, usize)> = by_key.into_iter().map(|(_, v)| v).collect();
        // stable, keeps the calendar order among equal counts
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        Aggregate { category, counts }
    }
}

pub fn weekend_label(is_weekend: bool) -> &'static str {
    if is_weekend {
        "weekend"
    } else {
        "weekday"
    }
}

impl std::fmt::Display for DateParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "timestamp,day,month,year,hour,quarter,weekday,weekday_name,is_weekend"
        )?;
        for i in 0..self.len() {
            writeln!(
                f,
                "{},{},{},{},{},{},{},{},{}",
                self.time[i].format(crate::DT_FORMAT),
                self.day[i],
                self.month[i],
                self.year[i],
                self.hour[i],
                self.quarter[i],
                self.weekday[i],
                self.weekday_name[i],
                self.is_weekend[i] as u8,
            )?;
        }
        Ok(())
    }
}

/// The derived attributes that records can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Day,
    Month,
    Year,
    Hour,
    Quarter,
    Weekday,
    WeekdayName,
    IsWeekend,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Day,
        Category::Month,
        Category::Year,
        Category::Hour,
        Category::Quarter,
        Category::Weekday,
        Category::WeekdayName,
        Category::IsWeekend,
    ];

    /// names of ALL, in the same order
    pub const NAMES: [&'static str; 8] = [
        "day",
        "month",
        "year",
        "hour",
        "quarter",
        "weekday",
        "weekday_name",
        "is_weekend",
    ];

    pub fn name(&self) -> &'static str {
        Category::NAMES[*self as usize]
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::IsWeekend
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Category {
    type Err = PartsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.name() == s)
            .copied()
            .ok_or_else(|| PartsError::format(format!("unknown category {:?}", s)))
    }
}

/// Record counts per value of one category
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub category: Category,
    pub counts: Vec<(String, usize)>,
}

impl Aggregate {
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, c)| c).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.counts.iter().find(|(l, _)| l == label).map(|(_, c)| *c)
    }

    /// share of each value over the total, in [0, 1]
    pub fn proportions(&self) -> Vec<(String, f64)> {
        let total = self.total() as f64;
        self.counts
            .iter()
            .map(|(l, c)| (l.clone(), *c as f64 / total))
            .collect()
    }
}

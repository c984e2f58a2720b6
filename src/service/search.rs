use crate::models::expense::ExpenseRecord;
use chrono::NaiveDate;
use chrono_tz::Tz;
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Case-insensitive name test built from the search box.
///
/// The query is first tried as a regular expression. When it does not compile
/// (an unbalanced bracket, a look-around the engine does not support, ...) it is
/// matched as plain text instead, so a half-typed pattern never breaks the list.
#[derive(Debug, Clone)]
pub enum NameMatcher {
    Pattern(Regex),
    Literal(String),
}

impl NameMatcher {
    pub fn new(query: &str) -> Self {
        match RegexBuilder::new(query).case_insensitive(true).build() {
            Ok(regex) => NameMatcher::Pattern(regex),
            Err(e) => {
                debug!(query = %query, error = %e, "search query is not a valid pattern, matching literally");
                NameMatcher::Literal(query.to_lowercase())
            }
        }
    }

    pub fn is_match(&self, name: &str) -> bool {
        match self {
            NameMatcher::Pattern(regex) => regex.is_match(name),
            NameMatcher::Literal(needle) => name.to_lowercase().contains(needle.as_str()),
        }
    }
}

impl Default for NameMatcher {
    fn default() -> Self {
        NameMatcher::new("")
    }
}

/// The two independent predicates of the expense list.
#[derive(Debug, Clone)]
pub struct ExpenseFilter {
    search_query: String,
    matcher: NameMatcher,
    filter_date: Option<NaiveDate>,
    timezone: Tz,
}

impl ExpenseFilter {
    pub fn new(timezone: Tz) -> Self {
        ExpenseFilter {
            search_query: String::new(),
            matcher: NameMatcher::default(),
            filter_date: None,
            timezone,
        }
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn filter_date(&self) -> Option<NaiveDate> {
        self.filter_date
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn set_search_query(&mut self, query: &str) {
        if query != self.search_query {
            self.matcher = NameMatcher::new(query);
            self.search_query = query.to_string();
        }
    }

    pub fn set_filter_date(&mut self, date: Option<NaiveDate>) {
        self.filter_date = date;
    }

    /// Calendar day of the expense as seen in the display timezone.
    pub fn calendar_day(&self, record: &ExpenseRecord) -> NaiveDate {
        record.date.with_timezone(&self.timezone).date_naive()
    }

    pub fn matches_name(&self, record: &ExpenseRecord) -> bool {
        self.matcher.is_match(&record.name)
    }

    pub fn matches_date(&self, record: &ExpenseRecord) -> bool {
        self.filter_date.is_none_or(|day| self.calendar_day(record) == day)
    }

    pub fn matches(&self, record: &ExpenseRecord) -> bool {
        self.matches_name(record) && self.matches_date(record)
    }
}

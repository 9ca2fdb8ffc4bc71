use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::token::{TokenColor, TokenId, TokenSet};

const DAY_ID_FORMAT: &str = "%Y-%m-%d";

/// Identity of a calendar day, written as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayId(NaiveDate);

impl DayId {
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayId {
    fn from(date: NaiveDate) -> Self {
        DayId(date)
    }
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_ID_FORMAT))
    }
}

impl FromStr for DayId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(DayId(NaiveDate::parse_from_str(s.trim(), DAY_ID_FORMAT)?))
    }
}

/// Name and color of a token, copied at the time it was dropped on a day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub name: String,
    pub color: TokenColor,
}

/// Payload of a finished drag gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEnd {
    pub dragged: TokenId,
    pub dropped_on: Option<DayId>,
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentStore {
    entries: BTreeMap<DayId, Assignment>,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the dragged token to the day it was dropped on, replacing
    /// whatever was assigned there. Drops of unknown tokens or onto no day
    /// leave the store untouched.
    pub fn handle_drop(&mut self, tokens: &TokenSet, event: &DragEnd) {
        let day = match event.dropped_on {
            Some(day) => day,
            None => {
                log::debug!("Token '{}' dropped outside the calendar", event.dragged);
                return;
            }
        };

        match tokens.get(&event.dragged) {
            Some(token) => {
                log::debug!("Assigning '{}' to {}", token.name, day);
                self.entries.insert(
                    day,
                    Assignment {
                        name: token.name.clone(),
                        color: token.color,
                    },
                );
            }
            None => log::warn!("Ignoring drop of unknown token '{}'", event.dragged),
        }
    }

    pub fn remove(&mut self, day: &DayId) -> Option<Assignment> {
        let removed = self.entries.remove(day);
        if let Some(assignment) = &removed {
            log::debug!("Removed '{}' from {}", assignment.name, day);
        }
        removed
    }

    pub fn get(&self, day: &DayId) -> Option<&Assignment> {
        self.entries.get(day)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DayId, &Assignment)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Domain types for the episode archive.
//!
//! An [`Episode`] is one installment of a work as listed in the sidebar; a
//! [`Line`] is one numbered paragraph of an episode's body. A [`Record`] is
//! the persisted flattening of the two and the unit every query returns.

use serde::{Deserialize, Serialize};

use crate::store::ScanKey;

/// One installment of a work, as listed in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub work_id: u64,

    /// Chapter heading most recently seen before this episode; empty when
    /// no heading preceded it.
    pub sub_title: String,

    /// Display label from the sidebar (usually an installment number).
    pub number: String,

    /// Globally unique installment id, taken from the episode URL.
    pub episode_id: u64,
}

/// One numbered paragraph of an episode body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: u32,
    pub body: String,
}

/// The persisted unit: one episode crossed with one of its lines.
///
/// Primary key is `(work_id, episode_id, line)`; re-ingesting the same
/// source overwrites records sharing that key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub work_id: u64,
    pub sub_title: String,
    pub number: String,
    pub episode_id: u64,
    pub line: u32,
    pub body: String,
}

impl Record {
    /// Flatten an episode and one of its lines into a record.
    pub fn from_parts(episode: &Episode, line: Line) -> Self {
        Self {
            work_id: episode.work_id,
            sub_title: episode.sub_title.clone(),
            number: episode.number.clone(),
            episode_id: episode.episode_id,
            line: line.number,
            body: line.body,
        }
    }

    /// Primary key triple.
    pub fn key(&self) -> ScanKey {
        ScanKey { work_id: self.work_id, episode_id: self.episode_id, line: self.line }
    }

    /// Composite ordering key: unpadded episode id followed by the line
    /// number zero-padded to four digits.
    ///
    /// Comparison is on the string, so episode ids of differing digit
    /// counts order lexicographically rather than numerically.
    pub fn sort_key(&self) -> String {
        format!("{}{:04}", self.episode_id, self.line)
    }
}

/// Wire form of a [`Record`] with every numeric field re-encoded as its
/// decimal string, for consumers whose number type cannot hold 64-bit ids
/// without precision loss.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRecord {
    pub work_id: String,
    pub sub_title: String,
    pub number: String,
    pub episode_id: String,
    pub line: String,
    pub body: String,
}

impl From<&Record> for WireRecord {
    fn from(record: &Record) -> Self {
        Self {
            work_id: record.work_id.to_string(),
            sub_title: record.sub_title.clone(),
            number: record.number.clone(),
            episode_id: record.episode_id.to_string(),
            line: record.line.to_string(),
            body: record.body.clone(),
        }
    }
}

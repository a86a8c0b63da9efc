//! Airport roster: which airport each LED slot shows
//!
//! The roster length is fixed to the physical pixel count when it is built
//! and never changes afterwards.

use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::error::DataError;

/// Roster line marking an unused slot
pub const SKIP_MARKER: &str = "SKIP";

/// One addressable LED position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Airport(String),
    Skip,
}

impl Slot {
    /// Parse a single roster line
    pub fn parse(line: &str) -> Self {
        let code = line.trim();
        if code.is_empty() || code.eq_ignore_ascii_case(SKIP_MARKER) {
            return Self::Skip;
        }
        Self::Airport(code.to_ascii_uppercase())
    }

    /// Airport code, if the slot shows one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Airport(code) => Some(code),
            Self::Skip => None,
        }
    }
}

/// Ordered slots, exactly one per pixel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    slots: Vec<Slot>,
}

impl Roster {
    /// Build a roster of exactly `pixel_count` slots
    ///
    /// Missing entries are padded with [`Slot::Skip`]; extra entries are
    /// dropped.
    pub fn new(mut slots: Vec<Slot>, pixel_count: usize) -> Self {
        if slots.len() > pixel_count {
            warn!(
                "roster has {} entries but the strip has {pixel_count} pixels, ignoring the rest",
                slots.len()
            );
            slots.truncate(pixel_count);
        } else if slots.len() < pixel_count {
            slots.resize(pixel_count, Slot::Skip);
        }
        Self { slots }
    }

    /// Parse roster text, one slot per line
    pub fn parse(text: &str, pixel_count: usize) -> Self {
        Self::new(text.lines().map(Slot::parse).collect(), pixel_count)
    }

    /// Load the roster file
    pub fn load(path: &Path, pixel_count: usize) -> Result<Self, DataError> {
        let text = fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let roster = Self::parse(&text, pixel_count);
        info!(
            "loaded {} airports across {pixel_count} slots from {}",
            roster.airports().count(),
            path.display()
        );
        Ok(roster)
    }

    /// Roster with every slot unused
    pub fn empty(pixel_count: usize) -> Self {
        Self::new(Vec::new(), pixel_count)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    /// Iterate over `(slot index, airport code)` pairs
    pub fn airports(&self) -> impl Iterator<Item = (usize, &str)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.code().map(|code| (index, code)))
    }
}

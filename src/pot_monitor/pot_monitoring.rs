// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::pot_monitor::messaging::TransitionEvent;
use thiserror::Error;

/// Percentage held before the first reading, treated the same as "off".
pub const NO_READING: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum LevelsError {
    #[error("full_lbs and empty_lbs must be finite numbers")]
    NotFinite,
    #[error("full_lbs ({full_lbs}) must be greater than empty_lbs ({empty_lbs})")]
    FullNotAboveEmpty { full_lbs: f64, empty_lbs: f64 },
}

/// Weights of the pot when empty and when full, and how far the fill
/// percentage must move before it is reported again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotLevels {
    full_lbs: f64,
    empty_lbs: f64,
    pct_err: u32,
}

impl PotLevels {
    pub fn new(full_lbs: f64, empty_lbs: f64, pct_err: u32) -> Result<Self, LevelsError> {
        if !full_lbs.is_finite() || !empty_lbs.is_finite() {
            return Err(LevelsError::NotFinite);
        }
        if full_lbs <= empty_lbs {
            return Err(LevelsError::FullNotAboveEmpty { full_lbs, empty_lbs });
        }
        Ok(Self {
            full_lbs,
            empty_lbs,
            pct_err,
        })
    }

    pub fn full_lbs(&self) -> f64 {
        self.full_lbs
    }

    pub fn empty_lbs(&self) -> f64 {
        self.empty_lbs
    }

    pub fn pct_err(&self) -> u32 {
        self.pct_err
    }

    /// Maps a weight linearly onto empty (0) .. full (100). Not clamped, a
    /// pot lifted off the scale reads negative and an overfilled one above 100.
    pub fn percentage(&self, weight_lbs: f64) -> i32 {
        (100.0 * (weight_lbs - self.empty_lbs) / (self.full_lbs - self.empty_lbs)).round() as i32
    }

    fn bucket(&self, pct: i32) -> i32 {
        if self.pct_err == 0 {
            pct
        } else {
            (f64::from(pct) / f64::from(self.pct_err)).round() as i32
        }
    }
}

/// Everything the monitor remembers between readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotState {
    pct: i32,
    weight_lbs: Option<f64>,
    reported_pct: Option<i32>,
}

impl Default for PotState {
    fn default() -> Self {
        Self {
            pct: NO_READING,
            weight_lbs: None,
            reported_pct: None,
        }
    }
}

impl PotState {
    pub fn pct(&self) -> i32 {
        self.pct
    }

    pub fn weight_lbs(&self) -> Option<f64> {
        self.weight_lbs
    }

    /// Percentage carried by the last event, `None` while off.
    pub fn reported_pct(&self) -> Option<i32> {
        self.reported_pct
    }

    /// Applies one reading. The returned state always reflects the reading,
    /// whether or not an event was produced.
    pub fn next(&self, levels: &PotLevels, weight_lbs: f64) -> (PotState, Option<TransitionEvent>) {
        let pct = levels.percentage(weight_lbs);
        let previous = self.pct;

        let event = if previous <= 0 && pct > 0 {
            Some(TransitionEvent::TurnedOn(pct))
        } else if previous >= 0 && pct < 0 {
            Some(TransitionEvent::TurnedOff)
        } else {
            match self.reported_pct {
                Some(reported) if pct >= 0 && levels.bucket(reported) != levels.bucket(pct) => {
                    Some(TransitionEvent::Updated(pct))
                }
                _ => None,
            }
        };

        let reported_pct = match event {
            Some(TransitionEvent::TurnedOn(pct)) | Some(TransitionEvent::Updated(pct)) => Some(pct),
            Some(TransitionEvent::TurnedOff) => None,
            None => self.reported_pct,
        };

        let state = PotState {
            pct,
            weight_lbs: Some(weight_lbs),
            reported_pct,
        };
        (state, event)
    }
}

/// Turns successive weights into edge-triggered pot events.
#[derive(Debug, Clone)]
pub struct PotMonitor {
    levels: PotLevels,
    state: PotState,
}

impl PotMonitor {
    pub fn new(levels: PotLevels) -> Self {
        Self {
            levels,
            state: PotState::default(),
        }
    }

    pub fn update(&mut self, weight_lbs: f64) -> Option<TransitionEvent> {
        let (state, event) = self.state.next(&self.levels, weight_lbs);
        log::trace!("{:?} -> {:?}, event {:?}", self.state, state, event);
        self.state = state;
        event
    }

    pub fn state(&self) -> &PotState {
        &self.state
    }

    pub fn levels(&self) -> &PotLevels {
        &self.levels
    }
}

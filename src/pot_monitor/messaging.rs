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

use std::fmt;

/// A change in the pot worth telling someone about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionEvent {
    /// Coffee appeared, carrying the new fill percentage.
    TurnedOn(i32),
    /// The pot went below empty, usually because it was lifted off the scale.
    TurnedOff,
    /// The fill percentage moved by more than the configured tolerance.
    Updated(i32),
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionEvent::TurnedOn(pct) => write!(f, "on ({}% full)", pct),
            TransitionEvent::TurnedOff => write!(f, "off"),
            TransitionEvent::Updated(pct) => write!(f, "{}% full", pct),
        }
    }
}

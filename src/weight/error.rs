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
use std::io;
use thiserror::Error;

/// Failures opening the scale. These are fatal, the monitor cannot start.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("scale device {device} is unavailable: {source}")]
    DeviceUnavailable {
        device: String,
        #[source]
        source: serialport::Error,
    },
    #[error("scale device {0} is already in use")]
    AlreadyInUse(String),
    #[error("scale device {device} could not be configured: {reason}")]
    Configuration { device: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityLimit {
    Over,
    Under,
}

impl fmt::Display for CapacityLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapacityLimit::Over => write!(f, "over capacity"),
            CapacityLimit::Under => write!(f, "under capacity"),
        }
    }
}

/// Failures of a single weight read. The polling loop reports these and
/// tries again on its next tick.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("scale i/o failed: {0}")]
    Io(#[from] io::Error),
    #[error("unexpected response from scale: \"{}\"", .raw.escape_ascii())]
    Protocol { raw: Vec<u8> },
    #[error("scale is {0}")]
    OutOfRange(CapacityLimit),
    #[error("scale zeroing error")]
    ZeroingFault,
    #[error("scale still in motion after {retries} retries")]
    Timeout { retries: u32 },
}

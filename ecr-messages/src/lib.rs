#![cfg_attr(not(test), no_std)]
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

//! ECR ("electronic cash register") mode protocol for Avery-Berkel bench scales.
//!
//! The host sends a one letter command followed by a carriage return. The scale
//! answers with a short text frame terminated by [`ETX`], either a weight value
//! followed by a status block, a range/zeroing marker followed by a status
//! block, or a status block on its own.

pub mod command;
pub mod response;
pub mod status;

pub use command::{Command, encode_query};
pub use response::{ResponseOutcome, decode};
pub use status::EcrStatus;

/// End-of-text byte terminating every response frame.
pub const ETX: u8 = 0x03;

/// Upper bound on the bytes buffered while waiting for [`ETX`].
pub const MAX_FRAME_LEN: usize = 64;

/// Width of the weight field, the decimal point may sit anywhere inside it.
pub const WEIGHT_FIELD_LEN: usize = 6;

/// Response bytes kept for diagnostics.
pub type RawFrame = heapless::Vec<u8, MAX_FRAME_LEN>;

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

use std::io;

pub mod serial;

/// Byte level access to the scale's line.
pub trait ScaleInterface {
    /// Writes all of `bytes` to the scale.
    fn send(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Blocks for the next byte from the scale. Implementations must give up
    /// after a bounded time and return an error rather than wait forever.
    fn receive_byte(&mut self) -> io::Result<u8>;

    /// Drops anything already received but not yet read, e.g. the tail of a
    /// reply that arrived after an earlier exchange timed out.
    fn discard_input(&mut self) -> io::Result<()>;
}

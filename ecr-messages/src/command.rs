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

/// Commands understood by the scale in ECR mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Request the current weight. Answered by a weight frame or a status frame.
    Weigh,
    /// Re-zero the scale. Answered by a status frame.
    Zero,
}

impl Command {
    /// The bytes to write to the line for this command.
    pub const fn encode(self) -> [u8; 2] {
        match self {
            Command::Weigh => *b"W\r",
            Command::Zero => *b"Z\r",
        }
    }
}

/// Builds the weight query, `W` followed by a carriage return.
pub const fn encode_query() -> [u8; 2] {
    Command::Weigh.encode()
}

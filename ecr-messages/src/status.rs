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

use core::fmt;

const MOTION_BIT: u8 = 0b01;
const AT_ZERO_BIT: u8 = 0b10;
const UNDER_CAPACITY_BIT: u8 = 0b01;
const OVER_CAPACITY_BIT: u8 = 0b10;

/// The two digit status code that closes every response, e.g. `S10`.
///
/// The tens digit carries the motion (bit 0) and at-zero (bit 1) flags, the
/// units digit the under capacity (bit 0) and over capacity (bit 1) flags. So
/// `00` is a settled reading, `20` a settled reading at zero, `10` and `11`
/// mean the platter has not come to rest yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EcrStatus {
    code: u8,
}

impl EcrStatus {
    pub const OK: EcrStatus = EcrStatus { code: 0 };
    pub const ZERO: EcrStatus = EcrStatus { code: 20 };

    /// Builds a status from its two ASCII digits, `None` if either is not a digit.
    pub fn from_digits(tens: u8, units: u8) -> Option<Self> {
        if tens.is_ascii_digit() && units.is_ascii_digit() {
            Some(Self {
                code: (tens - b'0') * 10 + (units - b'0'),
            })
        } else {
            None
        }
    }

    /// The code as the scale prints it, `10` for `S10`.
    pub fn code(&self) -> u8 {
        self.code
    }

    fn condition(&self) -> u8 {
        self.code / 10
    }

    fn range(&self) -> u8 {
        self.code % 10
    }

    pub fn is_in_motion(&self) -> bool {
        self.condition() & MOTION_BIT != 0
    }

    pub fn is_at_zero(&self) -> bool {
        self.condition() & AT_ZERO_BIT != 0
    }

    pub fn is_under_capacity(&self) -> bool {
        self.range() & UNDER_CAPACITY_BIT != 0
    }

    pub fn is_over_capacity(&self) -> bool {
        self.range() & OVER_CAPACITY_BIT != 0
    }

    /// True for the two codes that may accompany a weight value: OK and Zero.
    pub fn is_settled(&self) -> bool {
        *self == Self::OK || *self == Self::ZERO
    }
}

impl fmt::Display for EcrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if self.is_in_motion() {
            "Weight not stable"
        } else if self.is_over_capacity() {
            "Over capacity"
        } else if self.is_under_capacity() {
            "Under capacity"
        } else if *self == Self::ZERO {
            "Zero"
        } else if *self == Self::OK {
            "OK"
        } else {
            return write!(f, "Status {:02}", self.code);
        };
        write!(f, "{} (S{:02})", text, self.code)
    }
}

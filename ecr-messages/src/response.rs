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

use crate::status::EcrStatus;
use crate::{ETX, MAX_FRAME_LEN, RawFrame, WEIGHT_FIELD_LEN};

const OVER_CAPACITY_MARKER: u8 = b'^';
const UNDER_CAPACITY_MARKER: u8 = b'_';
const ZERO_ERROR_MARKER: u8 = b'-';

/// What a single response frame means.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    /// A settled weight in pounds, as printed by the scale.
    Weight(f64),
    /// A status block with no value, e.g. while the platter is in motion.
    StatusOnly(EcrStatus),
    OverCapacity,
    UnderCapacity,
    ZeroError,
    /// Anything else. Holds up to [`MAX_FRAME_LEN`] bytes of the frame.
    Unparseable(RawFrame),
}

/// Decodes one complete response frame, including its trailing ETX.
///
/// The layouts are tried in a fixed order: weight and status, the three
/// marker frames (over capacity, under capacity, zeroing error), then a bare
/// status block. A frame that matches a layout but carries a malformed field
/// is not retried against the others, it is [`ResponseOutcome::Unparseable`].
pub fn decode(frame: &[u8]) -> ResponseOutcome {
    match frame {
        [b'\n', field @ .., b'L', b'B', b'\r', b'\n', b'S', tens, units, b'\r', ETX]
            if field.len() == WEIGHT_FIELD_LEN =>
        {
            match (parse_weight(field), EcrStatus::from_digits(*tens, *units)) {
                (Some(pounds), Some(status)) if status.is_settled() => {
                    ResponseOutcome::Weight(pounds)
                }
                _ => unparseable(frame),
            }
        }
        [b'\n', field @ .., b'\r', b'\n', b'S', tens, units, b'\r', ETX]
            if field.len() == WEIGHT_FIELD_LEN =>
        {
            if EcrStatus::from_digits(*tens, *units).is_none() {
                return unparseable(frame);
            }
            if is_marker(field, OVER_CAPACITY_MARKER) {
                ResponseOutcome::OverCapacity
            } else if is_marker(field, UNDER_CAPACITY_MARKER) {
                ResponseOutcome::UnderCapacity
            } else if is_marker(field, ZERO_ERROR_MARKER) {
                ResponseOutcome::ZeroError
            } else {
                unparseable(frame)
            }
        }
        [b'\n', b'S', tens, units, b'\r', ETX] => match EcrStatus::from_digits(*tens, *units) {
            Some(status) => ResponseOutcome::StatusOnly(status),
            None => unparseable(frame),
        },
        _ => unparseable(frame),
    }
}

fn is_marker(field: &[u8], marker: u8) -> bool {
    field.iter().all(|&b| b == marker)
}

/// Parses the fixed width weight field. Leading spaces are allowed, then
/// digits with at most one decimal point. Signs, exponents and embedded
/// spaces are rejected so a value is never accepted from a partial parse.
fn parse_weight(field: &[u8]) -> Option<f64> {
    let digits = field.trim_ascii_start();
    let mut seen_point = false;
    let mut digit_count = 0;
    for &b in digits {
        match b {
            b'0'..=b'9' => digit_count += 1,
            b'.' if !seen_point => seen_point = true,
            _ => return None,
        }
    }
    if digit_count == 0 {
        return None;
    }
    core::str::from_utf8(digits).ok()?.parse::<f64>().ok()
}

fn unparseable(frame: &[u8]) -> ResponseOutcome {
    ResponseOutcome::Unparseable(frame.iter().take(MAX_FRAME_LEN).copied().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(code: &[u8; 2]) -> EcrStatus {
        EcrStatus::from_digits(code[0], code[1]).unwrap()
    }

    fn assert_unparseable(frame: &[u8]) {
        match decode(frame) {
            ResponseOutcome::Unparseable(raw) => assert_eq!(raw.as_slice(), frame),
            other => panic!(
                "expected Unparseable for {:?}, got {:?}",
                frame.escape_ascii().to_string(),
                other
            ),
        }
    }

    #[test]
    fn zero_weight() {
        assert_eq!(decode(b"\n00.000LB\r\nS00\r\x03"), ResponseOutcome::Weight(0.0));
    }

    #[test]
    fn weight_keeps_printed_value() {
        assert_eq!(decode(b"\n05.120LB\r\nS00\r\x03"), ResponseOutcome::Weight(5.12));
        assert_eq!(decode(b"\n12.34 LB\r\nS00\r\x03"), unparseable(b"\n12.34 LB\r\nS00\r\x03"));
        assert_eq!(decode(b"\n 12.34LB\r\nS00\r\x03"), ResponseOutcome::Weight(12.34));
        assert_eq!(decode(b"\n123456LB\r\nS00\r\x03"), ResponseOutcome::Weight(123456.0));
        assert_eq!(decode(b"\n1.2345LB\r\nS00\r\x03"), ResponseOutcome::Weight(1.2345));
    }

    #[test]
    fn weight_at_zero_status_is_accepted() {
        assert_eq!(decode(b"\n00.000LB\r\nS20\r\x03"), ResponseOutcome::Weight(0.0));
    }

    #[test]
    fn weight_with_error_status_is_unparseable() {
        assert_unparseable(b"\n05.120LB\r\nS10\r\x03");
        assert_unparseable(b"\n05.120LB\r\nS02\r\x03");
        assert_unparseable(b"\n05.120LB\r\nS01\r\x03");
    }

    #[test]
    fn malformed_weight_field_is_unparseable() {
        assert_unparseable(b"\n-5.120LB\r\nS00\r\x03");
        assert_unparseable(b"\n5..120LB\r\nS00\r\x03");
        assert_unparseable(b"\n5.1e10LB\r\nS00\r\x03");
        assert_unparseable(b"\n      LB\r\nS00\r\x03");
        assert_unparseable(b"\n    . LB\r\nS00\r\x03");
        assert_unparseable(b"\nNaN000LB\r\nS00\r\x03");
    }

    #[test]
    fn wrong_field_width_is_unparseable() {
        assert_unparseable(b"\n5.120LB\r\nS00\r\x03");
        assert_unparseable(b"\n005.120LB\r\nS00\r\x03");
    }

    #[test]
    fn over_capacity() {
        assert_eq!(decode(b"\n^^^^^^\r\nS02\r\x03"), ResponseOutcome::OverCapacity);
    }

    #[test]
    fn under_capacity() {
        assert_eq!(decode(b"\n______\r\nS01\r\x03"), ResponseOutcome::UnderCapacity);
    }

    #[test]
    fn zeroing_error() {
        assert_eq!(decode(b"\n------\r\nS00\r\x03"), ResponseOutcome::ZeroError);
    }

    #[test]
    fn mixed_or_short_markers_are_unparseable() {
        assert_unparseable(b"\n^^^__^\r\nS02\r\x03");
        assert_unparseable(b"\n^^^^^\r\nS02\r\x03");
        assert_unparseable(b"\n^^^^^^\r\nSx2\r\x03");
    }

    #[test]
    fn status_only() {
        assert_eq!(decode(b"\nS10\r\x03"), ResponseOutcome::StatusOnly(status(b"10")));
        assert_eq!(decode(b"\nS11\r\x03"), ResponseOutcome::StatusOnly(status(b"11")));
        assert_eq!(decode(b"\nS02\r\x03"), ResponseOutcome::StatusOnly(status(b"02")));
        assert_eq!(decode(b"\nS00\r\x03"), ResponseOutcome::StatusOnly(EcrStatus::OK));
    }

    #[test]
    fn truncated_frames_are_unparseable() {
        let full = b"\n05.120LB\r\nS00\r\x03";
        for len in 0..full.len() {
            assert_unparseable(&full[..len]);
        }
        assert_unparseable(b"\nS10\r");
        assert_unparseable(b"\x03");
    }

    #[test]
    fn trailing_bytes_are_unparseable() {
        assert_unparseable(b"\nS10\r\x03\nS00\r\x03");
        assert_unparseable(b"\n05.120LB\r\nS00\r\x03\x03");
    }

    #[test]
    fn oversized_input_is_truncated_for_diagnostics() {
        let frame = [b'x'; MAX_FRAME_LEN + 10];
        match decode(&frame) {
            ResponseOutcome::Unparseable(raw) => assert_eq!(raw.len(), MAX_FRAME_LEN),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn decode_is_repeatable() {
        let frames: [&[u8]; 4] = [
            b"\n05.120LB\r\nS00\r\x03",
            b"\n^^^^^^\r\nS02\r\x03",
            b"\nS10\r\x03",
            b"garbage",
        ];
        for frame in frames {
            assert_eq!(decode(frame), decode(frame));
        }
    }
}

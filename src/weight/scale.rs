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

use crate::config::ScaleConfig;
use crate::weight::error::{CapacityLimit, ReadError, TransportError};
use crate::weight::interface::serial::SerialScaleInterface;
use crate::weight::interface::ScaleInterface;
use crate::weight::WeighingSystem;
use ecr_messages::{Command, ETX, EcrStatus, RawFrame, ResponseOutcome};
use std::thread;
use std::time::Duration;

const DEFAULT_MOTION_RETRY_LIMIT: u32 = 20;
const DEFAULT_MOTION_RETRY_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Re-queries allowed while the scale reports motion before a read gives up.
    pub motion_retry_limit: u32,
    /// Pause before each re-query.
    pub motion_retry_interval: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            motion_retry_limit: DEFAULT_MOTION_RETRY_LIMIT,
            motion_retry_interval: DEFAULT_MOTION_RETRY_INTERVAL,
        }
    }
}

/// A session with a scale in ECR mode. Owns the line for its whole lifetime
/// and runs one command/response exchange at a time.
pub struct EcrScale<I> {
    interface: I,
    settings: SessionSettings,
}

impl EcrScale<SerialScaleInterface> {
    pub fn open(config: &ScaleConfig) -> Result<Self, TransportError> {
        log::info!("Opening scale on {}", config.device.display());
        let interface = SerialScaleInterface::open(config)?;
        Ok(Self::new(interface, config.session))
    }
}

impl<I> EcrScale<I>
where
    I: ScaleInterface,
{
    pub fn new(interface: I, settings: SessionSettings) -> Self {
        Self { interface, settings }
    }

    /// Reads a settled weight in pounds.
    ///
    /// While the scale reports motion the query is repeated, up to the
    /// configured retry limit. Range and zeroing problems are returned at once.
    pub fn read(&mut self) -> Result<f64, ReadError> {
        let mut retries = 0;
        loop {
            let (outcome, frame) = self.exchange(Command::Weigh)?;
            match outcome {
                ResponseOutcome::Weight(pounds) => {
                    log::trace!("Weight {} lbs after {} retries", pounds, retries);
                    return Ok(pounds);
                }
                ResponseOutcome::StatusOnly(status) if status.is_in_motion() => {
                    if retries >= self.settings.motion_retry_limit {
                        return Err(ReadError::Timeout { retries });
                    }
                    retries += 1;
                    log::debug!(
                        "{}, retrying ({}/{})",
                        status,
                        retries,
                        self.settings.motion_retry_limit
                    );
                    if !self.settings.motion_retry_interval.is_zero() {
                        thread::sleep(self.settings.motion_retry_interval);
                    }
                }
                outcome => return Err(outcome_error(outcome, frame)),
            }
        }
    }

    /// Asks the scale to re-zero and returns the status it answers with.
    pub fn zero(&mut self) -> Result<EcrStatus, ReadError> {
        let (outcome, frame) = self.exchange(Command::Zero)?;
        match outcome {
            ResponseOutcome::StatusOnly(status)
                if !status.is_over_capacity() && !status.is_under_capacity() =>
            {
                log::info!("Zero command answered with {}", status);
                Ok(status)
            }
            outcome => Err(outcome_error(outcome, frame)),
        }
    }

    /// Ends the session, releasing the device.
    pub fn close(self) {
        log::info!("Closing scale");
    }

    pub fn interface(&self) -> &I {
        &self.interface
    }

    fn exchange(&mut self, command: Command) -> Result<(ResponseOutcome, RawFrame), ReadError> {
        self.interface.discard_input()?;

        let request = command.encode();
        log::trace!("Sending \"{}\"", request.escape_ascii());
        self.interface.send(&request)?;

        let frame = self.receive_frame()?;
        log::trace!("Received \"{}\"", frame.escape_ascii());

        let outcome = ecr_messages::decode(&frame);
        log::debug!("{:?} -> {:?}", command, outcome);
        Ok((outcome, frame))
    }

    /// Collects bytes up to and including ETX. A reply longer than a frame
    /// buffer is a protocol error.
    fn receive_frame(&mut self) -> Result<RawFrame, ReadError> {
        let mut frame = RawFrame::new();
        loop {
            let byte = self.interface.receive_byte()?;
            if frame.push(byte).is_err() {
                return Err(ReadError::Protocol { raw: frame.to_vec() });
            }
            if byte == ETX {
                return Ok(frame);
            }
        }
    }
}

impl<I> WeighingSystem for EcrScale<I>
where
    I: ScaleInterface,
{
    type Error = ReadError;

    fn read_weight_lbs(&mut self) -> Result<f64, Self::Error> {
        self.read()
    }
}

/// Maps a reply that is not the one we wanted to the error it represents.
fn outcome_error(outcome: ResponseOutcome, frame: RawFrame) -> ReadError {
    match outcome {
        ResponseOutcome::OverCapacity => ReadError::OutOfRange(CapacityLimit::Over),
        ResponseOutcome::UnderCapacity => ReadError::OutOfRange(CapacityLimit::Under),
        ResponseOutcome::StatusOnly(status) if status.is_over_capacity() => {
            ReadError::OutOfRange(CapacityLimit::Over)
        }
        ResponseOutcome::StatusOnly(status) if status.is_under_capacity() => {
            ReadError::OutOfRange(CapacityLimit::Under)
        }
        ResponseOutcome::ZeroError => ReadError::ZeroingFault,
        ResponseOutcome::Weight(_)
        | ResponseOutcome::StatusOnly(_)
        | ResponseOutcome::Unparseable(_) => ReadError::Protocol { raw: frame.to_vec() },
    }
}

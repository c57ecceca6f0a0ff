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
use crate::weight::error::TransportError;
use crate::weight::interface::ScaleInterface;
use parking_lot::{Mutex, const_mutex};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::collections::BTreeSet;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

// Line settings of the scale in ECR mode. The scale has no way to negotiate
// these, so they are not configurable.
pub const BAUD_RATE: u32 = 9600;
pub const DATA_BITS: DataBits = DataBits::Seven;
pub const PARITY: Parity = Parity::Even;
pub const STOP_BITS: StopBits = StopBits::One;

static OPEN_DEVICES: Mutex<BTreeSet<PathBuf>> = const_mutex(BTreeSet::new());

/// Exclusive claim on a scale device within this process, released on drop.
#[derive(Debug)]
pub struct DeviceLease {
    device: PathBuf,
}

impl DeviceLease {
    pub fn acquire(device: &Path) -> Result<Self, TransportError> {
        // Resolve symlinks such as /dev/serial/by-id/... so two names for one
        // port collide.
        let device = std::fs::canonicalize(device).unwrap_or_else(|_| device.to_path_buf());
        if !OPEN_DEVICES.lock().insert(device.clone()) {
            return Err(TransportError::AlreadyInUse(device.display().to_string()));
        }
        log::trace!("Acquired lease on {}", device.display());
        Ok(Self { device })
    }

    pub fn device(&self) -> &Path {
        &self.device
    }
}

impl Drop for DeviceLease {
    fn drop(&mut self) {
        OPEN_DEVICES.lock().remove(&self.device);
        log::trace!("Released lease on {}", self.device.display());
    }
}

/// The scale attached to a serial port.
///
/// On Unix the port is also opened in exclusive mode, so a second process
/// opening the same tty fails as well.
pub struct SerialScaleInterface {
    port: Box<dyn SerialPort>,
    lease: DeviceLease,
}

impl SerialScaleInterface {
    pub fn open(config: &ScaleConfig) -> Result<Self, TransportError> {
        let lease = DeviceLease::acquire(&config.device)?;
        let device = lease.device().display().to_string();

        let port = serialport::new(device.as_str(), BAUD_RATE)
            .data_bits(DATA_BITS)
            .parity(PARITY)
            .stop_bits(STOP_BITS)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(|source| TransportError::DeviceUnavailable {
                device: device.clone(),
                source,
            })?;

        verify_line_settings(port.as_ref())
            .map_err(|reason| TransportError::Configuration { device: device.clone(), reason })?;

        log::info!(
            "Opened {} at {} baud, 7E1, read timeout {:?}",
            device,
            BAUD_RATE,
            config.read_timeout
        );
        Ok(Self { port, lease })
    }

    pub fn device(&self) -> &Path {
        self.lease.device()
    }
}

/// Reads the line settings back from the driver, some adapters silently
/// ignore what they do not support.
fn verify_line_settings(port: &dyn SerialPort) -> Result<(), String> {
    let read_back =
        |setting: &str, e: serialport::Error| format!("cannot read back {setting}: {e}");

    let baud_rate = port.baud_rate().map_err(|e| read_back("baud rate", e))?;
    if baud_rate != BAUD_RATE {
        return Err(format!("baud rate is {baud_rate}, expected {BAUD_RATE}"));
    }
    let data_bits = port.data_bits().map_err(|e| read_back("data bits", e))?;
    if data_bits != DATA_BITS {
        return Err(format!("data bits are {data_bits:?}, expected {DATA_BITS:?}"));
    }
    let parity = port.parity().map_err(|e| read_back("parity", e))?;
    if parity != PARITY {
        return Err(format!("parity is {parity:?}, expected {PARITY:?}"));
    }
    let stop_bits = port.stop_bits().map_err(|e| read_back("stop bits", e))?;
    if stop_bits != STOP_BITS {
        return Err(format!("stop bits are {stop_bits:?}, expected {STOP_BITS:?}"));
    }
    Ok(())
}

impl ScaleInterface for SerialScaleInterface {
    fn send(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.port.write_all(bytes)?;
        self.port.flush()
    }

    fn receive_byte(&mut self) -> io::Result<u8> {
        let mut byte = [0u8; 1];
        self.port.read_exact(&mut byte)?;
        Ok(byte[0])
    }

    fn discard_input(&mut self) -> io::Result<()> {
        self.port.clear(ClearBuffer::Input).map_err(io::Error::from)
    }
}

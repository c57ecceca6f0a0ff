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

//! Coffee pot monitor. Polls an Avery-Berkel bench scale in ECR mode over a
//! serial line, converts the weight into a fill percentage and reports when
//! the pot turns on, off, or changes level.

pub mod application;
pub mod config;
pub mod pot_monitor;
pub mod weight;

pub use config::{Config, ConfigError, PotConfig, ScaleConfig};

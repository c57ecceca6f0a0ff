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

use crate::pot_monitor::TransitionEvent;

/// Where pot events go: notifications, displays, logs.
pub trait EventSink {
    fn notify(&mut self, pot_name: &str, event: TransitionEvent);
}

/// Writes every event to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn notify(&mut self, pot_name: &str, event: TransitionEvent) {
        log::info!("{}: {}", pot_name, event);
    }
}

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

use crate::application::event_sink::EventSink;
use crate::pot_monitor::{PotMonitor, TransitionEvent};
use crate::weight::WeighingSystem;
use std::thread;
use std::time::{Duration, Instant};

/// Polls the scale on a fixed cadence and forwards pot events to a sink.
pub struct PotChecker<WS, S> {
    name: String,
    weighing_system: WS,
    monitor: PotMonitor,
    sink: S,
    poll_interval: Duration,
}

impl<WS, S> PotChecker<WS, S>
where
    WS: WeighingSystem,
    S: EventSink,
{
    pub fn new(
        name: impl Into<String>,
        weighing_system: WS,
        monitor: PotMonitor,
        sink: S,
        poll_interval: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            weighing_system,
            monitor,
            sink,
            poll_interval,
        }
    }

    /// One reading. Any event is forwarded to the sink before being returned.
    pub fn poll_once(&mut self) -> Result<Option<TransitionEvent>, WS::Error> {
        let weight = self.weighing_system.read_weight_lbs()?;
        let event = self.monitor.update(weight);
        log::debug!(
            "{}: read {:.2} lbs ({}%)",
            self.name,
            weight,
            self.monitor.state().pct()
        );
        if let Some(event) = event {
            self.sink.notify(&self.name, event);
        }
        Ok(event)
    }

    /// Polls until `max_polls` readings have been attempted, or forever when
    /// `None`. Read failures are logged and the next tick tries again.
    pub fn run(&mut self, max_polls: Option<u64>) {
        log::info!(
            "Monitoring {} every {:?}",
            self.name,
            self.poll_interval
        );
        let mut polls: u64 = 0;
        loop {
            let tick = Instant::now();
            if let Err(e) = self.poll_once() {
                log::warn!("{}: scale read failed: {}", self.name, e);
            }
            polls += 1;
            if max_polls.is_some_and(|max| polls >= max) {
                break;
            }
            thread::sleep(self.poll_interval.saturating_sub(tick.elapsed()));
        }
        log::info!("Stopped monitoring {} after {} polls", self.name, polls);
    }

    pub fn monitor(&self) -> &PotMonitor {
        &self.monitor
    }

    pub fn into_weighing_system(self) -> WS {
        self.weighing_system
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pot_monitor::PotLevels;
    use crate::weight::interface::scripted::ScriptedInterface;
    use crate::weight::{CapacityLimit, EcrScale, ReadError, SessionSettings};
    use std::collections::VecDeque;

    struct FakeScale {
        readings: VecDeque<Result<f64, ReadError>>,
    }

    impl WeighingSystem for FakeScale {
        type Error = ReadError;

        fn read_weight_lbs(&mut self) -> Result<f64, Self::Error> {
            self.readings.pop_front().unwrap_or(Err(ReadError::ZeroingFault))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        events: Vec<(String, TransitionEvent)>,
    }

    impl EventSink for &mut RecordingSink {
        fn notify(&mut self, pot_name: &str, event: TransitionEvent) {
            self.events.push((pot_name.to_string(), event));
        }
    }

    fn monitor() -> PotMonitor {
        PotMonitor::new(PotLevels::new(10.0, 0.0, 5).unwrap())
    }

    #[test]
    fn events_reach_the_sink() {
        let scale = FakeScale {
            readings: VecDeque::from([Ok(-1.0), Ok(2.0), Ok(6.0), Ok(-1.0)]),
        };
        let mut sink = RecordingSink::default();
        let mut checker = PotChecker::new("B451", scale, monitor(), &mut sink, Duration::ZERO);
        checker.run(Some(4));
        drop(checker);

        let events: Vec<_> = sink.events.iter().map(|(_, e)| *e).collect();
        assert_eq!(
            events,
            vec![
                TransitionEvent::TurnedOn(20),
                TransitionEvent::Updated(60),
                TransitionEvent::TurnedOff
            ]
        );
        assert!(sink.events.iter().all(|(name, _)| name == "B451"));
    }

    #[test]
    fn read_errors_do_not_stop_the_loop() {
        let scale = FakeScale {
            readings: VecDeque::from([
                Err(ReadError::OutOfRange(CapacityLimit::Over)),
                Ok(5.0),
                Err(ReadError::Timeout { retries: 20 }),
                Ok(5.0),
            ]),
        };
        let mut sink = RecordingSink::default();
        let mut checker = PotChecker::new("pot", scale, monitor(), &mut sink, Duration::ZERO);
        checker.run(Some(4));
        assert_eq!(checker.monitor().state().pct(), 50);
        drop(checker);
        assert_eq!(sink.events.len(), 1);
    }

    #[test]
    fn poll_once_returns_the_error() {
        let scale = FakeScale {
            readings: VecDeque::from([Err(ReadError::ZeroingFault)]),
        };
        let mut sink = RecordingSink::default();
        let mut checker = PotChecker::new("pot", scale, monitor(), &mut sink, Duration::ZERO);
        assert!(matches!(checker.poll_once(), Err(ReadError::ZeroingFault)));
    }

    #[test]
    fn drives_an_ecr_session() {
        let replies: [&[u8]; 3] = [
            b"\nS10\r\x03",
            b"\n05.120LB\r\nS00\r\x03",
            b"\n^^^^^^\r\nS02\r\x03",
        ];
        let scale = EcrScale::new(
            ScriptedInterface::new(replies),
            SessionSettings {
                motion_retry_limit: 5,
                motion_retry_interval: Duration::ZERO,
            },
        );
        let mut sink = RecordingSink::default();
        let mut checker = PotChecker::new("pot", scale, monitor(), &mut sink, Duration::ZERO);

        assert_eq!(checker.poll_once().unwrap(), Some(TransitionEvent::TurnedOn(51)));
        assert!(matches!(
            checker.poll_once(),
            Err(ReadError::OutOfRange(CapacityLimit::Over))
        ));
        assert_eq!(checker.into_weighing_system().interface().sent.len(), 3);
    }
}

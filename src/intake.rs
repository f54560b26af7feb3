use std::time::{Duration, Instant};

use crate::config::IntakeConfig;
use crate::hub::HubCommand;
use crate::indexer::{Spindexer, Step, SLOTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeState {
    Idle,
    WaitForBall,
}

/// Held-button intake control from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualIntake {
    Forward,
    Reverse,
    Stop,
}

/// Loads three balls: run the intake forward and rotate the spindexer one
/// slot per dwell so each incoming ball gets an empty slot. Direct operator
/// intake control always preempts the cycle.
#[derive(Debug)]
pub struct IntakeSequencer {
    state: IntakeState,
    state_since: Instant,
    loaded: u8,
    index_wait: Duration,
    power: f64,
}

impl IntakeSequencer {
    pub fn new(config: &IntakeConfig, now: Instant) -> Self {
        Self {
            state: IntakeState::Idle,
            state_since: now,
            loaded: 0,
            index_wait: config.index_wait(),
            power: config.power,
        }
    }

    pub fn state(&self) -> IntakeState {
        self.state
    }

    pub fn idle(&self) -> bool {
        self.state == IntakeState::Idle
    }

    /// One control cycle. `start` must already be edge-detected and is only
    /// honoured while idle. A manual override aborts the cycle on the spot.
    pub fn update(
        &mut self,
        now: Instant,
        start: bool,
        manual: Option<ManualIntake>,
        indexer: &mut Spindexer,
        pkt: &mut HubCommand,
    ) {
        if let Some(manual) = manual {
            if self.state != IntakeState::Idle {
                log::info!("intake sequencer preempted by {manual:?}");
                self.state = IntakeState::Idle;
            }
            pkt.intake = match manual {
                ManualIntake::Forward => self.power,
                ManualIntake::Reverse => -self.power,
                ManualIntake::Stop => 0.0,
            };
            return;
        }

        match self.state {
            IntakeState::Idle => {
                if start {
                    self.loaded = 0;
                    pkt.intake = self.power;
                    log::info!("intake sequencer: loading {SLOTS} balls");
                    self.state = IntakeState::WaitForBall;
                    self.state_since = now;
                }
            }
            IntakeState::WaitForBall => {
                pkt.intake = self.power;
                if now.duration_since(self.state_since) >= self.index_wait {
                    indexer.advance(Step::Third);
                    indexer.command(pkt);
                    self.loaded += 1;
                    if self.loaded < SLOTS {
                        self.state_since = now;
                    } else {
                        log::info!("intake sequencer: all slots loaded");
                        self.state = IntakeState::Idle;
                    }
                }
            }
        }
    }
}

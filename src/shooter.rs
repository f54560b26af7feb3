use std::time::{Duration, Instant};

use crate::config::ShooterConfig;
use crate::hub::HubCommand;
use crate::indexer::{Spindexer, Step, SLOTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KickState {
    Idle,
    Spinup,
    Kick,
    Retract,
}

/// Fires all three slots in one cycle: spin the flywheels up, then
/// alternate kick and retract while the spindexer walks each slot past the
/// kicker. Rotation pattern over a full cycle is 60, 120, 120, 60 degrees:
/// the kicker sits half a slot off the loading position, so the cycle opens
/// and closes with a half-slot turn to return to canonical alignment.
///
/// The kicker is not gated on the spindexer having settled; the retract
/// dwell is tuned to cover the rotation.
#[derive(Debug)]
pub struct ShootSequencer {
    state: KickState,
    state_since: Instant,
    shots: u8,
    spinup: Duration,
    kick: Duration,
    retract: Duration,
    flywheel_power: f64,
    kicker_extended: f64,
    kicker_retracted: f64,
}

impl ShootSequencer {
    pub fn new(config: &ShooterConfig, now: Instant) -> Self {
        Self {
            state: KickState::Idle,
            state_since: now,
            shots: 0,
            spinup: config.spinup(),
            kick: config.kick(),
            retract: config.retract(),
            flywheel_power: config.flywheel_power,
            kicker_extended: config.kicker_extended,
            kicker_retracted: config.kicker_retracted,
        }
    }

    pub fn state(&self) -> KickState {
        self.state
    }

    pub fn idle(&self) -> bool {
        self.state == KickState::Idle
    }

    fn enter(&mut self, state: KickState, now: Instant) {
        log::info!("shoot sequencer: {:?} -> {:?}", self.state, state);
        self.state = state;
        self.state_since = now;
    }

    /// One control cycle. `fire` must already be edge-detected; it is only
    /// honoured while idle, so re-triggering mid-cycle is ignored. Advances
    /// at most one transition per call.
    pub fn update(&mut self, now: Instant, fire: bool, indexer: &mut Spindexer, pkt: &mut HubCommand) {
        let elapsed = now.duration_since(self.state_since);
        match self.state {
            KickState::Idle => {
                pkt.set_flywheels(0.0);
                if fire {
                    self.shots = 0;
                    // pre-rotate half a slot to bring the first ball in
                    // front of the kicker
                    indexer.advance(Step::Sixth);
                    indexer.command(pkt);
                    self.enter(KickState::Spinup, now);
                }
            }
            KickState::Spinup => {
                pkt.set_flywheels(self.flywheel_power);
                if elapsed >= self.spinup {
                    pkt.set_kickers(self.kicker_extended);
                    self.enter(KickState::Kick, now);
                }
            }
            KickState::Kick => {
                pkt.set_flywheels(self.flywheel_power);
                if elapsed >= self.kick {
                    self.shots += 1;
                    pkt.set_kickers(self.kicker_retracted);
                    if self.shots < SLOTS {
                        indexer.advance(Step::Third);
                        indexer.command(pkt);
                        self.enter(KickState::Retract, now);
                    } else {
                        // close with the other half-slot so the slots land
                        // back on their 0/120/240 loading alignment
                        indexer.advance(Step::Sixth);
                        indexer.command(pkt);
                        self.enter(KickState::Idle, now);
                    }
                }
            }
            KickState::Retract => {
                pkt.set_flywheels(self.flywheel_power);
                if elapsed >= self.retract {
                    pkt.set_kickers(self.kicker_extended);
                    self.enter(KickState::Kick, now);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexerConfig;

    fn shooter_config() -> ShooterConfig {
        ShooterConfig {
            flywheel_power: 1.0,
            spinup_secs: 1.0,
            kick_secs: 0.2,
            retract_secs: 0.6,
            kicker_retracted: 0.0,
            kicker_extended: 0.5,
        }
    }

    fn spindexer() -> Spindexer {
        Spindexer::new(&IndexerConfig {
            ticks_per_rev: 8192,
            seek_power: 0.5,
        })
    }

    #[test]
    fn full_cycle_fires_three_shots_and_rotates_one_revolution() {
        let config = shooter_config();
        let t0 = Instant::now();
        let mut seq = ShootSequencer::new(&config, t0);
        let mut indexer = spindexer();
        let mut pkt = HubCommand::default();

        seq.update(t0, true, &mut indexer, &mut pkt);
        assert_eq!(seq.state(), KickState::Spinup);
        assert_eq!(indexer.target(), 1365); // 60 degree pre-rotation
        assert_eq!(pkt.flywheels, [0.0, 0.0]); // cut until next cycle

        let mut now = t0;
        let mut kicks = 0;
        let mut states = vec![seq.state()];
        for dwell in [
            config.spinup(),   // Spinup -> Kick
            config.kick(),     // shot 1
            config.retract(),  // Retract -> Kick
            config.kick(),     // shot 2
            config.retract(),  // Retract -> Kick
            config.kick(),     // shot 3 -> Idle
        ] {
            now += dwell;
            let before = seq.state();
            seq.update(now, false, &mut indexer, &mut pkt);
            if before == KickState::Kick && seq.state() != KickState::Kick {
                kicks += 1;
                assert_eq!(pkt.kickers, [0.0, 0.0]);
            }
            if seq.state() == KickState::Kick {
                assert_eq!(pkt.kickers, [0.5, 0.5]);
            }
            states.push(seq.state());
        }

        assert_eq!(
            states,
            vec![
                KickState::Spinup,
                KickState::Kick,
                KickState::Retract,
                KickState::Kick,
                KickState::Retract,
                KickState::Kick,
                KickState::Idle,
            ]
        );
        // kicker retracts twice mid-cycle and once at the end
        assert_eq!(kicks, 3);
        // 60 + 120 + 120 + 60 degrees = one full revolution of ticks
        assert_eq!(indexer.target(), 1365 + 2730 + 2730 + 1365);

        // flywheels stay powered until the idle cycle after the last shot
        seq.update(now, false, &mut indexer, &mut pkt);
        assert_eq!(pkt.flywheels, [0.0, 0.0]);
    }

    #[test]
    fn retrigger_mid_cycle_is_ignored() {
        let config = shooter_config();
        let t0 = Instant::now();
        let mut seq = ShootSequencer::new(&config, t0);
        let mut indexer = spindexer();
        let mut pkt = HubCommand::default();

        seq.update(t0, true, &mut indexer, &mut pkt);
        let target_after_start = indexer.target();

        // fire again before spin-up completes
        seq.update(t0 + Duration::from_millis(100), true, &mut indexer, &mut pkt);
        assert_eq!(seq.state(), KickState::Spinup);
        assert_eq!(indexer.target(), target_after_start);
    }

    #[test]
    fn flywheels_run_through_every_active_state() {
        let config = shooter_config();
        let t0 = Instant::now();
        let mut seq = ShootSequencer::new(&config, t0);
        let mut indexer = spindexer();
        let mut pkt = HubCommand::default();

        seq.update(t0, true, &mut indexer, &mut pkt);
        let mut now = t0;
        for dwell in [config.spinup(), config.kick(), config.retract()] {
            now += dwell;
            seq.update(now, false, &mut indexer, &mut pkt);
            assert_eq!(pkt.flywheels, [1.0, 1.0]);
        }
    }

    #[test]
    fn dwells_shorter_than_thresholds_hold_state() {
        let config = shooter_config();
        let t0 = Instant::now();
        let mut seq = ShootSequencer::new(&config, t0);
        let mut indexer = spindexer();
        let mut pkt = HubCommand::default();

        seq.update(t0, true, &mut indexer, &mut pkt);
        seq.update(t0 + Duration::from_millis(999), false, &mut indexer, &mut pkt);
        assert_eq!(seq.state(), KickState::Spinup);
        seq.update(t0 + Duration::from_millis(1000), false, &mut indexer, &mut pkt);
        assert_eq!(seq.state(), KickState::Kick);
    }
}

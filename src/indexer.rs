use crate::config::IndexerConfig;
use crate::hub::HubCommand;

/// The spindexer carries three ball slots 120 degrees apart; the kicker
/// sits 180 degrees from the loading position.
pub const SLOTS: u8 = 3;

/// Rotation increments the spindexer is ever commanded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// 60 degrees, the half-slot offset between loading and kicking
    /// alignment.
    Sixth,
    /// 120 degrees, one full slot.
    Third,
}

/// Tracks the accumulated absolute tick target for the spindexer. The
/// mechanism is only ever commanded in fixed relative increments, so the
/// absolute value is meaningless except as an offset from the startup zero.
#[derive(Debug)]
pub struct Spindexer {
    target: i32,
    ticks_per_rev: i32,
    seek_power: f64,
}

impl Spindexer {
    pub fn new(config: &IndexerConfig) -> Self {
        Self {
            target: 0,
            ticks_per_rev: config.ticks_per_rev,
            seek_power: config.seek_power,
        }
    }

    fn step_ticks(&self, step: Step) -> i32 {
        match step {
            Step::Sixth => self.ticks_per_rev / 6,
            Step::Third => self.ticks_per_rev / 3,
        }
    }

    /// Accumulate one increment. Monotonic: the target only ever grows.
    pub fn advance(&mut self, step: Step) {
        self.target += self.step_ticks(step);
    }

    /// Resynchronize the tracked target with the mechanism's reported
    /// position, absorbing drift or manual rotation.
    pub fn zero_to(&mut self, reported_ticks: i32) {
        self.target = reported_ticks;
    }

    /// Write the absolute target and seek power into the command packet.
    /// The position controller on the other side runs to it.
    pub fn command(&self, pkt: &mut HubCommand) {
        pkt.indexer_target = self.target;
        pkt.indexer_power = self.seek_power;
    }

    pub fn target(&self) -> i32 {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spindexer() -> Spindexer {
        Spindexer::new(&IndexerConfig {
            ticks_per_rev: 8192,
            seek_power: 0.5,
        })
    }

    #[test]
    fn steps_accumulate_with_truncated_tick_counts() {
        let mut indexer = spindexer();
        indexer.advance(Step::Sixth);
        assert_eq!(indexer.target(), 1365);
        indexer.advance(Step::Third);
        assert_eq!(indexer.target(), 1365 + 2730);
    }

    #[test]
    fn command_writes_target_and_seek_power() {
        let mut indexer = spindexer();
        indexer.advance(Step::Third);
        let mut pkt = HubCommand::default();
        indexer.command(&mut pkt);
        assert_eq!(pkt.indexer_target, 2730);
        assert_eq!(pkt.indexer_power, 0.5);
    }

    #[test]
    fn zeroing_adopts_the_reported_position() {
        let mut indexer = spindexer();
        indexer.advance(Step::Third);
        indexer.advance(Step::Third);
        indexer.zero_to(137);
        assert_eq!(indexer.target(), 137);

        // commanding now holds the mechanism where it is
        let mut pkt = HubCommand::default();
        indexer.command(&mut pkt);
        assert_eq!(pkt.indexer_target, 137);
    }
}

use std::time::{Duration, Instant};

/// Control-loop cadence for bench runs and bounded waits.
pub const CYCLE: Duration = Duration::from_millis(20);

/// Raw per-cycle snapshot of one gamepad.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PadState {
    pub buttons: u16,
    pub axes: [f64; 4],
}

/// Everything the hub reports back each cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HubState {
    pub pads: [PadState; 2],
    pub indexer_ticks: i32,
    pub indexer_busy: bool,
}

/// Outbound command packet. Fields persist between cycles until overwritten,
/// so a motor keeps its last commanded power without being re-written.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HubCommand {
    // wheel order: left front, left back, right front, right back
    pub drive: [f64; 4],
    pub intake: f64,
    pub flywheels: [f64; 2],
    pub kickers: [f64; 2],
    pub indexer_target: i32,
    pub indexer_power: f64,
    pub reset_indexer: bool,
}

impl Default for HubCommand {
    fn default() -> Self {
        Self {
            drive: [0.0; 4],
            intake: 0.0,
            flywheels: [0.0; 2],
            kickers: [0.0; 2],
            indexer_target: 0,
            indexer_power: 0.0,
            reset_indexer: false,
        }
    }
}

impl HubCommand {
    /// Both kicker servos share one throw; directions are handled at the
    /// servo sink. Positions outside [0, 1] are clipped like servo range.
    pub fn set_kickers(&mut self, position: f64) {
        let position = position.clamp(0.0, 1.0);
        self.kickers = [position, position];
    }

    pub fn set_flywheels(&mut self, power: f64) {
        let power = power.clamp(-1.0, 1.0);
        self.flywheels = [power, power];
    }
}

/// Seam to the robot-controller runtime: it polls inputs, applies the
/// command packet to the actuators and renders telemetry lines.
pub trait Hub {
    /// False once the host signals stop.
    fn active(&self) -> bool;
    /// Read the inputs once per control cycle.
    fn poll(&mut self) -> HubState;
    /// Push the command packet to the actuators.
    fn apply(&mut self, cmd: &HubCommand);
    /// Key/value status lines for the operator. Write-only.
    fn telemetry(&mut self, lines: &[(&str, String)]);
}

/// Desktop stand-in for the real hub: scripted gamepads and a spindexer
/// that seeks its commanded target at a fixed tick rate.
pub struct BenchHub {
    deadline: Instant,
    pads: [PadState; 2],
    ticks: i32,
    target: i32,
    seek_rate: i32,
}

impl BenchHub {
    pub fn new(run_time: Duration, seek_rate: i32) -> Self {
        Self {
            deadline: Instant::now() + run_time,
            pads: [PadState::default(); 2],
            ticks: 0,
            target: 0,
            seek_rate,
        }
    }

    pub fn set_pads(&mut self, first: PadState, second: PadState) {
        self.pads = [first, second];
    }

    pub fn ticks(&self) -> i32 {
        self.ticks
    }
}

impl Hub for BenchHub {
    fn active(&self) -> bool {
        Instant::now() < self.deadline
    }

    fn poll(&mut self) -> HubState {
        // one poll = one control cycle of simulated seek progress
        let delta = self.target - self.ticks;
        self.ticks += delta.clamp(-self.seek_rate, self.seek_rate);
        HubState {
            pads: self.pads,
            indexer_ticks: self.ticks,
            indexer_busy: self.ticks != self.target,
        }
    }

    fn apply(&mut self, cmd: &HubCommand) {
        if cmd.reset_indexer {
            self.ticks = 0;
            self.target = 0;
        } else {
            self.target = cmd.indexer_target;
        }
    }

    fn telemetry(&mut self, lines: &[(&str, String)]) {
        for (key, value) in lines {
            log::debug!("{key}: {value}");
        }
    }
}

/// Poll until `done` holds or `timeout` passes. Returns whether the
/// condition was met, so a mechanism that never arrives cannot hang the
/// program.
pub fn wait_until(
    hub: &mut dyn Hub,
    timeout: Duration,
    mut done: impl FnMut(&HubState) -> bool,
) -> bool {
    let deadline = Instant::now() + timeout;
    while hub.active() {
        let state = hub.poll();
        if done(&state) {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(CYCLE);
    }
    false
}

use std::time::Duration;

mod config;
mod controller;
mod hub;

use config::RobotConfig;
use controller::{button, Gamepads};
use hub::{BenchHub, Hub, HubCommand};

// Bench diagnostics: jog the kicker servos on the d-pad and watch the
// spindexer encoder. A re-zeroes the encoder.

const POSITION_INCREMENT: f64 = 0.01;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = RobotConfig::load()?;
    let mut hub = BenchHub::new(Duration::from_secs(600), 200);
    run(&mut hub, &config);
    Ok(())
}

fn run(hub: &mut dyn Hub, config: &RobotConfig) {
    let mut pads = Gamepads::default();
    let mut pkt = HubCommand::default();
    let mut position = 0.5;
    log::info!("dpad up/down jogs the kickers, A re-zeroes the encoder");

    while hub.active() {
        let state = hub.poll();
        pads.update(&state);

        if pads.driver.held(button::DPAD_UP) {
            position += POSITION_INCREMENT;
        } else if pads.driver.held(button::DPAD_DOWN) {
            position -= POSITION_INCREMENT;
        }
        position = f64::clamp(position, 0.0, 1.0);

        // the servos face each other, so one runs mirrored
        pkt.kickers = [position, 1.0 - position];
        pkt.reset_indexer = pads.driver.pressed(button::A);
        hub.apply(&pkt);

        hub.telemetry(&[
            ("Servo Position", format!("{position:.2}")),
            ("Spindexer Ticks", state.indexer_ticks.to_string()),
            (
                "Full Rotations",
                format!(
                    "{:.2}",
                    f64::from(state.indexer_ticks) / f64::from(config.indexer.ticks_per_rev)
                ),
            ),
        ]);
        std::thread::sleep(hub::CYCLE);
    }
}

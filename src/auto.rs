use std::thread::sleep;
use std::time::Duration;

mod config;
mod drivebase;
mod hub;
mod indexer;

use config::RobotConfig;
use drivebase::Drivebase;
use hub::{BenchHub, Hub, HubCommand};
use indexer::{Spindexer, Step};

const AUTO_TIME: Duration = Duration::from_secs(30);
const BENCH_SEEK_RATE: i32 = 200;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = RobotConfig::load()?;
    let mut hub = BenchHub::new(AUTO_TIME, BENCH_SEEK_RATE);
    run(&mut hub, &config);
    Ok(())
}

// Scripted one-ball autonomous: drive out, spin up, index a slot, kick.
// Blocking waits are fine here, there is no operator input to service.
fn run(hub: &mut dyn Hub, config: &RobotConfig) {
    let drivebase = Drivebase::new(config.drive.reversed);
    let mut indexer = Spindexer::new(&config.indexer);
    let mut pkt = HubCommand::default();

    // re-zero the spindexer encoder and park the kickers
    pkt.reset_indexer = true;
    pkt.set_kickers(config.shooter.kicker_retracted);
    indexer.command(&mut pkt);
    hub.apply(&pkt);
    pkt.reset_indexer = false;

    // movement legs; powers and times live in robot.toml
    let power = config.auto.drive_power;
    drive_for(hub, &drivebase, &mut pkt, [power, 0.0, 0.0], config.auto.forward_millis);
    drive_for(hub, &drivebase, &mut pkt, [0.0, power, 0.0], config.auto.strafe_millis);
    sleep(Duration::from_millis(500)); // stabilize

    log::info!("spinning up flywheels");
    pkt.set_flywheels(config.shooter.flywheel_power);
    hub.apply(&pkt);
    sleep(config.auto.spinup());

    log::info!("indexing ball");
    indexer.advance(Step::Sixth);
    indexer.command(&mut pkt);
    hub.apply(&pkt);
    if !hub::wait_until(hub, config.auto.settle_timeout(), |s| !s.indexer_busy) {
        log::warn!("spindexer did not settle before the kick");
    }
    sleep(Duration::from_millis(200));

    log::info!("kicking");
    pkt.set_kickers(config.auto.kicker_extended);
    hub.apply(&pkt);
    sleep(config.auto.kick());

    log::info!("resetting kicker");
    pkt.set_kickers(config.shooter.kicker_retracted);
    hub.apply(&pkt);
    sleep(config.auto.reset());

    pkt.set_flywheels(0.0);
    hub.apply(&pkt);
    log::info!("done");
}

fn drive_for(
    hub: &mut dyn Hub,
    drivebase: &Drivebase,
    pkt: &mut HubCommand,
    [forward, strafe, rotate]: [f64; 3],
    millis: u64,
) {
    drivebase.write_powers(forward, strafe, rotate, pkt);
    hub.apply(pkt);
    sleep(Duration::from_millis(millis));
    drivebase.write_powers(0.0, 0.0, 0.0, pkt);
    hub.apply(pkt);
}

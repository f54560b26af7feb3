use std::time::{Duration, Instant};

mod config;
mod controller;
mod drivebase;
mod hub;
mod indexer;
mod intake;
mod shooter;

use config::RobotConfig;
use controller::{button, Gamepads};
use drivebase::Drivebase;
use hub::{BenchHub, Hub, HubCommand};
use indexer::{Spindexer, Step};
use intake::{IntakeSequencer, ManualIntake};
use shooter::ShootSequencer;

const MATCH_TIME: Duration = Duration::from_secs(120);
const BENCH_SEEK_RATE: i32 = 200;

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let config = RobotConfig::load()?;
    let mut hub = BenchHub::new(MATCH_TIME, BENCH_SEEK_RATE);
    run(&mut hub, &config);
    Ok(())
}

fn run(hub: &mut dyn Hub, config: &RobotConfig) {
    let drivebase = Drivebase::new(config.drive.reversed);
    let mut pads = Gamepads::default();
    let mut indexer = Spindexer::new(&config.indexer);
    let now = Instant::now();
    let mut shooter = ShootSequencer::new(&config.shooter, now);
    let mut intake = IntakeSequencer::new(&config.intake, now);
    let mut pkt = HubCommand::default();

    // re-zero the spindexer encoder and park the kickers before the match
    pkt.reset_indexer = true;
    pkt.set_kickers(config.shooter.kicker_retracted);
    indexer.command(&mut pkt);
    hub.apply(&pkt);
    pkt.reset_indexer = false;
    log::info!("driver control ready");

    while hub.active() {
        let state = hub.poll();
        pads.update(&state);
        let now = Instant::now();

        // drive: left stick translates, right stick rotates
        drivebase.write_powers(
            -pads.driver.ly(),
            pads.driver.lx(),
            pads.driver.rx(),
            &mut pkt,
        );

        // bumpers run the intake, B stops it; any of them overrides the
        // automated load cycle
        let manual = if pads.driver.held(button::RIGHT_BUMPER) {
            Some(ManualIntake::Forward)
        } else if pads.driver.held(button::LEFT_BUMPER) {
            Some(ManualIntake::Reverse)
        } else if pads.driver.held(button::B) {
            Some(ManualIntake::Stop)
        } else {
            None
        };

        // manual spindexer nudge and re-zero
        if pads.driver.pressed(button::Y) {
            indexer.advance(Step::Third);
            indexer.command(&mut pkt);
        }
        if pads.operator.pressed(button::X) {
            indexer.zero_to(state.indexer_ticks);
            indexer.command(&mut pkt);
            log::info!("spindexer target re-zeroed to {}", state.indexer_ticks);
        }

        let load = pads.operator.pressed(button::A) && intake.idle();
        intake.update(now, load, manual, &mut indexer, &mut pkt);

        let fire = pads.driver.pressed(button::A) && shooter.idle();
        shooter.update(now, fire, &mut indexer, &mut pkt);

        hub.telemetry(&[
            ("Kick State", format!("{:?}", shooter.state())),
            ("Intake State", format!("{:?}", intake.state())),
            ("Spindexer Target", indexer.target().to_string()),
            ("Spindexer Ticks", state.indexer_ticks.to_string()),
        ]);
        hub.apply(&pkt);
        std::thread::sleep(hub::CYCLE);
    }
}

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{ensure, Context};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RobotConfig {
    pub drive: DriveConfig,
    pub indexer: IndexerConfig,
    pub intake: IntakeConfig,
    pub shooter: ShooterConfig,
    pub auto: AutoConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DriveConfig {
    // wheel order: left front, left back, right front, right back
    pub reversed: [bool; 4],
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexerConfig {
    pub ticks_per_rev: i32,
    pub seek_power: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntakeConfig {
    pub power: f64,
    pub index_wait_secs: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShooterConfig {
    pub flywheel_power: f64,
    pub spinup_secs: f64,
    pub kick_secs: f64,
    pub retract_secs: f64,
    pub kicker_retracted: f64,
    pub kicker_extended: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutoConfig {
    pub drive_power: f64,
    pub forward_millis: u64,
    pub strafe_millis: u64,
    pub spinup_secs: f64,
    pub kick_secs: f64,
    pub reset_secs: f64,
    pub kicker_extended: f64,
    pub settle_timeout_secs: f64,
}

impl RobotConfig {
    pub fn load() -> anyhow::Result<Self> {
        let config = if Path::new("robot.toml").exists() {
            let content = fs::read_to_string("robot.toml")?;
            let config: RobotConfig =
                toml::from_str(&content).context("failed to parse robot.toml")?;
            log::info!("loaded configuration from robot.toml");
            config
        } else {
            let config: RobotConfig = toml::from_str(include_str!("../robot.toml"))
                .context("failed to parse built-in robot.toml")?;
            log::warn!("no robot.toml found, using built-in configuration");
            config
        };
        config.validate()?;
        Ok(config)
    }

    // Bad constants abort here instead of surfacing mid-match.
    fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.indexer.ticks_per_rev > 0,
            "indexer.ticks_per_rev must be positive"
        );
        unit_power("indexer.seek_power", self.indexer.seek_power)?;
        unit_power("intake.power", self.intake.power)?;
        unit_power("shooter.flywheel_power", self.shooter.flywheel_power)?;
        unit_power("auto.drive_power", self.auto.drive_power)?;
        dwell("intake.index_wait_secs", self.intake.index_wait_secs)?;
        dwell("shooter.spinup_secs", self.shooter.spinup_secs)?;
        dwell("shooter.kick_secs", self.shooter.kick_secs)?;
        dwell("shooter.retract_secs", self.shooter.retract_secs)?;
        dwell("auto.spinup_secs", self.auto.spinup_secs)?;
        dwell("auto.kick_secs", self.auto.kick_secs)?;
        dwell("auto.reset_secs", self.auto.reset_secs)?;
        dwell("auto.settle_timeout_secs", self.auto.settle_timeout_secs)?;
        servo_pos("shooter.kicker_retracted", self.shooter.kicker_retracted)?;
        servo_pos("shooter.kicker_extended", self.shooter.kicker_extended)?;
        servo_pos("auto.kicker_extended", self.auto.kicker_extended)?;
        Ok(())
    }
}

impl IntakeConfig {
    pub fn index_wait(&self) -> Duration {
        Duration::from_secs_f64(self.index_wait_secs)
    }
}

impl ShooterConfig {
    pub fn spinup(&self) -> Duration {
        Duration::from_secs_f64(self.spinup_secs)
    }
    pub fn kick(&self) -> Duration {
        Duration::from_secs_f64(self.kick_secs)
    }
    pub fn retract(&self) -> Duration {
        Duration::from_secs_f64(self.retract_secs)
    }
}

impl AutoConfig {
    pub fn spinup(&self) -> Duration {
        Duration::from_secs_f64(self.spinup_secs)
    }
    pub fn kick(&self) -> Duration {
        Duration::from_secs_f64(self.kick_secs)
    }
    pub fn reset(&self) -> Duration {
        Duration::from_secs_f64(self.reset_secs)
    }
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_secs_f64(self.settle_timeout_secs)
    }
}

fn dwell(name: &str, secs: f64) -> anyhow::Result<()> {
    ensure!(
        secs.is_finite() && secs > 0.0,
        "{name} must be a positive number of seconds, got {secs}"
    );
    Ok(())
}

fn servo_pos(name: &str, pos: f64) -> anyhow::Result<()> {
    ensure!(
        (0.0..=1.0).contains(&pos),
        "{name} must be a servo position in [0, 1], got {pos}"
    );
    Ok(())
}

fn unit_power(name: &str, power: f64) -> anyhow::Result<()> {
    ensure!(
        (0.0..=1.0).contains(&power) && power > 0.0,
        "{name} must be a motor power in (0, 1], got {power}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> RobotConfig {
        toml::from_str(include_str!("../robot.toml")).unwrap()
    }

    #[test]
    fn builtin_config_is_valid() {
        builtin().validate().unwrap();
    }

    #[test]
    fn rejects_negative_dwell() {
        let mut config = builtin();
        config.shooter.kick_secs = -0.2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_nan_dwell() {
        let mut config = builtin();
        config.intake.index_wait_secs = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_servo_position() {
        let mut config = builtin();
        config.shooter.kicker_extended = 1.3;
        assert!(config.validate().is_err());
    }
}

use crate::hub::HubCommand;

/// Mecanum chassis. Wheel order everywhere is left front, left back,
/// right front, right back.
pub struct Drivebase {
    reversed: [bool; 4],
}

impl Drivebase {
    pub fn new(reversed: [bool; 4]) -> Self {
        Self { reversed }
    }

    /// Mix three stick axes into four wheel powers and write them into the
    /// command packet, applying the per-wheel mounting direction.
    pub fn write_powers(&self, forward: f64, strafe: f64, rotate: f64, pkt: &mut HubCommand) {
        let powers = mix(forward, strafe, rotate);
        for (power, (out, rev)) in powers
            .iter()
            .zip(pkt.drive.iter_mut().zip(self.reversed.iter()))
        {
            *out = if *rev { -*power } else { *power };
        }
    }
}

/// Standard mecanum mixing. Normalized by the peak magnitude so ratios
/// between wheels survive saturation, then clipped to motor range.
pub fn mix(forward: f64, strafe: f64, rotate: f64) -> [f64; 4] {
    let mut powers = [
        forward + strafe + rotate,
        forward - strafe + rotate,
        forward - strafe - rotate,
        forward + strafe - rotate,
    ];

    let max = powers.iter().fold(0.0f64, |max, p| max.max(p.abs()));
    if max > 1.0 {
        for power in &mut powers {
            *power /= max;
        }
    }
    powers.map(|p| p.clamp(-1.0, 1.0))
}

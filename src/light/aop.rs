use uom::si::{angle::degree, f64::Angle};

/// Period of a polarization angle in degrees.
const HALF_TURN_DEG: f64 = 180.0;

/// Largest jump allowed between adjacent unwrapped angles in degrees.
const QUARTER_TURN_DEG: f64 = 90.0;

/// Wraps `angle` into -90 to 90 degrees.
///
/// Angles that already lie within the range are returned unchanged.
pub fn wrap_half_turn(angle: Angle) -> Angle {
    let deg = angle.get::<degree>();
    if (-QUARTER_TURN_DEG..=QUARTER_TURN_DEG).contains(&deg) {
        return angle;
    }

    Angle::new::<degree>((deg + QUARTER_TURN_DEG).rem_euclid(HALF_TURN_DEG) - QUARTER_TURN_DEG)
}

/// Makes a sequence of per-bin angles in degrees continuous across the grid.
///
/// Bins are walked from the highest energy down. Each bin is shifted by whole
/// half turns until it lies within a quarter turn of its already processed
/// higher-energy neighbour. Afterwards the whole sequence is moved by one
/// half turn if the midpoint of its range lies beyond +/- 90 degrees.
pub fn unwrap_angles(angles: &mut [f64]) {
    let Some((min, max)) = unwrap_descending(angles) else {
        return;
    };

    let shift = if max + min > HALF_TURN_DEG {
        -HALF_TURN_DEG
    } else if max + min < -HALF_TURN_DEG {
        HALF_TURN_DEG
    } else {
        return;
    };

    angles.iter_mut().for_each(|angle| *angle += shift);
}

/// Returns the range of the unwrapped sequence, or `None` if it is empty.
fn unwrap_descending(angles: &mut [f64]) -> Option<(f64, f64)> {
    let last = angles.len().checked_sub(1)?;
    let mut min = angles[last];
    let mut max = angles[last];

    for i in (0..last).rev() {
        let next = angles[i + 1];

        // Non-finite values would never settle.
        if angles[i].is_finite() && next.is_finite() {
            while angles[i] - next > QUARTER_TURN_DEG {
                angles[i] -= HALF_TURN_DEG;
            }
            while next - angles[i] > QUARTER_TURN_DEG {
                angles[i] += HALF_TURN_DEG;
            }
        }

        min = min.min(angles[i]);
        max = max.max(angles[i]);
    }

    Some((min, max))
}

use crate::layout::GAME_SCALE;

/// Clock text shown before the first click.
pub const CLOCK_ZERO: &str = "00:00:00";

/// Header font size in pixels
pub const HUD_FONT_SIZE: f64 = 22.0;

/// Left-pad values below ten with a single zero, larger values are printed as they are.
pub fn pad2(value: u64) -> String {
    if value < 10 {
        format!("0{value}")
    } else {
        value.to_string()
    }
}

/// `MM:SS:HH` from hundredths of a second, minutes keep growing past 99.
pub fn format_clock(hundredths: u64) -> String {
    let hundreds = hundredths % 100;
    let total_secs = hundredths / 100;
    let seconds = total_secs % 60;
    let minutes = total_secs / 60;
    format!("{}:{}:{}", pad2(minutes), pad2(seconds), pad2(hundreds))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HudSlot {
    Name,
    TimeLabel,
    Time,
    RoundLabel,
    Round,
}

impl HudSlot {
    pub const ALL: [HudSlot; 5] = [
        HudSlot::Name,
        HudSlot::TimeLabel,
        HudSlot::Time,
        HudSlot::RoundLabel,
        HudSlot::Round,
    ];

    /// Canvas position of the label's top-left corner.
    pub fn position(self) -> (f64, f64) {
        use HudSlot::*;
        let x = match self {
            Name => 20.0,
            TimeLabel => 260.0,
            Time => 360.0,
            RoundLabel => 610.0,
            Round => 730.0,
        };
        (x * GAME_SCALE, 20.0 * GAME_SCALE)
    }
}

/// Texts of the header, rebuilt on every redraw
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudText {
    pub name: String,
    pub time_label: String,
    pub time: String,
    pub round_label: String,
    pub round: String,
}

impl HudText {
    pub fn text(&self, slot: HudSlot) -> &str {
        use HudSlot::*;
        match slot {
            Name => &self.name,
            TimeLabel => &self.time_label,
            Time => &self.time,
            RoundLabel => &self.round_label,
            Round => &self.round,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (HudSlot, &str)> {
        HudSlot::ALL.into_iter().map(|slot| (slot, self.text(slot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad2_pads_single_digits_only() {
        assert_eq!(pad2(0), "00");
        assert_eq!(pad2(9), "09");
        assert_eq!(pad2(10), "10");
        assert_eq!(pad2(123), "123");
    }

    #[test]
    fn clock_splits_minutes_seconds_hundredths() {
        assert_eq!(format_clock(0), CLOCK_ZERO);
        assert_eq!(format_clock(5), "00:00:05");
        assert_eq!(format_clock(1_234), "00:12:34");
        assert_eq!(format_clock(6_000), "01:00:00");
        assert_eq!(format_clock(65_432), "10:54:32");
        assert_eq!(format_clock(600_000), "100:00:00");
    }

    #[test]
    fn header_slots_are_left_to_right() {
        let xs: Vec<f64> = HudSlot::ALL.iter().map(|slot| slot.position().0).collect();
        assert!(xs.windows(2).all(|pair| pair[0] < pair[1]));
        assert!((HudSlot::Round.position().0 - 657.0).abs() < 1e-9);
    }
}

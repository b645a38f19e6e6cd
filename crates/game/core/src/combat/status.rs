/// Low-health narration bands, ordered by severity.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum HealthBand {
    Steady,
    /// At or below 40% of maximum.
    Winded,
    /// At or below 10%: about to fall.
    Faltering,
    /// Nothing left.
    Collapsed,
}

impl HealthBand {
    /// Band for `health` out of `max`, most severe first.
    pub fn of(health: u32, max: u32) -> Self {
        if health == 0 {
            return Self::Collapsed;
        }
        if max == 0 {
            return Self::Steady;
        }
        let (scaled, max) = (u64::from(health) * 100, u64::from(max));
        if scaled <= max * 10 {
            Self::Faltering
        } else if scaled <= max * 40 {
            Self::Winded
        } else {
            Self::Steady
        }
    }

    /// The band to announce after health moved from `before` to `after`:
    /// only a strictly more severe band is worth a line.
    pub fn crossed(before: u32, after: u32, max: u32) -> Option<Self> {
        let (old, new) = (Self::of(before, max), Self::of(after, max));
        (new > old).then_some(new)
    }
}

use serde::{Deserialize, Serialize};

const DEFAULT_MIN_PARTICIPANTES: usize = 4;
const DEFAULT_MAX_PARTICIPANTES: usize = 10;

/// Per-meeting configuration row. Its bounds override the application default
/// for submissions that name it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EncuentroConfig {
    pub id: i64,
    pub nombre: String,
    pub min_participantes: i32,
    pub max_participantes: i32,
}

/// Inclusive participant-count range an acta must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParticipantBounds {
    pub min: usize,
    pub max: usize,
}

impl Default for ParticipantBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_PARTICIPANTES,
            max: DEFAULT_MAX_PARTICIPANTES,
        }
    }
}

impl ParticipantBounds {
    pub fn new(min: usize, max: usize) -> Result<Self, String> {
        if min == 0 {
            return Err("PARTICIPANTES_MIN must be at least 1".to_string());
        }
        if min > max {
            return Err(format!(
                "PARTICIPANTES_MIN ({min}) must not exceed PARTICIPANTES_MAX ({max})"
            ));
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, count: usize) -> bool {
        (self.min..=self.max).contains(&count)
    }
}

impl From<&EncuentroConfig> for ParticipantBounds {
    /// The table CHECK keeps `1 <= min <= max`; negative values clamp to zero.
    fn from(config: &EncuentroConfig) -> Self {
        Self {
            min: usize::try_from(config.min_participantes).unwrap_or(0),
            max: usize::try_from(config.max_participantes).unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds_are_four_to_ten() {
        let b = ParticipantBounds::default();
        assert!(!b.contains(3));
        assert!(b.contains(4));
        assert!(b.contains(10));
        assert!(!b.contains(11));
    }

    #[test]
    fn new_rejects_zero_and_inverted() {
        assert!(ParticipantBounds::new(0, 5).is_err());
        assert!(ParticipantBounds::new(6, 5).is_err());
        assert_eq!(ParticipantBounds::new(5, 5).unwrap().max, 5);
    }

    #[test]
    fn bounds_from_config() {
        let cfg = EncuentroConfig {
            id: 2,
            nombre: "Cabildo Provincial".to_string(),
            min_participantes: 7,
            max_participantes: 50,
        };
        let b = ParticipantBounds::from(&cfg);
        assert_eq!(b, ParticipantBounds { min: 7, max: 50 });
    }
}

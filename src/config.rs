//! MCTS configuration parameters.

use crate::mcts::SearchError;

/// Configuration for one Monte Carlo tree search.
#[derive(Debug, Clone, PartialEq)]
pub struct MctsConfig {
    /// Simulations per search. This is the only thing bounding a search.
    pub simulations: u32,

    /// Weight of the prior-driven exploration term in the PUCT score.
    pub c_puct: f64,

    /// Root policy temperature: visit counts are raised to `1 / temperature`.
    /// `1.0` is proportional to visits, `0.0` puts all mass on the most visited move.
    pub temperature: f64,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            simulations: 100,
            c_puct: 1.0,
            temperature: 1.0,
        }
    }
}

impl MctsConfig {
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.simulations = n;
        self
    }

    pub fn with_c_puct(mut self, c: f64) -> Self {
        self.c_puct = c;
        self
    }

    pub fn with_temperature(mut self, t: f64) -> Self {
        self.temperature = t;
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.simulations == 0 {
            return Err(SearchError::InvalidConfig(
                "at least one simulation is required".to_string(),
            ));
        }
        if !self.c_puct.is_finite() || self.c_puct < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "c_puct must be finite and non-negative, got {}",
                self.c_puct
            )));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "temperature must be finite and non-negative, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = MctsConfig::default();
        assert_eq!(config.simulations, 100);
        assert!((config.c_puct - 1.0).abs() < 1e-12);
        assert!((config.temperature - 1.0).abs() < 1e-12);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_pattern() {
        let config = MctsConfig::default()
            .with_simulations(400)
            .with_c_puct(1.5)
            .with_temperature(0.5);

        assert_eq!(config.simulations, 400);
        assert!((config.c_puct - 1.5).abs() < 1e-12);
        assert!((config.temperature - 0.5).abs() < 1e-12);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(MctsConfig::default().with_simulations(0).validate().is_err());
        assert!(MctsConfig::default().with_c_puct(f64::NAN).validate().is_err());
        assert!(MctsConfig::default().with_temperature(-1.0).validate().is_err());
        assert!(MctsConfig::default().with_temperature(0.0).validate().is_ok());
    }
}

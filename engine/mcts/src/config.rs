//! UCT search configuration parameters.

/// Configuration for UCT Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct UctConfig {
    /// Number of select/expand/simulate/backpropagate iterations per decision.
    /// Must be at least 1.
    pub num_simulations: u32,

    /// Factor under the square root of the exploration term:
    /// `sqrt(exploration * ln(N_parent) / N_child)`.
    /// 2.0 gives the classic UCB1 bound.
    pub exploration: f64,
}

impl Default for UctConfig {
    fn default() -> Self {
        Self {
            num_simulations: 1000,
            exploration: 2.0,
        }
    }
}

impl UctConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            num_simulations: 100,
            exploration: 2.0,
        }
    }

    /// Builder pattern: set number of simulations.
    pub fn with_simulations(mut self, n: u32) -> Self {
        self.num_simulations = n;
        self
    }

    /// Builder pattern: set the exploration factor.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Reject budgets and exploration factors the search cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.num_simulations == 0 {
            return Err("num_simulations must be at least 1".to_string());
        }
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(format!(
                "exploration must be a finite non-negative number, got {}",
                self.exploration
            ));
        }
        Ok(())
    }
}

use super::propagation_states::PropagationState;
use crate::errors::PropagationError;

/// Lifecycle of a single propagation: Configured -> Running -> Complete.
#[derive(Debug)]
pub struct PropagationFsm {
    current_state: PropagationState,
}

impl PropagationFsm {
    pub fn new() -> Self {
        Self {
            current_state: PropagationState::Configured,
        }
    }

    pub fn get_current_state(&self) -> PropagationState {
        self.current_state
    }

    fn transition_to(&mut self, new_state: PropagationState) {
        if self.current_state != new_state {
            log::debug!("Propagation state transition: {} -> {}", self.current_state, new_state);
            self.current_state = new_state;
        }
    }

    /// Moves to Running. Only allowed once, from Configured.
    pub fn start(&mut self) -> Result<(), PropagationError> {
        match self.current_state {
            PropagationState::Configured => {
                self.transition_to(PropagationState::Running);
                Ok(())
            }
            state => Err(PropagationError::Reinvocation(state)),
        }
    }

    pub fn finish(&mut self) {
        self.transition_to(PropagationState::Complete);
    }
}

impl Default for PropagationFsm {
    fn default() -> Self {
        Self::new()
    }
}

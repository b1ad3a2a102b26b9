use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationState {
    Configured,
    Running,
    Complete,
}

impl fmt::Display for PropagationState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PropagationState::Configured => write!(f, "Configured"),
            PropagationState::Running => write!(f, "Running"),
            PropagationState::Complete => write!(f, "Complete"),
        }
    }
}

pub mod propagation_states;
pub mod state_machine;

/// State management module
///
/// This module handles the picker session state, including:
/// - The coordinator tying image, selection and preview together (coordinator.rs)
/// - Preview and thumbnail derivation (derive.rs)
/// - The outcome reported back to the host (outcome.rs)

pub mod coordinator;
pub mod derive;
pub mod outcome;

// Application layer - Use case interactors

pub mod batch_interactor;
pub mod container;
pub mod cut_executor;

// Re-export interactors
pub use batch_interactor::{BatchInteractor, PlannedCut};
pub use container::{AppContainer, DefaultAppContainer};
pub use cut_executor::{CutExecutor, CutOutcome};

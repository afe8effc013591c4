pub mod enumerator;
pub mod estimator;
pub mod game;
pub mod registries;
pub mod sim;
pub mod value;

pub use enumerator::CandidateEnumerator;
pub use estimator::Estimator;
pub use game::GameState;
pub use registries::Registries;
pub use sim::GameSim;
pub use value::ValueModel;

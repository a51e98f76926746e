pub mod game;
pub mod reward;
pub mod schedule;
pub mod validator;

pub use tourney_distribution as distribution;

pub mod cache;
pub mod errors;
pub mod ledger;
pub mod levels;
pub mod models;
pub mod repo;
pub mod streak;
pub mod xp;

pub use cache::*;
pub use errors::*;
pub use ledger::*;
pub use levels::*;
pub use models::*;
pub use repo::*;
pub use streak::*;
pub use xp::*;

pub mod club;
pub mod results;
pub mod server;

pub use club::{Club, MemberDirectory, SyncReport};
pub use results::{MatchOutcome, TrainingResults};
pub use server::ServerService;

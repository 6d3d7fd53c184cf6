pub mod athlete;
pub mod club;
pub mod ruleset;
pub mod tournament;

pub use athlete::AthleteRepository;
pub use club::ClubRepository;
pub use ruleset::{NewRuleset, RulesetRepository};
pub use tournament::{NewTournament, TournamentRepository};

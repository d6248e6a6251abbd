// Stats aggregation and ranking
pub mod leaderboard;
pub mod normalizer;
pub mod player_stats;
pub mod ranking;
pub mod time_aggregator;

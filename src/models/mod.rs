pub mod leaderboard;
pub mod period;

pub mod dashboard;
pub mod high_scores;
pub mod stats_sidebar;
pub mod typing_area;

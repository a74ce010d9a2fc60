use std::time::{Duration, Instant};

use crate::game::{MoveOutcome, StepResult};

/// Per-process play statistics. Nothing here outlives the process.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    /// Paths computed during the current run
    pub paths_computed: u32,
    /// Whether the run clock is ticking
    running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            paths_computed: 0,
            running: false,
        }
    }

    /// Refresh the run clock; frozen while no run is in progress
    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.paths_computed = 0;
        self.running = true;
    }

    pub fn on_step(&mut self, result: &StepResult) {
        if result.path_recomputed {
            self.paths_computed += 1;
        }
    }

    pub fn on_game_over(&mut self, final_score: u32, outcome: MoveOutcome) {
        self.update();
        self.running = false;
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
        tracing::info!(
            final_score,
            %outcome,
            high_score = self.high_score,
            games_played = self.games_played,
            paths = self.paths_computed,
            "run finished"
        );
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

use fw_sim::{RunMode, SimProgress};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    Simulating,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            RunStage::Simulating => "simulating",
            RunStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub mode: RunMode,
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub sim: Option<SimProgress>,
}

impl RunProgressEvent {
    pub fn stage(mode: RunMode, stage: RunStage, elapsed_wall_s: f64) -> Self {
        Self {
            mode,
            stage,
            elapsed_wall_s,
            sim: None,
        }
    }

    /// Fraction of the step budget executed; 1 once completed.
    pub fn fraction_complete(&self) -> f64 {
        match (&self.stage, &self.sim) {
            (RunStage::Completed, _) => 1.0,
            (_, Some(p)) => p.fraction_complete,
            _ => 0.0,
        }
    }
}

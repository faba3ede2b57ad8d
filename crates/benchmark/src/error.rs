use thiserror::Error;

#[derive(Error, Debug)]
pub enum BenchmarkError {
    #[error("A benchmark needs between 1 and {max} runs, got {0}", max = u32::MAX)]
    InvalidRuns(usize),

    #[error("Progress bar template error: {0}")]
    ProgressBarTemplate(String),
}

impl From<indicatif::style::TemplateError> for BenchmarkError {
    fn from(error: indicatif::style::TemplateError) -> Self {
        BenchmarkError::ProgressBarTemplate(error.to_string())
    }
}

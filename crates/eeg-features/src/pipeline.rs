//! Ordered step pipeline over an owned copy of the input
//!
//! A [`Pipeline`] is a named list of fallible transformations. Running it
//! clones the input once, feeds every step the previous step's output and
//! stops at the first failure, handing that step's error back unchanged.

use eeg_core::FeatureResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;
use tracing::{debug, warn};

/// Boxed pipeline step
pub type StepFn<T> = Box<dyn Fn(T) -> FeatureResult<T> + Send + Sync>;

struct Step<T> {
    name: String,
    apply: StepFn<T>,
}

/// Processing pipeline that chains named steps
pub struct Pipeline<T> {
    name: String,
    steps: Vec<Step<T>>,
}

/// Timing of one executed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepMetrics {
    pub name: String,
    /// Wall-clock time spent in the step, in microseconds
    pub processing_time_us: u64,
}

/// Pipeline execution result
#[derive(Debug, Clone)]
pub struct PipelineOutput<T> {
    pub output: T,
    pub step_metrics: Vec<StepMetrics>,
    pub total_latency_us: u64,
}

impl<T: Clone> Pipeline<T> {
    /// Create new empty pipeline
    pub fn new(name: &str) -> Self {
        Pipeline {
            name: name.to_string(),
            steps: Vec::new(),
        }
    }

    /// Append a step to the end of the pipeline
    pub fn add_step<F>(&mut self, name: &str, step: F)
    where
        F: Fn(T) -> FeatureResult<T> + Send + Sync + 'static,
    {
        self.steps.push(Step {
            name: name.to_string(),
            apply: Box::new(step),
        });
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in execution order
    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|step| step.name.as_str()).collect()
    }

    /// Run every step in order on a copy of `input`
    pub fn forward(&self, input: &T) -> FeatureResult<PipelineOutput<T>> {
        let start_time = Instant::now();
        let mut current = input.clone();
        let mut step_metrics = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let step_start = Instant::now();

            current = (step.apply)(current).map_err(|e| {
                warn!(pipeline = %self.name, step = %step.name, error = %e, "Pipeline step failed");
                e
            })?;

            let processing_time_us = step_start.elapsed().as_micros() as u64;
            debug!(pipeline = %self.name, step = %step.name, processing_time_us, "Pipeline step done");
            step_metrics.push(StepMetrics {
                name: step.name.clone(),
                processing_time_us,
            });
        }

        Ok(PipelineOutput {
            output: current,
            step_metrics,
            total_latency_us: start_time.elapsed().as_micros() as u64,
        })
    }
}

impl<T> fmt::Debug for Pipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("steps", &self.steps.iter().map(|s| s.name.as_str()).collect::<Vec<_>>())
            .finish()
    }
}

/// Pipeline builder for constructing step chains
pub struct PipelineBuilder<T> {
    pipeline: Pipeline<T>,
}

impl<T: Clone> PipelineBuilder<T> {
    /// Create new pipeline builder
    pub fn new(name: &str) -> Self {
        PipelineBuilder {
            pipeline: Pipeline::new(name),
        }
    }

    /// Add a named step
    pub fn step<F>(mut self, name: &str, step: F) -> Self
    where
        F: Fn(T) -> FeatureResult<T> + Send + Sync + 'static,
    {
        self.pipeline.add_step(name, step);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline<T> {
        self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eeg_core::FeatureError;
    use ndarray::{Array2, Axis};

    #[test]
    fn test_pipeline_builder() {
        let pipeline = PipelineBuilder::<i64>::new("Test Pipeline")
            .step("double", |x| Ok(x * 2))
            .step("increment", |x| Ok(x + 1))
            .build();

        assert_eq!(pipeline.len(), 2);
        assert_eq!(pipeline.name(), "Test Pipeline");
        assert_eq!(pipeline.step_names(), vec!["double", "increment"]);
    }

    #[test]
    fn test_steps_run_in_order() {
        let pipeline = PipelineBuilder::<i64>::new("order")
            .step("double", |x| Ok(x * 2))
            .step("increment", |x| Ok(x + 1))
            .build();

        let result = pipeline.forward(&5).unwrap();
        assert_eq!(result.output, 11);
        assert_eq!(result.step_metrics.len(), 2);
        assert_eq!(result.step_metrics[1].name, "increment");
    }

    #[test]
    fn test_empty_pipeline_returns_copy() {
        let pipeline: Pipeline<Vec<f64>> = Pipeline::new("empty");
        let input = vec![1.0, 2.0, 3.0];

        let result = pipeline.forward(&input).unwrap();
        assert!(pipeline.is_empty());
        assert_eq!(result.output, input);
        assert!(result.step_metrics.is_empty());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let pipeline = PipelineBuilder::<Array2<f64>>::new("demean")
            .step("remove channel mean", |mut signal| {
                for mut row in signal.axis_iter_mut(Axis(0)) {
                    let mean = row.sum() / row.len() as f64;
                    row.mapv_inplace(|x| x - mean);
                }
                Ok(signal)
            })
            .build();

        let input = Array2::from_shape_fn((2, 4), |(c, i)| (c * 10 + i) as f64);
        let result = pipeline.forward(&input).unwrap();

        assert_eq!(input[[1, 0]], 10.0);
        assert!(result.output.row(1).sum().abs() < 1e-12);
    }

    #[test]
    fn test_first_error_stops_pipeline() {
        let pipeline = PipelineBuilder::<i64>::new("failing")
            .step("ok", |x| Ok(x + 1))
            .step("fail", |_| Err(FeatureError::config("step rejected input")))
            .step("unreachable", |_| panic!("must not run"))
            .build();

        let err = pipeline.forward(&0).unwrap_err();
        assert_eq!(err, FeatureError::config("step rejected input"));
    }

    #[test]
    fn test_debug_lists_steps() {
        let mut pipeline: Pipeline<i64> = Pipeline::new("dbg");
        pipeline.add_step("noop", Ok);
        let debug = format!("{:?}", pipeline);
        assert!(debug.contains("dbg"));
        assert!(debug.contains("noop"));
    }
}

//! Ordered chain of batch transforms

use super::{BatchTransform, SchemaAware};
use crate::batch::Batch;
use crate::error::Result;
use crate::schema::Schema;
use tracing::debug;

/// Applies its stages in insertion order, feeding each stage the previous
/// stage's output.
#[derive(Default)]
pub struct SequencePipeline {
    stages: Vec<Box<dyn BatchTransform>>,
}

impl SequencePipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stage: impl BatchTransform + 'static) {
        self.stages.push(Box::new(stage));
    }

    pub fn with_stage(mut self, stage: impl BatchTransform + 'static) -> Self {
        self.push(stage);
        self
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Stage names in application order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl std::fmt::Debug for SequencePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SequencePipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl SchemaAware for SequencePipeline {
    fn initialize_from_schema(&mut self, schema: &Schema) -> Result<()> {
        for stage in &mut self.stages {
            stage.initialize_from_schema(schema)?;
        }
        Ok(())
    }
}

impl BatchTransform for SequencePipeline {
    fn transform(&self, batch: &Batch) -> Result<Batch> {
        let mut current = batch.clone();
        for stage in &self.stages {
            debug!(stage = stage.name(), "applying transform");
            current = stage.transform(&current)?;
        }
        Ok(current)
    }

    fn name(&self) -> &'static str {
        "sequence_pipeline"
    }
}

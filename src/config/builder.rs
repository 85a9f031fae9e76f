//! Build transforms from configuration

use super::schema::{BroadcastSpec, TransformSpec};
use crate::error::Result;
use crate::transforms::{BroadcastToSequence, SchemaAware, SequencePipeline, TabularPadding};
use tracing::debug;

impl TransformSpec {
    /// Padding transform initialized against the spec's schema.
    pub fn build_padding(&self) -> Result<TabularPadding> {
        let mut padding = TabularPadding::new()
            .with_selection(self.padding.sequence.clone())
            .with_pad_value(self.padding.pad_value);
        if let Some(max_len) = self.padding.max_sequence_length {
            padding = padding.with_max_sequence_length(max_len);
        }
        padding.initialize_from_schema(&self.schema)?;
        Ok(padding)
    }

    /// Broadcast transform initialized against the spec's schema, if one is
    /// configured.
    pub fn build_broadcast(&self) -> Result<Option<BroadcastToSequence>> {
        self.broadcast.as_ref().map(|spec| build_broadcast(spec, self)).transpose()
    }

    /// Padding followed by the optional broadcast.
    pub fn build_pipeline(&self) -> Result<SequencePipeline> {
        let mut pipeline = SequencePipeline::new().with_stage(self.build_padding()?);
        if let Some(broadcast) = self.build_broadcast()? {
            pipeline.push(broadcast);
        }
        debug!(stages = ?pipeline.stage_names(), "built transform pipeline");
        Ok(pipeline)
    }
}

fn build_broadcast(spec: &BroadcastSpec, transform: &TransformSpec) -> Result<BroadcastToSequence> {
    let mut broadcast = BroadcastToSequence::new(spec.to_broadcast.clone(), spec.sequence.clone());
    broadcast.initialize_from_schema(&transform.schema)?;
    Ok(broadcast)
}

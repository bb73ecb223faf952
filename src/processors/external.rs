//! External nodes: delegate to an injected [`ExternalNodeProcessor`].
//!
//! Fails closed. A missing implementation, a reported failure, or an output
//! stamped in the future surfaces as `ProcessorError`; there is no fallback
//! value.

use ssz_rs::prelude::*;

use crate::error::{ProcessingError, RegistryError};
use crate::processors::ProcessorTable;
use crate::types::{NodeDefinition, NodeId, NodeOutput, NodeType, ProcessorId};

/// Maximum opaque payload carried by an external node.
pub const MAX_EXTERNAL_PAYLOAD_LEN: usize = 4000;

/// Parameters of an external node.
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct ExternalParams {
    /// Processor reference
    pub processor: [u8; 32],

    /// Opaque payload handed to the processor
    pub payload: List<u8, MAX_EXTERNAL_PAYLOAD_LEN>,
}

impl ExternalParams {
    pub fn new(processor: ProcessorId, payload: Vec<u8>) -> Result<Self, RegistryError> {
        let len = payload.len();
        let payload = List::try_from(payload).map_err(|_| {
            definition_error(format!(
                "payload is {len} bytes, limit is {MAX_EXTERNAL_PAYLOAD_LEN}"
            ))
        })?;

        Ok(Self {
            processor: processor.0,
            payload,
        })
    }

    #[inline]
    pub fn processor_id(&self) -> ProcessorId {
        ProcessorId(self.processor)
    }

    pub fn encode(&self) -> Result<Vec<u8>, RegistryError> {
        ssz_rs::serialize(self).map_err(|e| definition_error(format!("parameter encoding failed: {e:?}")))
    }

    pub fn decode(bytes: &[u8]) -> Option<Self> {
        ssz_rs::deserialize(bytes).ok()
    }
}

impl NodeDefinition {
    /// External node delegating to `processor`, combining `parents` in order.
    pub fn external(
        processor: ProcessorId,
        payload: Vec<u8>,
        parents: Vec<NodeId>,
    ) -> Result<Self, RegistryError> {
        let parameters = ExternalParams::new(processor, payload)?.encode()?;
        Ok(NodeDefinition::new(NodeType::External, parameters, parents))
    }
}

fn definition_error(reason: String) -> RegistryError {
    RegistryError::Definition {
        node_type: NodeType::External.to_u8(),
        reason,
    }
}

pub(crate) fn validate(definition: &NodeDefinition, table: &ProcessorTable) -> bool {
    let Some(params) = ExternalParams::decode(definition.parameters()) else {
        return false;
    };

    match table.external(&params.processor_id()) {
        Some(processor) => processor.validate(definition.parents(), &params.payload[..]),
        None => false,
    }
}

pub(crate) fn process(
    id: NodeId,
    parameters: &[u8],
    parent_outputs: &[NodeOutput],
    table: &ProcessorTable,
    now: u64,
) -> Result<NodeOutput, ProcessingError> {
    let processor_error = |reason: String| ProcessingError::ProcessorError { id, reason };

    let params = ExternalParams::decode(parameters)
        .ok_or_else(|| processor_error("external parameters do not decode".to_string()))?;

    let processor = table.external(&params.processor_id()).ok_or_else(|| {
        processor_error(format!("processor {} is not registered", params.processor_id()))
    })?;

    let output = processor
        .process(parent_outputs, &params.payload[..], now)
        .map_err(|e| processor_error(e.to_string()))?;

    if output.timestamp > now {
        return Err(processor_error(format!(
            "output timestamp {} is ahead of now {}",
            output.timestamp, now
        )));
    }

    Ok(output)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceFailure;
    use crate::processors::ExternalNodeProcessor;
    use rust_decimal::Decimal;
    use std::sync::Arc;

    /// Returns its payload length as the value, or fails on request.
    struct Probe {
        fail: bool,
        timestamp_offset: u64,
    }

    impl ExternalNodeProcessor for Probe {
        fn validate(&self, parents: &[NodeId], _payload: &[u8]) -> bool {
            parents.len() <= 2
        }

        fn process(
            &self,
            _parent_outputs: &[NodeOutput],
            payload: &[u8],
            now: u64,
        ) -> Result<NodeOutput, SourceFailure> {
            if self.fail {
                return Err(SourceFailure::new("probe failure"));
            }
            Ok(NodeOutput::new(
                Decimal::from(payload.len() as u64),
                now + self.timestamp_offset,
            ))
        }
    }

    fn table_with(probe: Probe) -> (ProcessorId, ProcessorTable) {
        let id = ProcessorId::from_label("probe");
        let table = ProcessorTable::builder().with_external(id, Arc::new(probe)).build();
        (id, table)
    }

    #[test]
    fn test_params_roundtrip_and_limit() {
        let params = ExternalParams::new(ProcessorId([1u8; 32]), vec![1, 2, 3]).unwrap();
        let bytes = params.encode().unwrap();
        assert_eq!(ExternalParams::decode(&bytes), Some(params));

        assert!(ExternalParams::new(ProcessorId::NULL, vec![0u8; MAX_EXTERNAL_PAYLOAD_LEN + 1]).is_err());
        assert!(ExternalParams::decode(&[1, 2, 3]).is_none());
    }

    #[test]
    fn test_validate_delegates() {
        let (proc_id, table) = table_with(Probe { fail: false, timestamp_offset: 0 });

        let two = NodeDefinition::external(proc_id, vec![], vec![NodeId([1u8; 32]); 2]).unwrap();
        let three = NodeDefinition::external(proc_id, vec![], vec![NodeId([1u8; 32]); 3]).unwrap();
        assert!(validate(&two, &table));
        assert!(!validate(&three, &table));

        let unregistered = NodeDefinition::external(ProcessorId::from_label("nope"), vec![], vec![]).unwrap();
        assert!(!validate(&unregistered, &table));
    }

    #[test]
    fn test_process_passes_payload() {
        let (proc_id, table) = table_with(Probe { fail: false, timestamp_offset: 0 });
        let def = NodeDefinition::external(proc_id, vec![0u8; 5], vec![]).unwrap();

        let out = process(NodeId::ZERO, def.parameters(), &[], &table, 50).unwrap();
        assert_eq!(out, NodeOutput::new(Decimal::from(5), 50));
    }

    #[test]
    fn test_process_fails_closed() {
        let (proc_id, table) = table_with(Probe { fail: true, timestamp_offset: 0 });
        let def = NodeDefinition::external(proc_id, vec![], vec![]).unwrap();
        let err = process(NodeId::ZERO, def.parameters(), &[], &table, 50).unwrap_err();
        assert_eq!(
            err,
            ProcessingError::ProcessorError {
                id: NodeId::ZERO,
                reason: "probe failure".to_string()
            }
        );

        let (proc_id, table) = table_with(Probe { fail: false, timestamp_offset: 1 });
        let def = NodeDefinition::external(proc_id, vec![], vec![]).unwrap();
        assert!(matches!(
            process(NodeId::ZERO, def.parameters(), &[], &table, 50),
            Err(ProcessingError::ProcessorError { .. })
        ));

        // Processor missing at evaluation time
        let empty = ProcessorTable::default();
        assert!(matches!(
            process(NodeId::ZERO, def.parameters(), &[], &empty, 50),
            Err(ProcessingError::ProcessorError { .. })
        ));
    }
}

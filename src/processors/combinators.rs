//! Ready-made external processors.
//!
//! These plug into the `External` extension point like any third-party
//! processor: register them in the [`ProcessorTable`](crate::processors::ProcessorTable)
//! under a [`ProcessorId`](crate::types::ProcessorId) of your choosing.
//!
//! - [`Passthrough`]: exactly one parent, returned unchanged
//! - [`Reduce`]: folds one or more parents with a [`ReduceOp`]
//!
//! Both expect an empty payload. A reduced output carries the oldest parent
//! timestamp, so downstream staleness checks see the weakest input.

use rust_decimal::Decimal;

use crate::error::SourceFailure;
use crate::processors::ExternalNodeProcessor;
use crate::types::{NodeId, NodeOutput};

/// Identity combinator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl ExternalNodeProcessor for Passthrough {
    fn validate(&self, parents: &[NodeId], payload: &[u8]) -> bool {
        parents.len() == 1 && payload.is_empty()
    }

    fn process(
        &self,
        parent_outputs: &[NodeOutput],
        _payload: &[u8],
        _now: u64,
    ) -> Result<NodeOutput, SourceFailure> {
        match parent_outputs {
            [only] => Ok(*only),
            _ => Err(SourceFailure::new(format!(
                "passthrough expects 1 parent output, got {}",
                parent_outputs.len()
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    Min,
    Max,
    Mean,
    Product,
    /// `first / second`; exactly two parents
    Quotient,
}

/// Folding combinator over parent values.
#[derive(Debug, Clone, Copy)]
pub struct Reduce {
    pub op: ReduceOp,
}

impl Reduce {
    pub fn new(op: ReduceOp) -> Self {
        Self { op }
    }

    fn fold(&self, values: &[Decimal]) -> Result<Decimal, SourceFailure> {
        let overflow = || SourceFailure::new(format!("{:?} overflowed", self.op));

        let (first, rest) = values
            .split_first()
            .ok_or_else(|| SourceFailure::new("reduce needs at least one parent output"))?;

        match self.op {
            ReduceOp::Min => Ok(rest.iter().fold(*first, |acc, v| acc.min(*v))),
            ReduceOp::Max => Ok(rest.iter().fold(*first, |acc, v| acc.max(*v))),
            ReduceOp::Mean => {
                let sum = rest
                    .iter()
                    .try_fold(*first, |acc, v| acc.checked_add(*v))
                    .ok_or_else(overflow)?;
                sum.checked_div(Decimal::from(values.len() as u64))
                    .ok_or_else(overflow)
            }
            ReduceOp::Product => rest
                .iter()
                .try_fold(*first, |acc, v| acc.checked_mul(*v))
                .ok_or_else(overflow),
            ReduceOp::Quotient => match rest {
                [divisor] if divisor.is_zero() => Err(SourceFailure::new("division by zero")),
                [divisor] => first.checked_div(*divisor).ok_or_else(overflow),
                _ => Err(SourceFailure::new("quotient expects exactly 2 parent outputs")),
            },
        }
    }
}

impl ExternalNodeProcessor for Reduce {
    fn validate(&self, parents: &[NodeId], payload: &[u8]) -> bool {
        let arity_ok = match self.op {
            ReduceOp::Quotient => parents.len() == 2,
            _ => !parents.is_empty(),
        };
        arity_ok && payload.is_empty()
    }

    fn process(
        &self,
        parent_outputs: &[NodeOutput],
        _payload: &[u8],
        _now: u64,
    ) -> Result<NodeOutput, SourceFailure> {
        let values: Vec<Decimal> = parent_outputs.iter().map(|o| o.value).collect();
        let value = self.fold(&values)?;

        let oldest = parent_outputs
            .iter()
            .map(|o| o.timestamp)
            .min()
            .unwrap_or_default();

        Ok(NodeOutput::new(value, oldest))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn out(value: i64, timestamp: u64) -> NodeOutput {
        NodeOutput::new(Decimal::from(value), timestamp)
    }

    #[test]
    fn test_passthrough() {
        let p = Passthrough;
        assert!(p.validate(&[NodeId::ZERO], &[]));
        assert!(!p.validate(&[], &[]));
        assert!(!p.validate(&[NodeId::ZERO, NodeId::ZERO], &[]));
        assert!(!p.validate(&[NodeId::ZERO], &[1]));

        assert_eq!(p.process(&[out(7, 3)], &[], 10), Ok(out(7, 3)));
        assert!(p.process(&[], &[], 10).is_err());
    }

    #[test]
    fn test_reduce_ops() {
        let inputs = [out(4, 30), out(1, 10), out(7, 20)];

        let min = Reduce::new(ReduceOp::Min).process(&inputs, &[], 40).unwrap();
        assert_eq!(min, out(1, 10));

        let max = Reduce::new(ReduceOp::Max).process(&inputs, &[], 40).unwrap();
        assert_eq!(max, out(7, 10));

        let mean = Reduce::new(ReduceOp::Mean).process(&inputs, &[], 40).unwrap();
        assert_eq!(mean.value, Decimal::from(4));

        let product = Reduce::new(ReduceOp::Product).process(&inputs, &[], 40).unwrap();
        assert_eq!(product.value, Decimal::from(28));
    }

    #[test]
    fn test_quotient_is_order_sensitive() {
        let q = Reduce::new(ReduceOp::Quotient);
        assert!(q.validate(&[NodeId::ZERO, NodeId::ZERO], &[]));
        assert!(!q.validate(&[NodeId::ZERO], &[]));

        assert_eq!(q.process(&[out(10, 1), out(4, 1)], &[], 1).unwrap().value, Decimal::new(25, 1));
        assert_eq!(q.process(&[out(4, 1), out(10, 1)], &[], 1).unwrap().value, Decimal::new(4, 1));
        assert!(q.process(&[out(4, 1), out(0, 1)], &[], 1).is_err());
    }

    #[test]
    fn test_reduce_overflow_fails() {
        let big = NodeOutput::new(Decimal::MAX, 0);
        assert!(Reduce::new(ReduceOp::Product).process(&[big, big], &[], 0).is_err());
        assert!(Reduce::new(ReduceOp::Mean).process(&[big, big], &[], 0).is_err());
        assert!(Reduce::new(ReduceOp::Min).process(&[], &[], 0).is_err());
    }
}

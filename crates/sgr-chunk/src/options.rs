//! # Chunk Options
//!
//! Builds the options record consumed by the external graph-traversal
//! engine: a reducer that accumulates edge weights as an exact rational
//! product, a stopper that halts expansion once the accumulated weight
//! drops to the configured limit, and pass-through traversal options.
//!
//! ## Design
//!
//! Weights are [`Fraction`] literals end to end. Multiplication reduces
//! through the GCD at every step, so the running product over an
//! arbitrarily long path stays exact — no floating point, no drift. A
//! malformed literal in the traversal state is a fatal error for that
//! call, logged and surfaced, never coerced to a default.

use serde::{Deserialize, Serialize};
use tracing::error;

use sgr_core::{Fraction, FractionError};

/// Weight threshold below which traversal stops, when the caller does
/// not supply one.
pub const DEFAULT_LIMIT: &str = "1/10000";

/// Accumulated traversal state: the running weight product as a
/// fraction literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accumulated {
    pub k: String,
}

/// Weight data carried by one edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    pub k: String,
}

/// One edge of the traversal graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub data: EdgeData,
}

/// Reducer input: the running total plus the edge being crossed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeVisit {
    pub total: Accumulated,
    pub edge: Edge,
}

/// Stopper input: the running total at a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    pub total: Accumulated,
}

/// Caller-supplied traversal options, before parsing the limit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChunkRequest {
    /// Node the traversal starts from.
    pub start: Option<String>,
    /// Node to fast-forward to before chunking.
    pub skip_to: Option<String>,
    /// Upper bound on one emitted chunk.
    pub max_array_size: Option<usize>,
    /// Weight threshold as a fraction literal; [`DEFAULT_LIMIT`] when
    /// absent.
    pub limit: Option<String>,
}

/// The options record handed to the traversal engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOptions {
    pub start: Option<String>,
    pub skip_to: Option<String>,
    pub max_array_size: Option<usize>,
    limit: Fraction,
}

impl ChunkOptions {
    /// Build options from a raw request, parsing the limit.
    pub fn new(request: ChunkRequest) -> Result<Self, FractionError> {
        let limit = match &request.limit {
            Some(literal) => parse_weight("limit", literal)?,
            None => Fraction::parse(DEFAULT_LIMIT)?,
        };
        Ok(Self {
            start: request.start,
            skip_to: request.skip_to,
            max_array_size: request.max_array_size,
            limit,
        })
    }

    /// The initial accumulated state: a weight product of one.
    pub fn initial(&self) -> Accumulated {
        Accumulated {
            k: Fraction::ONE.to_string(),
        }
    }

    /// The configured stop threshold.
    pub fn limit(&self) -> Fraction {
        self.limit
    }

    /// Reducer: multiply the running weight by the edge's weight and
    /// re-render the product as a reduced fraction literal.
    pub fn reduce(&self, visit: &EdgeVisit) -> Result<Accumulated, FractionError> {
        let total = parse_weight("total.k", &visit.total.k)?;
        let edge = parse_weight("edge.data.k", &visit.edge.data.k)?;
        let product = total.checked_mul(edge)?;
        Ok(Accumulated {
            k: product.to_string(),
        })
    }

    /// Stopper: true once the running weight is at or below the limit.
    pub fn should_stop(&self, visit: &Visit) -> Result<bool, FractionError> {
        let total = parse_weight("total.k", &visit.total.k)?;
        Ok(total <= self.limit)
    }
}

fn parse_weight(field: &str, literal: &str) -> Result<Fraction, FractionError> {
    Fraction::parse(literal).map_err(|e| {
        error!(field, literal, "malformed fraction literal in traversal state");
        e
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(limit: Option<&str>) -> ChunkOptions {
        ChunkOptions::new(ChunkRequest {
            limit: limit.map(String::from),
            ..Default::default()
        })
        .unwrap()
    }

    fn edge_visit(total: &str, edge: &str) -> EdgeVisit {
        EdgeVisit {
            total: Accumulated { k: total.into() },
            edge: Edge {
                data: EdgeData { k: edge.into() },
            },
        }
    }

    fn visit(total: &str) -> Visit {
        Visit {
            total: Accumulated { k: total.into() },
        }
    }

    // ---- reducer ----

    #[test]
    fn test_reduce_multiplies_and_reduces() {
        let opts = options(None);
        let acc = opts.reduce(&edge_visit("1/3", "1/2")).unwrap();
        assert_eq!(acc.k, "1/6");
    }

    #[test]
    fn test_reduce_large_denominator() {
        let opts = options(None);
        let acc = opts.reduce(&edge_visit("1/3", "2/1000000")).unwrap();
        assert_eq!(acc.k, "1/1500000");
    }

    #[test]
    fn test_reduce_from_initial() {
        let opts = options(None);
        let initial = opts.initial();
        assert_eq!(initial.k, "1/1");
        let acc = opts
            .reduce(&edge_visit(&initial.k, "3/4"))
            .unwrap();
        assert_eq!(acc.k, "3/4");
    }

    #[test]
    fn test_reduce_rejects_malformed_weight() {
        let opts = options(None);
        assert!(opts.reduce(&edge_visit("1/3", "carrot")).is_err());
        assert!(opts.reduce(&edge_visit("", "1/2")).is_err());
        assert!(opts.reduce(&edge_visit("1/3", "1/0")).is_err());
    }

    // ---- stopper ----

    #[test]
    fn test_should_stop_threshold() {
        let opts = options(Some("1/1000"));
        assert!(!opts.should_stop(&visit("1/3")).unwrap());
        assert!(opts.should_stop(&visit("5/10000")).unwrap());
        assert!(opts.should_stop(&visit("1/1000")).unwrap());
    }

    #[test]
    fn test_should_stop_rejects_malformed_total() {
        let opts = options(None);
        assert!(opts.should_stop(&visit("0.5")).is_err());
    }

    #[test]
    fn test_default_limit() {
        let opts = options(None);
        assert_eq!(opts.limit().to_string(), DEFAULT_LIMIT);
        assert!(!opts.should_stop(&visit("1/9999")).unwrap());
        assert!(opts.should_stop(&visit("1/10001")).unwrap());
    }

    #[test]
    fn test_malformed_limit_is_fatal() {
        let err = ChunkOptions::new(ChunkRequest {
            limit: Some("a quarter".into()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, FractionError::Parse { .. }));
    }

    // ---- request parsing ----

    #[test]
    fn test_request_camel_case() {
        let request: ChunkRequest = serde_json::from_str(
            r#"{
                "start": "n1",
                "skipTo": "n4",
                "maxArraySize": 50,
                "limit": "1/500"
            }"#,
        )
        .unwrap();
        let opts = ChunkOptions::new(request).unwrap();
        assert_eq!(opts.start.as_deref(), Some("n1"));
        assert_eq!(opts.skip_to.as_deref(), Some("n4"));
        assert_eq!(opts.max_array_size, Some(50));
        assert_eq!(opts.limit().to_string(), "1/500");
    }
}

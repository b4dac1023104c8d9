//! Operation trace format
//!
//! Two JSON layouts are accepted:
//! - a list of tagged ops: `[{"op":"new","capacity":2},{"op":"put","key":1,"value":1}]`
//! - parallel arrays: `{"operations":["LRUCache","put"],"values":[[2],[1,1]]}`

use std::fs;
use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// One replayable cache operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Build a fresh cache, replacing any current one
    New {
        /// Cache capacity
        capacity: usize,
    },
    /// Insert or update a key
    Put {
        /// Key
        key: i64,
        /// Value
        value: i64,
    },
    /// Look up a key
    Get {
        /// Key
        key: i64,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TraceFile {
    Ops(Vec<Op>),
    Columns {
        operations: Vec<String>,
        values: Vec<Vec<i64>>,
    },
}

/// Parse a trace from JSON text
pub fn parse_trace(json: &str) -> Result<Vec<Op>> {
    let file: TraceFile = serde_json::from_str(json).context("malformed trace JSON")?;

    let ops = match file {
        TraceFile::Ops(ops) => ops,
        TraceFile::Columns { operations, values } => from_columns(&operations, &values)?,
    };

    match ops.first() {
        Some(Op::New { .. }) => Ok(ops),
        Some(other) => bail!("trace must start with a new op, found {:?}", other),
        None => bail!("trace is empty"),
    }
}

/// Read and parse a trace file
pub fn load_trace(path: &Path) -> Result<Vec<Op>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read trace {}", path.display()))?;
    parse_trace(&json).with_context(|| format!("invalid trace {}", path.display()))
}

fn from_columns(operations: &[String], values: &[Vec<i64>]) -> Result<Vec<Op>> {
    ensure!(
        operations.len() == values.len(),
        "{} operations but {} argument lists",
        operations.len(),
        values.len()
    );

    operations
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (name, args))| -> Result<Op> {
            let op = match (name.as_str(), args.as_slice()) {
                ("LRUCache" | "new", &[capacity]) => Op::New {
                    capacity: usize::try_from(capacity)
                        .with_context(|| format!("negative capacity {}", capacity))?,
                },
                ("put", &[key, value]) => Op::Put { key, value },
                ("get", &[key]) => Op::Get { key },
                ("LRUCache" | "new" | "put" | "get", _) => {
                    bail!("wrong number of arguments for {} at op {}", name, i)
                }
                _ => bail!("unknown operation {:?} at op {}", name, i),
            };
            Ok(op)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_ops() {
        let ops = parse_trace(
            r#"[{"op":"new","capacity":2},{"op":"put","key":1,"value":10},{"op":"get","key":1}]"#,
        )
        .unwrap();

        assert_eq!(
            ops,
            vec![
                Op::New { capacity: 2 },
                Op::Put { key: 1, value: 10 },
                Op::Get { key: 1 },
            ]
        );
    }

    #[test]
    fn test_parse_columns() {
        let ops = parse_trace(
            r#"{"operations":["LRUCache","put","get"],"values":[[2],[1,1],[1]]}"#,
        )
        .unwrap();

        assert_eq!(
            ops,
            vec![
                Op::New { capacity: 2 },
                Op::Put { key: 1, value: 1 },
                Op::Get { key: 1 },
            ]
        );
    }

    #[test]
    fn test_columns_length_mismatch() {
        let err = parse_trace(r#"{"operations":["LRUCache","put"],"values":[[2]]}"#).unwrap_err();
        assert!(format!("{:#}", err).contains("2 operations but 1 argument lists"));
    }

    #[test]
    fn test_columns_bad_arity() {
        let err = parse_trace(r#"{"operations":["LRUCache","put"],"values":[[2],[1]]}"#)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("wrong number of arguments for put"));
    }

    #[test]
    fn test_unknown_operation() {
        let err = parse_trace(r#"{"operations":["LRUCache","del"],"values":[[2],[1]]}"#)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("unknown operation"));
    }

    #[test]
    fn test_must_start_with_new() {
        assert!(parse_trace(r#"[{"op":"get","key":1}]"#).is_err());
        assert!(parse_trace("[]").is_err());
    }
}

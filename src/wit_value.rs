// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The flattened, node-indexed wire form of [`crate::value::Value`] and its
//! codec. `WitValue` is what actually crosses the Component Model boundary;
//! `Value` is the ergonomic in-process tree, the same split
//! `golem-wasm-rpc` draws between `WitValue` and `Value` (see the comment in
//! `cli/golem-cli/src/model/agent/mod.rs`: "the primary reason for
//! duplicating the model with handwritten Rust types is to avoid the need to
//! work with WitValue ... directly").

use crate::error::SdkError;
use crate::value::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WitValue {
    pub nodes: Vec<WitNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WitNode {
    PrimBool(bool),
    PrimU8(u8),
    PrimU16(u16),
    PrimU32(u32),
    PrimU64(u64),
    PrimS8(i8),
    PrimS16(i16),
    PrimS32(i32),
    PrimS64(i64),
    PrimF32(f32),
    PrimF64(f64),
    PrimChr(char),
    PrimString(String),
    PrimHandle(String),
    RecordValue(Vec<usize>),
    VariantValue {
        case_idx: u32,
        case_value: Option<usize>,
    },
    EnumValue(u32),
    FlagsValue(Vec<bool>),
    TupleValue(Vec<usize>),
    ListValue(Vec<usize>),
    OptionValue(Option<usize>),
    ResultValue(Result<Option<usize>, Option<usize>>),
}

impl WitValue {
    /// DFS encode: push a placeholder for the current node, recurse into
    /// children (which append *after* the placeholder), then overwrite the
    /// placeholder with the final tag and child indices. Produces a
    /// topologically ordered array with the root at index 0.
    pub fn from_value(value: &Value) -> WitValue {
        let mut nodes = Vec::new();
        build_node(value, &mut nodes);
        WitValue { nodes }
    }

    /// Interpret node 0, following child indices recursively. Fails on an
    /// empty node array, a dangling index, or a node whose expected children
    /// don't exist.
    pub fn to_value(&self) -> Result<Value, SdkError> {
        if self.nodes.is_empty() {
            return Err(SdkError::type_mismatch(
                "decoding WitValue: node array is empty",
            ));
        }
        decode_node(self, 0)
    }
}

fn build_node(value: &Value, nodes: &mut Vec<WitNode>) -> usize {
    let idx = nodes.len();
    // Placeholder; overwritten below once children (and their own
    // placeholders) have been appended.
    nodes.push(WitNode::PrimBool(false));

    let node = match value {
        Value::Bool(b) => WitNode::PrimBool(*b),
        Value::U8(v) => WitNode::PrimU8(*v),
        Value::U16(v) => WitNode::PrimU16(*v),
        Value::U32(v) => WitNode::PrimU32(*v),
        Value::U64(v) => WitNode::PrimU64(*v),
        Value::S8(v) => WitNode::PrimS8(*v),
        Value::S16(v) => WitNode::PrimS16(*v),
        Value::S32(v) => WitNode::PrimS32(*v),
        Value::S64(v) => WitNode::PrimS64(*v),
        Value::F32(v) => WitNode::PrimF32(*v),
        Value::F64(v) => WitNode::PrimF64(*v),
        Value::Chr(v) => WitNode::PrimChr(*v),
        Value::String(v) => WitNode::PrimString(v.clone()),
        Value::Handle(v) => WitNode::PrimHandle(v.clone()),
        Value::Record(fields) => {
            let idxs = fields.iter().map(|f| build_node(f, nodes)).collect();
            WitNode::RecordValue(idxs)
        }
        Value::Variant {
            case_idx,
            case_value,
        } => {
            let cv = case_value.as_deref().map(|v| build_node(v, nodes));
            WitNode::VariantValue {
                case_idx: *case_idx,
                case_value: cv,
            }
        }
        Value::Enum(idx) => WitNode::EnumValue(*idx),
        Value::Flags(flags) => WitNode::FlagsValue(flags.clone()),
        Value::Tuple(items) => {
            let idxs = items.iter().map(|v| build_node(v, nodes)).collect();
            WitNode::TupleValue(idxs)
        }
        Value::List(items) => {
            let idxs = items.iter().map(|v| build_node(v, nodes)).collect();
            WitNode::ListValue(idxs)
        }
        Value::Option(inner) => {
            let idx = inner.as_deref().map(|v| build_node(v, nodes));
            WitNode::OptionValue(idx)
        }
        Value::Result(result) => match result {
            Ok(ok) => WitNode::ResultValue(Ok(ok.as_deref().map(|v| build_node(v, nodes)))),
            Err(err) => WitNode::ResultValue(Err(err.as_deref().map(|v| build_node(v, nodes)))),
        },
    };

    nodes[idx] = node;
    idx
}

fn decode_node(wit_value: &WitValue, idx: usize) -> Result<Value, SdkError> {
    let node = wit_value.nodes.get(idx).ok_or_else(|| {
        SdkError::type_mismatch(format!("decoding WitValue: dangling node index {idx}"))
    })?;

    let child = |wit_value: &WitValue, child_idx: usize| decode_node(wit_value, child_idx);

    Ok(match node {
        WitNode::PrimBool(b) => Value::Bool(*b),
        WitNode::PrimU8(v) => Value::U8(*v),
        WitNode::PrimU16(v) => Value::U16(*v),
        WitNode::PrimU32(v) => Value::U32(*v),
        WitNode::PrimU64(v) => Value::U64(*v),
        WitNode::PrimS8(v) => Value::S8(*v),
        WitNode::PrimS16(v) => Value::S16(*v),
        WitNode::PrimS32(v) => Value::S32(*v),
        WitNode::PrimS64(v) => Value::S64(*v),
        WitNode::PrimF32(v) => Value::F32(*v),
        WitNode::PrimF64(v) => Value::F64(*v),
        WitNode::PrimChr(v) => Value::Chr(*v),
        WitNode::PrimString(v) => Value::String(v.clone()),
        WitNode::PrimHandle(v) => Value::Handle(v.clone()),
        WitNode::RecordValue(idxs) => {
            let mut fields = Vec::with_capacity(idxs.len());
            for i in idxs {
                fields.push(child(wit_value, *i)?);
            }
            Value::Record(fields)
        }
        WitNode::VariantValue {
            case_idx,
            case_value,
        } => {
            let case_value = match case_value {
                Some(i) => Some(Box::new(child(wit_value, *i)?)),
                None => None,
            };
            Value::Variant {
                case_idx: *case_idx,
                case_value,
            }
        }
        WitNode::EnumValue(i) => Value::Enum(*i),
        WitNode::FlagsValue(flags) => Value::Flags(flags.clone()),
        WitNode::TupleValue(idxs) => {
            let mut items = Vec::with_capacity(idxs.len());
            for i in idxs {
                items.push(child(wit_value, *i)?);
            }
            Value::Tuple(items)
        }
        WitNode::ListValue(idxs) => {
            let mut items = Vec::with_capacity(idxs.len());
            for i in idxs {
                items.push(child(wit_value, *i)?);
            }
            Value::List(items)
        }
        WitNode::OptionValue(inner) => {
            let inner = match inner {
                Some(i) => Some(Box::new(child(wit_value, *i)?)),
                None => None,
            };
            Value::Option(inner)
        }
        WitNode::ResultValue(result) => match result {
            Ok(ok) => {
                let ok = match ok {
                    Some(i) => Some(Box::new(child(wit_value, *i)?)),
                    None => None,
                };
                Value::Result(Ok(ok))
            }
            Err(err) => {
                let err = match err {
                    Some(i) => Some(Box::new(child(wit_value, *i)?)),
                    None => None,
                };
                Value::Result(Err(err))
            }
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trip() {
        let value = Value::Record(vec![Value::U32(7), Value::String("hi".to_string())]);
        let wit_value = WitValue::from_value(&value);
        assert_eq!(wit_value.nodes[0], WitNode::RecordValue(vec![1, 2]));
        assert_eq!(wit_value.nodes[1], WitNode::PrimU32(7));
        assert_eq!(wit_value.nodes[2], WitNode::PrimString("hi".to_string()));
        assert_eq!(wit_value.to_value().unwrap(), value);
    }

    #[test]
    fn tagged_union_round_trip() {
        let value = Value::Variant {
            case_idx: 1,
            case_value: Some(Box::new(Value::U64(42))),
        };
        let wit_value = WitValue::from_value(&value);
        assert_eq!(wit_value.to_value().unwrap(), value);
    }

    #[test]
    fn dangling_index_is_fatal() {
        let wit_value = WitValue {
            nodes: vec![WitNode::OptionValue(Some(5))],
        };
        assert!(wit_value.to_value().is_err());
    }

    #[test]
    fn empty_node_array_is_fatal() {
        let wit_value = WitValue { nodes: vec![] };
        assert!(wit_value.to_value().is_err());
    }
}

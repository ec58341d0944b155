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

//! The tagged value tree mirroring [`crate::analysed_type::AnalysedType`],
//! grounded on `Value::Record`/`Value::Variant`/`Value::Option`/
//! `Value::Result` as used throughout `cloud-debugging-service/src/from_value.rs`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    S8(i8),
    S16(i16),
    S32(i32),
    S64(i64),
    F32(f32),
    F64(f64),
    Chr(char),
    String(String),
    /// Resource handles are opaque to this crate; values of `AnalysedType::Handle`
    /// never reach the serializer (class-typed parameters are rejected at
    /// schema-build time), but the variant exists to keep the Value/AnalysedType
    /// sums in lock-step.
    Handle(String),
    Option(Option<Box<Value>>),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Record(Vec<Value>),
    Variant {
        case_idx: u32,
        case_value: Option<Box<Value>>,
    },
    Enum(u32),
    Flags(Vec<bool>),
    Result(Result<Option<Box<Value>>, Option<Box<Value>>>),
}

impl Value {
    pub fn some(v: Value) -> Value {
        Value::Option(Some(Box::new(v)))
    }

    pub fn none() -> Value {
        Value::Option(None)
    }

    pub fn ok(v: Option<Value>) -> Value {
        Value::Result(Ok(v.map(Box::new)))
    }

    pub fn err(v: Option<Value>) -> Value {
        Value::Result(Err(v.map(Box::new)))
    }
}

/// Unstructured text content, referenced either out-of-band (`Url`) or
/// carried inline with an optional language-code restriction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TextReference {
    Url(String),
    Inline(TextSource),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSource {
    pub data: String,
    pub language_code: Option<String>,
}

/// Unstructured binary content, referenced either out-of-band (`Url`) or
/// carried inline with an optional mime-type restriction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BinaryReference {
    Url(String),
    Inline(BinarySource),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinarySource {
    pub data: Vec<u8>,
    pub mime_type: Option<String>,
}

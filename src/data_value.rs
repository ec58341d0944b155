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

//! The wire-form counterpart of [`crate::schema::DataSchema`]: what actually
//! crosses the RPC boundary for one constructor call or method invocation,
//! once every parameter has been serialized.

use crate::value::{BinaryReference, TextReference};
use crate::wit_value::WitValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElementValue {
    ComponentModel(WitValue),
    UnstructuredText(TextReference),
    UnstructuredBinary(BinaryReference),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedElementValue {
    pub name: String,
    pub value: ElementValue,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DataValue {
    Tuple(Vec<ElementValue>),
    Multimodal(Vec<NamedElementValue>),
}

impl DataValue {
    pub fn empty_tuple() -> Self {
        DataValue::Tuple(Vec::new())
    }
}

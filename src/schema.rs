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

//! The published artefacts: `DataSchema`, `AgentType` and friends, grounded
//! directly on `cli/golem-cli/src/model/agent/mod.rs` and the fixtures in
//! `cli/golem-cli/src/model/agent/test.rs`.

use crate::analysed_type::AnalysedType;
use crate::reflect::HttpEndpointDescriptor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextDescriptor {
    /// `None` means "any language accepted"; `Some(vec![])` is a schema that
    /// accepts no text at all, which the schema builder never produces but
    /// which a hand-built schema could express.
    pub restrictions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryDescriptor {
    pub restrictions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ElementSchema {
    ComponentModel(AnalysedType),
    UnstructuredText(TextDescriptor),
    UnstructuredBinary(BinaryDescriptor),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedElementSchema {
    pub name: String,
    pub schema: ElementSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DataSchema {
    Tuple(Vec<NamedElementSchema>),
    Multimodal(Vec<NamedElementSchema>),
}

impl DataSchema {
    pub fn empty_tuple() -> Self {
        DataSchema::Tuple(Vec::new())
    }

    pub fn elements(&self) -> &[NamedElementSchema] {
        match self {
            DataSchema::Tuple(elements) => elements,
            DataSchema::Multimodal(elements) => elements,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConstructor {
    pub name: Option<String>,
    pub description: String,
    pub prompt_hint: Option<String>,
    pub input_schema: DataSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMethod {
    pub name: String,
    pub description: String,
    pub prompt_hint: Option<String>,
    pub input_schema: DataSchema,
    pub output_schema: DataSchema,
    pub http_endpoint: Vec<HttpEndpointDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentType {
    pub type_name: String,
    pub description: String,
    pub constructor: AgentConstructor,
    pub methods: Vec<AgentMethod>,
}

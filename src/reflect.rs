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

//! The external reflection collaborator's data shape. This crate never
//! produces a `ReflectedType`/`ClassMetadata` itself — it only consumes one,
//! the way the schema builder is handed a structural type from reflection
//! metadata it does not own.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The discriminant of a reflected type node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    Boolean,
    Number,
    BigInt,
    String,
    Null,
    Undefined,
    Void,
    Array,
    Tuple,
    Union,
    Object,
    Interface,
    Class,
    Promise,
    Map,
    Literal,
    Alias,
    Others,
    UnresolvedType,
    Principal,
}

/// A reflected type node: `kind` plus a grab-bag of fields only some kinds
/// populate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReflectedType {
    pub kind: Option<TypeKind>,
    pub name: Option<String>,
    pub literal_value: Option<serde_json::Value>,
    #[serde(default)]
    pub type_params: Vec<ReflectedType>,
    #[serde(default)]
    pub union_types: Vec<ReflectedType>,
    #[serde(default)]
    pub elements: Vec<ReflectedType>,
    pub element: Option<Box<ReflectedType>>,
    #[serde(default)]
    pub properties: IndexMap<String, PropertyType>,
    #[serde(default)]
    pub optional: bool,
    pub original_type_name: Option<String>,
}

impl ReflectedType {
    pub fn of(kind: TypeKind) -> Self {
        ReflectedType {
            kind: Some(kind),
            ..Default::default()
        }
    }

    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        ReflectedType {
            kind: Some(kind),
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn kind(&self) -> TypeKind {
        self.kind.unwrap_or(TypeKind::Others)
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = optional;
        self
    }

    pub fn with_type_params(mut self, params: Vec<ReflectedType>) -> Self {
        self.type_params = params;
        self
    }

    pub fn with_union_types(mut self, types: Vec<ReflectedType>) -> Self {
        self.union_types = types;
        self
    }

    pub fn with_elements(mut self, elements: Vec<ReflectedType>) -> Self {
        self.elements = elements;
        self
    }

    pub fn with_element(mut self, element: ReflectedType) -> Self {
        self.element = Some(Box::new(element));
        self
    }

    pub fn with_properties(mut self, properties: IndexMap<String, PropertyType>) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_literal(mut self, value: serde_json::Value) -> Self {
        self.literal_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyType {
    pub typ: ReflectedType,
    #[serde(default)]
    pub optional: bool,
}

/// Boxed primitive wrapper classes the type mapper rejects.
pub const BOXED_PRIMITIVES: &[&str] = &["String", "Number", "Boolean", "BigInt", "Symbol", "Date", "RegExp"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstructorArg {
    pub name: String,
    pub typ: ReflectedType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpEndpointDescriptor {
    pub method: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodMetadata {
    /// Ordered parameter list; order is the wire order.
    pub method_params: IndexMap<String, ReflectedType>,
    pub return_type: ReflectedType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub prompt_hint: Option<String>,
    #[serde(default)]
    pub http_endpoint: Vec<HttpEndpointDescriptor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetadata {
    pub type_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub constructor_args: Vec<ConstructorArg>,
    pub methods: IndexMap<String, MethodMetadata>,
}

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

//! Per-class registries: constructor-arg and method-param
//! `TypeInfoInternal`, method return types, and base method metadata. Built
//! once by [`crate::schema_builder::build_agent_type`] and read-only
//! thereafter — callers hold these behind whatever ownership they like
//! (`&'static`, `Arc`, thread-local); this crate does not impose a global
//! singleton.

use crate::error::SdkResult;
use crate::reflect::ClassMetadata;
use crate::schema::AgentType;
use crate::schema_builder::build_agent_type;
use crate::type_info::TypeInfoInternal;
use indexmap::IndexMap;

/// A single named constructor-arg or method parameter, in wire order.
#[derive(Debug, Clone)]
pub struct ParamInfo {
    pub name: String,
    pub info: TypeInfoInternal,
}

#[derive(Debug, Clone, Default)]
pub struct Signature {
    pub params: Vec<ParamInfo>,
}

impl Signature {
    /// Number of `ElementValue`s a `DataValue` built from this signature
    /// carries: every param except the auto-injected ones.
    pub fn wire_arity(&self) -> usize {
        self.params.iter().filter(|p| !p.info.is_auto_injected()).count()
    }
}

#[derive(Debug, Clone)]
pub struct MethodEntry {
    pub params: Signature,
    /// The method's return "parameters" — almost always zero (void) or one
    /// (a single named `return` element); modelled as a signature so the
    /// same (de)serializer code path handles both directions.
    pub output: Signature,
    pub metadata: crate::schema::AgentMethod,
}

#[derive(Debug, Clone)]
pub struct ClassRegistry {
    pub type_name: String,
    pub constructor: Signature,
    pub methods: IndexMap<String, MethodEntry>,
}

impl ClassRegistry {
    pub fn method(&self, name: &str) -> SdkResult<&MethodEntry> {
        self.methods
            .get(name)
            .ok_or_else(|| crate::error::SdkError::unresolved_method(format!(
                "{}::{name}",
                self.type_name
            )))
    }
}

/// Builds both the published [`AgentType`] and the internal [`ClassRegistry`]
/// from one pass over the reflected class metadata: reflection metadata
/// flows through the schema builder into both outputs together.
pub fn register_class(class: &ClassMetadata) -> SdkResult<(AgentType, ClassRegistry)> {
    build_agent_type(class)
}

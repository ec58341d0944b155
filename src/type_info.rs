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

//! `TypeInfoInternal`: the discriminated handle tying a reflected host type
//! to one of {analysed, unstructured-text, unstructured-binary, multimodal,
//! principal, config}, produced once by the type mapper / schema builder and
//! cached in the registries.

use crate::schema::{ElementSchema, NamedElementSchema};

#[derive(Debug, Clone)]
pub enum TypeInfoInternal {
    /// A parameter/return value backed by the Component Model value tree or
    /// one of the two unstructured shapes.
    Element(ElementSchema),
    /// A single array-of-tagged-union parameter; cases are non-empty and
    /// pairwise distinct by (kebab-cased) name.
    Multimodal(Vec<NamedElementSchema>),
    /// Auto-injected; consumes no wire slot.
    Principal,
    /// Auto-injected; consumes no wire slot.
    Config,
}

impl TypeInfoInternal {
    pub fn is_auto_injected(&self) -> bool {
        matches!(self, TypeInfoInternal::Principal | TypeInfoInternal::Config)
    }

    pub fn as_element_schema(&self) -> Option<ElementSchema> {
        match self {
            TypeInfoInternal::Element(schema) => Some(schema.clone()),
            _ => None,
        }
    }
}

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

//! Type-schema and value-marshalling core for Golem agent SDKs.
//!
//! Turns a reflected host-language class ([`reflect::ClassMetadata`]) into a
//! published [`schema::AgentType`] plus a read-only [`registry::ClassRegistry`],
//! and converts host argument/return values to and from the wire-level
//! [`data_value::DataValue`] those schemas describe. [`proxy::RemoteAgentProxy`]
//! wires both halves together into a callable handle for a remote agent.

pub mod analysed_type;
pub mod data_value;
pub mod deserialize;
pub mod error;
pub mod host;
pub mod proxy;
pub mod reflect;
pub mod registry;
pub mod schema;
pub mod schema_builder;
pub mod serialize;
pub mod type_info;
pub mod type_mapper;
pub mod value;
pub mod wit_value;

pub use error::{SdkError, SdkResult};
pub use reflect::ClassMetadata;
pub use schema::AgentType;

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

//! The closed set of error kinds produced by schema construction, value
//! conversion and RPC dispatch.

use std::fmt;

/// Every fallible operation in this crate returns one of these kinds, each
/// carrying a human-readable context string identifying the offending
/// class/method/parameter and, where useful, a short rendering of the value.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SdkError {
    #[error("type mismatch in {context}")]
    TypeMismatch { context: String },

    #[error("unresolved method: {context}")]
    UnresolvedMethod { context: String },

    #[error("unresolved parameter: {context}")]
    UnresolvedParameter { context: String },

    #[error("no union case matched in {context}")]
    UnionAmbiguityOrMiss { context: String },

    #[error("malformed unstructured reference in {context}")]
    UnstructuredCast { context: String },

    #[error("invalid multimodal shape in {context}")]
    MultimodalShape { context: String },

    #[error("unsupported type while building schema: {context}")]
    SchemaConstruction { context: String },

    #[error("remote call failed: {context}")]
    RpcError {
        context: String,
        kind: RpcErrorKind,
    },

    #[error("reserved or invalid method name: {context}")]
    ReservedOrInvalidMethodName { context: String },
}

impl SdkError {
    pub fn type_mismatch(context: impl Into<String>) -> Self {
        SdkError::TypeMismatch {
            context: context.into(),
        }
    }

    pub fn unresolved_method(context: impl Into<String>) -> Self {
        SdkError::UnresolvedMethod {
            context: context.into(),
        }
    }

    pub fn unresolved_parameter(context: impl Into<String>) -> Self {
        SdkError::UnresolvedParameter {
            context: context.into(),
        }
    }

    pub fn union_ambiguity_or_miss(context: impl Into<String>) -> Self {
        SdkError::UnionAmbiguityOrMiss {
            context: context.into(),
        }
    }

    pub fn unstructured_cast(context: impl Into<String>) -> Self {
        SdkError::UnstructuredCast {
            context: context.into(),
        }
    }

    pub fn multimodal_shape(context: impl Into<String>) -> Self {
        SdkError::MultimodalShape {
            context: context.into(),
        }
    }

    pub fn schema_construction(context: impl Into<String>) -> Self {
        SdkError::SchemaConstruction {
            context: context.into(),
        }
    }

    pub fn rpc_error(context: impl Into<String>, kind: RpcErrorKind) -> Self {
        SdkError::RpcError {
            context: context.into(),
            kind,
        }
    }

    pub fn reserved_or_invalid_method_name(context: impl Into<String>) -> Self {
        SdkError::ReservedOrInvalidMethodName {
            context: context.into(),
        }
    }
}

/// Mirrors the host-side RPC error variants; the proxy wraps whichever one
/// the host capability surface reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorKind {
    Protocol,
    Denied,
    NotFound,
    RemoteInternal,
    RemoteAgent,
}

impl fmt::Display for RpcErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RpcErrorKind::Protocol => "protocol",
            RpcErrorKind::Denied => "denied",
            RpcErrorKind::NotFound => "not-found",
            RpcErrorKind::RemoteInternal => "remote-internal",
            RpcErrorKind::RemoteAgent => "remote-agent",
        };
        f.write_str(s)
    }
}

pub type SdkResult<T> = Result<T, SdkError>;

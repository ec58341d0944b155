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

//! Builds a callable proxy for a remote agent from an [`AgentHost`] plus
//! reflected [`ClassMetadata`]. Grounded on the constructor/method-wrapper
//! generation in `cli/golem-cli/src/wasm_rpc_stubgen/rust.rs`, adapted from
//! codegen-time stub generation to a runtime proxy built once per target
//! agent.

use std::collections::HashMap;

use serde_json::Value as Json;
use uuid::Uuid;

use crate::deserialize::{deserialize_data_value, AutoInject};
use crate::error::{RpcErrorKind, SdkError, SdkResult};
use crate::host::{AgentHost, CancellationToken, DateTime, WasmRpc};
use crate::reflect::ClassMetadata;
use crate::registry::{register_class, ClassRegistry};
use crate::serialize::serialize_data_value;

/// Connects a freshly constructed agent id to its `WasmRpc` transport. Kept
/// as a caller-supplied closure rather than folded into [`AgentHost`]
/// because establishing the transport is a capability of the RPC layer, not
/// of the host capability surface itself (Open Question, see DESIGN.md).
pub type RpcConnector<'a> = dyn Fn(&str) -> Box<dyn WasmRpc> + 'a;

pub struct ProxyBuilder<'a> {
    host: &'a dyn AgentHost,
    connect: &'a RpcConnector<'a>,
    class: &'a ClassMetadata,
}

impl<'a> ProxyBuilder<'a> {
    pub fn new(host: &'a dyn AgentHost, connect: &'a RpcConnector<'a>, class: &'a ClassMetadata) -> Self {
        ProxyBuilder {
            host,
            connect,
            class,
        }
    }

    /// Serializes `ctor_args` against the class's constructor schema, derives
    /// the target agent id via [`AgentHost::make_agent_id`], and connects its
    /// `WasmRpc` transport.
    pub fn build(self, ctor_args: &[Json], phantom_id: Option<Uuid>) -> SdkResult<RemoteAgentProxy> {
        let (_, registry) = register_class(self.class)?;
        let ctx = format!("{}::new", registry.type_name);
        let ctor_data = serialize_data_value(ctor_args, &registry.constructor, &ctx)?;
        let agent_id = self
            .host
            .make_agent_id(&registry.type_name, &ctor_data, phantom_id);
        log::debug!(
            "constructing remote agent proxy: type={} agent_id={}",
            registry.type_name,
            agent_id
        );
        let rpc = (self.connect)(&agent_id);
        Ok(RemoteAgentProxy {
            agent_id,
            rpc,
            registry,
            method_cache: HashMap::new(),
        })
    }
}

/// A callable handle to one remote agent instance. `method_cache` memoizes
/// the one thing method dispatch isn't free to redo on every call —
/// validating that the method name actually exists on the class — since the
/// registry's `IndexMap` already gives O(1) lookup for the rest. One proxy
/// is used from a single instance at a time, so a plain `HashMap` needs no
/// lock.
pub struct RemoteAgentProxy {
    agent_id: String,
    rpc: Box<dyn WasmRpc>,
    registry: ClassRegistry,
    method_cache: HashMap<String, ()>,
}

impl RemoteAgentProxy {
    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    fn validate_method(&mut self, method: &str) -> SdkResult<()> {
        if !self.method_cache.contains_key(method) {
            self.registry.method(method)?;
            self.method_cache.insert(method.to_string(), ());
        }
        Ok(())
    }

    /// Blocking call-and-wait: serializes `args`, starts the invocation,
    /// subscribes to the returned pollable and blocks until it's ready,
    /// then unwraps the result (an error reply is raised as an `SdkError`)
    /// and deserializes it. Zero output elements decode to `Json::Null`;
    /// exactly one decodes to that element directly.
    pub fn call(&mut self, method: &str, args: &[Json]) -> SdkResult<Json> {
        self.validate_method(method)?;
        let entry = self.registry.method(method)?;
        let ctx = format!("{}::{method}", self.registry.type_name);
        let data = serialize_data_value(args, &entry.params, &ctx)?;
        log::debug!(
            "invoking {ctx} on agent {} ({} element(s))",
            self.agent_id,
            data_value_len(&data)
        );
        let future = self.rpc.async_invoke_and_await(method, data);
        future.subscribe().0.block();
        let result = future.get().ok_or_else(|| {
            SdkError::rpc_error(
                format!("{ctx} on agent {}: pollable ready but no result available", self.agent_id),
                RpcErrorKind::Protocol,
            )
        })?;
        let result = result.map_err(|e| {
            log::warn!("remote call {ctx} on agent {} failed: {e}", self.agent_id);
            e
        })?;
        decode_single_output(&result, &self.registry, method, &ctx)
    }

    /// Fire-and-forget: serializes `args`, invokes, does not wait for or
    /// decode a reply.
    pub fn trigger(&mut self, method: &str, args: &[Json]) -> SdkResult<()> {
        self.validate_method(method)?;
        let entry = self.registry.method(method)?;
        let ctx = format!("{}::{method}", self.registry.type_name);
        let data = serialize_data_value(args, &entry.params, &ctx)?;
        log::debug!("triggering {ctx} on agent {} (fire-and-forget)", self.agent_id);
        self.rpc.invoke(method, data)
    }

    /// Starts the call without blocking; returns a handle the caller
    /// subscribes to and polls.
    pub fn call_async(
        &mut self,
        method: &str,
        args: &[Json],
    ) -> SdkResult<Box<dyn crate::host::FutureInvokeResult>> {
        self.validate_method(method)?;
        let entry = self.registry.method(method)?;
        let ctx = format!("{}::{method}", self.registry.type_name);
        let data = serialize_data_value(args, &entry.params, &ctx)?;
        Ok(self.rpc.async_invoke_and_await(method, data))
    }

    /// Schedules the call for a future time; returns a token the caller may
    /// use to cancel it before it runs.
    pub fn schedule(
        &mut self,
        method: &str,
        args: &[Json],
        at: DateTime,
    ) -> SdkResult<CancellationToken> {
        self.validate_method(method)?;
        let entry = self.registry.method(method)?;
        let ctx = format!("{}::{method}", self.registry.type_name);
        let data = serialize_data_value(args, &entry.params, &ctx)?;
        log::debug!("scheduling {ctx} on agent {} at {at}", self.agent_id);
        Ok(self.rpc.schedule_cancelable_invocation(at, method, data))
    }
}

fn data_value_len(data: &crate::data_value::DataValue) -> usize {
    match data {
        crate::data_value::DataValue::Tuple(elements) => elements.len(),
        crate::data_value::DataValue::Multimodal(elements) => elements.len(),
    }
}

fn decode_single_output(
    data: &crate::data_value::DataValue,
    registry: &ClassRegistry,
    method: &str,
    ctx: &str,
) -> SdkResult<Json> {
    let entry = registry.method(method)?;
    let outputs = deserialize_data_value(data, &entry.output, &AutoInject::default(), ctx)?;
    match outputs.as_slice() {
        [] => Ok(Json::Null),
        [single] => Ok(single.clone()),
        many => Ok(Json::Array(many.to_vec())),
    }
}

impl std::fmt::Debug for RemoteAgentProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteAgentProxy")
            .field("agent_id", &self.agent_id)
            .field("type_name", &self.registry.type_name)
            .finish()
    }
}


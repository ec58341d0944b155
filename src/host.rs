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

//! The host capability surface, modelled as traits rather than generated
//! bindgen bindings so the rest of the crate is testable on a native
//! target — the same seam `golem-rust`'s `wasm_rpc` module draws around the
//! component-model host imports it wraps.

use crate::data_value::DataValue;
use crate::error::SdkResult;
use crate::schema::AgentType;
use uuid::Uuid;

pub type DateTime = chrono::DateTime<chrono::Utc>;

/// Everything an agent implementation or the proxy needs from its hosting
/// environment that isn't itself a remote-agent call.
pub trait AgentHost {
    fn get_agent_type(&self, type_name: &str) -> Option<RegisteredAgentType>;
    /// Derives the target agent id from its constructor arguments, optionally
    /// pinned to a caller-supplied `phantom_id`.
    fn make_agent_id(&self, type_name: &str, ctor: &DataValue, phantom_id: Option<Uuid>) -> String;
    fn random_uuid(&self) -> Uuid;
    fn get_config_value(&self, path: &[String]) -> SdkResult<serde_json::Value>;
}

/// One remote agent's RPC surface, reached through whatever transport the
/// host provides. A `RemoteAgentProxy` holds one of these per target agent
/// instance. There is deliberately no blocking "invoke and await" method
/// here — a blocking call is built by subscribing to the pollable returned
/// from `async_invoke_and_await` and blocking on it, not by a separate
/// entry point.
pub trait WasmRpc {
    fn invoke(&self, method: &str, args: DataValue) -> SdkResult<()>;
    fn async_invoke_and_await(&self, method: &str, args: DataValue) -> Box<dyn FutureInvokeResult>;
    fn schedule_invocation(&self, at: DateTime, method: &str, args: DataValue);
    fn schedule_cancelable_invocation(
        &self,
        at: DateTime,
        method: &str,
        args: DataValue,
    ) -> CancellationToken;
}

/// A pending asynchronous call. Mirrors the subscribe/get split of a WASI
/// `pollable` + result pair: poll until ready, then take the result exactly
/// once.
pub trait FutureInvokeResult {
    fn subscribe(&self) -> Pollable;
    fn get(&self) -> Option<SdkResult<DataValue>>;
}

/// A host-owned readiness handle for a pending call (mirrors
/// `wasi:io/poll.pollable`). A blocking caller calls `block()` on it and
/// then reads the result off the `FutureInvokeResult` it was subscribed to;
/// an async-capable host may instead poll `ready()` from its own event loop.
pub struct Pollable(pub Box<dyn PollableImpl>);

pub trait PollableImpl {
    fn ready(&self) -> bool;
    fn block(&self);
}

/// A handle letting the caller cancel a scheduled invocation before it runs.
pub struct CancellationToken(pub Box<dyn CancellationTokenImpl>);

pub trait CancellationTokenImpl {
    fn cancel(&self);
}

/// What `AgentHost::get_agent_type` returns about another agent type known
/// to this host environment.
#[derive(Debug, Clone)]
pub struct RegisteredAgentType {
    pub agent_type: AgentType,
}

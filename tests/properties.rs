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

//! Property tests for the universal invariants that the seed scenarios in
//! `tests/agent.rs` only exercise at fixed points: host value -> `Value` ->
//! `WitValue` -> (wire bytes) -> `WitValue` -> `Value` -> host value returns
//! the original for arbitrary well-typed input, and a value produced against
//! a schema always deserializes back through that same schema without error.

use golem_agent_sdk::analysed_type as at;
use golem_agent_sdk::deserialize::deserialize_value;
use golem_agent_sdk::serialize::serialize_value;
use golem_agent_sdk::wit_value::WitValue;
use proptest::prelude::*;
use serde_json::json;

/// Runs a host value through the full wire pipeline, including a pass
/// through `serde_json` standing in for the bytes that would actually cross
/// the Component Model boundary, and returns what comes out the other end.
fn round_trip(host: &serde_json::Value, typ: &at::AnalysedType) -> serde_json::Value {
    let value = serialize_value(host, typ, "proptest").expect("serialize_value should succeed");
    let wit_value = WitValue::from_value(&value);
    let wire = serde_json::to_vec(&wit_value).expect("WitValue should serialize");
    let wit_value: WitValue = serde_json::from_slice(&wire).expect("WitValue should deserialize");
    let decoded_value = wit_value.to_value().expect("WitValue should decode back to a Value");
    deserialize_value(&decoded_value, typ, "proptest").expect("deserialize_value should succeed")
}

proptest! {
    #[test]
    fn bool_round_trips(b in any::<bool>()) {
        let out = round_trip(&json!(b), &at::bool_());
        prop_assert_eq!(out, json!(b));
    }

    #[test]
    fn u32_round_trips(n in any::<u32>()) {
        let out = round_trip(&json!(n), &at::u32_());
        prop_assert_eq!(out, json!(n));
    }

    #[test]
    fn s64_round_trips(n in any::<i64>()) {
        let out = round_trip(&json!(n), &at::s64_());
        prop_assert_eq!(out, json!(n));
    }

    #[test]
    fn string_round_trips(s in "[a-zA-Z0-9 ]{0,32}") {
        let out = round_trip(&json!(s), &at::str_());
        prop_assert_eq!(out, json!(s));
    }

    #[test]
    fn option_round_trips(n in proptest::option::of(any::<u32>())) {
        let typ = at::option_union(at::u32_());
        let host = match n {
            Some(n) => json!(n),
            None => serde_json::Value::Null,
        };
        let out = round_trip(&host, &typ);
        prop_assert_eq!(out, host);
    }

    #[test]
    fn list_round_trips(items in proptest::collection::vec(any::<u32>(), 0..8)) {
        let typ = at::list(at::u32_());
        let host = json!(items);
        let out = round_trip(&host, &typ);
        prop_assert_eq!(out, host);
    }

    /// Schema<->value consistency: an arbitrary two-field record always
    /// serializes and decodes back to the same shape the schema describes,
    /// regardless of which `u32`/string values it carries.
    #[test]
    fn record_round_trips(n in any::<u32>(), s in "[a-zA-Z0-9]{0,16}") {
        let typ = at::record(vec![at::field("n", at::u32_()), at::field("s", at::str_())]);
        let host = json!({"n": n, "s": s});
        let out = round_trip(&host, &typ);
        prop_assert_eq!(out, host);
    }

    #[test]
    fn tuple_round_trips(b in any::<bool>(), n in any::<u32>()) {
        let typ = at::tuple(vec![at::bool_(), at::u32_()]);
        let host = json!([b, n]);
        let out = round_trip(&host, &typ);
        prop_assert_eq!(out, host);
    }
}

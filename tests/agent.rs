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

//! End-to-end coverage of the reflection → schema → wire-value pipeline,
//! one test per seed scenario.

use golem_agent_sdk::analysed_type as at;
use golem_agent_sdk::analysed_type::EmptyKind;
use golem_agent_sdk::data_value::{DataValue, ElementValue, NamedElementValue};
use golem_agent_sdk::deserialize::{deserialize_data_value, deserialize_value, AutoInject};
use golem_agent_sdk::reflect::{ClassMetadata, ConstructorArg, MethodMetadata, ReflectedType, TypeKind};
use golem_agent_sdk::registry::{register_class, ParamInfo, Signature};
use golem_agent_sdk::schema::{DataSchema, ElementSchema, NamedElementSchema};
use golem_agent_sdk::serialize::{serialize_data_value, serialize_value};
use golem_agent_sdk::type_info::TypeInfoInternal;
use golem_agent_sdk::value::Value;
use golem_agent_sdk::wit_value::{WitNode, WitValue};
use indexmap::IndexMap;
use serde_json::json;

/// (a) Record `{n:u32, s:string}` with `{n:7, s:"hi"}`.
#[test]
fn seed_a_record_round_trip() {
    let typ = at::record(vec![at::field("n", at::u32_()), at::field("s", at::str_())]);
    let host = json!({"n": 7, "s": "hi"});

    let value = serialize_value(&host, &typ, "seed-a").unwrap();
    assert_eq!(value, Value::Record(vec![Value::U32(7), Value::String("hi".to_string())]));

    let wit_value = WitValue::from_value(&value);
    assert_eq!(wit_value.nodes[0], WitNode::RecordValue(vec![1, 2]));
    assert_eq!(wit_value.nodes[1], WitNode::PrimU32(7));
    assert_eq!(wit_value.nodes[2], WitNode::PrimString("hi".to_string()));

    let decoded_value = wit_value.to_value().unwrap();
    assert_eq!(decoded_value, value);
    let decoded_host = deserialize_value(&decoded_value, &typ, "seed-a").unwrap();
    assert_eq!(decoded_host, host);
}

/// (b) Tagged union `{tag:'A', val:string} | {tag:'B', val:u64}` with
/// `{tag:'B', val: 42}`.
#[test]
fn seed_b_tagged_union() {
    let typ = at::tagged_variant(vec![at::case("A", at::str_()), at::case("B", at::u64_())]);
    let host = json!({"tag": "B", "val": 42});

    let value = serialize_value(&host, &typ, "seed-b").unwrap();
    assert_eq!(
        value,
        Value::Variant {
            case_idx: 1,
            case_value: Some(Box::new(Value::U64(42))),
        }
    );

    let decoded = deserialize_value(&value, &typ, "seed-b").unwrap();
    assert_eq!(decoded, host);
}

/// (c) Optional field: `record{x?: u32}` with `{}` decodes back to `{}`
/// with no `x` key at all.
#[test]
fn seed_c_optional_field_omits_missing_key() {
    let typ = at::record(vec![at::field("x", at::option_question_mark(at::u32_()))]);
    let host = json!({});

    let value = serialize_value(&host, &typ, "seed-c").unwrap();
    assert_eq!(value, Value::Record(vec![Value::none()]));

    let decoded = deserialize_value(&value, &typ, "seed-c").unwrap();
    assert_eq!(decoded, json!({}));
    assert!(decoded.as_object().unwrap().get("x").is_none());
}

/// (d) `result<ok:u32, err:void>`: `{tag:'ok',val:1}` and `{tag:'err'}`.
#[test]
fn seed_d_result_with_empty_err() {
    let typ = at::result_ok(at::u32_(), EmptyKind::Void);

    let ok_value = serialize_value(&json!({"tag": "ok", "val": 1}), &typ, "seed-d").unwrap();
    assert_eq!(ok_value, Value::ok(Some(Value::U32(1))));
    assert_eq!(
        deserialize_value(&ok_value, &typ, "seed-d").unwrap(),
        json!({"tag": "ok", "val": 1})
    );

    let err_value = serialize_value(&json!({"tag": "err"}), &typ, "seed-d").unwrap();
    assert_eq!(err_value, Value::err(None));
    assert_eq!(
        deserialize_value(&err_value, &typ, "seed-d").unwrap(),
        json!({"tag": "err"})
    );
}

/// (e) Method with a `principal` parameter and a `u32` parameter: the
/// schema emits one element for the `u32` only; deserializing with that
/// one element plus an injected principal yields host args `[principal, n]`.
#[test]
fn seed_e_principal_auto_injection() {
    let mut constructor_args = Vec::new();
    constructor_args.push(ConstructorArg {
        name: "label".to_string(),
        typ: ReflectedType::of(TypeKind::String),
    });

    let mut method_params = IndexMap::new();
    method_params.insert(
        "caller".to_string(),
        ReflectedType::named(TypeKind::Principal, "Principal"),
    );
    method_params.insert("n".to_string(), ReflectedType::of(TypeKind::Number));
    let mut methods = IndexMap::new();
    methods.insert(
        "greet".to_string(),
        MethodMetadata {
            method_params,
            return_type: ReflectedType::of(TypeKind::Void),
            description: None,
            prompt_hint: None,
            http_endpoint: Vec::new(),
        },
    );
    let class = ClassMetadata {
        type_name: "greeter".to_string(),
        description: None,
        constructor_args,
        methods,
    };

    let (agent_type, registry) = register_class(&class).unwrap();
    let method = &agent_type.methods[0];
    // Only `n` is published; `caller` consumes no wire slot.
    assert_eq!(method.input_schema.elements().len(), 1);
    assert_eq!(method.input_schema.elements()[0].name, "n");

    let entry = registry.method("greet").unwrap();
    let data = DataValue::Tuple(vec![ElementValue::ComponentModel(WitValue::from_value(
        &Value::F64(5.0),
    ))]);
    let inject = AutoInject {
        principal: Some(json!("urn:principal:pi")),
        config: None,
    };
    let outputs = deserialize_data_value(&data, &entry.params, &inject, "seed-e").unwrap();
    assert_eq!(outputs, vec![json!("urn:principal:pi"), json!(5.0)]);
}

/// (f) Multimodal method argument:
/// `[{tag:'text', val:{tag:'inline', val:'hello'}}, {tag:'image', val:{tag:'url', val:'https://...'}}]`
/// round-trips through `DataValue::Multimodal`.
#[test]
fn seed_f_multimodal_round_trip() {
    let cases = vec![
        NamedElementSchema {
            name: "text".to_string(),
            schema: ElementSchema::UnstructuredText(golem_agent_sdk::schema::TextDescriptor {
                restrictions: None,
            }),
        },
        NamedElementSchema {
            name: "image".to_string(),
            schema: ElementSchema::UnstructuredBinary(golem_agent_sdk::schema::BinaryDescriptor {
                restrictions: None,
            }),
        },
    ];
    let signature = Signature {
        params: vec![ParamInfo {
            name: "parts".to_string(),
            info: TypeInfoInternal::Multimodal(cases.clone()),
        }],
    };

    let host_arg = json!([
        {"tag": "text", "val": {"tag": "inline", "val": "hello"}},
        {"tag": "image", "val": {"tag": "url", "val": "https://example.com/x.png"}},
    ]);

    let data = serialize_data_value(&[host_arg.clone()], &signature, "seed-f").unwrap();
    match &data {
        DataValue::Multimodal(elements) => {
            assert_eq!(elements.len(), 2);
            assert_eq!(elements[0].name, "text");
            assert_eq!(elements[1].name, "image");
            assert!(matches!(
                &elements[0],
                NamedElementValue {
                    value: ElementValue::UnstructuredText(_),
                    ..
                }
            ));
        }
        DataValue::Tuple(_) => panic!("expected a multimodal data value"),
    }

    let outputs =
        deserialize_data_value(&data, &signature, &AutoInject::default(), "seed-f").unwrap();
    assert_eq!(outputs, vec![host_arg]);
}

#[test]
fn constructor_and_method_schema_round_trip_for_a_simple_class() {
    let mut method_params = IndexMap::new();
    method_params.insert("amount".to_string(), ReflectedType::of(TypeKind::Number));
    let mut methods = IndexMap::new();
    methods.insert(
        "deposit".to_string(),
        MethodMetadata {
            method_params,
            return_type: ReflectedType::of(TypeKind::Number),
            description: Some("deposits funds".to_string()),
            prompt_hint: None,
            http_endpoint: Vec::new(),
        },
    );
    let class = ClassMetadata {
        type_name: "account".to_string(),
        description: Some("a bank account agent".to_string()),
        constructor_args: vec![ConstructorArg {
            name: "owner".to_string(),
            typ: ReflectedType::of(TypeKind::String),
        }],
        methods,
    };

    let (agent_type, registry) = register_class(&class).unwrap();
    assert!(matches!(agent_type.constructor.input_schema, DataSchema::Tuple(ref e) if e.len() == 1));

    let entry = registry.method("deposit").unwrap();
    let args = serialize_data_value(&[json!(100)], &entry.params, "account::deposit").unwrap();
    let decoded = deserialize_data_value(&args, &entry.params, &AutoInject::default(), "account::deposit").unwrap();
    assert_eq!(decoded, vec![json!(100.0)]);
}

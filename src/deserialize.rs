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

//! Wire value → host value (`serde_json::Value`). Used on the receiving
//! side of a call: turning an incoming `DataValue` (a constructor's or a
//! method's arguments) back into the positional host arguments an agent
//! implementation expects, including auto-injected principal/config slots
//! that never consumed a wire position in the first place.
//!
//! Also reused to decode a method's *return* `DataValue` on the calling
//! side (`crate::proxy`) — a return is just a signature with zero or one
//! non-auto-injected parameters, so the same machinery applies unchanged.

use crate::analysed_type::AnalysedType;
use crate::data_value::{DataValue, ElementValue, NamedElementValue};
use crate::error::{SdkError, SdkResult};
use crate::registry::{ParamInfo, Signature};
use crate::schema::{BinaryDescriptor, ElementSchema, NamedElementSchema, TextDescriptor};
use crate::type_info::TypeInfoInternal;
use crate::value::{BinaryReference, TextReference, Value};
use serde_json::{json, Map, Value as Json};

/// The externally-supplied values auto-injected parameters pull from,
/// instead of the wire. Absent where the call site has nothing to inject
/// (e.g. decoding a method's return value).
#[derive(Debug, Clone, Default)]
pub struct AutoInject {
    pub principal: Option<Json>,
    pub config: Option<Json>,
}

pub fn deserialize_data_value(
    data: &DataValue,
    signature: &Signature,
    inject: &AutoInject,
    ctx: &str,
) -> SdkResult<Vec<Json>> {
    let wire_params: Vec<&ParamInfo> = signature
        .params
        .iter()
        .filter(|p| !p.info.is_auto_injected())
        .collect();

    let wire_values = if let [single] = wire_params.as_slice() {
        if let TypeInfoInternal::Multimodal(cases) = &single.info {
            let value = match data {
                DataValue::Multimodal(elements) => deserialize_multimodal(elements, cases, ctx)?,
                DataValue::Tuple(elements) if elements.is_empty() => Json::Array(Vec::new()),
                DataValue::Tuple(_) => {
                    return Err(SdkError::type_mismatch(format!(
                        "{ctx}: expected a multimodal data value"
                    )))
                }
            };
            vec![value]
        } else {
            deserialize_tuple_params(data, &wire_params, ctx)?
        }
    } else {
        deserialize_tuple_params(data, &wire_params, ctx)?
    };

    assemble_outputs(signature, inject, wire_values, ctx)
}

fn deserialize_tuple_params(
    data: &DataValue,
    wire_params: &[&ParamInfo],
    ctx: &str,
) -> SdkResult<Vec<Json>> {
    let elements = match data {
        DataValue::Tuple(elements) => elements,
        DataValue::Multimodal(_) => {
            return Err(SdkError::type_mismatch(format!(
                "{ctx}: unexpected multimodal data value"
            )))
        }
    };

    let mut input_idx = 0;
    let mut values = Vec::with_capacity(wire_params.len());
    for param in wire_params {
        let schema = param.info.as_element_schema().ok_or_else(|| {
            SdkError::schema_construction(format!(
                "{ctx}(arg '{}'): parameter has no element schema",
                param.name
            ))
        })?;
        let element_ctx = format!("{ctx}(arg '{}')", param.name);

        match elements.get(input_idx) {
            Some(element) => {
                values.push(deserialize_element(element, &schema, &element_ctx)?);
                input_idx += 1;
            }
            None => match default_for_exhausted(&schema) {
                Some(default) => values.push(default),
                None => {
                    return Err(SdkError::unresolved_parameter(format!(
                        "{element_ctx}: missing required argument"
                    )))
                }
            },
        }
    }
    Ok(values)
}

/// Walks `signature.params` in full (auto-injected slots included), pulling
/// from `inject` for `Principal`/`Config` and from the already-decoded
/// `wire_values` (in wire order) for everything else.
fn assemble_outputs(
    signature: &Signature,
    inject: &AutoInject,
    wire_values: Vec<Json>,
    ctx: &str,
) -> SdkResult<Vec<Json>> {
    let mut wire_values = wire_values.into_iter();
    let mut outputs = Vec::with_capacity(signature.params.len());
    for param in &signature.params {
        match &param.info {
            TypeInfoInternal::Principal => {
                let value = inject.principal.clone().ok_or_else(|| {
                    SdkError::unresolved_parameter(format!(
                        "{ctx}: no principal available to inject for '{}'",
                        param.name
                    ))
                })?;
                outputs.push(value);
            }
            TypeInfoInternal::Config => {
                outputs.push(inject.config.clone().unwrap_or(Json::Null));
            }
            TypeInfoInternal::Element(_) | TypeInfoInternal::Multimodal(_) => {
                let value = wire_values.next().ok_or_else(|| {
                    SdkError::unresolved_parameter(format!(
                        "{ctx}: missing decoded value for '{}'",
                        param.name
                    ))
                })?;
                outputs.push(value);
            }
        }
    }
    Ok(outputs)
}

fn default_for_exhausted(schema: &ElementSchema) -> Option<Json> {
    match schema {
        ElementSchema::ComponentModel(typ) => {
            if typ.is_option_question_mark() {
                Some(Json::Null)
            } else if typ.is_empty_like() {
                Some(Json::Null)
            } else {
                None
            }
        }
        ElementSchema::UnstructuredText(_) | ElementSchema::UnstructuredBinary(_) => None,
    }
}

fn deserialize_element(element: &ElementValue, schema: &ElementSchema, ctx: &str) -> SdkResult<Json> {
    match (element, schema) {
        (ElementValue::ComponentModel(wit), ElementSchema::ComponentModel(typ)) => {
            let value = wit.to_value()?;
            deserialize_value(&value, typ, ctx)
        }
        (ElementValue::UnstructuredText(text_ref), ElementSchema::UnstructuredText(desc)) => {
            deserialize_text(text_ref, desc, ctx)
        }
        (ElementValue::UnstructuredBinary(bin_ref), ElementSchema::UnstructuredBinary(desc)) => {
            deserialize_binary(bin_ref, desc, ctx)
        }
        _ => Err(SdkError::type_mismatch(format!(
            "{ctx}: element value shape does not match its schema"
        ))),
    }
}

fn deserialize_multimodal(
    elements: &[NamedElementValue],
    cases: &[NamedElementSchema],
    ctx: &str,
) -> SdkResult<Json> {
    let mut parts = Vec::with_capacity(elements.len());
    for (i, element) in elements.iter().enumerate() {
        let item_ctx = format!("{ctx}[{i}]");
        let case = cases.iter().find(|c| c.name == element.name).ok_or_else(|| {
            SdkError::union_ambiguity_or_miss(format!(
                "{item_ctx}: unknown multimodal case '{}'",
                element.name
            ))
        })?;
        let payload = deserialize_element(&element.value, &case.schema, &item_ctx)?;
        parts.push(json!({ "tag": element.name, "val": payload }));
    }
    Ok(Json::Array(parts))
}

pub fn deserialize_value(value: &Value, typ: &AnalysedType, ctx: &str) -> SdkResult<Json> {
    match (value, typ) {
        (Value::Bool(b), AnalysedType::Bool) => Ok(Json::Bool(*b)),
        (Value::U8(v), AnalysedType::U8) => Ok(Json::from(*v)),
        (Value::U16(v), AnalysedType::U16) => Ok(Json::from(*v)),
        (Value::U32(v), AnalysedType::U32) => Ok(Json::from(*v)),
        (Value::U64(v), AnalysedType::U64) => Ok(Json::from(*v)),
        (Value::S8(v), AnalysedType::S8) => Ok(Json::from(*v)),
        (Value::S16(v), AnalysedType::S16) => Ok(Json::from(*v)),
        (Value::S32(v), AnalysedType::S32) => Ok(Json::from(*v)),
        (Value::S64(v), AnalysedType::S64) => Ok(Json::from(*v)),
        (Value::F32(v), AnalysedType::F32) => Ok(Json::from(*v as f64)),
        (Value::F64(v), AnalysedType::F64) => Ok(Json::from(*v)),
        (Value::Chr(c), AnalysedType::Chr) => Ok(Json::String(c.to_string())),
        (Value::String(s), AnalysedType::Str) => Ok(Json::String(s.clone())),
        (Value::Handle(_), AnalysedType::Handle) => Err(SdkError::schema_construction(format!(
            "{ctx}: resource handles cannot be deserialized to a host value"
        ))),
        (Value::Option(inner), AnalysedType::Option(option)) => match inner {
            Some(v) => deserialize_value(v, &option.inner, ctx),
            None => Ok(Json::Null),
        },
        (Value::List(items), AnalysedType::List(list)) => {
            let values = items
                .iter()
                .enumerate()
                .map(|(i, item)| deserialize_value(item, &list.inner, &format!("{ctx}[{i}]")))
                .collect::<SdkResult<Vec<_>>>()?;
            Ok(Json::Array(values))
        }
        (Value::Tuple(items), AnalysedType::Tuple(tuple)) => {
            if tuple.items.is_empty() {
                return Ok(Json::Null);
            }
            if items.len() != tuple.items.len() {
                return Err(SdkError::type_mismatch(format!(
                    "{ctx}: tuple arity mismatch: value has {}, schema has {}",
                    items.len(),
                    tuple.items.len()
                )));
            }
            let values = items
                .iter()
                .zip(&tuple.items)
                .enumerate()
                .map(|(i, (item, item_typ))| {
                    deserialize_value(item, item_typ, &format!("{ctx}[{i}]"))
                })
                .collect::<SdkResult<Vec<_>>>()?;
            Ok(Json::Array(values))
        }
        (Value::Record(fields), AnalysedType::Record(record)) => {
            if fields.len() != record.fields.len() {
                return Err(SdkError::type_mismatch(format!(
                    "{ctx}: record arity mismatch: value has {}, schema has {}",
                    fields.len(),
                    record.fields.len()
                )));
            }
            let mut obj = Map::with_capacity(fields.len());
            for (value, named_field) in fields.iter().zip(&record.fields) {
                let field_ctx = format!("{ctx}.{}", named_field.name);
                let decoded = deserialize_value(value, &named_field.typ, &field_ctx)?;
                // An absent optional field round-trips as a missing key, not
                // an explicit `null`.
                if decoded.is_null() && named_field.typ.is_option_question_mark() {
                    continue;
                }
                obj.insert(named_field.name.clone(), decoded);
            }
            Ok(Json::Object(obj))
        }
        (
            Value::Variant {
                case_idx,
                case_value,
            },
            AnalysedType::Variant(variant),
        ) => {
            let case = variant.cases.get(*case_idx as usize).ok_or_else(|| {
                SdkError::type_mismatch(format!("{ctx}: variant case index {case_idx} out of range"))
            })?;
            if variant.tagged {
                let mut obj = Map::with_capacity(2);
                obj.insert("tag".to_string(), Json::String(case.name.clone()));
                if let (Some(case_typ), Some(case_value)) = (&case.typ, case_value) {
                    obj.insert("val".to_string(), deserialize_value(case_value, case_typ, ctx)?);
                }
                Ok(Json::Object(obj))
            } else {
                match (&case.typ, case_value) {
                    (Some(case_typ), Some(case_value)) => deserialize_value(case_value, case_typ, ctx),
                    (None, None) => Ok(Json::Null),
                    _ => Err(SdkError::type_mismatch(format!(
                        "{ctx}: untagged union case/value shape mismatch"
                    ))),
                }
            }
        }
        (Value::Enum(idx), AnalysedType::Enum(enum_type)) => enum_type
            .cases
            .get(*idx as usize)
            .map(|name| Json::String(name.clone()))
            .ok_or_else(|| SdkError::type_mismatch(format!("{ctx}: enum case index {idx} out of range"))),
        (Value::Flags(bits), AnalysedType::Flags(flags)) => {
            if bits.len() != flags.names.len() {
                return Err(SdkError::type_mismatch(format!(
                    "{ctx}: flags arity mismatch: value has {}, schema has {}",
                    bits.len(),
                    flags.names.len()
                )));
            }
            let set: Vec<Json> = flags
                .names
                .iter()
                .zip(bits)
                .filter(|(_, set)| **set)
                .map(|(name, _)| Json::String(name.clone()))
                .collect();
            Ok(Json::Array(set))
        }
        (Value::Result(result), AnalysedType::Result(result_type)) => match result {
            Ok(ok) => deserialize_result_side("ok", ok.as_deref(), &result_type.ok, ctx),
            Err(err) => deserialize_result_side("err", err.as_deref(), &result_type.err, ctx),
        },
        (value, typ) => Err(SdkError::type_mismatch(format!(
            "{ctx}: value shape {value:?} does not match schema {typ:?}"
        ))),
    }
}

fn deserialize_result_side(
    tag: &str,
    value: Option<&Value>,
    side: &crate::analysed_type::ResultSide,
    ctx: &str,
) -> SdkResult<Json> {
    let mut obj = Map::with_capacity(2);
    obj.insert("tag".to_string(), Json::String(tag.to_string()));
    if let (Some(typ), Some(value)) = (&side.typ, value) {
        obj.insert("val".to_string(), deserialize_value(value, typ, ctx)?);
    }
    Ok(Json::Object(obj))
}

fn deserialize_text(text_ref: &TextReference, desc: &TextDescriptor, ctx: &str) -> SdkResult<Json> {
    match text_ref {
        TextReference::Url(url) => Ok(json!({ "tag": "url", "val": url })),
        TextReference::Inline(source) => {
            if let (Some(allowed), Some(code)) = (&desc.restrictions, &source.language_code) {
                if !allowed.iter().any(|a| a == code) {
                    return Err(SdkError::unstructured_cast(format!(
                        "{ctx}: language code '{code}' is not in the allowed set"
                    )));
                }
            }
            let mut obj = Map::with_capacity(3);
            obj.insert("tag".to_string(), Json::String("inline".to_string()));
            obj.insert("val".to_string(), Json::String(source.data.clone()));
            if let Some(code) = &source.language_code {
                obj.insert("languageCode".to_string(), Json::String(code.clone()));
            }
            Ok(Json::Object(obj))
        }
    }
}

fn deserialize_binary(bin_ref: &BinaryReference, desc: &BinaryDescriptor, ctx: &str) -> SdkResult<Json> {
    match bin_ref {
        BinaryReference::Url(url) => Ok(json!({ "tag": "url", "val": url })),
        BinaryReference::Inline(source) => {
            if let (Some(allowed), Some(mime)) = (&desc.restrictions, &source.mime_type) {
                if !allowed.iter().any(|a| a == mime) {
                    return Err(SdkError::unstructured_cast(format!(
                        "{ctx}: mime type '{mime}' is not in the allowed set"
                    )));
                }
            }
            let mut obj = Map::with_capacity(3);
            obj.insert("tag".to_string(), Json::String("inline".to_string()));
            let bytes: Vec<Json> = source.data.iter().map(|b| Json::from(*b)).collect();
            obj.insert("val".to_string(), Json::Array(bytes));
            if let Some(mime) = &source.mime_type {
                obj.insert("mimeType".to_string(), Json::String(mime.clone()));
            }
            Ok(Json::Object(obj))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysed_type as at;

    #[test]
    fn decodes_primitives() {
        assert_eq!(
            deserialize_value(&Value::U32(7), &at::u32_(), "test").unwrap(),
            json!(7)
        );
        assert_eq!(
            deserialize_value(&Value::Bool(true), &at::bool_(), "test").unwrap(),
            json!(true)
        );
    }

    #[test]
    fn decodes_empty_tuple_to_null() {
        let value = Value::Tuple(vec![]);
        let typ = at::unit();
        assert_eq!(deserialize_value(&value, &typ, "test").unwrap(), Json::Null);
    }

    #[test]
    fn decodes_tagged_union() {
        let typ = at::tagged_variant(vec![at::case("added", at::u32_()), at::unit_case("removed")]);
        let value = Value::Variant {
            case_idx: 1,
            case_value: None,
        };
        assert_eq!(
            deserialize_value(&value, &typ, "test").unwrap(),
            json!({"tag": "removed"})
        );
    }

    #[test]
    fn principal_is_injected_without_consuming_wire_slot() {
        use crate::registry::{ParamInfo, Signature};
        use crate::schema::ElementSchema;

        let signature = Signature {
            params: vec![
                ParamInfo {
                    name: "caller".to_string(),
                    info: TypeInfoInternal::Principal,
                },
                ParamInfo {
                    name: "amount".to_string(),
                    info: TypeInfoInternal::Element(ElementSchema::ComponentModel(at::u32_())),
                },
            ],
        };
        let data = DataValue::Tuple(vec![ElementValue::ComponentModel(
            crate::wit_value::WitValue::from_value(&Value::U32(42)),
        )]);
        let inject = AutoInject {
            principal: Some(json!("urn:principal:abc")),
            config: None,
        };
        let outputs = deserialize_data_value(&data, &signature, &inject, "test").unwrap();
        assert_eq!(outputs, vec![json!("urn:principal:abc"), json!(42)]);
    }
}

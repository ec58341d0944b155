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

//! Host value (`serde_json::Value`) → wire value. Used by the proxy
//! (`crate::proxy`) to turn constructor/method arguments supplied by calling
//! code into the `DataValue` that actually crosses the RPC boundary.
//!
//! Every tagged shape at this boundary (union case, `Result` side, inline
//! unstructured text/binary) is a plain JSON object carrying a string `tag`
//! and, where the case has a payload, a `val` — one convention reused
//! everywhere instead of a different ad hoc shape per construct.

use crate::analysed_type::{AnalysedType, EmptyKind};
use crate::data_value::{DataValue, ElementValue, NamedElementValue};
use crate::error::{SdkError, SdkResult};
use crate::registry::{ParamInfo, Signature};
use crate::schema::{BinaryDescriptor, ElementSchema, NamedElementSchema, TextDescriptor};
use crate::type_info::TypeInfoInternal;
use crate::value::{BinaryReference, BinarySource, TextReference, TextSource, Value};
use crate::wit_value::WitValue;
use serde_json::Value as Json;

/// Serializes the non-auto-injected arguments of a constructor call or method
/// invocation into the `DataValue` a [`Signature`] describes.
pub fn serialize_data_value(host_args: &[Json], signature: &Signature, ctx: &str) -> SdkResult<DataValue> {
    let wire_params: Vec<&ParamInfo> = signature
        .params
        .iter()
        .filter(|p| !p.info.is_auto_injected())
        .collect();

    if let [single] = wire_params.as_slice() {
        if let TypeInfoInternal::Multimodal(cases) = &single.info {
            let host_arg = host_args.first().ok_or_else(|| {
                SdkError::unresolved_parameter(format!(
                    "{ctx}: missing multimodal argument '{}'",
                    single.name
                ))
            })?;
            return serialize_multimodal(host_arg, cases, ctx);
        }
    }

    if wire_params.len() != host_args.len() {
        return Err(SdkError::unresolved_parameter(format!(
            "{ctx}: expected {} argument(s), got {}",
            wire_params.len(),
            host_args.len()
        )));
    }

    let mut elements = Vec::with_capacity(wire_params.len());
    for (param, host_arg) in wire_params.iter().zip(host_args.iter()) {
        let element_ctx = format!("{ctx}(arg '{}')", param.name);
        let schema = param.info.as_element_schema().ok_or_else(|| {
            SdkError::schema_construction(format!(
                "{element_ctx}: parameter has no element schema"
            ))
        })?;
        elements.push(serialize_element(host_arg, &schema, &element_ctx)?);
    }
    Ok(DataValue::Tuple(elements))
}

fn serialize_element(host: &Json, schema: &ElementSchema, ctx: &str) -> SdkResult<ElementValue> {
    match schema {
        ElementSchema::ComponentModel(typ) => {
            let value = serialize_value(host, typ, ctx)?;
            Ok(ElementValue::ComponentModel(WitValue::from_value(&value)))
        }
        ElementSchema::UnstructuredText(desc) => {
            serialize_text(host, desc, ctx).map(ElementValue::UnstructuredText)
        }
        ElementSchema::UnstructuredBinary(desc) => {
            serialize_binary(host, desc, ctx).map(ElementValue::UnstructuredBinary)
        }
    }
}

fn serialize_multimodal(host: &Json, cases: &[NamedElementSchema], ctx: &str) -> SdkResult<DataValue> {
    let items = host.as_array().ok_or_else(|| {
        SdkError::type_mismatch(format!("{ctx}: expected an array of multimodal parts"))
    })?;

    let mut elements = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let item_ctx = format!("{ctx}[{i}]");
        let (tag, val) = tag_and_val(item, &item_ctx)?;
        let case = cases.iter().find(|c| c.name == tag).ok_or_else(|| {
            SdkError::union_ambiguity_or_miss(format!(
                "{item_ctx}: unknown multimodal case '{tag}'"
            ))
        })?;
        let payload = val.cloned().unwrap_or(Json::Null);
        let value = serialize_element(&payload, &case.schema, &item_ctx)?;
        elements.push(NamedElementValue {
            name: tag,
            value,
        });
    }
    Ok(DataValue::Multimodal(elements))
}

fn tag_and_val<'a>(host: &'a Json, ctx: &str) -> SdkResult<(String, Option<&'a Json>)> {
    let obj = host
        .as_object()
        .ok_or_else(|| SdkError::type_mismatch(format!("{ctx}: expected a tagged object")))?;
    let tag = obj
        .get("tag")
        .and_then(Json::as_str)
        .ok_or_else(|| SdkError::type_mismatch(format!("{ctx}: missing string 'tag' field")))?
        .to_string();
    Ok((tag, obj.get("val")))
}

pub fn serialize_value(host: &Json, typ: &AnalysedType, ctx: &str) -> SdkResult<Value> {
    match typ {
        AnalysedType::Bool => host
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| type_mismatch(ctx, "boolean")),
        AnalysedType::U8 => as_u64(host, ctx, "u8", u8::MAX as u64).map(|v| Value::U8(v as u8)),
        AnalysedType::U16 => as_u64(host, ctx, "u16", u16::MAX as u64).map(|v| Value::U16(v as u16)),
        AnalysedType::U32 => as_u64(host, ctx, "u32", u32::MAX as u64).map(|v| Value::U32(v as u32)),
        AnalysedType::U64 => host
            .as_u64()
            .map(Value::U64)
            .ok_or_else(|| type_mismatch(ctx, "u64")),
        AnalysedType::S8 => as_i64(host, ctx, "s8", i8::MIN as i64, i8::MAX as i64).map(|v| Value::S8(v as i8)),
        AnalysedType::S16 => {
            as_i64(host, ctx, "s16", i16::MIN as i64, i16::MAX as i64).map(|v| Value::S16(v as i16))
        }
        AnalysedType::S32 => {
            as_i64(host, ctx, "s32", i32::MIN as i64, i32::MAX as i64).map(|v| Value::S32(v as i32))
        }
        AnalysedType::S64 => host
            .as_i64()
            .map(Value::S64)
            .ok_or_else(|| type_mismatch(ctx, "s64")),
        AnalysedType::F32 => host
            .as_f64()
            .map(|v| Value::F32(v as f32))
            .ok_or_else(|| type_mismatch(ctx, "f32")),
        AnalysedType::F64 => host
            .as_f64()
            .map(Value::F64)
            .ok_or_else(|| type_mismatch(ctx, "f64")),
        AnalysedType::Chr => {
            let s = host.as_str().ok_or_else(|| type_mismatch(ctx, "char"))?;
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(Value::Chr(c)),
                _ => Err(type_mismatch(ctx, "single-character string")),
            }
        }
        AnalysedType::Str => host
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| type_mismatch(ctx, "string")),
        AnalysedType::Handle => Err(SdkError::schema_construction(format!(
            "{ctx}: resource handles cannot be serialized from a host value"
        ))),
        AnalysedType::Option(option) => {
            if host.is_null() {
                Ok(Value::none())
            } else {
                Ok(Value::some(serialize_value(host, &option.inner, ctx)?))
            }
        }
        AnalysedType::List(list) => {
            let items = host
                .as_array()
                .ok_or_else(|| type_mismatch(ctx, "array"))?;
            let values = items
                .iter()
                .enumerate()
                .map(|(i, item)| serialize_value(item, &list.inner, &format!("{ctx}[{i}]")))
                .collect::<SdkResult<Vec<_>>>()?;
            Ok(Value::List(values))
        }
        AnalysedType::Tuple(tuple) => serialize_tuple(host, &tuple.items, ctx),
        AnalysedType::Record(record) => {
            let obj = host
                .as_object()
                .ok_or_else(|| type_mismatch(ctx, "object"))?;
            let mut fields = Vec::with_capacity(record.fields.len());
            for field in &record.fields {
                let field_ctx = format!("{ctx}.{}", field.name);
                match obj.get(&field.name) {
                    Some(value) => fields.push(serialize_value(value, &field.typ, &field_ctx)?),
                    None if field.typ.is_option_question_mark() => fields.push(Value::none()),
                    None => {
                        return Err(SdkError::type_mismatch(format!(
                            "{field_ctx}: missing required field"
                        )))
                    }
                }
            }
            Ok(Value::Record(fields))
        }
        AnalysedType::Variant(variant) => {
            if variant.tagged {
                let (tag, val) = tag_and_val(host, ctx)?;
                let (idx, case) = variant
                    .cases
                    .iter()
                    .enumerate()
                    .find(|(_, c)| c.name == tag)
                    .ok_or_else(|| {
                        SdkError::union_ambiguity_or_miss(format!(
                            "{ctx}: unknown union case '{tag}'"
                        ))
                    })?;
                let case_value = match &case.typ {
                    Some(case_typ) => {
                        let payload = val.ok_or_else(|| {
                            SdkError::type_mismatch(format!(
                                "{ctx}: case '{tag}' requires a 'val'"
                            ))
                        })?;
                        Some(Box::new(serialize_value(payload, case_typ, ctx)?))
                    }
                    None => None,
                };
                Ok(Value::Variant {
                    case_idx: idx as u32,
                    case_value,
                })
            } else {
                serialize_untagged_variant(host, variant, ctx)
            }
        }
        AnalysedType::Enum(enum_type) => {
            let s = host.as_str().ok_or_else(|| type_mismatch(ctx, "string"))?;
            let idx = enum_type
                .cases
                .iter()
                .position(|c| c == s)
                .ok_or_else(|| SdkError::type_mismatch(format!("{ctx}: unknown enum case '{s}'")))?;
            Ok(Value::Enum(idx as u32))
        }
        AnalysedType::Flags(flags) => {
            let set: Vec<&str> = host
                .as_array()
                .ok_or_else(|| type_mismatch(ctx, "array of flag names"))?
                .iter()
                .map(|v| v.as_str().ok_or_else(|| type_mismatch(ctx, "string")))
                .collect::<SdkResult<Vec<_>>>()?;
            let bits = flags
                .names
                .iter()
                .map(|name| set.contains(&name.as_str()))
                .collect();
            Ok(Value::Flags(bits))
        }
        AnalysedType::Result(result) => {
            let (tag, val) = tag_and_val(host, ctx)?;
            match tag.as_str() {
                "ok" => serialize_result_side(&result.ok, val, ctx).map(Value::ok),
                "err" => serialize_result_side(&result.err, val, ctx).map(Value::err),
                other => Err(SdkError::type_mismatch(format!(
                    "{ctx}: unknown result tag '{other}'"
                ))),
            }
        }
    }
}

fn serialize_result_side(
    side: &crate::analysed_type::ResultSide,
    val: Option<&Json>,
    ctx: &str,
) -> SdkResult<Option<Value>> {
    match (&side.typ, side.empty_kind) {
        (Some(typ), _) => {
            let payload = val.ok_or_else(|| {
                SdkError::type_mismatch(format!("{ctx}: result side requires a 'val'"))
            })?;
            Ok(Some(serialize_value(payload, typ, ctx)?))
        }
        (None, Some(_)) => Ok(None),
        (None, None) => Err(SdkError::schema_construction(format!(
            "{ctx}: result side has neither a type nor an empty kind"
        ))),
    }
}

fn serialize_tuple(host: &Json, items: &[AnalysedType], ctx: &str) -> SdkResult<Value> {
    if items.is_empty() {
        return Ok(Value::Tuple(Vec::new()));
    }
    let elements = host
        .as_array()
        .ok_or_else(|| type_mismatch(ctx, "array"))?;
    if elements.len() != items.len() {
        return Err(SdkError::type_mismatch(format!(
            "{ctx}: expected a {}-tuple, got {} element(s)",
            items.len(),
            elements.len()
        )));
    }
    let values = elements
        .iter()
        .zip(items)
        .enumerate()
        .map(|(i, (element, item_typ))| serialize_value(element, item_typ, &format!("{ctx}[{i}]")))
        .collect::<SdkResult<Vec<_>>>()?;
    Ok(Value::Tuple(values))
}

/// Untagged unions are resolved structurally: every case is attempted, and
/// exactly one must succeed — ambiguity and no-match are both reported as
/// [`SdkError::UnionAmbiguityOrMiss`].
fn serialize_untagged_variant(
    host: &Json,
    variant: &crate::analysed_type::VariantType,
    ctx: &str,
) -> SdkResult<Value> {
    let mut matches = Vec::new();
    for (idx, case) in variant.cases.iter().enumerate() {
        let attempt = match &case.typ {
            Some(typ) => serialize_value(host, typ, ctx).ok().map(Some),
            None if host.is_null() => Some(None),
            None => None,
        };
        if let Some(case_value) = attempt {
            matches.push((idx, case_value));
        }
    }
    match matches.len() {
        0 => Err(SdkError::union_ambiguity_or_miss(format!(
            "{ctx}: no union case matched the given value"
        ))),
        1 => {
            let (idx, case_value) = matches.into_iter().next().unwrap();
            Ok(Value::Variant {
                case_idx: idx as u32,
                case_value: case_value.map(Box::new),
            })
        }
        _ => Err(SdkError::union_ambiguity_or_miss(format!(
            "{ctx}: value matched more than one union case"
        ))),
    }
}

fn serialize_text(host: &Json, desc: &TextDescriptor, ctx: &str) -> SdkResult<TextReference> {
    let (tag, val) = tag_and_val(host, ctx)?;
    match tag.as_str() {
        "url" => {
            let url = val
                .and_then(Json::as_str)
                .ok_or_else(|| SdkError::unstructured_cast(format!("{ctx}: url reference missing string 'val'")))?;
            Ok(TextReference::Url(url.to_string()))
        }
        "inline" => {
            let data = val
                .and_then(Json::as_str)
                .ok_or_else(|| SdkError::unstructured_cast(format!("{ctx}: inline text missing string 'val'")))?
                .to_string();
            let language_code = host
                .get("languageCode")
                .and_then(Json::as_str)
                .map(|s| s.to_string());
            if let (Some(allowed), Some(code)) = (&desc.restrictions, &language_code) {
                if !allowed.iter().any(|a| a == code) {
                    return Err(SdkError::unstructured_cast(format!(
                        "{ctx}: language code '{code}' is not in the allowed set"
                    )));
                }
            }
            Ok(TextReference::Inline(TextSource { data, language_code }))
        }
        other => Err(SdkError::unstructured_cast(format!(
            "{ctx}: unknown unstructured-text tag '{other}'"
        ))),
    }
}

fn serialize_binary(host: &Json, desc: &BinaryDescriptor, ctx: &str) -> SdkResult<BinaryReference> {
    let (tag, val) = tag_and_val(host, ctx)?;
    match tag.as_str() {
        "url" => {
            let url = val
                .and_then(Json::as_str)
                .ok_or_else(|| SdkError::unstructured_cast(format!("{ctx}: url reference missing string 'val'")))?;
            Ok(BinaryReference::Url(url.to_string()))
        }
        "inline" => {
            let data = bytes_from_json(
                val.ok_or_else(|| {
                    SdkError::unstructured_cast(format!("{ctx}: inline binary missing 'val'"))
                })?,
                ctx,
            )?;
            let mime_type = host
                .get("mimeType")
                .and_then(Json::as_str)
                .map(|s| s.to_string());
            if let (Some(allowed), Some(mime)) = (&desc.restrictions, &mime_type) {
                if !allowed.iter().any(|a| a == mime) {
                    return Err(SdkError::unstructured_cast(format!(
                        "{ctx}: mime type '{mime}' is not in the allowed set"
                    )));
                }
            }
            Ok(BinaryReference::Inline(BinarySource { data, mime_type }))
        }
        other => Err(SdkError::unstructured_cast(format!(
            "{ctx}: unknown unstructured-binary tag '{other}'"
        ))),
    }
}

/// Inline binary payloads are carried as a JSON array of byte values rather
/// than a base64 string, so no additional dependency is needed just to cross
/// this boundary.
fn bytes_from_json(val: &Json, ctx: &str) -> SdkResult<Vec<u8>> {
    let items = val
        .as_array()
        .ok_or_else(|| SdkError::unstructured_cast(format!("{ctx}: inline binary 'val' must be a byte array")))?;
    items
        .iter()
        .map(|b| {
            b.as_u64()
                .filter(|v| *v <= u8::MAX as u64)
                .map(|v| v as u8)
                .ok_or_else(|| SdkError::unstructured_cast(format!("{ctx}: byte value out of range")))
        })
        .collect()
}

fn as_u64(host: &Json, ctx: &str, label: &str, max: u64) -> SdkResult<u64> {
    let v = host.as_u64().ok_or_else(|| type_mismatch(ctx, label))?;
    if v > max {
        return Err(SdkError::type_mismatch(format!("{ctx}: {v} overflows {label}")));
    }
    Ok(v)
}

fn as_i64(host: &Json, ctx: &str, label: &str, min: i64, max: i64) -> SdkResult<i64> {
    let v = host.as_i64().ok_or_else(|| type_mismatch(ctx, label))?;
    if v < min || v > max {
        return Err(SdkError::type_mismatch(format!("{ctx}: {v} overflows {label}")));
    }
    Ok(v)
}

fn type_mismatch(ctx: &str, expected: &str) -> SdkError {
    SdkError::type_mismatch(format!("{ctx}: expected a {expected}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysed_type as at;
    use serde_json::json;

    #[test]
    fn serializes_primitives() {
        let ctx = "test";
        assert_eq!(serialize_value(&json!(true), &at::bool_(), ctx).unwrap(), Value::Bool(true));
        assert_eq!(serialize_value(&json!(7), &at::u32_(), ctx).unwrap(), Value::U32(7));
        assert_eq!(serialize_value(&json!("hi"), &at::str_(), ctx).unwrap(), Value::String("hi".into()));
        assert!(serialize_value(&json!(-1), &at::u32_(), ctx).is_err());
    }

    #[test]
    fn serializes_question_mark_option_field() {
        let typ = at::record(vec![at::field("nick", at::option_question_mark(at::str_()))]);
        let v = serialize_value(&json!({}), &typ, "test").unwrap();
        assert_eq!(v, Value::Record(vec![Value::none()]));
    }

    #[test]
    fn rejects_untagged_union_with_no_match() {
        let typ = at::variant(vec![at::case("a", at::str_()), at::case("b", at::bool_())]);
        assert!(serialize_value(&json!(42), &typ, "test").is_err());
    }

    #[test]
    fn serializes_tagged_union() {
        let typ = at::tagged_variant(vec![at::case("added", at::u32_()), at::unit_case("removed")]);
        let v = serialize_value(&json!({"tag": "added", "val": 3}), &typ, "test").unwrap();
        assert_eq!(
            v,
            Value::Variant {
                case_idx: 0,
                case_value: Some(Box::new(Value::U32(3)))
            }
        );
    }

    #[test]
    fn serializes_inbuilt_result() {
        let typ = at::result_ok(at::u32_(), EmptyKind::Void);
        let v = serialize_value(&json!({"tag": "ok", "val": 5}), &typ, "test").unwrap();
        assert_eq!(v, Value::ok(Some(Value::U32(5))));
        let v = serialize_value(&json!({"tag": "err"}), &typ, "test").unwrap();
        assert_eq!(v, Value::err(None));
    }
}

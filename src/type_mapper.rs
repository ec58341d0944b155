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

//! Converts a reflected type node into an [`AnalysedType`].

use crate::analysed_type::{
    self as at, AnalysedType, EmptyKind, OptionOrigin, ResultForm, ResultSide, ResultType,
    TypedArrayKind, VariantCase, VariantType,
};
use crate::error::{SdkError, SdkResult};
use crate::reflect::{ReflectedType, TypeKind, BOXED_PRIMITIVES};

/// Per-call-site context threaded through the mapper purely for error
/// messages and the "optional field" wrapping rule.
#[derive(Debug, Clone)]
pub struct MapperScope {
    /// e.g. `"MyAgent::new(arg 'count')"` or `"MyAgent.increment() return type"`.
    pub context: String,
    pub optional: bool,
}

impl MapperScope {
    pub fn new(context: impl Into<String>, optional: bool) -> Self {
        MapperScope {
            context: context.into(),
            optional,
        }
    }

    fn child(&self, suffix: impl std::fmt::Display) -> MapperScope {
        MapperScope {
            context: format!("{} > {}", self.context, suffix),
            optional: false,
        }
    }
}

const TYPED_ARRAY_ELEMENT_NAMES: &[(&str, TypedArrayKind)] = &[
    ("Uint8Array", TypedArrayKind::U8),
    ("Uint16Array", TypedArrayKind::U16),
    ("Uint32Array", TypedArrayKind::U32),
    ("Int8Array", TypedArrayKind::I8),
    ("Int16Array", TypedArrayKind::I16),
    ("Int32Array", TypedArrayKind::I32),
    ("Float32Array", TypedArrayKind::F32),
    ("Float64Array", TypedArrayKind::F64),
    ("BigUint64Array", TypedArrayKind::BigU64),
    ("BigInt64Array", TypedArrayKind::BigI64),
];

pub fn map_type(typ: &ReflectedType, scope: &MapperScope) -> SdkResult<AnalysedType> {
    let mapped = map_type_unwrapped(typ, scope)?;
    if scope.optional && !mapped.is_option_question_mark() {
        Ok(at::option_question_mark(mapped))
    } else {
        Ok(mapped)
    }
}

fn map_type_unwrapped(typ: &ReflectedType, scope: &MapperScope) -> SdkResult<AnalysedType> {
    if let Some(name) = &typ.name {
        if BOXED_PRIMITIVES.contains(&name.as_str()) {
            return Err(SdkError::schema_construction(format!(
                "{}: boxed primitive `{name}` is not supported, use the primitive type instead",
                scope.context
            )));
        }
    }

    match typ.kind() {
        TypeKind::Boolean => Ok(at::bool_()),
        TypeKind::Number => Ok(at::f64_()),
        TypeKind::String => Ok(at::str_()),
        TypeKind::BigInt => Ok(at::u64_()),

        TypeKind::Array => map_array(typ, scope),
        TypeKind::Map => map_map(typ, scope),
        TypeKind::Tuple => map_tuple(typ, scope),
        TypeKind::Object | TypeKind::Interface => map_object(typ, scope),
        TypeKind::Literal => map_literal(typ, scope),
        TypeKind::Union => map_union(typ, scope),
        TypeKind::Promise => map_promise(typ, scope),
        TypeKind::Alias => {
            let inner = typ.element.as_deref().ok_or_else(|| {
                SdkError::schema_construction(format!(
                    "{}: alias type has no aliased type",
                    scope.context
                ))
            })?;
            map_type_unwrapped(inner, scope)
        }

        TypeKind::Class => Err(SdkError::schema_construction(format!(
            "{}: class types are not supported as parameters or return values",
            scope.context
        ))),
        TypeKind::Null | TypeKind::Undefined | TypeKind::Void => {
            Err(SdkError::schema_construction(format!(
                "{}: `{:?}` is only supported as part of an Option/Result/void return type",
                scope.context,
                typ.kind()
            )))
        }
        TypeKind::Principal => Err(SdkError::schema_construction(format!(
            "{}: principal types are only supported as constructor/method parameters",
            scope.context
        ))),
        TypeKind::Others | TypeKind::UnresolvedType => Err(SdkError::schema_construction(format!(
            "{}: unresolved or unsupported reflected type",
            scope.context
        ))),
    }
}

fn map_array(typ: &ReflectedType, scope: &MapperScope) -> SdkResult<AnalysedType> {
    let element = typ.element.as_deref().ok_or_else(|| {
        SdkError::schema_construction(format!("{}: array type has no element type", scope.context))
    })?;

    if let Some(element_name) = &element.name {
        if let Some((_, kind)) = TYPED_ARRAY_ELEMENT_NAMES
            .iter()
            .find(|(n, _)| n == element_name)
        {
            return Ok(at::typed_array(
                map_type_unwrapped(element, &scope.child("[typed-array element]"))?,
                *kind,
            ));
        }
    }

    let inner = map_type_unwrapped(element, &scope.child("[]"))?;
    Ok(at::list(inner))
}

fn map_map(typ: &ReflectedType, scope: &MapperScope) -> SdkResult<AnalysedType> {
    let key = typ.type_params.first().ok_or_else(|| {
        SdkError::schema_construction(format!("{}: map type missing key type param", scope.context))
    })?;
    let value = typ.type_params.get(1).ok_or_else(|| {
        SdkError::schema_construction(format!(
            "{}: map type missing value type param",
            scope.context
        ))
    })?;

    let key_type = map_type_unwrapped(key, &scope.child("[key]"))?;
    let value_type = map_type_unwrapped(value, &scope.child("[value]"))?;
    Ok(at::map(key_type, value_type))
}

fn map_tuple(typ: &ReflectedType, scope: &MapperScope) -> SdkResult<AnalysedType> {
    let mut items = Vec::with_capacity(typ.elements.len());
    for (i, element) in typ.elements.iter().enumerate() {
        items.push(map_type_unwrapped(element, &scope.child(format!("[{i}]")))?);
    }
    Ok(at::tuple(items))
}

fn map_object(typ: &ReflectedType, scope: &MapperScope) -> SdkResult<AnalysedType> {
    let mut fields = Vec::with_capacity(typ.properties.len());
    for (name, prop) in &typ.properties {
        let field_scope = MapperScope::new(
            format!("{} > field '{name}'", scope.context),
            prop.optional,
        );
        let field_type = map_type(&prop.typ, &field_scope)?;
        fields.push(at::field(name.clone(), field_type));
    }
    let record = at::record(fields);
    Ok(match &typ.name {
        Some(name) => record.named(name.clone()),
        None => record,
    })
}

fn map_literal(typ: &ReflectedType, scope: &MapperScope) -> SdkResult<AnalysedType> {
    let value = typ.literal_value.as_ref().ok_or_else(|| {
        SdkError::schema_construction(format!("{}: literal type has no value", scope.context))
    })?;

    match value {
        serde_json::Value::Bool(_) => Ok(at::bool_()),
        serde_json::Value::String(s) => Ok(at::enum_(&[s.as_str()])),
        serde_json::Value::Number(_) => Err(SdkError::schema_construction(format!(
            "{}: numeric literal types are not supported",
            scope.context
        ))),
        _ => Err(SdkError::schema_construction(format!(
            "{}: unsupported literal value",
            scope.context
        ))),
    }
}

pub(crate) fn is_empty_like(typ: &ReflectedType) -> Option<EmptyKind> {
    match typ.kind() {
        TypeKind::Void => Some(EmptyKind::Void),
        TypeKind::Null => Some(EmptyKind::Null),
        TypeKind::Undefined => Some(EmptyKind::Undefined),
        _ => None,
    }
}

/// A union member counts as a tagged-union case when it is an object with a
/// literal string `tag` property and (optionally) a `val` property.
pub(crate) fn tagged_case_name(member: &ReflectedType) -> Option<(String, Option<ReflectedType>)> {
    if !matches!(member.kind(), TypeKind::Object | TypeKind::Interface) {
        return None;
    }
    let tag_prop = member.properties.get("tag")?;
    let tag_name = match tag_prop.typ.kind() {
        TypeKind::Literal => match tag_prop.typ.literal_value.as_ref()?.as_str() {
            Some(s) => s.to_string(),
            None => return None,
        },
        _ => return None,
    };
    let val_type = member.properties.get("val").map(|p| p.typ.clone());
    Some((tag_name, val_type))
}

fn map_union(typ: &ReflectedType, scope: &MapperScope) -> SdkResult<AnalysedType> {
    let members = &typ.union_types;
    if members.is_empty() {
        return Err(SdkError::schema_construction(format!(
            "{}: union type has no members",
            scope.context
        )));
    }

    // Tagged union: every member carries a literal `tag` + optional `val`.
    let tagged: Option<Vec<(String, Option<ReflectedType>)>> =
        members.iter().map(tagged_case_name).collect();
    if let Some(tagged_members) = tagged {
        let mut cases = Vec::with_capacity(tagged_members.len());
        for (tag, val_type) in tagged_members {
            let case = match val_type {
                Some(val_type) => VariantCase {
                    name: tag,
                    typ: Some(map_type_unwrapped(
                        &val_type,
                        &scope.child("[tagged val]"),
                    )?),
                },
                None => VariantCase {
                    name: tag,
                    typ: None,
                },
            };
            cases.push(case);
        }
        return Ok(AnalysedType::Variant(VariantType {
            name: typ.name.clone(),
            cases,
            tagged: true,
        }));
    }

    // `X | undefined` / `X | null` / `X | void`.
    if members.len() == 2 {
        let empties: Vec<_> = members.iter().map(is_empty_like).collect();
        if let [Some(_), None] = empties.as_slice() {
            let inner = map_type_unwrapped(&members[1], &scope.child("Option inner"))?;
            return Ok(at::option_union(inner));
        }
        if let [None, Some(_)] = empties.as_slice() {
            let inner = map_type_unwrapped(&members[0], &scope.child("Option inner"))?;
            return Ok(at::option_union(inner));
        }
    }

    // `Result<Ok, Err>`.
    if members.len() == 2 {
        if let Some(result_type) = try_map_result_union(members, scope)? {
            return Ok(result_type);
        }
    }

    // Untagged union: structural match at the serializer, synthetic case names.
    let mut cases = Vec::with_capacity(members.len());
    for (i, member) in members.iter().enumerate() {
        let mapped = map_type_unwrapped(member, &scope.child(format!("case {i}")))?;
        cases.push(VariantCase {
            name: format!("case-{i}"),
            typ: Some(mapped),
        });
    }
    Ok(AnalysedType::Variant(VariantType {
        name: typ.name.clone(),
        cases,
        tagged: false,
    }))
}

fn try_map_result_union(
    members: &[ReflectedType],
    scope: &MapperScope,
) -> SdkResult<Option<AnalysedType>> {
    let names: Vec<Option<&str>> = members.iter().map(|m| m.name.as_deref()).collect();
    let ok_idx = names.iter().position(|n| *n == Some("Ok"));
    let err_idx = names.iter().position(|n| *n == Some("Err"));
    let (ok_idx, err_idx) = match (ok_idx, err_idx) {
        (Some(o), Some(e)) => (o, e),
        _ => return Ok(None),
    };

    let ok_member = &members[ok_idx];
    let err_member = &members[err_idx];
    let ok_payload = ok_member.type_params.first();
    let err_payload = err_member.type_params.first();

    let ok_side = match ok_payload {
        Some(t) if is_empty_like(t).is_none() => ResultSide {
            typ: Some(Box::new(map_type_unwrapped(t, &scope.child("Result::Ok"))?)),
            empty_kind: None,
        },
        Some(t) => ResultSide {
            typ: None,
            empty_kind: is_empty_like(t),
        },
        None => ResultSide {
            typ: None,
            empty_kind: Some(EmptyKind::Void),
        },
    };
    let err_side = match err_payload {
        Some(t) if is_empty_like(t).is_none() => ResultSide {
            typ: Some(Box::new(map_type_unwrapped(t, &scope.child("Result::Err"))?)),
            empty_kind: None,
        },
        Some(t) => ResultSide {
            typ: None,
            empty_kind: is_empty_like(t),
        },
        None => ResultSide {
            typ: None,
            empty_kind: Some(EmptyKind::Void),
        },
    };

    let form = if ok_side.typ.is_none() || err_side.typ.is_none() {
        ResultForm::Inbuilt
    } else {
        ResultForm::Custom
    };

    Ok(Some(AnalysedType::Result(ResultType {
        ok: ok_side,
        err: err_side,
        form,
    })))
}

fn map_promise(typ: &ReflectedType, scope: &MapperScope) -> SdkResult<AnalysedType> {
    let inner = typ
        .type_params
        .first()
        .or(typ.element.as_deref())
        .ok_or_else(|| {
            SdkError::schema_construction(format!(
                "{}: promise type has no resolved value type",
                scope.context
            ))
        })?;
    // Promise unwrapping is a no-op at the semantic level: awaits happen
    // only at the RPC boundary, so we simply recurse.
    map_type_unwrapped(inner, scope)
}

/// Top-level entry point for return types, which additionally recognise
/// `void`/`null`/`undefined` (optionally wrapped in a promise) as the empty
/// tuple schema. Everything else defers to [`map_type`].
pub fn map_return_type(typ: &ReflectedType, scope: &MapperScope) -> SdkResult<Option<AnalysedType>> {
    let unwrapped;
    let typ = if typ.kind() == TypeKind::Promise {
        unwrapped = typ
            .type_params
            .first()
            .or(typ.element.as_deref())
            .cloned()
            .ok_or_else(|| {
                SdkError::schema_construction(format!(
                    "{}: promise return type has no resolved value type",
                    scope.context
                ))
            })?;
        &unwrapped
    } else {
        typ
    };

    if is_empty_like(typ).is_some() {
        return Ok(None);
    }

    Ok(Some(map_type(typ, scope)?))
}

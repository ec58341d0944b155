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

//! Builds an [`AgentType`] and its matching [`ClassRegistry`] from one pass
//! over a [`ClassMetadata`]. Grounded on
//! `cli/golem-cli/src/model/agent/mod.rs`'s `AgentType::from_*` constructors,
//! which perform the same reflection-to-schema walk for the CLI's own
//! component model.

use heck::ToKebabCase;
use std::collections::HashSet;

use crate::error::{SdkError, SdkResult};
use crate::reflect::{ClassMetadata, ConstructorArg, MethodMetadata, ReflectedType, TypeKind};
use crate::registry::{ClassRegistry, MethodEntry, ParamInfo, Signature};
use crate::schema::{
    AgentConstructor, AgentMethod, AgentType, BinaryDescriptor, DataSchema, ElementSchema,
    NamedElementSchema, TextDescriptor,
};
use crate::type_info::TypeInfoInternal;
use crate::type_mapper::{is_empty_like, map_type, tagged_case_name, MapperScope};

/// Method names that collide with the platform's own RPC surface once
/// kebab-cased, plus the `$`-prefixed names reserved for internal use.
const RESERVED_METHOD_NAMES: &[&str] = &["initialize", "get-definition"];

pub fn build_agent_type(class: &ClassMetadata) -> SdkResult<(AgentType, ClassRegistry)> {
    let (constructor, constructor_schema) = build_constructor(class)?;

    let mut methods = Vec::with_capacity(class.methods.len());
    let mut registry_methods = indexmap::IndexMap::with_capacity(class.methods.len());
    for (name, metadata) in &class.methods {
        validate_method_name(name, class)?;
        let (entry, agent_method) = build_method(class, name, metadata)?;
        methods.push(agent_method);
        registry_methods.insert(name.clone(), entry);
    }

    let agent_type = AgentType {
        type_name: class.type_name.clone(),
        description: class.description.clone().unwrap_or_default(),
        constructor: constructor_schema,
        methods,
    };
    let registry = ClassRegistry {
        type_name: class.type_name.clone(),
        constructor,
        methods: registry_methods,
    };
    Ok((agent_type, registry))
}

fn validate_method_name(name: &str, class: &ClassMetadata) -> SdkResult<()> {
    if name.contains('$') {
        return Err(SdkError::reserved_or_invalid_method_name(format!(
            "{}::{name}",
            class.type_name
        )));
    }
    let kebab = name.to_kebab_case();
    if RESERVED_METHOD_NAMES.contains(&kebab.as_str()) {
        return Err(SdkError::reserved_or_invalid_method_name(format!(
            "{}::{name}",
            class.type_name
        )));
    }
    Ok(())
}

fn build_constructor(class: &ClassMetadata) -> SdkResult<(Signature, AgentConstructor)> {
    let ctx_base = format!("{}::new", class.type_name);
    let (params, input_schema) = build_param_list(
        &ctx_base,
        class
            .constructor_args
            .iter()
            .map(|ConstructorArg { name, typ }| (name.as_str(), typ)),
    )?;

    let constructor = AgentConstructor {
        name: None,
        description: class.description.clone().unwrap_or_default(),
        prompt_hint: None,
        input_schema,
    };
    Ok((Signature { params }, constructor))
}

fn build_method(
    class: &ClassMetadata,
    name: &str,
    metadata: &MethodMetadata,
) -> SdkResult<(MethodEntry, AgentMethod)> {
    let ctx_base = format!("{}::{name}", class.type_name);
    let (params, input_schema) = build_param_list(
        &ctx_base,
        metadata
            .method_params
            .iter()
            .map(|(name, typ)| (name.as_str(), typ)),
    )?;

    let (output, output_schema) = build_return(&ctx_base, &metadata.return_type)?;

    let agent_method = AgentMethod {
        name: name.to_string(),
        description: metadata.description.clone().unwrap_or_default(),
        prompt_hint: metadata.prompt_hint.clone(),
        input_schema,
        output_schema,
        http_endpoint: metadata.http_endpoint.clone(),
    };
    let entry = MethodEntry {
        params: Signature { params },
        output,
        metadata: agent_method.clone(),
    };
    Ok((entry, agent_method))
}

/// Classifies every parameter in `params`, in order, enforcing the
/// multimodal-is-the-sole-wire-parameter rule. Returns both the
/// registry-facing param list (auto-injected params included) and the
/// published `DataSchema` (a single multimodal parameter publishes as
/// `DataSchema::Multimodal`; anything else publishes as `DataSchema::Tuple`,
/// skipping auto-injected params entirely).
fn build_param_list<'a>(
    ctx_base: &str,
    params: impl Iterator<Item = (&'a str, &'a ReflectedType)>,
) -> SdkResult<(Vec<ParamInfo>, DataSchema)> {
    let mut infos = Vec::new();
    let mut elements = Vec::new();
    let mut multimodal: Option<Vec<NamedElementSchema>> = None;

    for (param_name, typ) in params {
        let ctx = format!("{ctx_base}(arg '{param_name}')");
        let info = classify_param(typ, &ctx)?;

        match &info {
            TypeInfoInternal::Multimodal(cases) => {
                if multimodal.is_some() || !elements.is_empty() {
                    return Err(SdkError::multimodal_shape(format!(
                        "{ctx}: a multimodal parameter must be the only non-auto-injected parameter"
                    )));
                }
                multimodal = Some(cases.clone());
            }
            TypeInfoInternal::Principal | TypeInfoInternal::Config => {}
            TypeInfoInternal::Element(schema) => {
                if multimodal.is_some() {
                    return Err(SdkError::multimodal_shape(format!(
                        "{ctx}: a multimodal parameter must be the only non-auto-injected parameter"
                    )));
                }
                elements.push(NamedElementSchema {
                    name: param_name.to_string(),
                    schema: schema.clone(),
                });
            }
        }

        infos.push(ParamInfo {
            name: param_name.to_string(),
            info,
        });
    }

    let schema = match multimodal {
        Some(cases) => DataSchema::Multimodal(cases),
        None => DataSchema::Tuple(elements),
    };
    Ok((infos, schema))
}

fn build_return(
    ctx_base: &str,
    return_type: &ReflectedType,
) -> SdkResult<(Signature, DataSchema)> {
    let ctx = format!("{ctx_base} return type");
    let resolved = resolve_promise(return_type);

    if is_empty_like(&resolved).is_some() {
        return Ok((Signature::default(), DataSchema::empty_tuple()));
    }
    if is_principal_type(&resolved) || is_config_type(&resolved) {
        return Err(SdkError::schema_construction(format!(
            "{ctx}: principal/config types are not valid return types"
        )));
    }

    let info = classify_param(&resolved, &ctx)?;
    match info {
        TypeInfoInternal::Multimodal(cases) => {
            let schema = DataSchema::Multimodal(cases.clone());
            let signature = Signature {
                params: vec![ParamInfo {
                    name: "return".to_string(),
                    info: TypeInfoInternal::Multimodal(cases),
                }],
            };
            Ok((signature, schema))
        }
        TypeInfoInternal::Element(schema) => {
            let signature = Signature {
                params: vec![ParamInfo {
                    name: "return".to_string(),
                    info: TypeInfoInternal::Element(schema.clone()),
                }],
            };
            let data_schema = DataSchema::Tuple(vec![NamedElementSchema {
                name: "return".to_string(),
                schema,
            }]);
            Ok((signature, data_schema))
        }
        TypeInfoInternal::Principal | TypeInfoInternal::Config => unreachable!(
            "principal/config are rejected above before classify_param is reached"
        ),
    }
}

fn resolve_promise(typ: &ReflectedType) -> ReflectedType {
    let mut current = typ.clone();
    while current.kind() == TypeKind::Promise {
        match current.type_params.first().or(current.element.as_deref()) {
            Some(inner) => current = inner.clone(),
            None => break,
        }
    }
    current
}

fn is_principal_type(typ: &ReflectedType) -> bool {
    typ.kind() == TypeKind::Principal || typ.name.as_deref() == Some("Principal")
}

fn is_config_type(typ: &ReflectedType) -> bool {
    typ.name.as_deref() == Some("Config")
}

fn classify_param(typ: &ReflectedType, ctx: &str) -> SdkResult<TypeInfoInternal> {
    if is_principal_type(typ) {
        return Ok(TypeInfoInternal::Principal);
    }
    if is_config_type(typ) {
        return Ok(TypeInfoInternal::Config);
    }
    if let Some(text) = try_unstructured_text(typ, ctx)? {
        return Ok(TypeInfoInternal::Element(ElementSchema::UnstructuredText(
            text,
        )));
    }
    if let Some(binary) = try_unstructured_binary(typ, ctx)? {
        return Ok(TypeInfoInternal::Element(ElementSchema::UnstructuredBinary(
            binary,
        )));
    }
    if let Some(cases) = try_multimodal(typ, ctx)? {
        return Ok(TypeInfoInternal::Multimodal(cases));
    }
    let mapped = map_type(typ, &MapperScope::new(ctx, typ.optional))?;
    Ok(TypeInfoInternal::Element(ElementSchema::ComponentModel(
        mapped,
    )))
}

fn try_unstructured_text(typ: &ReflectedType, ctx: &str) -> SdkResult<Option<TextDescriptor>> {
    if typ.name.as_deref() != Some("UnstructuredText") {
        return Ok(None);
    }
    let restrictions = extract_restrictions(typ.type_params.first(), ctx)?;
    Ok(Some(TextDescriptor { restrictions }))
}

fn try_unstructured_binary(typ: &ReflectedType, ctx: &str) -> SdkResult<Option<BinaryDescriptor>> {
    if typ.name.as_deref() != Some("UnstructuredBinary") {
        return Ok(None);
    }
    let restrictions = extract_restrictions(typ.type_params.first(), ctx)?;
    Ok(Some(BinaryDescriptor { restrictions }))
}

/// A bare `string` type parameter means "any"; a literal tuple yields an
/// explicit allow-list of language-code / MIME-type restrictions.
fn extract_restrictions(
    param: Option<&ReflectedType>,
    ctx: &str,
) -> SdkResult<Option<Vec<String>>> {
    let Some(param) = param else {
        return Ok(None);
    };
    match param.kind() {
        TypeKind::String => Ok(None),
        TypeKind::Tuple => {
            let mut out = Vec::with_capacity(param.elements.len());
            for element in &param.elements {
                if element.kind() != TypeKind::Literal {
                    return Err(SdkError::schema_construction(format!(
                        "{ctx}: restriction tuple members must be string literals"
                    )));
                }
                match element.literal_value.as_ref().and_then(|v| v.as_str()) {
                    Some(s) => out.push(s.to_string()),
                    None => {
                        return Err(SdkError::schema_construction(format!(
                            "{ctx}: restriction literal must be a string"
                        )))
                    }
                }
            }
            Ok(Some(out))
        }
        _ => Err(SdkError::schema_construction(format!(
            "{ctx}: unsupported restriction type parameter"
        ))),
    }
}

/// Recognises the `Array<TaggedUnion>` shape as a multimodal parameter.
/// Returns `Ok(None)` for any array whose element isn't a tagged union —
/// such arrays are ordinary component-model lists.
fn try_multimodal(typ: &ReflectedType, ctx: &str) -> SdkResult<Option<Vec<NamedElementSchema>>> {
    if typ.kind() != TypeKind::Array {
        return Ok(None);
    }
    let Some(element) = typ.element.as_deref() else {
        return Ok(None);
    };
    if element.kind() != TypeKind::Union || element.union_types.is_empty() {
        return Ok(None);
    }

    let tagged: Option<Vec<(String, Option<ReflectedType>)>> =
        element.union_types.iter().map(tagged_case_name).collect();
    let Some(tagged_members) = tagged else {
        return Ok(None);
    };

    let mut cases = Vec::with_capacity(tagged_members.len());
    let mut seen: HashSet<String> = HashSet::new();
    for (tag, val_type) in tagged_members {
        let kebab = tag.to_kebab_case();
        if !seen.insert(kebab.clone()) {
            return Err(SdkError::multimodal_shape(format!(
                "{ctx}: duplicate multimodal case name '{kebab}'"
            )));
        }
        let val_type = val_type.ok_or_else(|| {
            SdkError::multimodal_shape(format!(
                "{ctx}: multimodal case '{kebab}' has no payload type"
            ))
        })?;
        let schema = classify_multimodal_case(&val_type, ctx)?;
        cases.push(NamedElementSchema { name: kebab, schema });
    }
    Ok(Some(cases))
}

fn classify_multimodal_case(val_type: &ReflectedType, ctx: &str) -> SdkResult<ElementSchema> {
    if try_multimodal(val_type, ctx)?.is_some() {
        return Err(SdkError::multimodal_shape(format!(
            "{ctx}: nested multimodal cases are not supported"
        )));
    }
    if is_principal_type(val_type) || is_config_type(val_type) {
        return Err(SdkError::multimodal_shape(format!(
            "{ctx}: principal/config are not valid multimodal case payloads"
        )));
    }
    if let Some(text) = try_unstructured_text(val_type, ctx)? {
        return Ok(ElementSchema::UnstructuredText(text));
    }
    if let Some(binary) = try_unstructured_binary(val_type, ctx)? {
        return Ok(ElementSchema::UnstructuredBinary(binary));
    }
    let mapped = map_type(val_type, &MapperScope::new(ctx, val_type.optional))?;
    Ok(ElementSchema::ComponentModel(mapped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::PropertyType;
    use indexmap::IndexMap;

    fn string_type() -> ReflectedType {
        ReflectedType::of(TypeKind::String)
    }

    fn simple_class() -> ClassMetadata {
        let mut method_params = IndexMap::new();
        method_params.insert("amount".to_string(), ReflectedType::of(TypeKind::Number));

        let mut methods = IndexMap::new();
        methods.insert(
            "increment".to_string(),
            MethodMetadata {
                method_params,
                return_type: ReflectedType::of(TypeKind::Void),
                description: Some("bumps the counter".to_string()),
                prompt_hint: None,
                http_endpoint: Vec::new(),
            },
        );

        ClassMetadata {
            type_name: "counter".to_string(),
            description: Some("a counter agent".to_string()),
            constructor_args: vec![ConstructorArg {
                name: "label".to_string(),
                typ: string_type(),
            }],
            methods,
        }
    }

    #[test]
    fn builds_constructor_and_method_schemas() {
        let (agent_type, registry) = build_agent_type(&simple_class()).unwrap();
        assert_eq!(agent_type.type_name, "counter");
        assert_eq!(agent_type.constructor.input_schema.elements().len(), 1);
        assert_eq!(agent_type.methods.len(), 1);
        assert!(matches!(
            agent_type.methods[0].output_schema,
            DataSchema::Tuple(ref elements) if elements.is_empty()
        ));
        assert_eq!(registry.methods.len(), 1);
        assert_eq!(registry.constructor.params.len(), 1);
    }

    #[test]
    fn rejects_dollar_method_names() {
        let mut class = simple_class();
        let metadata = class.methods.shift_remove("increment").unwrap();
        class.methods.insert("$internal".to_string(), metadata);
        assert!(build_agent_type(&class).is_err());
    }

    #[test]
    fn rejects_reserved_method_names() {
        let mut class = simple_class();
        let metadata = class.methods.shift_remove("increment").unwrap();
        class.methods.insert("getDefinition".to_string(), metadata);
        assert!(build_agent_type(&class).is_err());
    }

    #[test]
    fn optional_property_maps_to_question_mark_option() {
        let mut properties = IndexMap::new();
        properties.insert(
            "name".to_string(),
            PropertyType {
                typ: string_type(),
                optional: true,
            },
        );
        let record = ReflectedType::of(TypeKind::Object).with_properties(properties);
        let scope = MapperScope::new("test", false);
        let mapped = map_type(&record, &scope).unwrap();
        match mapped {
            crate::analysed_type::AnalysedType::Record(r) => {
                assert_eq!(r.fields.len(), 1);
                assert!(r.fields[0].typ.is_option_question_mark());
            }
            other => panic!("expected a record, got {other:?}"),
        }
    }
}

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

//! The semantic type tree used for value conversion.
//!
//! Constructed with the free functions at the bottom of this module
//! (`bool_()`, `u32()`, `record(..)`, `variant(..)`, ...) rather than by
//! naming the enum variants directly, the same convention
//! `golem_wasm::analysis::analysed_type` uses.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysedType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
    F32,
    F64,
    Chr,
    Str,
    Handle,
    Option(OptionType),
    List(ListType),
    Tuple(TupleType),
    Record(RecordType),
    Variant(VariantType),
    Enum(EnumType),
    Flags(FlagsType),
    Result(ResultType),
}

impl AnalysedType {
    /// The nominal name carried by record/variant/enum/flags types, used both
    /// for record-field-name-uniqueness bookkeeping and for publishing a
    /// stable name to `DataSchema` consumers.
    pub fn name(&self) -> Option<&str> {
        match self {
            AnalysedType::Record(r) => r.name.as_deref(),
            AnalysedType::Variant(v) => v.name.as_deref(),
            AnalysedType::Enum(e) => e.name.as_deref(),
            AnalysedType::Flags(f) => f.name.as_deref(),
            _ => None,
        }
    }

    /// Attach a nominal name. A no-op on types that carry no name slot.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        match &mut self {
            AnalysedType::Record(r) => r.name = Some(name),
            AnalysedType::Variant(v) => v.name = Some(name),
            AnalysedType::Enum(e) => e.name = Some(name),
            AnalysedType::Flags(f) => f.name = Some(name),
            _ => {}
        }
        self
    }

    pub fn is_option_question_mark(&self) -> bool {
        matches!(
            self,
            AnalysedType::Option(OptionType {
                origin: OptionOrigin::QuestionMark,
                ..
            })
        )
    }

    /// True for the empty tuple and for a `result`/`option` whose payload is
    /// itself empty-like; used by the deserializer to decide whether a
    /// missing tuple slot can default rather than fail.
    pub fn is_empty_like(&self) -> bool {
        matches!(self, AnalysedType::Tuple(TupleType { items }) if items.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionType {
    pub inner: Box<AnalysedType>,
    pub origin: OptionOrigin,
}

/// Distinguishes an implicit `option` synthesised for an optional field
/// (`question-mark`) from an explicit `T | undefined` union (`union`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionOrigin {
    QuestionMark,
    Union,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypedArrayKind {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,
    BigU64,
    BigI64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapTypeHint {
    pub key_type: Box<AnalysedType>,
    pub value_type: Box<AnalysedType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListType {
    pub inner: Box<AnalysedType>,
    pub typed_array: Option<TypedArrayKind>,
    pub map_type: Option<MapTypeHint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TupleType {
    pub items: Vec<AnalysedType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedField {
    pub name: String,
    pub typ: AnalysedType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    pub name: Option<String>,
    pub fields: Vec<NamedField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCase {
    pub name: String,
    pub typ: Option<AnalysedType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantType {
    pub name: Option<String>,
    pub cases: Vec<VariantCase>,
    /// True when this variant was built from a tagged union (every case
    /// carries a literal `tag` string equal to `case.name`); `false` for a
    /// structurally-matched untagged union.
    pub tagged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: Option<String>,
    pub cases: Vec<String>,
}

/// Reserved but unsupported at the serializer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagsType {
    pub name: Option<String>,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyKind {
    Void,
    Null,
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSide {
    /// `None` means this side is empty-like (`void`/`null`/`undefined`).
    pub typ: Option<Box<AnalysedType>>,
    /// Only meaningful when `typ` is `None`; remembered so the empty value
    /// round-trips to the same host shape it came from.
    pub empty_kind: Option<EmptyKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultForm {
    /// Either side may be the built-in empty type.
    Inbuilt,
    /// Both sides are named value fields (e.g. a user-defined `Result<Ok, Err>`
    /// alias where neither member is void-like).
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultType {
    pub ok: ResultSide,
    pub err: ResultSide,
    pub form: ResultForm,
}

// --- builder functions -------------------------------------------------

pub fn bool_() -> AnalysedType {
    AnalysedType::Bool
}
pub fn u8_() -> AnalysedType {
    AnalysedType::U8
}
pub fn u16_() -> AnalysedType {
    AnalysedType::U16
}
pub fn u32_() -> AnalysedType {
    AnalysedType::U32
}
pub fn u64_() -> AnalysedType {
    AnalysedType::U64
}
pub fn s8_() -> AnalysedType {
    AnalysedType::S8
}
pub fn s16_() -> AnalysedType {
    AnalysedType::S16
}
pub fn s32_() -> AnalysedType {
    AnalysedType::S32
}
pub fn s64_() -> AnalysedType {
    AnalysedType::S64
}
pub fn f32_() -> AnalysedType {
    AnalysedType::F32
}
pub fn f64_() -> AnalysedType {
    AnalysedType::F64
}
pub fn chr() -> AnalysedType {
    AnalysedType::Chr
}
pub fn str_() -> AnalysedType {
    AnalysedType::Str
}
pub fn handle() -> AnalysedType {
    AnalysedType::Handle
}

pub fn option_question_mark(inner: AnalysedType) -> AnalysedType {
    AnalysedType::Option(OptionType {
        inner: Box::new(inner),
        origin: OptionOrigin::QuestionMark,
    })
}

pub fn option_union(inner: AnalysedType) -> AnalysedType {
    AnalysedType::Option(OptionType {
        inner: Box::new(inner),
        origin: OptionOrigin::Union,
    })
}

/// Defaults to the `union` origin; callers building an implicit optional
/// field should use [`option_question_mark`].
pub fn option(inner: AnalysedType) -> AnalysedType {
    option_union(inner)
}

pub fn list(inner: AnalysedType) -> AnalysedType {
    AnalysedType::List(ListType {
        inner: Box::new(inner),
        typed_array: None,
        map_type: None,
    })
}

pub fn typed_array(inner: AnalysedType, kind: TypedArrayKind) -> AnalysedType {
    AnalysedType::List(ListType {
        inner: Box::new(inner),
        typed_array: Some(kind),
        map_type: None,
    })
}

pub fn map(key_type: AnalysedType, value_type: AnalysedType) -> AnalysedType {
    AnalysedType::List(ListType {
        inner: Box::new(tuple(vec![key_type.clone(), value_type.clone()])),
        typed_array: None,
        map_type: Some(MapTypeHint {
            key_type: Box::new(key_type),
            value_type: Box::new(value_type),
        }),
    })
}

pub fn tuple(items: Vec<AnalysedType>) -> AnalysedType {
    AnalysedType::Tuple(TupleType { items })
}

pub fn unit() -> AnalysedType {
    tuple(vec![])
}

pub fn field(name: impl Into<String>, typ: AnalysedType) -> NamedField {
    NamedField {
        name: name.into(),
        typ,
    }
}

pub fn record(fields: Vec<NamedField>) -> AnalysedType {
    AnalysedType::Record(RecordType { name: None, fields })
}

pub fn case(name: impl Into<String>, typ: AnalysedType) -> VariantCase {
    VariantCase {
        name: name.into(),
        typ: Some(typ),
    }
}

pub fn unit_case(name: impl Into<String>) -> VariantCase {
    VariantCase {
        name: name.into(),
        typ: None,
    }
}

pub fn variant(cases: Vec<VariantCase>) -> AnalysedType {
    AnalysedType::Variant(VariantType {
        name: None,
        cases,
        tagged: false,
    })
}

pub fn tagged_variant(cases: Vec<VariantCase>) -> AnalysedType {
    AnalysedType::Variant(VariantType {
        name: None,
        cases,
        tagged: true,
    })
}

pub fn enum_(cases: &[&str]) -> AnalysedType {
    AnalysedType::Enum(EnumType {
        name: None,
        cases: cases.iter().map(|s| s.to_string()).collect(),
    })
}

pub fn flags(names: &[&str]) -> AnalysedType {
    AnalysedType::Flags(FlagsType {
        name: None,
        names: names.iter().map(|s| s.to_string()).collect(),
    })
}

pub fn result(ok: AnalysedType, err: AnalysedType) -> AnalysedType {
    AnalysedType::Result(ResultType {
        ok: ResultSide {
            typ: Some(Box::new(ok)),
            empty_kind: None,
        },
        err: ResultSide {
            typ: Some(Box::new(err)),
            empty_kind: None,
        },
        form: ResultForm::Custom,
    })
}

pub fn result_ok(ok: AnalysedType, err_empty: EmptyKind) -> AnalysedType {
    AnalysedType::Result(ResultType {
        ok: ResultSide {
            typ: Some(Box::new(ok)),
            empty_kind: None,
        },
        err: ResultSide {
            typ: None,
            empty_kind: Some(err_empty),
        },
        form: ResultForm::Inbuilt,
    })
}

pub fn result_err(err: AnalysedType, ok_empty: EmptyKind) -> AnalysedType {
    AnalysedType::Result(ResultType {
        ok: ResultSide {
            typ: None,
            empty_kind: Some(ok_empty),
        },
        err: ResultSide {
            typ: Some(Box::new(err)),
            empty_kind: None,
        },
        form: ResultForm::Inbuilt,
    })
}

pub fn unit_result(ok_empty: EmptyKind, err_empty: EmptyKind) -> AnalysedType {
    AnalysedType::Result(ResultType {
        ok: ResultSide {
            typ: None,
            empty_kind: Some(ok_empty),
        },
        err: ResultSide {
            typ: None,
            empty_kind: Some(err_empty),
        },
        form: ResultForm::Inbuilt,
    })
}

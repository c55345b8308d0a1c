//! Serialized form of a symbol graph.
//!
//! A graph document lists the types of one compilation, namespace by
//! namespace, with every type reference written in C# syntax. Documents are
//! produced by a host-side exporter and consumed by [`crate::loader`].

use bridgegen_common::SourceLocation;
use serde::{Deserialize, Deserializer, Serialize};

/// Distinguish an explicit `null` from an absent field.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    /// Register the built-in core library types alongside this document.
    #[serde(default = "default_true")]
    pub core_library: bool,
    /// Namespaces imported for every type reference in the document.
    #[serde(default)]
    pub usings: Vec<String>,
    #[serde(default)]
    pub types: Vec<TypeDoc>,
}

const fn default_true() -> bool {
    true
}

impl GraphDocument {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKindDoc {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDoc {
    pub kind: TypeKindDoc,
    pub name: String,
    /// Ignored on nested types, which live in their container's namespace.
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDoc>,
    #[serde(default)]
    pub base: Option<String>,
    #[serde(default)]
    pub interfaces: Vec<String>,
    #[serde(default)]
    pub partial: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub methods: Vec<MethodDoc>,
    /// Names of fields, properties, events and enum members.
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub nested: Vec<TypeDoc>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceDoc {
    #[default]
    None,
    In,
    Out,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeParameterDoc {
    pub name: String,
    #[serde(default)]
    pub variance: VarianceDoc,
    /// `class`, `class?`, `struct`, `unmanaged`, `notnull`, `new()` or a type.
    #[serde(default)]
    pub constraints: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeDoc>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDoc {
    pub name: String,
    #[serde(default = "default_accessibility")]
    pub accessibility: String,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, rename = "async")]
    pub is_async: bool,
    #[serde(default, rename = "readonly")]
    pub is_readonly: bool,
    #[serde(default, rename = "extension")]
    pub is_extension: bool,
    #[serde(default)]
    pub returns_by_ref: bool,
    #[serde(default)]
    pub explicit_interface: bool,
    #[serde(default)]
    pub partial_definition: bool,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDoc>,
    #[serde(default)]
    pub parameters: Vec<ParameterDoc>,
    #[serde(default = "default_returns")]
    pub returns: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDoc>,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

fn default_accessibility() -> String {
    "private".to_string()
}

fn default_returns() -> String {
    "void".to_string()
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKindDoc {
    #[default]
    None,
    Ref,
    Out,
    In,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDoc {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub ref_kind: RefKindDoc,
    /// Explicit default value; `null` stands for `= null` and `= default`.
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub params: bool,
    #[serde(default)]
    pub location: Option<SourceLocation>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDoc {
    /// Metadata name of the attribute class.
    pub name: String,
    #[serde(default)]
    pub args: Vec<ArgumentDoc>,
    #[serde(default)]
    pub named: Vec<NamedArgumentDoc>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NamedArgumentDoc {
    pub name: String,
    pub value: ArgumentDoc,
}

/// Attribute argument: `{"typeof": "T"}`, `{"char": "x"}`, `{"invalid": true}`
/// or a JSON primitive.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArgumentDoc {
    TypeOf {
        #[serde(rename = "typeof")]
        ty: String,
    },
    Char {
        char: char,
    },
    Invalid {
        invalid: bool,
    },
    Value(serde_json::Value),
}

//! Builds a [`SymbolGraph`] from graph documents.
//!
//! Loading runs in two phases. The first declares every type, method and
//! type parameter so that all names exist; the second binds the type
//! references (bases, interfaces, constraints, signatures, attribute
//! arguments) against those declarations.
//!
//! Name lookup for a reference inside a declaration tries, in order: type
//! parameters in scope, types nested in the enclosing types, the enclosing
//! namespace chain out to the global namespace, then the document's usings.

use crate::document::*;
use crate::graph::SymbolGraph;
use crate::type_syntax::{NameSegment, TypeSyntax, TypeSyntaxError, parse_type};
use crate::types::*;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

/// Core library types registered unless a document opts out.
pub const CORE_LIBRARY_JSON: &str = include_str!("../lib/corelib.json");

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("built-in core library is malformed: {0}")]
    CoreLibrary(#[source] serde_json::Error),
    #[error("malformed graph document: {0}")]
    Document(#[source] serde_json::Error),
    #[error("type '{name}' is declared more than once")]
    DuplicateType { name: String },
    #[error("{context}: {source}")]
    Syntax {
        context: String,
        #[source]
        source: TypeSyntaxError,
    },
    #[error("{context}: type '{name}' could not be resolved")]
    UnresolvedType { context: String, name: String },
    #[error("{context}: unknown accessibility '{text}'")]
    InvalidAccessibility { context: String, text: String },
    #[error("{context}: default value of parameter '{param}' is not a constant")]
    InvalidDefault { context: String, param: String },
}

/// Load documents into one graph. The core library is included once if any
/// document asks for it.
pub fn load_documents(documents: &[GraphDocument]) -> Result<SymbolGraph, LoadError> {
    let core = if documents.iter().any(|doc| doc.core_library) {
        Some(GraphDocument::from_json(CORE_LIBRARY_JSON).map_err(LoadError::CoreLibrary)?)
    } else {
        None
    };

    let mut loader = Loader {
        graph: SymbolGraph::new(),
        types: Vec::new(),
        methods: Vec::new(),
        type_params: Vec::new(),
    };
    for doc in core.iter().chain(documents) {
        for ty in &doc.types {
            loader.declare_type(ty, None, ty.namespace.as_deref(), &doc.usings)?;
        }
    }
    loader.bind()?;

    debug!(
        types = loader.types.len(),
        methods = loader.methods.len(),
        interned = loader.graph.interner().len(),
        "loaded symbol graph"
    );
    Ok(loader.graph)
}

/// Parse and load a single JSON document.
pub fn load_json(text: &str) -> Result<SymbolGraph, LoadError> {
    let doc = GraphDocument::from_json(text).map_err(LoadError::Document)?;
    load_documents(std::slice::from_ref(&doc))
}

// =============================================================================
// Declaration Phase
// =============================================================================

struct PendingType<'a> {
    def: DefId,
    doc: &'a TypeDoc,
    usings: &'a [String],
}

struct PendingMethod<'a> {
    method: MethodId,
    doc: &'a MethodDoc,
    usings: &'a [String],
}

struct PendingTypeParam<'a> {
    param: TypeParamId,
    doc: &'a TypeParameterDoc,
    scope: Scope<'a>,
}

#[derive(Copy, Clone)]
struct Scope<'a> {
    def: DefId,
    method: Option<MethodId>,
    usings: &'a [String],
}

struct Loader<'a> {
    graph: SymbolGraph,
    types: Vec<PendingType<'a>>,
    methods: Vec<PendingMethod<'a>>,
    type_params: Vec<PendingTypeParam<'a>>,
}

const fn def_kind(kind: TypeKindDoc) -> DefKind {
    match kind {
        TypeKindDoc::Class => DefKind::Class,
        TypeKindDoc::Struct => DefKind::Struct,
        TypeKindDoc::Interface => DefKind::Interface,
        TypeKindDoc::Enum => DefKind::Enum,
        TypeKindDoc::Delegate => DefKind::Delegate,
    }
}

const fn variance(doc: VarianceDoc) -> Variance {
    match doc {
        VarianceDoc::None => Variance::None,
        VarianceDoc::In => Variance::In,
        VarianceDoc::Out => Variance::Out,
    }
}

const fn ref_kind(doc: RefKindDoc) -> RefKind {
    match doc {
        RefKindDoc::None => RefKind::None,
        RefKindDoc::Ref => RefKind::Ref,
        RefKindDoc::Out => RefKind::Out,
        RefKindDoc::In => RefKind::In,
    }
}

fn constraint_kind(text: &str) -> Option<ConstraintKinds> {
    Some(match text.trim() {
        "class" => ConstraintKinds::REFERENCE,
        "class?" => ConstraintKinds::REFERENCE | ConstraintKinds::NULLABLE_REFERENCE,
        "struct" => ConstraintKinds::VALUE,
        // `unmanaged` implies `struct`.
        "unmanaged" => ConstraintKinds::UNMANAGED | ConstraintKinds::VALUE,
        "notnull" => ConstraintKinds::NOT_NULL,
        "new()" => ConstraintKinds::CONSTRUCTOR,
        _ => return None,
    })
}

impl<'a> Loader<'a> {
    fn declare_type(
        &mut self,
        doc: &'a TypeDoc,
        containing: Option<DefId>,
        namespace: Option<&str>,
        usings: &'a [String],
    ) -> Result<DefId, LoadError> {
        let namespace = if containing.is_some() {
            None
        } else {
            namespace.filter(|ns| !ns.is_empty()).map(str::to_string)
        };

        let mut metadata_name = match (containing, &namespace) {
            (Some(parent), _) => format!("{}+{}", self.graph.metadata_name(parent), doc.name),
            (None, Some(ns)) => format!("{ns}.{}", doc.name),
            (None, None) => doc.name.clone(),
        };
        if !doc.type_parameters.is_empty() {
            metadata_name.push_str(&format!("`{}", doc.type_parameters.len()));
        }
        if self.graph.def_by_metadata_name(&metadata_name).is_some() {
            return Err(LoadError::DuplicateType {
                name: metadata_name,
            });
        }
        let special = SpecialType::ALL
            .into_iter()
            .find(|s| s.metadata_name() == metadata_name);

        let def = self.graph.add_def(TypeDef {
            name: doc.name.clone(),
            namespace,
            containing,
            kind: def_kind(doc.kind),
            type_params: Vec::new(),
            base: None,
            interfaces: Vec::new(),
            is_partial: doc.partial,
            is_static: doc.is_static,
            special,
            methods: Vec::new(),
            member_names: doc.members.clone(),
            nested: Vec::new(),
            location: doc.location.clone(),
        });

        let scope = Scope {
            def,
            method: None,
            usings,
        };
        let params =
            self.declare_type_params(&doc.type_parameters, TypeParamOwner::Type(def), scope);
        self.graph.def_mut(def).type_params = params;
        self.graph.register_metadata_name(def);

        for method in &doc.methods {
            self.declare_method(def, method, usings)?;
        }
        for nested in &doc.nested {
            self.declare_type(nested, Some(def), None, usings)?;
        }

        self.types.push(PendingType { def, doc, usings });
        Ok(def)
    }

    fn declare_type_params(
        &mut self,
        docs: &'a [TypeParameterDoc],
        owner: TypeParamOwner,
        scope: Scope<'a>,
    ) -> Vec<TypeParamId> {
        docs.iter()
            .enumerate()
            .map(|(ordinal, doc)| {
                let constraints = doc
                    .constraints
                    .iter()
                    .filter_map(|c| constraint_kind(c))
                    .fold(ConstraintKinds::empty(), |acc, k| acc | k);
                let param = self.graph.add_type_param(TypeParamDef {
                    name: doc.name.clone(),
                    owner,
                    ordinal: ordinal as u16,
                    variance: variance(doc.variance),
                    constraints,
                    constraint_types: Vec::new(),
                    attributes: Vec::new(),
                    location: doc.location.clone(),
                });
                self.type_params.push(PendingTypeParam { param, doc, scope });
                param
            })
            .collect()
    }

    fn declare_method(
        &mut self,
        def: DefId,
        doc: &'a MethodDoc,
        usings: &'a [String],
    ) -> Result<(), LoadError> {
        let accessibility = Accessibility::from_keyword(&doc.accessibility).ok_or_else(|| {
            LoadError::InvalidAccessibility {
                context: format!("{}.{}", self.graph.metadata_name(def), doc.name),
                text: doc.accessibility.clone(),
            }
        })?;

        let mut flags = MethodFlags::empty();
        flags.set(MethodFlags::STATIC, doc.is_static);
        flags.set(MethodFlags::ASYNC, doc.is_async);
        flags.set(MethodFlags::READONLY, doc.is_readonly);
        flags.set(MethodFlags::EXTENSION, doc.is_extension);
        flags.set(MethodFlags::RETURNS_BY_REF, doc.returns_by_ref);
        flags.set(MethodFlags::EXPLICIT_INTERFACE_IMPL, doc.explicit_interface);
        flags.set(MethodFlags::PARTIAL_DEFINITION, doc.partial_definition);

        let method = self.graph.add_method(MethodDef {
            name: doc.name.clone(),
            containing: def,
            type_params: Vec::new(),
            params: Vec::new(),
            return_type: TypeId::VOID,
            flags,
            accessibility,
            attributes: Vec::new(),
            location: doc.location.clone(),
        });

        let scope = Scope {
            def,
            method: Some(method),
            usings,
        };
        let params =
            self.declare_type_params(&doc.type_parameters, TypeParamOwner::Method(method), scope);
        self.graph.method_mut(method).type_params = params;

        self.methods.push(PendingMethod {
            method,
            doc,
            usings,
        });
        Ok(())
    }

    // =========================================================================
    // Binding Phase
    // =========================================================================

    fn bind(&mut self) -> Result<(), LoadError> {
        let types = std::mem::take(&mut self.types);
        let type_params = std::mem::take(&mut self.type_params);
        let methods = std::mem::take(&mut self.methods);

        // Constraints first: `T?` depends on whether `T` is a value type.
        for pending in &type_params {
            self.bind_type_param(pending)?;
        }
        for pending in &types {
            self.bind_type(pending)?;
        }
        for pending in &methods {
            self.bind_method(pending)?;
        }

        self.types = types;
        self.type_params = type_params;
        self.methods = methods;
        Ok(())
    }

    fn bind_type_param(&mut self, pending: &PendingTypeParam<'a>) -> Result<(), LoadError> {
        let context = self.context(pending.scope);
        let mut constraint_types = Vec::new();
        for text in &pending.doc.constraints {
            if constraint_kind(text).is_none() {
                constraint_types.push(self.resolve_text(text, pending.scope, &context)?);
            }
        }
        let attributes = self.bind_attributes(&pending.doc.attributes, pending.scope);
        let param = self.graph.type_param_mut(pending.param);
        param.constraint_types = constraint_types;
        param.attributes = attributes;
        Ok(())
    }

    fn bind_type(&mut self, pending: &PendingType<'a>) -> Result<(), LoadError> {
        let scope = Scope {
            def: pending.def,
            method: None,
            usings: pending.usings,
        };
        let context = self.context(scope);

        let base = match &pending.doc.base {
            Some(text) => Some(self.resolve_text(text, scope, &context)?),
            None => self.default_base(pending.def),
        };
        let interfaces = pending
            .doc
            .interfaces
            .iter()
            .map(|text| self.resolve_text(text, scope, &context))
            .collect::<Result<Vec<_>, _>>()?;

        let def = self.graph.def_mut(pending.def);
        def.base = base;
        def.interfaces = interfaces;
        Ok(())
    }

    fn default_base(&self, def: DefId) -> Option<TypeId> {
        let decl = self.graph.def(def);
        let special = match decl.kind {
            DefKind::Interface => return None,
            DefKind::Class if decl.special == Some(SpecialType::Object) => return None,
            DefKind::Class => "System.Object",
            DefKind::Struct => "System.ValueType",
            DefKind::Enum => "System.Enum",
            DefKind::Delegate => "System.MulticastDelegate",
        };
        self.graph
            .def_by_metadata_name(special)
            .map(|base| self.graph.named(base, &[]))
    }

    fn bind_method(&mut self, pending: &PendingMethod<'a>) -> Result<(), LoadError> {
        let decl = self.graph.method(pending.method);
        let scope = Scope {
            def: decl.containing,
            method: Some(pending.method),
            usings: pending.usings,
        };
        let context = self.context(scope);

        let mut params = Vec::with_capacity(pending.doc.parameters.len());
        for param in &pending.doc.parameters {
            let ty = self.resolve_text(&param.ty, scope, &context)?;
            let default = match &param.default {
                None => None,
                Some(value) => {
                    Some(
                        constant_from_json(value).ok_or_else(|| LoadError::InvalidDefault {
                            context: context.clone(),
                            param: param.name.clone(),
                        })?,
                    )
                }
            };
            params.push(ParamDef {
                name: param.name.clone(),
                ty,
                ref_kind: ref_kind(param.ref_kind),
                default,
                is_params: param.params,
                location: param.location.clone(),
            });
        }
        let return_type = self.resolve_text(&pending.doc.returns, scope, &context)?;
        let attributes = self.bind_attributes(&pending.doc.attributes, scope);

        let method = self.graph.method_mut(pending.method);
        method.params = params;
        method.return_type = return_type;
        method.attributes = attributes;
        Ok(())
    }

    fn bind_attributes(&self, docs: &[AttributeDoc], scope: Scope<'_>) -> Vec<Attribute> {
        docs.iter()
            .map(|doc| Attribute {
                class_name: doc.name.clone(),
                args: doc
                    .args
                    .iter()
                    .map(|arg| self.bind_argument(arg, scope))
                    .collect(),
                named: doc
                    .named
                    .iter()
                    .map(|arg| (arg.name.clone(), self.bind_argument(&arg.value, scope)))
                    .collect(),
            })
            .collect()
    }

    /// Arguments the host could not bind become `TypedConstant::Error`;
    /// judging them is the generator's job, not the loader's.
    fn bind_argument(&self, arg: &ArgumentDoc, scope: Scope<'_>) -> TypedConstant {
        match arg {
            ArgumentDoc::TypeOf { ty } => self
                .resolve_text(ty, scope, "")
                .map_or(TypedConstant::Error, TypedConstant::Type),
            ArgumentDoc::Char { char } => TypedConstant::Value(ConstantValue::Char(*char)),
            ArgumentDoc::Invalid { .. } => TypedConstant::Error,
            ArgumentDoc::Value(value) => {
                constant_from_json(value).map_or(TypedConstant::Error, TypedConstant::Value)
            }
        }
    }

    fn context(&self, scope: Scope<'_>) -> String {
        let owner = self.graph.metadata_name(scope.def);
        match scope.method {
            Some(method) => format!("{owner}.{}", self.graph.method(method).name),
            None => owner,
        }
    }

    // =========================================================================
    // Name Resolution
    // =========================================================================

    fn resolve_text(
        &self,
        text: &str,
        scope: Scope<'_>,
        context: &str,
    ) -> Result<TypeId, LoadError> {
        let syntax = parse_type(text).map_err(|source| LoadError::Syntax {
            context: context.to_string(),
            source,
        })?;
        self.resolve(&syntax, scope, context)
    }

    fn resolve(
        &self,
        syntax: &TypeSyntax,
        scope: Scope<'_>,
        context: &str,
    ) -> Result<TypeId, LoadError> {
        match syntax {
            TypeSyntax::Array { element, rank } => {
                let element = self.resolve(element, scope, context)?;
                Ok(self.graph.array(element, *rank))
            }
            TypeSyntax::Pointer(element) => {
                let element = self.resolve(element, scope, context)?;
                Ok(self.graph.intern(TypeData::Pointer(element)))
            }
            TypeSyntax::FunctionPointer { params, ret } => {
                let params = params
                    .iter()
                    .map(|p| self.resolve(p, scope, context))
                    .collect::<Result<SmallVec<_>, _>>()?;
                let ret = self.resolve(ret, scope, context)?;
                Ok(self.graph.intern(TypeData::FunctionPointer { params, ret }))
            }
            TypeSyntax::Nullable(inner) => {
                let inner = self.resolve(inner, scope, context)?;
                // Reference types only carry an annotation.
                if !self.graph.is_value_type(inner) {
                    return Ok(inner);
                }
                match self.graph.def_by_metadata_name("System.Nullable`1") {
                    Some(nullable) => Ok(self.graph.named(nullable, &[inner])),
                    None => Ok(inner),
                }
            }
            TypeSyntax::Name { global, segments } => {
                self.resolve_name(*global, segments, scope, context)
            }
        }
    }

    fn resolve_name(
        &self,
        global: bool,
        segments: &[NameSegment],
        scope: Scope<'_>,
        context: &str,
    ) -> Result<TypeId, LoadError> {
        let unresolved = || LoadError::UnresolvedType {
            context: context.to_string(),
            name: segments
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>()
                .join("."),
        };

        if !global && segments.len() == 1 && segments[0].args.is_empty() {
            let name = segments[0].name.as_str();
            match name {
                "void" => return Ok(TypeId::VOID),
                "dynamic" => return Ok(TypeId::DYNAMIC),
                _ => {}
            }
            if let Some(special) = SpecialType::from_keyword(name) {
                return self
                    .graph
                    .def_by_metadata_name(special.metadata_name())
                    .map(|def| self.graph.named(def, &[]))
                    .ok_or_else(unresolved);
            }
            if let Some(param) = self.type_param_in_scope(name, scope) {
                return Ok(self.graph.param_type(param));
            }
        }

        let def = self
            .lookup_def(global, segments, scope)
            .ok_or_else(unresolved)?;

        let mut args: SmallVec<[TypeId; 2]> = SmallVec::new();
        for segment in segments {
            for arg in &segment.args {
                args.push(self.resolve(arg, scope, context)?);
            }
        }

        // The metadata name fixes each segment's arity, so only outer type
        // arguments can be missing (`Inner` inside `Outer<T>`); they are the
        // outer type's own parameters.
        let all_params = self.graph.all_type_params(def);
        if args.len() < all_params.len() {
            let missing = all_params.len() - args.len();
            let mut full: SmallVec<[TypeId; 2]> = all_params[..missing]
                .iter()
                .map(|&p| self.graph.param_type(p))
                .collect();
            full.extend(args);
            args = full;
        }
        Ok(self.graph.intern(TypeData::Named { def, args }))
    }

    fn type_param_in_scope(&self, name: &str, scope: Scope<'_>) -> Option<TypeParamId> {
        if let Some(method) = scope.method {
            let found = self
                .graph
                .method(method)
                .type_params
                .iter()
                .copied()
                .find(|&p| self.graph.type_param(p).name == name);
            if found.is_some() {
                return found;
            }
        }
        self.graph
            .containing_chain(scope.def)
            .into_iter()
            .rev()
            .flat_map(|d| self.graph.def(d).type_params.iter().copied())
            .find(|&p| self.graph.type_param(p).name == name)
    }

    fn lookup_def(&self, global: bool, segments: &[NameSegment], scope: Scope<'_>) -> Option<DefId> {
        if global {
            return self.lookup_with_prefix("", segments, true);
        }

        // Types nested in the enclosing types, innermost first.
        for enclosing in self.graph.containing_chain(scope.def).into_iter().rev() {
            let prefix = format!("{}+", self.graph.metadata_name(enclosing));
            if let Some(def) = self.lookup_with_prefix(&prefix, segments, false) {
                return Some(def);
            }
        }

        // Enclosing namespaces, then the global namespace.
        let mut namespace = self.graph.namespace_of(scope.def).map(str::to_string);
        loop {
            let prefix = namespace
                .as_deref()
                .map_or_else(String::new, |ns| format!("{ns}."));
            if let Some(def) = self.lookup_with_prefix(&prefix, segments, true) {
                return Some(def);
            }
            namespace = match namespace {
                Some(ns) => ns.rsplit_once('.').map(|(outer, _)| outer.to_string()),
                None => break,
            };
        }

        scope.usings.iter().find_map(|using| {
            self.lookup_with_prefix(&format!("{using}."), segments, false)
        })
    }

    /// Try `prefix` + the segments read as `Ns.Sub.Type+Nested`, for every
    /// split point between namespace and type parts.
    fn lookup_with_prefix(
        &self,
        prefix: &str,
        segments: &[NameSegment],
        allow_namespace_part: bool,
    ) -> Option<DefId> {
        let splits = if allow_namespace_part { segments.len() } else { 1 };
        (0..splits).find_map(|split| {
            let namespace_part = &segments[..split];
            if namespace_part.iter().any(|s| !s.args.is_empty()) {
                return None;
            }
            let mut name = prefix.to_string();
            for segment in namespace_part {
                name.push_str(&segment.name);
                name.push('.');
            }
            for (i, segment) in segments[split..].iter().enumerate() {
                if i > 0 {
                    name.push('+');
                }
                name.push_str(&segment.name);
                if !segment.args.is_empty() {
                    name.push_str(&format!("`{}", segment.args.len()));
                }
            }
            self.graph.def_by_metadata_name(&name)
        })
    }
}

/// Convert a JSON primitive to a constant. `{"char": "x"}` denotes a char.
fn constant_from_json(value: &serde_json::Value) -> Option<ConstantValue> {
    use serde_json::Value;
    Some(match value {
        Value::Null => ConstantValue::Null,
        Value::Bool(b) => ConstantValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => ConstantValue::Int(i),
            None => ConstantValue::Float(n.as_f64()?),
        },
        Value::String(s) => ConstantValue::String(s.clone()),
        Value::Object(map) if map.len() == 1 => {
            let mut chars = map.get("char")?.as_str()?.chars();
            let c = chars.next()?;
            if chars.next().is_some() {
                return None;
            }
            ConstantValue::Char(c)
        }
        _ => return None,
    })
}

#[cfg(test)]
#[path = "tests/loader_unit_tests.rs"]
mod tests;

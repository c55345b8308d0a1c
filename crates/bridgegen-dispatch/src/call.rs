//! Executing a bridge.
//!
//! A bridge call binds the original method against the runtime types of the
//! arguments and then runs the target body. Both steps can fail with a
//! [`BindFailure`]; which step failed decides what the caller sees, so every
//! failure is tagged with its [`Origin`] before it is classified:
//!
//! - `Origin::Bridge`: the bridge's own binding failed. The caller gets a
//!   [`BridgeError::ArgumentType`] naming the erased argument, the plural
//!   [`BridgeError::Arguments`], or, for `IgnoreUnbound` bridges, defaults.
//! - `Origin::Inner`: the target body failed. The failure is handed back
//!   unchanged as [`BridgeError::Inner`].

use bridgegen_solver::{BridgePlan, WrapperParam};
use bridgegen_symbols::{RefKind, SymbolGraph, TypeData, TypeId};
use thiserror::Error;
use tracing::debug;

use crate::binder::{BindFailure, Instantiation, LateBinder};
use crate::value::Value;

/// Where a late-binding failure was raised.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Origin {
    /// The bridge's own dispatch to the target.
    Bridge,
    /// Code running inside the target.
    Inner,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// The single erased argument did not bind.
    #[error("{message}")]
    ArgumentType {
        param: String,
        /// `None` for a null argument.
        runtime_type: Option<String>,
        /// Generic definition the argument had to match, when there is one.
        expected: Option<String>,
        message: String,
        source: BindFailure,
    },
    /// Several erased arguments and the call did not bind.
    #[error("The arguments could not be dynamically resolved to their specific types.")]
    Arguments { source: BindFailure },
    /// A failure raised inside the target, unchanged.
    #[error(transparent)]
    Inner(BindFailure),
}

impl BridgeError {
    #[must_use]
    pub const fn origin(&self) -> Origin {
        match self {
            Self::Inner(_) => Origin::Inner,
            Self::ArgumentType { .. } | Self::Arguments { .. } => Origin::Bridge,
        }
    }

    /// The underlying binding failure.
    #[must_use]
    pub const fn failure(&self) -> &BindFailure {
        match self {
            Self::ArgumentType { source, .. } | Self::Arguments { source } => source,
            Self::Inner(failure) => failure,
        }
    }
}

struct Tagged {
    origin: Origin,
    failure: BindFailure,
}

/// One bridge, ready to be called.
pub struct BridgeCall<'a> {
    graph: &'a SymbolGraph,
    plan: &'a BridgePlan,
    binder: LateBinder<'a>,
}

impl<'a> BridgeCall<'a> {
    #[must_use]
    pub const fn new(graph: &'a SymbolGraph, plan: &'a BridgePlan) -> Self {
        Self {
            graph,
            plan,
            binder: LateBinder::new(graph),
        }
    }

    /// Call the bridge with `args`, one per wrapper parameter.
    ///
    /// `body` stands for the target: it receives the bound type arguments and
    /// the argument slots, and may write `out`/`ref` slots.
    pub fn invoke<F>(&self, args: &mut [Value], body: F) -> Result<Value, BridgeError>
    where
        F: FnOnce(&Instantiation, &mut [Value]) -> Result<Value, BindFailure>,
    {
        match self.dispatch(args, body) {
            Ok(value) => Ok(value),
            Err(Tagged {
                origin: Origin::Inner,
                failure,
            }) => Err(BridgeError::Inner(failure)),
            Err(Tagged {
                origin: Origin::Bridge,
                failure,
            }) => self.unbound(args, failure),
        }
    }

    fn dispatch<F>(&self, args: &mut [Value], body: F) -> Result<Value, Tagged>
    where
        F: FnOnce(&Instantiation, &mut [Value]) -> Result<Value, BindFailure>,
    {
        let instantiation = self
            .binder
            .infer(self.plan.method, args)
            .map_err(|failure| Tagged {
                origin: Origin::Bridge,
                failure,
            })?;
        body(&instantiation, args).map_err(|failure| Tagged {
            origin: Origin::Inner,
            failure,
        })
    }

    fn unbound(&self, args: &mut [Value], failure: BindFailure) -> Result<Value, BridgeError> {
        debug!(
            bridge = %self.plan.wrapper.name,
            %failure,
            ignored = self.plan.ignore_unbound,
            "bridge call did not bind"
        );
        if self.plan.ignore_unbound {
            for (param, slot) in self.plan.wrapper.params.iter().zip(args.iter_mut()) {
                if param.ref_kind == RefKind::Out {
                    *slot = Value::Default(param.ty);
                }
            }
            return Ok(self
                .plan
                .async_shape
                .value
                .map_or(Value::Unit, Value::Default));
        }

        let dynamic: Vec<(usize, &WrapperParam)> = self
            .plan
            .wrapper
            .params
            .iter()
            .enumerate()
            .filter(|(_, p)| p.dynamic)
            .collect();
        let [(index, param)] = dynamic.as_slice() else {
            return Err(BridgeError::Arguments { source: failure });
        };

        let runtime_type = args
            .get(*index)
            .and_then(|arg| arg.runtime_type(self.graph))
            .map(|ty| self.graph.display_type(ty));
        let expected = self.expected_definition(param.target_ty);
        let shown = runtime_type.as_deref().unwrap_or_default();
        let message = match &expected {
            Some(expected) => format!(
                "The argument of type '{shown}' could not be dynamically resolved to its specific type '{expected}'."
            ),
            None => format!(
                "The argument of type '{shown}' could not be dynamically resolved to its specific type."
            ),
        };
        Err(BridgeError::ArgumentType {
            param: param.name.clone(),
            runtime_type,
            expected,
            message,
            source: failure,
        })
    }

    /// `Demo.Container<T>` for `Container<int>`, `Demo.Container<T>[,]` for
    /// arrays of it.
    fn expected_definition(&self, ty: TypeId) -> Option<String> {
        match self.graph.lookup(ty) {
            TypeData::Named { def, .. } => Some(self.graph.display_def(def)),
            TypeData::Array { element, rank } => {
                let def = self.graph.def_of(element)?;
                let commas = ",".repeat(usize::from(rank.saturating_sub(1)));
                Some(format!("{}[{commas}]", self.graph.display_def(def)))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/call_tests.rs"]
mod tests;

use super::*;
use crate::types::{DefId, TypeParamId};
use rayon::prelude::*;
use smallvec::smallvec;

#[test]
fn test_interner_reserved_types() {
    let interner = TypeInterner::new();

    assert_eq!(interner.lookup(TypeId::VOID), TypeData::Void);
    assert_eq!(interner.lookup(TypeId::DYNAMIC), TypeData::Dynamic);
    assert_eq!(interner.lookup(TypeId::ERROR), TypeData::Error);
    assert_eq!(interner.intern(TypeData::Void), TypeId::VOID);
}

#[test]
fn test_interner_deduplication() {
    let interner = TypeInterner::new();

    let param = interner.intern(TypeData::Param(TypeParamId(0)));
    let a = interner.intern(TypeData::Named {
        def: DefId(4),
        args: smallvec![param],
    });
    let b = interner.intern(TypeData::Named {
        def: DefId(4),
        args: smallvec![param],
    });
    let c = interner.intern(TypeData::Array {
        element: param,
        rank: 1,
    });

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_interner_unknown_id_is_error() {
    let interner = TypeInterner::new();
    assert_eq!(interner.lookup(TypeId(10_000)), TypeData::Error);
}

#[test]
fn test_interner_concurrent_construction_agrees() {
    let interner = TypeInterner::new();

    let ids: Vec<TypeId> = (0..64)
        .into_par_iter()
        .map(|i| interner.intern(TypeData::Param(TypeParamId(i % 8))))
        .collect();

    for (i, id) in ids.iter().enumerate() {
        assert_eq!(*id, interner.intern(TypeData::Param(TypeParamId(i as u32 % 8))));
    }
    assert_eq!(interner.len(), TypeId::RESERVED as usize + 8);
}

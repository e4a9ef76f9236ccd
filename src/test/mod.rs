use std::sync::Arc;

use crate::metadata::{
    method::{MethodDefBuilder, MethodDefRc, MethodModifiers, MethodVtableFlags},
    registry::TypeRegistry,
    signatures::TypeSig,
    token::Token,
    typedef::{TypeAttributes, TypeDefBuilder, TypeDefRc},
};

// Helper function to create a new-slot virtual method
pub fn virtual_method(rid: u32, name: &str) -> MethodDefRc {
    MethodDefBuilder::new()
        .token(Token::method_def(rid))
        .name(name)
        .flags(
            MethodModifiers::VIRTUAL.bits()
                | MethodModifiers::HIDE_BY_SIG.bits()
                | MethodVtableFlags::NEW_SLOT.bits(),
        )
        .build()
        .unwrap()
}

// Helper function to create a reuse-slot virtual method
pub fn reuse_method(rid: u32, name: &str) -> MethodDefRc {
    MethodDefBuilder::new()
        .token(Token::method_def(rid))
        .name(name)
        .flags(MethodModifiers::VIRTUAL.bits() | MethodModifiers::HIDE_BY_SIG.bits())
        .build()
        .unwrap()
}

// Helper function to create a new-slot abstract method
pub fn abstract_method(rid: u32, name: &str) -> MethodDefRc {
    MethodDefBuilder::new()
        .token(Token::method_def(rid))
        .name(name)
        .flags(
            MethodModifiers::VIRTUAL.bits()
                | MethodModifiers::HIDE_BY_SIG.bits()
                | MethodModifiers::ABSTRACT.bits()
                | MethodVtableFlags::NEW_SLOT.bits(),
        )
        .build()
        .unwrap()
}

// Helper function to create a non-virtual instance method
pub fn plain_method(rid: u32, name: &str) -> MethodDefRc {
    MethodDefBuilder::new()
        .token(Token::method_def(rid))
        .name(name)
        .flags(MethodModifiers::HIDE_BY_SIG.bits())
        .build()
        .unwrap()
}

// Helper function to create a virtual method with parameters
pub fn method_with_params(rid: u32, name: &str, new_slot: bool, params: &[TypeSig]) -> MethodDefRc {
    let mut flags = MethodModifiers::VIRTUAL.bits() | MethodModifiers::HIDE_BY_SIG.bits();
    if new_slot {
        flags |= MethodVtableFlags::NEW_SLOT.bits();
    }
    let mut builder = MethodDefBuilder::new()
        .token(Token::method_def(rid))
        .name(name)
        .flags(flags);
    for param in params {
        builder = builder.param(param.clone());
    }
    builder.build().unwrap()
}

// Helper function to create a virtual method carrying explicit override declarations
pub fn method_with_overrides(
    rid: u32,
    name: &str,
    new_slot: bool,
    targets: &[(Token, Token)],
) -> MethodDefRc {
    let mut flags = MethodModifiers::VIRTUAL.bits()
        | MethodModifiers::HIDE_BY_SIG.bits()
        | MethodModifiers::FINAL.bits();
    if new_slot {
        flags |= MethodVtableFlags::NEW_SLOT.bits();
    }
    let mut builder = MethodDefBuilder::new()
        .token(Token::method_def(rid))
        .name(name)
        .flags(flags);
    for (declaration_type, declaration) in targets {
        builder = builder.overrides(*declaration_type, *declaration);
    }
    builder.build().unwrap()
}

// Helper function to create a concrete class
pub fn create_class(
    rid: u32,
    name: &str,
    base: Option<Token>,
    methods: &[MethodDefRc],
) -> TypeDefRc {
    create_class_full(rid, name, 0, base, &[], methods)
}

// Helper function to create a class with explicit flags and interface list
pub fn create_class_full(
    rid: u32,
    name: &str,
    flags: u32,
    base: Option<Token>,
    interfaces: &[Token],
    methods: &[MethodDefRc],
) -> TypeDefRc {
    let mut builder = TypeDefBuilder::new()
        .token(Token::type_def(rid))
        .name(name)
        .flags(flags);
    if let Some(base) = base {
        builder = builder.base(base);
    }
    for interface in interfaces {
        builder = builder.implements(*interface);
    }
    for method in methods {
        builder = builder.method(method.clone());
    }
    builder.build().unwrap()
}

// Helper function to create an interface
pub fn create_interface(rid: u32, name: &str, methods: &[MethodDefRc]) -> TypeDefRc {
    create_class_full(
        rid,
        name,
        TypeAttributes::INTERFACE.bits() | TypeAttributes::ABSTRACT.bits(),
        None,
        &[],
        methods,
    )
}

// Helper function to create a registry holding the given types
pub fn create_registry(types: &[TypeDefRc]) -> Arc<TypeRegistry> {
    let registry = Arc::new(TypeRegistry::new());
    for ty in types {
        registry.insert(ty).unwrap();
    }
    registry
}

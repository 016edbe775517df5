use jsz_scopes::{symbol_flags, ScopeTree, Symbol};

#[test]
fn test_symbol_kind_predicates() {
    let l = Symbol::new("a", symbol_flags::LET);
    assert!(l.is_let());
    assert!(!l.is_const());
    assert!(!l.is_var());
    assert!(l.is_block_scoped());

    let c = Symbol::new("b", symbol_flags::CONST);
    assert!(c.is_const());
    assert!(c.is_block_scoped());

    let v = Symbol::new("c", symbol_flags::VAR);
    assert!(v.is_var());
    assert!(!v.is_block_scoped());
}

#[test]
#[should_panic(expected = "exactly one declaration kind")]
fn test_symbol_requires_exactly_one_kind() {
    let _ = Symbol::new("x", symbol_flags::LET | symbol_flags::VAR);
}

#[test]
#[should_panic(expected = "exactly one declaration kind")]
fn test_symbol_requires_a_kind() {
    let _ = Symbol::new("x", symbol_flags::PARAMETER);
}

#[test]
fn test_symbol_display_codes() {
    assert_eq!(Symbol::new("a", symbol_flags::LET).to_string(), "a L");
    assert_eq!(Symbol::new("b", symbol_flags::CONST).to_string(), "b C");
    assert_eq!(Symbol::new("c", symbol_flags::VAR).to_string(), "c V");
    assert_eq!(
        Symbol::new("d", symbol_flags::VAR | symbol_flags::GLOBAL).to_string(),
        "d G"
    );
    assert_eq!(
        Symbol::new("e", symbol_flags::VAR | symbol_flags::PARAMETER).to_string(),
        "e P"
    );
}

#[test]
fn test_tdz_bit_roundtrip() {
    let mut sym = Symbol::new("x", symbol_flags::LET);
    assert!(!sym.has_been_declared());
    sym.set_has_been_declared(true);
    assert!(sym.has_been_declared());
    sym.set_has_been_declared(false);
    assert!(!sym.has_been_declared());
}

#[test]
fn test_attribute_predicates() {
    let sym = Symbol::new(
        "arguments",
        symbol_flags::VAR | symbol_flags::ARGUMENTS | symbol_flags::INTERNAL,
    );
    assert!(sym.is_arguments());
    assert!(sym.is_internal());
    assert!(!sym.is_this());

    let this = Symbol::new("this", symbol_flags::VAR | symbol_flags::THIS);
    assert!(this.is_this());

    let imported = Symbol::new(
        "imported",
        symbol_flags::CONST | symbol_flags::IMPORT_BINDING,
    );
    assert!(imported.is_import_binding());
}

#[test]
fn test_put_symbol_first_writer_wins() {
    let mut tree = ScopeTree::new();
    let global = tree.create_global();
    let flags = symbol_flags::VAR | symbol_flags::HOISTABLE_DECLARATION;
    assert!(tree.put_symbol(global, Symbol::new("x", flags)).is_none());
    let first = tree.scope(global).get_existing_symbol("x").unwrap();

    // repeated var declaration hands back the original
    let existing = tree.put_symbol(global, Symbol::new("x", flags));
    assert_eq!(existing, Some(first));
    assert_eq!(tree.scope(global).symbol_count(), 1);
}

#[test]
#[should_panic(expected = "conflicting declaration kind")]
fn test_put_symbol_kind_conflict_aborts() {
    let mut tree = ScopeTree::new();
    let global = tree.create_global();
    tree.put_symbol(global, Symbol::new("x", symbol_flags::VAR));
    tree.put_symbol(global, Symbol::new("x", symbol_flags::LET));
}

#[test]
fn test_symbol_iteration_order_is_declaration_order() {
    let mut tree = ScopeTree::new();
    let global = tree.create_global();
    for name in ["zeta", "alpha", "mid"] {
        tree.put_symbol(global, Symbol::new(name, symbol_flags::VAR));
    }
    let names: Vec<&str> = tree.scope(global).symbols().map(|(name, _)| name).collect();
    assert_eq!(names, ["zeta", "alpha", "mid"]);
}

#[test]
fn test_block_scoped_flag_on_scope() {
    let mut tree = ScopeTree::new();
    let global = tree.create_global();
    let block = tree.create_block(global);
    assert!(!tree.scope(block).has_block_scoped_or_redeclared_symbols());
    tree.put_symbol(block, Symbol::new("x", symbol_flags::LET));
    assert!(tree.scope(block).has_block_scoped_or_redeclared_symbols());

    let body = tree.create_function_body(global, 0, true);
    tree.put_symbol(
        body,
        Symbol::new("p", symbol_flags::VAR | symbol_flags::VAR_REDECLARED_HERE),
    );
    assert!(tree.scope(body).has_block_scoped_or_redeclared_symbols());
}

#[test]
fn test_private_names() {
    let mut tree = ScopeTree::new();
    let global = tree.create_global();
    let class_head = tree.create_class_head(global);
    let class_body = tree.create_class_body(class_head);

    assert!(tree.add_private_name(class_body, "#field", 0));
    // duplicate private name: caller's error to report, nothing mutated
    assert!(!tree.add_private_name(class_body, "#field", 0));
    assert!(tree.add_private_name(
        class_body,
        "#method",
        symbol_flags::PRIVATE_NAME_METHOD
    ));

    assert!(tree.scope(class_body).has_private_names());
    let field = tree.scope(class_body).get_existing_symbol("#field").unwrap();
    assert!(tree.symbol(field).is_private_name());
    assert!(tree.symbol(field).is_private_field());
    assert!(tree.symbol(field).is_const());
    assert!(tree.symbol(field).has_been_declared());

    let method = tree.scope(class_body).get_existing_symbol("#method").unwrap();
    assert!(tree.symbol(method).is_private_method());
    assert!(!tree.symbol(method).is_private_field());

    // visible from a method body nested below the class body
    let method_scope = tree.create_function_parameter(class_body, 0);
    assert!(tree.find_private_name(method_scope, "#field"));
    assert!(!tree.find_private_name(method_scope, "#missing"));
}

#[test]
#[should_panic(expected = "class bodies")]
fn test_private_name_requires_class_body() {
    let mut tree = ScopeTree::new();
    let global = tree.create_global();
    tree.add_private_name(global, "#oops", 0);
}

#[test]
fn test_scope_display_lists_symbols() {
    let mut tree = ScopeTree::new();
    let global = tree.create_global();
    tree.put_symbol(global, Symbol::new("x", symbol_flags::VAR));
    tree.put_symbol(global, Symbol::new("y", symbol_flags::LET));
    assert_eq!(tree.scope(global).to_string(), "[GlobalScope(x,y)]");
}

//! End-to-end rewrite sessions over small Java sources

use jrewrite_rewrite::{AstRewrite, EditOperation, RewriteError, RewriteEvent};
use jrewrite_syntax::{parse, Ast, NodeId, NodeKind, Prop};
use pretty_assertions::assert_eq;

fn in_method(body: &str) -> String {
    format!("class A {{\n    void f() {{\n{}\n    }}\n}}\n", body)
}

fn statements(ast: &Ast) -> Vec<NodeId> {
    let block = ast.find_first(NodeKind::Block).unwrap();
    ast.list(block, Prop::Statements).to_vec()
}

#[test]
fn test_array_index_copy_keeps_comment() {
    let source = in_method("        o[3 /* comment*/ - 1]= this.o[3 - 1];");
    let ast = parse(&source).unwrap();
    let accesses = ast.find_all(NodeKind::ArrayAccess);
    let (left, right) = (accesses[0], accesses[1]);
    let left_index = ast.child(left, Prop::Index).unwrap();
    let right_index = ast.child(right, Prop::Index).unwrap();
    let right_array = ast.child(right, Prop::Array).unwrap();

    let mut rw = AstRewrite::new(&ast);
    let one = rw.new_number_literal("1");
    rw.replace(left_index, one).unwrap();
    let copy = rw.create_copy_target(left_index).unwrap();
    rw.replace(right_index, copy).unwrap();
    let name = rw.new_simple_name("o");
    rw.replace(right_array, name).unwrap();

    assert_eq!(
        rw.rewrite_source().unwrap(),
        in_method("        o[1]= o[3 /* comment*/ - 1];")
    );
}

#[test]
fn test_enum_constant_remove_and_insert() {
    let source = "public enum E { A, B, C }";
    let ast = parse(source).unwrap();
    let decl = ast.find_first(NodeKind::EnumDeclaration).unwrap();
    let constants = ast.list(decl, Prop::EnumConstants).to_vec();

    let mut rw = AstRewrite::new(&ast);
    rw.remove(constants[0]).unwrap();
    let x = rw.new_enum_constant("X");
    rw.list(decl, Prop::EnumConstants)
        .unwrap()
        .insert_after(x, constants[1])
        .unwrap();

    let edits = rw.compute_edits().unwrap();
    assert_eq!(edits.len(), 2);
    assert_eq!(rw.rewrite_source().unwrap(), "public enum E { B, X, C }");
    assert_eq!(rw.event(constants[0]), RewriteEvent::Removed);
    assert_eq!(rw.event(constants[1]), RewriteEvent::Unchanged);
}

#[test]
fn test_enum_body_declaration_adds_semicolon() {
    let source = "public enum E { A, B, C }";
    let ast = parse(source).unwrap();
    let decl = ast.find_first(NodeKind::EnumDeclaration).unwrap();

    let mut rw = AstRewrite::new(&ast);
    let void = rw.new_primitive_type("void");
    let method = rw.new_method_declaration(&[], Some(void), "m").unwrap();
    rw.list(decl, Prop::BodyDeclarations).unwrap().insert_last(method).unwrap();

    assert_eq!(
        rw.rewrite_source().unwrap(),
        "public enum E { A, B, C;\n    void m() {\n    }\n}"
    );
}

#[test]
fn test_assignment_operator_and_operand() {
    let source = in_method("        x = 1;");
    let ast = parse(&source).unwrap();
    let assignment = ast.find_first(NodeKind::Assignment).unwrap();
    let right = ast.child(assignment, Prop::Right).unwrap();

    let mut rw = AstRewrite::new(&ast);
    rw.set_text(assignment, Prop::Operator, "+=").unwrap();
    let two = rw.new_number_literal("2");
    rw.replace(right, two).unwrap();

    assert_eq!(rw.rewrite_source().unwrap(), in_method("        x += 2;"));
    assert_eq!(rw.log().len(), 2);
}

#[test]
fn test_multiple_copies_of_one_argument() {
    let source = in_method("        foo(a);");
    let ast = parse(&source).unwrap();
    let call = ast.find_first(NodeKind::MethodInvocation).unwrap();
    let argument = ast.list(call, Prop::Arguments)[0];

    let mut rw = AstRewrite::new(&ast);
    let first = rw.create_copy_target(argument).unwrap();
    let second = rw.create_copy_target(argument).unwrap();
    let mut list = rw.list(call, Prop::Arguments).unwrap();
    list.insert_last(first).unwrap();
    list.insert_last(second).unwrap();
    assert_eq!(list.rewritten_list(), vec![argument, first, second]);

    assert_eq!(rw.rewrite_source().unwrap(), in_method("        foo(a, a, a);"));
}

#[test]
fn test_nested_copy_carries_inner_changes() {
    let source = in_method("        f(a, g(b));");
    let ast = parse(&source).unwrap();
    let calls = ast.find_all(NodeKind::MethodInvocation);
    let (outer, inner) = (calls[0], calls[1]);
    let a = ast.list(outer, Prop::Arguments)[0];
    let b = ast.list(inner, Prop::Arguments)[0];

    let mut rw = AstRewrite::new(&ast);
    let copy_a = rw.create_copy_target(a).unwrap();
    rw.replace(b, copy_a).unwrap();
    let copy_g = rw.create_copy_target(inner).unwrap();
    rw.list(outer, Prop::Arguments).unwrap().insert_last(copy_g).unwrap();

    assert_eq!(rw.rewrite_source().unwrap(), in_method("        f(a, g(a), g(a));"));
}

#[test]
fn test_changes_inside_moved_statement() {
    let source = in_method("        a(1);\n        b();");
    let ast = parse(&source).unwrap();
    let block = ast.find_first(NodeKind::Block).unwrap();
    let first = statements(&ast)[0];
    let literal = ast.find_first(NodeKind::NumberLiteral).unwrap();

    let mut rw = AstRewrite::new(&ast);
    rw.move_node(first, block, Prop::Statements, 2).unwrap();
    let two = rw.new_number_literal("2");
    rw.replace(literal, two).unwrap();

    assert_eq!(rw.rewrite_source().unwrap(), in_method("        b();\n        a(2);"));
    assert!(rw
        .log()
        .operations()
        .iter()
        .any(|op| matches!(op, EditOperation::Move { first: f, .. } if *f == first)));
}

#[test]
fn test_move_last_statement_to_front() {
    let source = in_method("        a();\n        b();\n        c();");
    let ast = parse(&source).unwrap();
    let block = ast.find_first(NodeKind::Block).unwrap();
    let last = statements(&ast)[2];

    let mut rw = AstRewrite::new(&ast);
    rw.move_node(last, block, Prop::Statements, 0).unwrap();

    assert_eq!(
        rw.rewrite_source().unwrap(),
        in_method("        c();\n        a();\n        b();")
    );
}

#[test]
fn test_copy_statement_range() {
    let source = in_method("        a();\n        b();");
    let ast = parse(&source).unwrap();
    let block = ast.find_first(NodeKind::Block).unwrap();
    let stmts = statements(&ast);

    let mut rw = AstRewrite::new(&ast);
    let copy = rw.create_copy_target_range(stmts[0], stmts[1]).unwrap();
    rw.list(block, Prop::Statements).unwrap().insert_last(copy).unwrap();

    assert_eq!(
        rw.rewrite_source().unwrap(),
        in_method("        a();\n        b();\n        a();\n        b();")
    );
}

#[test]
fn test_overlapping_moves_are_rejected() {
    let source = in_method("        a(1);");
    let ast = parse(&source).unwrap();
    let statement = statements(&ast)[0];
    let literal = ast.find_first(NodeKind::NumberLiteral).unwrap();

    let mut rw = AstRewrite::new(&ast);
    rw.create_move_target(statement).unwrap();
    let err = rw.create_move_target(literal).unwrap_err();
    assert!(matches!(err, RewriteError::OverlappingRange { .. }));
}

#[test]
fn test_original_node_cannot_be_placed_directly() {
    let source = in_method("        a(1);");
    let ast = parse(&source).unwrap();
    let call = ast.find_first(NodeKind::MethodInvocation).unwrap();
    let literal = ast.find_first(NodeKind::NumberLiteral).unwrap();

    let mut rw = AstRewrite::new(&ast);
    let err = rw.list(call, Prop::Arguments).unwrap().insert_last(literal).unwrap_err();
    assert!(matches!(err, RewriteError::InvalidNode { .. }));
}

#[test]
fn test_untouched_session_produces_no_edits() {
    let source = in_method("        a(1); // keep\n        b();");
    let ast = parse(&source).unwrap();
    let rw = AstRewrite::new(&ast);
    assert!(rw.is_unchanged());
    assert!(rw.compute_edits().unwrap().is_empty());
    assert_eq!(rw.rewrite_source().unwrap(), source);
}

#[test]
fn test_insert_into_empty_block() {
    let source = "class A {\n    void f() {}\n}\n";
    let ast = parse(source).unwrap();
    let block = ast.find_first(NodeKind::Block).unwrap();

    let mut rw = AstRewrite::new(&ast);
    let call = rw.new_method_invocation(None, "g", &[]).unwrap();
    let statement = rw.new_expression_statement(call).unwrap();
    rw.list(block, Prop::Statements).unwrap().insert_first(statement).unwrap();

    assert_eq!(
        rw.rewrite_source().unwrap(),
        "class A {\n    void f() {\n        g();\n    }\n}\n"
    );
}

#[test]
fn test_remove_optional_children() {
    let source = in_method("        if (a) x(); else y();\n        return z;");
    let ast = parse(&source).unwrap();
    let branch = ast.find_first(NodeKind::IfStatement).unwrap();
    let otherwise = ast.child(branch, Prop::ElseStatement).unwrap();
    let ret = ast.find_first(NodeKind::ReturnStatement).unwrap();
    let value = ast.child(ret, Prop::Expression).unwrap();

    let mut rw = AstRewrite::new(&ast);
    rw.remove(otherwise).unwrap();
    rw.remove(value).unwrap();

    assert_eq!(rw.rewrite_source().unwrap(), in_method("        if (a) x();\n        return;"));
}

#[test]
fn test_remove_required_child_is_rejected() {
    let source = in_method("        if (a) x();");
    let ast = parse(&source).unwrap();
    let branch = ast.find_first(NodeKind::IfStatement).unwrap();
    let condition = ast.child(branch, Prop::Expression).unwrap();

    let mut rw = AstRewrite::new(&ast);
    assert!(matches!(rw.remove(condition), Err(RewriteError::InvalidNode { .. })));
    assert!(rw.is_unchanged());
}

#[test]
fn test_remove_method_body() {
    let source = "abstract class A {\n    abstract void f() { }\n}\n";
    let ast = parse(source).unwrap();
    let body = ast.find_first(NodeKind::Block).unwrap();

    let mut rw = AstRewrite::new(&ast);
    rw.remove(body).unwrap();

    assert_eq!(rw.rewrite_source().unwrap(), "abstract class A {\n    abstract void f();\n}\n");
}

#[test]
fn test_remove_every_modifier() {
    let source = "class A {\n    public static void f() {}\n}\n";
    let ast = parse(source).unwrap();
    let method = ast.find_first(NodeKind::MethodDeclaration).unwrap();
    let modifiers = ast.list(method, Prop::Modifiers).to_vec();

    let mut rw = AstRewrite::new(&ast);
    for modifier in modifiers {
        rw.remove(modifier).unwrap();
    }

    assert_eq!(rw.rewrite_source().unwrap(), "class A {\n    void f() {}\n}\n");
}

#[test]
fn test_remove_all_statements_takes_whole_lines() {
    let source = in_method("        a();\n        // about b\n        b();");
    let ast = parse(&source).unwrap();
    let stmts = statements(&ast);

    let mut rw = AstRewrite::new(&ast);
    rw.remove(stmts[0]).unwrap();
    rw.remove(stmts[1]).unwrap();

    assert_eq!(rw.rewrite_source().unwrap(), "class A {\n    void f() {\n    }\n}\n");
}

#[test]
fn test_import_flags() {
    let source = "import java.util.List;\n\nclass A {\n}\n";
    let ast = parse(source).unwrap();
    let import = ast.find_first(NodeKind::ImportDeclaration).unwrap();

    let mut rw = AstRewrite::new(&ast);
    rw.set_flag(import, Prop::Static, true).unwrap();
    rw.set_flag(import, Prop::OnDemand, true).unwrap();

    assert_eq!(
        rw.rewrite_source().unwrap(),
        "import static java.util.List.*;\n\nclass A {\n}\n"
    );
}

#[test]
fn test_replace_wins_over_implicit_move_removal() {
    let source = in_method("        x = y;");
    let ast = parse(&source).unwrap();
    let assignment = ast.find_first(NodeKind::Assignment).unwrap();
    let left = ast.child(assignment, Prop::Left).unwrap();
    let right = ast.child(assignment, Prop::Right).unwrap();

    let mut rw = AstRewrite::new(&ast);
    let moved_left = rw.create_move_target(left).unwrap();
    let moved_right = rw.create_move_target(right).unwrap();
    rw.replace(left, moved_right).unwrap();
    rw.replace(right, moved_left).unwrap();

    assert_eq!(rw.rewrite_source().unwrap(), in_method("        y = x;"));
}

#[test]
fn test_intersection_type_list_edit() {
    let source = in_method("        x = (String & Comparable) y;");
    let ast = parse(&source).unwrap();
    let intersection = ast.find_first(NodeKind::IntersectionType).unwrap();
    let types = ast.list(intersection, Prop::Types).to_vec();

    let mut rw = AstRewrite::new(&ast);
    rw.remove(types[0]).unwrap();
    let serializable = rw.new_simple_type("Serializable");
    rw.list(intersection, Prop::Types)
        .unwrap()
        .insert_last(serializable)
        .unwrap();

    assert_eq!(
        rw.rewrite_source().unwrap(),
        in_method("        x = (Comparable & Serializable) y;")
    );
}

#[test]
fn test_replace_supersedes_property_change() {
    let source = in_method("        x = y + 1;");
    let ast = parse(&source).unwrap();
    let infix = ast.find_first(NodeKind::InfixExpression).unwrap();

    let mut rw = AstRewrite::new(&ast);
    rw.set_text(infix, Prop::Operator, "-").unwrap();
    let zero = rw.new_number_literal("0");
    rw.replace(infix, zero).unwrap();

    assert_eq!(rw.rewrite_source().unwrap(), in_method("        x = 0;"));
    assert_eq!(rw.event(infix), RewriteEvent::Replaced(zero));
}

#[test]
fn test_move_within_one_list() {
    let source = in_method("        g(a, b, c);");
    let ast = parse(&source).unwrap();
    let call = ast.find_first(NodeKind::MethodInvocation).unwrap();
    let a = ast.list(call, Prop::Arguments)[0];

    let mut rw = AstRewrite::new(&ast);
    // removed originals keep their index, so 3 is after `c`
    rw.move_node(a, call, Prop::Arguments, 3).unwrap();

    assert_eq!(rw.rewrite_source().unwrap(), in_method("        g(b, c, a);"));
}

#[test]
fn test_swap_siblings_with_move_targets() {
    let source = in_method("        g(a, /* c */ b);");
    let ast = parse(&source).unwrap();
    let call = ast.find_first(NodeKind::MethodInvocation).unwrap();
    let args = ast.list(call, Prop::Arguments).to_vec();

    let mut rw = AstRewrite::new(&ast);
    let moved_a = rw.create_move_target(args[0]).unwrap();
    let moved_b = rw.create_move_target(args[1]).unwrap();
    rw.replace(args[0], moved_b).unwrap();
    rw.replace(args[1], moved_a).unwrap();

    assert_eq!(rw.rewrite_source().unwrap(), in_method("        g(b, /* c */ a);"));
}

#[test]
fn test_first_import_goes_below_package_line_comment() {
    let source = "package p; // pkg\n\nclass A {\n}\n";
    let ast = parse(source).unwrap();
    let unit = ast.root();

    let mut rw = AstRewrite::new(&ast);
    let import = rw.new_node(NodeKind::ImportDeclaration);
    let name = rw.new_name("java.util.List");
    rw.set_child(import, Prop::Name, Some(name)).unwrap();
    rw.list(unit, Prop::Imports).unwrap().insert_last(import).unwrap();

    assert_eq!(
        rw.rewrite_source().unwrap(),
        "package p; // pkg\n\nimport java.util.List;\n\nclass A {\n}\n"
    );
}

//! Import reconciliation scenarios over whole compilation units

use jrewrite_imports::{ImportConfig, ImportError, ImportRewrite, KnownTypes};
use pretty_assertions::assert_eq;

fn rewrite(source: &str, restore: bool, build: impl FnOnce(&mut ImportRewrite)) -> String {
    let mut session = ImportRewrite::create(source, restore).unwrap();
    build(&mut session);
    session.rewrite_source().unwrap()
}

#[test]
fn test_no_edits_for_present_import() {
    let source = "package p;\n\nimport java.util.List;\n\nclass A {}\n";
    let mut session = ImportRewrite::create(source, true).unwrap();
    assert_eq!(session.add_import("java.util.List"), "List");
    assert!(session.rewrite_imports().unwrap().is_empty());
}

#[test]
fn test_add_after_package() {
    let out = rewrite("package p;\n\nclass A {}\n", true, |s| {
        s.add_import("java.util.List");
    });
    assert_eq!(out, "package p;\n\nimport java.util.List;\n\nclass A {}\n");
}

#[test]
fn test_add_without_package() {
    let out = rewrite("class A {}\n", true, |s| {
        s.add_import("java.util.List");
    });
    assert_eq!(out, "import java.util.List;\n\nclass A {}\n");
}

#[test]
fn test_keeps_crlf_delimiter() {
    let out = rewrite("package p;\r\n\r\nclass A {}\r\n", true, |s| {
        s.add_import("java.util.List");
    });
    assert_eq!(out, "package p;\r\n\r\nimport java.util.List;\r\n\r\nclass A {}\r\n");
}

#[test]
fn test_duplicates_do_not_count_toward_threshold() {
    let source = "package p;\n\nimport java.util.List;\nimport java.util.List;\n\nclass A {}\n";
    let below = rewrite(source, true, |s| {
        s.set_on_demand_threshold(3);
        s.add_import("java.util.Map");
    });
    assert_eq!(
        below,
        "package p;\n\nimport java.util.List;\nimport java.util.List;\nimport java.util.Map;\n\nclass A {}\n"
    );

    let folded = rewrite(source, true, |s| {
        s.set_on_demand_threshold(3);
        s.add_import("java.util.Map");
        s.add_import("java.util.Set");
    });
    assert_eq!(folded, "package p;\n\nimport java.util.*;\n\nclass A {}\n");
}

#[test]
fn test_reduce_new_on_demand_keeps_comments() {
    let source = "package p;\n\n// file\nimport java.io.File;\nimport java.io.Reader; // reader\n\nclass A {}\n";
    let out = rewrite(source, true, |s| {
        s.set_on_demand_threshold(3);
        assert_eq!(s.add_import("java.io.Writer"), "Writer");
    });
    assert_eq!(out, "package p;\n\n// file\nimport java.io.*; // reader\n\nclass A {}\n");
}

#[test]
fn test_reduce_existing_on_demand_without_restore() {
    let source = "package p;\n\nimport java.io.*; // io\nimport java.io.File; // file\n\nclass A {}\n";
    let out = rewrite(source, false, |s| {
        s.set_on_demand_threshold(3);
        s.add_import("java.io.File");
        s.add_import("java.io.Reader");
        s.add_import("java.io.Writer");
    });
    assert_eq!(out, "package p;\n\nimport java.io.*; // io\n// file\n\nclass A {}\n");
}

#[test]
fn test_removed_import_comments_are_removed() {
    let source = "package p;\n\n// about List\nimport java.util.List; // list\nimport java.util.Map;\n\nclass A {}\n";
    let mut session = ImportRewrite::create(source, true).unwrap();
    assert!(session.remove_import("java.util.List"));
    assert!(!session.remove_import("java.util.Set"));
    assert_eq!(
        session.rewrite_source().unwrap(),
        "package p;\n\nimport java.util.Map;\n\nclass A {}\n"
    );
}

#[test]
fn test_removing_last_import_drops_block() {
    let out = rewrite("package p;\n\nimport a.A;\n\nclass X {}\n", true, |s| {
        s.remove_import("a.A");
    });
    assert_eq!(out, "package p;\n\nclass X {}\n");
}

#[test]
fn test_add_order_does_not_matter() {
    let names = ["java.util.Map", "org.x.Y", "java.io.File", "javax.swing.JList"];
    let expected = "package p;\n\nimport java.io.File;\nimport java.util.Map;\n\nimport javax.swing.JList;\n\nimport org.x.Y;\n\nclass A {}\n";
    let orders: [[usize; 4]; 4] = [[0, 1, 2, 3], [3, 2, 1, 0], [1, 3, 0, 2], [2, 0, 3, 1]];
    for order in orders {
        let out = rewrite("package p;\n\nclass A {}\n", true, |s| {
            s.set_import_order(vec!["java".into(), "javax".into(), "org".into()]);
            for &i in &order {
                s.add_import(names[i]);
            }
        });
        assert_eq!(out, expected);
    }
}

#[test]
fn test_blank_lines_between_groups() {
    let config = ImportConfig {
        order: vec!["java".into(), "org".into()],
        blank_lines_between_groups: 2,
        ..ImportConfig::default()
    };
    let mut session = ImportRewrite::create("package p;\n\nclass A {}\n", true)
        .unwrap()
        .with_config(config);
    session.add_import("org.x.Y");
    session.add_import("java.util.List");
    assert_eq!(
        session.rewrite_source().unwrap(),
        "package p;\n\nimport java.util.List;\n\n\nimport org.x.Y;\n\nclass A {}\n"
    );
}

#[test]
fn test_static_imports_lead() {
    let mut session = ImportRewrite::create("package p;\n\nclass A {}\n", true).unwrap();
    assert_eq!(session.add_static_import("java.lang.Math", "max", false), "max");
    assert_eq!(session.add_import("java.util.List"), "List");
    assert_eq!(
        session.rewrite_source().unwrap(),
        "package p;\n\nimport static java.lang.Math.max;\n\nimport java.util.List;\n\nclass A {}\n"
    );
}

#[test]
fn test_static_threshold_folds_members() {
    let out = rewrite("package p;\n\nclass A {}\n", true, |s| {
        s.set_static_on_demand_threshold(2);
        s.add_static_import("org.junit.Assert", "assertEquals", false);
        s.add_static_import("org.junit.Assert", "fail", false);
    });
    assert_eq!(out, "package p;\n\nimport static org.junit.Assert.*;\n\nclass A {}\n");
}

#[test]
fn test_remove_static_import() {
    let source = "package p;\n\nimport static java.lang.Math.max;\nimport java.util.List;\n\nclass A {}\n";
    let out = rewrite(source, true, |s| {
        assert!(!s.remove_import("java.lang.Math.max"));
        assert!(s.remove_static_import("java.lang.Math.max"));
    });
    assert_eq!(out, "package p;\n\nimport java.util.List;\n\nclass A {}\n");
}

#[test]
fn test_duplicate_import_omitted_without_restore() {
    let source = "package p;\n\nimport java.util.List; // keep\nimport java.util.List;\nimport java.util.Map;\n\nclass A {}\n";
    let out = rewrite(source, false, |s| {
        assert_eq!(s.add_import("java.util.List"), "List");
    });
    assert_eq!(out, "package p;\n\nimport java.util.List; // keep\n\nclass A {}\n");
}

#[test]
fn test_unit_not_on_classpath_is_untouched() {
    let source = "package p;\n\nimport a.A;\n\nclass X {}\n";
    let mut session = ImportRewrite::create(source, true)
        .unwrap()
        .with_oracle(Box::new(KnownTypes::detached()));
    assert_eq!(session.add_import("java.util.List"), "java.util.List");
    assert!(session.rewrite_imports().unwrap().is_empty());

    assert!(session.remove_import("a.A"));
    assert_eq!(session.rewrite_source().unwrap(), "package p;\n\nclass X {}\n");
}

#[test]
fn test_remove_import_with_syntax_error_in_body() {
    let source = "package p;\n\nimport a.A;\nimport b.B;\n\nclass X { void f( { int }\n";
    let out = rewrite(source, true, |s| {
        s.remove_import("b.B");
    });
    assert_eq!(out, "package p;\n\nimport a.A;\n\nclass X { void f( { int }\n");
}

#[test]
fn test_malformed_header_is_an_error() {
    let result = ImportRewrite::create("import a.;\nclass X {}\n", true);
    assert!(matches!(result, Err(ImportError::Syntax { .. })));
}

#[test]
fn test_conflicting_simple_name_stays_qualified() {
    let source = "package p;\n\nimport java.awt.List;\n\nclass A {}\n";
    let mut session = ImportRewrite::create(source, true).unwrap();
    assert_eq!(session.add_import("java.util.List"), "java.util.List");
    assert!(session.added_imports().is_empty());
    assert!(session.rewrite_imports().unwrap().is_empty());
}

#[test]
fn test_shadowed_name_stays_explicit() {
    let source = "package p;\n\nimport java.awt.*;\n\nclass A {}\n";

    let plain = rewrite(source, true, |s| {
        s.set_on_demand_threshold(2);
        s.add_import("java.util.List");
        s.add_import("java.util.Map");
    });
    assert_eq!(plain, "package p;\n\nimport java.awt.*;\nimport java.util.*;\n\nclass A {}\n");

    let mut session = ImportRewrite::create(source, true)
        .unwrap()
        .with_oracle(Box::new(KnownTypes::new().with_container("java.awt", ["Button", "List"])));
    session.set_on_demand_threshold(2);
    session.add_import("java.util.List");
    session.add_import("java.util.Map");
    assert_eq!(
        session.rewrite_source().unwrap(),
        "package p;\n\nimport java.awt.*;\nimport java.util.List;\nimport java.util.Map;\n\nclass A {}\n"
    );
}

//! Printing of nodes created in a session
//!
//! Created nodes have no source text. They are printed from their slots with
//! the session's formatting options; children that are placeholders are
//! expanded from the original text.

use super::Synth;
use crate::error::{Result, RewriteError};
use crate::session::CreatedNode;
use jrewrite_syntax::{NodeId, NodeKind, Prop};

impl<'r> Synth<'r, '_> {
    pub(super) fn print_created(&mut self, id: NodeId, indent: &str) -> Result<String> {
        use NodeKind::*;
        let rw = self.rw;
        let node: &'r CreatedNode = rw
            .created(id)
            .ok_or_else(|| RewriteError::invalid(id, "node does not belong to this session"))?;
        let ld = self.ld;
        let inner = format!("{}{}", indent, self.unit);
        let text = |prop: Prop| node.slots.text(prop).unwrap_or_default().to_string();

        let printed = match node.kind {
            CompilationUnit => {
                let mut parts = Vec::new();
                if let Some(package) = self.opt_child(node, Prop::Package, indent)? {
                    parts.push(package);
                }
                let imports = self.join(node, Prop::Imports, ld, indent)?;
                if !imports.is_empty() {
                    parts.push(imports);
                }
                let types = self.join(node, Prop::Types, &self.member_separator(indent), indent)?;
                if !types.is_empty() {
                    parts.push(types);
                }
                let mut out = parts.join(&format!("{ld}{ld}"));
                out.push_str(ld);
                out
            }
            PackageDeclaration => format!("package {};", self.req_child(node, id, Prop::Name, indent)?),
            ImportDeclaration => {
                let name = self.req_child(node, id, Prop::Name, indent)?;
                let keyword = if node.slots.flag(Prop::Static) { "import static " } else { "import " };
                let star = if node.slots.flag(Prop::OnDemand) { ".*" } else { "" };
                format!("{keyword}{name}{star};")
            }
            TypeDeclaration => {
                let mut out = self.modifiers(node, indent)?;
                out.push_str(if node.slots.flag(Prop::Interface) { "interface " } else { "class " });
                out.push_str(&self.req_child(node, id, Prop::Name, indent)?);
                if let Some(superclass) = self.opt_child(node, Prop::Superclass, indent)? {
                    out.push_str(" extends ");
                    out.push_str(&superclass);
                }
                let interfaces = self.join(node, Prop::Interfaces, self.config.comma(), indent)?;
                if !interfaces.is_empty() {
                    out.push_str(if node.slots.flag(Prop::Interface) { " extends " } else { " implements " });
                    out.push_str(&interfaces);
                }
                out.push(' ');
                out.push_str(&self.type_body(node, "", indent)?);
                out
            }
            EnumDeclaration => {
                let mut out = self.modifiers(node, indent)?;
                out.push_str("enum ");
                out.push_str(&self.req_child(node, id, Prop::Name, indent)?);
                let interfaces = self.join(node, Prop::Interfaces, self.config.comma(), indent)?;
                if !interfaces.is_empty() {
                    out.push_str(" implements ");
                    out.push_str(&interfaces);
                }
                let mut constants = self.join(node, Prop::EnumConstants, self.config.comma(), &inner)?;
                if !node.slots.list(Prop::BodyDeclarations).is_empty() {
                    constants.push(';');
                }
                out.push(' ');
                out.push_str(&self.type_body(node, &constants, indent)?);
                out
            }
            EnumConstant => {
                let mut out = self.req_child(node, id, Prop::Name, indent)?;
                if !node.slots.list(Prop::Arguments).is_empty() {
                    out.push_str(&self.arguments(node, indent)?);
                }
                out
            }
            FieldDeclaration | VariableDeclarationStatement => {
                let mut out = self.modifiers(node, indent)?;
                out.push_str(&self.req_child(node, id, Prop::Type, indent)?);
                out.push(' ');
                out.push_str(&self.join(node, Prop::Fragments, self.config.comma(), indent)?);
                out.push(';');
                out
            }
            MethodDeclaration => {
                let mut out = self.modifiers(node, indent)?;
                if let Some(return_type) = self.opt_child(node, Prop::ReturnType, indent)? {
                    out.push_str(&return_type);
                    out.push(' ');
                }
                out.push_str(&self.req_child(node, id, Prop::Name, indent)?);
                out.push('(');
                out.push_str(&self.join(node, Prop::Parameters, self.config.comma(), indent)?);
                out.push(')');
                let thrown = self.join(node, Prop::ThrownExceptions, self.config.comma(), indent)?;
                if !thrown.is_empty() {
                    out.push_str(" throws ");
                    out.push_str(&thrown);
                }
                match self.opt_child(node, Prop::Body, indent)? {
                    Some(body) => {
                        out.push(' ');
                        out.push_str(&body);
                    }
                    None => out.push(';'),
                }
                out
            }
            SingleVariableDeclaration => {
                let mut out = self.modifiers(node, indent)?;
                out.push_str(&self.req_child(node, id, Prop::Type, indent)?);
                if node.slots.flag(Prop::Varargs) {
                    out.push_str("...");
                }
                out.push(' ');
                out.push_str(&self.req_child(node, id, Prop::Name, indent)?);
                out
            }
            VariableDeclarationFragment => {
                let mut out = self.req_child(node, id, Prop::Name, indent)?;
                if let Some(initializer) = self.opt_child(node, Prop::Initializer, indent)? {
                    out.push_str(&self.config.assignment("="));
                    out.push_str(&initializer);
                }
                out
            }
            Modifier | PrimitiveType => text(Prop::Keyword),
            Annotation => {
                let mut out = format!("@{}", self.req_child(node, id, Prop::TypeName, indent)?);
                if !node.slots.list(Prop::Arguments).is_empty() {
                    if self.config.space_before_annotation_paren {
                        out.push(' ');
                    }
                    out.push_str(&self.arguments(node, indent)?);
                }
                out
            }
            Block => {
                let statements = node.slots.list(Prop::Statements);
                if statements.is_empty() {
                    format!("{{{ld}{indent}}}")
                } else {
                    let separator = format!("{ld}{inner}");
                    let body = self.join(node, Prop::Statements, &separator, &inner)?;
                    format!("{{{separator}{body}{ld}{indent}}}")
                }
            }
            ExpressionStatement => format!("{};", self.req_child(node, id, Prop::Expression, indent)?),
            ReturnStatement => match self.opt_child(node, Prop::Expression, indent)? {
                Some(expression) => format!("return {};", expression),
                None => "return;".to_string(),
            },
            ThrowStatement => format!("throw {};", self.req_child(node, id, Prop::Expression, indent)?),
            IfStatement => {
                let mut out = format!(
                    "if ({}) {}",
                    self.req_child(node, id, Prop::Expression, indent)?,
                    self.req_child(node, id, Prop::ThenStatement, indent)?
                );
                if let Some(otherwise) = self.opt_child(node, Prop::ElseStatement, indent)? {
                    out.push_str(" else ");
                    out.push_str(&otherwise);
                }
                out
            }
            WhileStatement => format!(
                "while ({}) {}",
                self.req_child(node, id, Prop::Expression, indent)?,
                self.req_child(node, id, Prop::Body, indent)?
            ),
            EmptyStatement => ";".to_string(),
            Assignment | InfixExpression => {
                let operator = text(Prop::Operator);
                let operator = if node.kind == Assignment {
                    self.config.assignment(&operator)
                } else {
                    self.config.binary(&operator)
                };
                format!(
                    "{}{}{}",
                    self.req_child(node, id, Prop::Left, indent)?,
                    operator,
                    self.req_child(node, id, Prop::Right, indent)?
                )
            }
            PrefixExpression => format!(
                "{}{}",
                text(Prop::Operator),
                self.req_child(node, id, Prop::Operand, indent)?
            ),
            PostfixExpression => format!(
                "{}{}",
                self.req_child(node, id, Prop::Operand, indent)?,
                text(Prop::Operator)
            ),
            InstanceofExpression => format!(
                "{} instanceof {}",
                self.req_child(node, id, Prop::Left, indent)?,
                self.req_child(node, id, Prop::Type, indent)?
            ),
            ParenthesizedExpression => format!("({})", self.req_child(node, id, Prop::Expression, indent)?),
            ArrayAccess => format!(
                "{}[{}]",
                self.req_child(node, id, Prop::Array, indent)?,
                self.req_child(node, id, Prop::Index, indent)?
            ),
            FieldAccess => format!(
                "{}.{}",
                self.req_child(node, id, Prop::Expression, indent)?,
                self.req_child(node, id, Prop::Name, indent)?
            ),
            MethodInvocation => {
                let mut out = String::new();
                if let Some(receiver) = self.opt_child(node, Prop::Expression, indent)? {
                    out.push_str(&receiver);
                    out.push('.');
                }
                out.push_str(&self.req_child(node, id, Prop::Name, indent)?);
                out.push_str(&self.arguments(node, indent)?);
                out
            }
            ClassInstanceCreation => format!(
                "new {}{}",
                self.req_child(node, id, Prop::Type, indent)?,
                self.arguments(node, indent)?
            ),
            CastExpression => format!(
                "({}) {}",
                self.req_child(node, id, Prop::Type, indent)?,
                self.req_child(node, id, Prop::Expression, indent)?
            ),
            ConditionalExpression => format!(
                "{} ? {} : {}",
                self.req_child(node, id, Prop::Expression, indent)?,
                self.req_child(node, id, Prop::ThenExpression, indent)?,
                self.req_child(node, id, Prop::ElseExpression, indent)?
            ),
            SimpleName => text(Prop::Identifier),
            QualifiedName => format!(
                "{}.{}",
                self.req_child(node, id, Prop::Qualifier, indent)?,
                self.req_child(node, id, Prop::Name, indent)?
            ),
            NumberLiteral | StringLiteral | CharacterLiteral => text(Prop::Token),
            BooleanLiteral => node.slots.flag(Prop::Value).to_string(),
            NullLiteral => "null".to_string(),
            ThisExpression => "this".to_string(),
            SimpleType => self.req_child(node, id, Prop::Name, indent)?,
            ArrayType => format!("{}[]", self.req_child(node, id, Prop::ComponentType, indent)?),
            ParameterizedType => format!(
                "{}<{}>",
                self.req_child(node, id, Prop::Type, indent)?,
                self.join(node, Prop::TypeArguments, self.config.comma(), indent)?
            ),
            IntersectionType => self.join(node, Prop::Types, " & ", indent)?,
        };
        Ok(printed)
    }

    fn opt_child(&mut self, node: &CreatedNode, prop: Prop, indent: &str) -> Result<Option<String>> {
        node.slots
            .child(prop)
            .map(|child| self.render(child, indent))
            .transpose()
    }

    fn req_child(&mut self, node: &CreatedNode, id: NodeId, prop: Prop, indent: &str) -> Result<String> {
        self.opt_child(node, prop, indent)?.ok_or_else(|| {
            RewriteError::invalid(id, format!("required {} of a new {:?} is not set", prop, node.kind))
        })
    }

    fn join(&mut self, node: &CreatedNode, prop: Prop, separator: &str, indent: &str) -> Result<String> {
        let mut parts = Vec::new();
        for &child in node.slots.list(prop) {
            parts.push(self.render(child, indent)?);
        }
        Ok(parts.join(separator))
    }

    /// Modifiers with a trailing space, or nothing
    fn modifiers(&mut self, node: &CreatedNode, indent: &str) -> Result<String> {
        let mut out = self.join(node, Prop::Modifiers, " ", indent)?;
        if !out.is_empty() {
            out.push(' ');
        }
        Ok(out)
    }

    fn arguments(&mut self, node: &CreatedNode, indent: &str) -> Result<String> {
        Ok(format!("({})", self.join(node, Prop::Arguments, self.config.comma(), indent)?))
    }

    fn member_separator(&self, indent: &str) -> String {
        format!("{}{}", self.ld.repeat(1 + self.config.blank_lines_between_members), indent)
    }

    /// `{ ... }` holding an optional header line (enum constants) and the members
    fn type_body(&mut self, node: &CreatedNode, header: &str, indent: &str) -> Result<String> {
        let ld = self.ld;
        let inner = format!("{}{}", indent, self.unit);
        let members = self.join(node, Prop::BodyDeclarations, &self.member_separator(&inner), &inner)?;
        let mut out = String::from("{");
        if !header.is_empty() {
            out.push_str(ld);
            out.push_str(&inner);
            out.push_str(header);
        }
        if !members.is_empty() {
            out.push_str(ld);
            if !header.is_empty() {
                out.push_str(ld);
            }
            out.push_str(&inner);
            out.push_str(&members);
        }
        out.push_str(ld);
        out.push_str(indent);
        out.push('}');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use crate::session::AstRewrite;
    use crate::FormattingConfig;
    use jrewrite_core::IndentStyle;
    use jrewrite_syntax::{parse, NodeKind, Prop, SlotValue};
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "class A {\n    void f() {\n        g();\n    }\n}\n";

    #[test]
    fn test_print_statement_with_call() {
        let ast = parse(SOURCE).unwrap();
        let mut rw = AstRewrite::new(&ast);
        let receiver = rw.new_name("System.out");
        let message = rw.new_string_literal("hi \"there\"");
        let call = rw.new_method_invocation(Some(receiver), "println", &[message]).unwrap();
        let stmt = rw.new_expression_statement(call).unwrap();
        let block = ast.find_first(NodeKind::Block).unwrap();
        rw.list(block, Prop::Statements).unwrap().insert_last(stmt).unwrap();
        assert_eq!(
            rw.rewrite_source().unwrap(),
            "class A {\n    void f() {\n        g();\n        System.out.println(\"hi \\\"there\\\"\");\n    }\n}\n"
        );
    }

    #[test]
    fn test_print_method_declaration_in_body() {
        let ast = parse(SOURCE).unwrap();
        let mut rw = AstRewrite::new(&ast);
        let int = rw.new_primitive_type("int");
        let method = rw.new_method_declaration(&["public", "static"], Some(int), "size").unwrap();
        let ty = ast.find_first(NodeKind::TypeDeclaration).unwrap();
        rw.list(ty, Prop::BodyDeclarations).unwrap().insert_last(method).unwrap();
        assert_eq!(
            rw.rewrite_source().unwrap(),
            "class A {\n    void f() {\n        g();\n    }\n\n    public static int size() {\n    }\n}\n"
        );
    }

    #[test]
    fn test_print_compact_operators() {
        let source = "class A { int f() { return 0; } }";
        let ast = parse(source).unwrap();
        let config = FormattingConfig {
            space_around_binary_operators: false,
            ..FormattingConfig::default()
        };
        let mut rw = AstRewrite::new(&ast).with_formatting(config.with_indent(IndentStyle::Tabs));
        let zero = ast.find_first(NodeKind::NumberLiteral).unwrap();
        let a = rw.new_simple_name("a");
        let one = rw.new_number_literal("1");
        let sum = rw.new_infix(a, "+", one).unwrap();
        rw.replace(zero, sum).unwrap();
        assert_eq!(rw.rewrite_source().unwrap(), "class A { int f() { return a+1; } }");
    }

    #[test]
    fn test_print_missing_required_child_is_rejected() {
        let ast = parse(SOURCE).unwrap();
        let mut rw = AstRewrite::new(&ast);
        let empty = rw.new_node(NodeKind::ExpressionStatement);
        let block = ast.find_first(NodeKind::Block).unwrap();
        rw.list(block, Prop::Statements).unwrap().insert_first(empty).unwrap();
        assert!(rw.compute_edits().is_err());
    }

    #[test]
    fn test_print_boolean_and_flags() {
        let ast = parse(SOURCE).unwrap();
        let mut rw = AstRewrite::new(&ast);
        let literal = rw.new_boolean_literal(true);
        rw.set(literal, Prop::Value, SlotValue::Flag(false)).unwrap();
        let stmt = ast.find_first(NodeKind::ExpressionStatement).unwrap();
        let call = ast.child(stmt, Prop::Expression).unwrap();
        rw.list(call, Prop::Arguments).unwrap().insert_last(literal).unwrap();
        assert_eq!(
            rw.rewrite_source().unwrap(),
            "class A {\n    void f() {\n        g(false);\n    }\n}\n"
        );
    }
}

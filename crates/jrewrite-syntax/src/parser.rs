//! Lowering of the tree-sitter tree into the node arena
//!
//! Walks the concrete tree top-down and allocates children before their
//! parent; allocating a parent records the parent link on every child.
//! Constructs outside the supported subset are rejected with a `ParseError`
//! instead of being dropped from the model.

use crate::ast::{Ast, Node, NodeId, NodeKind, Prop, SlotValue, Slots};
use crate::cst::{children, first_error, leaves, named_children, node_span, parse_tree, ParseError};
use jrewrite_core::Span;
use tree_sitter::Node as CstNode;

type PResult<T> = Result<T, ParseError>;

/// Parse a compilation unit
pub fn parse(source: &str) -> Result<Ast, ParseError> {
    let tree = parse_tree(source)?;
    let root = tree.root_node();
    if let Some(error) = first_error(root) {
        return Err(error);
    }
    let mut builder = Builder {
        src: source,
        nodes: Vec::new(),
    };
    let unit = builder.compilation_unit(root)?;
    let lexed = leaves(&tree, source);
    Ok(Ast::new(
        source.to_string(),
        lexed.tokens,
        lexed.comments,
        builder.nodes,
        unit,
    ))
}

fn unsupported(node: CstNode<'_>, what: &str) -> ParseError {
    ParseError::at(node, format!("{} are not supported", what))
}

fn field<'t>(node: CstNode<'t>, name: &str) -> Option<CstNode<'t>> {
    node.child_by_field_name(name)
}

fn required<'t>(node: CstNode<'t>, name: &str) -> PResult<CstNode<'t>> {
    field(node, name).ok_or_else(|| ParseError::at(node, format!("{} without {}", node.kind(), name)))
}

fn fields<'t>(node: CstNode<'t>, name: &str) -> Vec<CstNode<'t>> {
    let mut cursor = node.walk();
    let found = node.children_by_field_name(name, &mut cursor).collect();
    found
}

fn child_of_kind<'t>(node: CstNode<'t>, kind: &str) -> Option<CstNode<'t>> {
    named_children(node).into_iter().find(|c| c.kind() == kind)
}

fn has_token(node: CstNode<'_>, text: &str) -> bool {
    children(node).iter().any(|c| !c.is_named() && c.kind() == text)
}

struct Builder<'s> {
    src: &'s str,
    nodes: Vec<Node>,
}

impl<'s> Builder<'s> {
    fn text(&self, node: CstNode<'_>) -> &'s str {
        node_span(node).text(self.src)
    }

    fn alloc(&mut self, kind: NodeKind, node: CstNode<'_>, values: Vec<(Prop, SlotValue)>) -> NodeId {
        self.alloc_span(kind, node_span(node), values)
    }

    fn alloc_span(&mut self, kind: NodeKind, span: Span, values: Vec<(Prop, SlotValue)>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let mut slots = Slots::for_kind(kind);
        for (prop, value) in values {
            match &value {
                SlotValue::Child(Some(child)) => self.nodes[child.index()].parent = Some((id, prop)),
                SlotValue::List(items) => {
                    for child in items {
                        self.nodes[child.index()].parent = Some((id, prop));
                    }
                }
                _ => {}
            }
            let stored = slots.set(prop, value);
            debug_assert!(stored, "{:?} has no slot {:?}", kind, prop);
        }
        self.nodes.push(Node {
            kind,
            span,
            parent: None,
            slots,
        });
        id
    }

    // --- names and types ---

    fn simple_name(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        if !matches!(node.kind(), "identifier" | "type_identifier") {
            return Err(ParseError::at(node, format!("expected identifier, found '{}'", self.text(node))));
        }
        let text = self.text(node).to_string();
        Ok(self.alloc(NodeKind::SimpleName, node, vec![(Prop::Identifier, SlotValue::Text(text))]))
    }

    fn qualified(&mut self, node: CstNode<'_>, qualifier: NodeId, name: NodeId) -> NodeId {
        self.alloc(
            NodeKind::QualifiedName,
            node,
            vec![
                (Prop::Qualifier, SlotValue::Child(Some(qualifier))),
                (Prop::Name, SlotValue::Child(Some(name))),
            ],
        )
    }

    fn name(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        match node.kind() {
            "identifier" | "type_identifier" => self.simple_name(node),
            "scoped_identifier" => {
                let qualifier = self.name(required(node, "scope")?)?;
                let name = self.simple_name(required(node, "name")?)?;
                Ok(self.qualified(node, qualifier, name))
            }
            "scoped_type_identifier" => {
                let parts = named_children(node);
                match parts.as_slice() {
                    [scope, last] if scope.kind() != "generic_type" => {
                        let qualifier = self.name(*scope)?;
                        let name = self.simple_name(*last)?;
                        Ok(self.qualified(node, qualifier, name))
                    }
                    _ => Err(unsupported(node, "annotated or generic type qualifiers")),
                }
            }
            other => Err(ParseError::at(node, format!("expected name, found {}", other))),
        }
    }

    fn parse_type(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        match node.kind() {
            "integral_type" | "floating_point_type" | "boolean_type" | "void_type" => {
                let keyword = self.text(node).to_string();
                Ok(self.alloc(NodeKind::PrimitiveType, node, vec![(Prop::Keyword, SlotValue::Text(keyword))]))
            }
            "type_identifier" | "scoped_type_identifier" => {
                let name = self.name(node)?;
                Ok(self.alloc(NodeKind::SimpleType, node, vec![(Prop::Name, SlotValue::Child(Some(name)))]))
            }
            "generic_type" => {
                let parts = named_children(node);
                let (Some(base), Some(arguments)) = (parts.first(), parts.iter().find(|c| c.kind() == "type_arguments"))
                else {
                    return Err(ParseError::at(node, "generic type without arguments"));
                };
                let simple = self.parse_type(*base)?;
                let mut args = Vec::new();
                for argument in named_children(*arguments) {
                    if argument.kind() == "wildcard" {
                        return Err(unsupported(argument, "wildcard type arguments"));
                    }
                    args.push(self.parse_type(argument)?);
                }
                Ok(self.alloc(
                    NodeKind::ParameterizedType,
                    node,
                    vec![
                        (Prop::Type, SlotValue::Child(Some(simple))),
                        (Prop::TypeArguments, SlotValue::List(args)),
                    ],
                ))
            }
            "array_type" => {
                let mut ty = self.parse_type(required(node, "element")?)?;
                let dimensions = required(node, "dimensions")?;
                // One ArrayType per `[]` pair, innermost first
                for bracket in children(dimensions) {
                    if bracket.is_named() {
                        return Err(unsupported(bracket, "annotated dimensions"));
                    }
                    if bracket.kind() == "]" {
                        ty = self.alloc_span(
                            NodeKind::ArrayType,
                            Span::new(node.start_byte(), bracket.end_byte()),
                            vec![(Prop::ComponentType, SlotValue::Child(Some(ty)))],
                        );
                    }
                }
                Ok(ty)
            }
            other => Err(ParseError::at(node, format!("unsupported type {}", other))),
        }
    }

    fn type_list(&mut self, node: Option<CstNode<'_>>) -> PResult<Vec<NodeId>> {
        let Some(node) = node else {
            return Ok(Vec::new());
        };
        // `implements A, B` and `extends A, B` wrap a type_list
        let list = child_of_kind(node, "type_list").unwrap_or(node);
        named_children(list).into_iter().map(|t| self.parse_type(t)).collect()
    }

    // --- declarations ---

    fn compilation_unit(&mut self, root: CstNode<'_>) -> PResult<NodeId> {
        let mut package = None;
        let mut imports = Vec::new();
        let mut types = Vec::new();
        for item in named_children(root) {
            match item.kind() {
                "package_declaration" => {
                    if child_of_kind(item, "annotation").is_some() || child_of_kind(item, "marker_annotation").is_some() {
                        return Err(unsupported(item, "package annotations"));
                    }
                    let name = self.declared_name(item)?;
                    package = Some(self.alloc(
                        NodeKind::PackageDeclaration,
                        item,
                        vec![(Prop::Name, SlotValue::Child(Some(name)))],
                    ));
                }
                "import_declaration" => imports.push(self.import_declaration(item)?),
                _ => types.push(self.type_declaration(item)?),
            }
        }
        Ok(self.alloc_span(
            NodeKind::CompilationUnit,
            Span::new(0, self.src.len()),
            vec![
                (Prop::Package, SlotValue::Child(package)),
                (Prop::Imports, SlotValue::List(imports)),
                (Prop::Types, SlotValue::List(types)),
            ],
        ))
    }

    /// Dotted name of a package or import declaration
    fn declared_name(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        let name = named_children(node)
            .into_iter()
            .find(|c| matches!(c.kind(), "identifier" | "scoped_identifier"))
            .ok_or_else(|| ParseError::at(node, "expected name"))?;
        self.name(name)
    }

    fn import_declaration(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        let name = self.declared_name(node)?;
        let is_static = has_token(node, "static");
        let on_demand = child_of_kind(node, "asterisk").is_some();
        Ok(self.alloc(
            NodeKind::ImportDeclaration,
            node,
            vec![
                (Prop::Static, SlotValue::Flag(is_static)),
                (Prop::Name, SlotValue::Child(Some(name))),
                (Prop::OnDemand, SlotValue::Flag(on_demand)),
            ],
        ))
    }

    fn modifiers(&mut self, owner: CstNode<'_>) -> PResult<Vec<NodeId>> {
        let Some(node) = child_of_kind(owner, "modifiers") else {
            return Ok(Vec::new());
        };
        let mut modifiers = Vec::new();
        for item in children(node) {
            match item.kind() {
                "marker_annotation" | "annotation" => modifiers.push(self.annotation(item)?),
                _ if !item.is_named() => {
                    let keyword = self.text(item).to_string();
                    modifiers.push(self.alloc(NodeKind::Modifier, item, vec![(Prop::Keyword, SlotValue::Text(keyword))]));
                }
                other => return Err(ParseError::at(item, format!("unsupported modifier {}", other))),
            }
        }
        Ok(modifiers)
    }

    fn annotation(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        let name = self.name(required(node, "name")?)?;
        let mut arguments = Vec::new();
        if let Some(list) = field(node, "arguments") {
            for value in named_children(list) {
                if value.kind() == "element_value_pair" {
                    return Err(unsupported(value, "named annotation arguments"));
                }
                arguments.push(self.expression(value)?);
            }
        }
        Ok(self.alloc(
            NodeKind::Annotation,
            node,
            vec![
                (Prop::TypeName, SlotValue::Child(Some(name))),
                (Prop::Arguments, SlotValue::List(arguments)),
            ],
        ))
    }

    fn type_declaration(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        match node.kind() {
            "class_declaration" | "interface_declaration" => self.class_declaration(node),
            "enum_declaration" => self.enum_declaration(node),
            other => Err(ParseError::at(node, format!("expected type declaration, found {}", other))),
        }
    }

    fn class_declaration(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        let interface = node.kind() == "interface_declaration";
        if field(node, "type_parameters").is_some() {
            return Err(unsupported(node, "type parameters"));
        }
        if field(node, "permits").is_some() || child_of_kind(node, "permits").is_some() {
            return Err(unsupported(node, "permits clauses"));
        }
        let modifiers = self.modifiers(node)?;
        let name = self.simple_name(required(node, "name")?)?;
        let superclass = match field(node, "superclass") {
            Some(clause) => match named_children(clause).first() {
                Some(ty) => Some(self.parse_type(*ty)?),
                None => None,
            },
            None => None,
        };
        let interfaces = if interface {
            self.type_list(child_of_kind(node, "extends_interfaces"))?
        } else {
            self.type_list(field(node, "interfaces"))?
        };
        let body = self.member_declarations(required(node, "body")?)?;
        Ok(self.alloc(
            NodeKind::TypeDeclaration,
            node,
            vec![
                (Prop::Modifiers, SlotValue::List(modifiers)),
                (Prop::Interface, SlotValue::Flag(interface)),
                (Prop::Name, SlotValue::Child(Some(name))),
                (Prop::Superclass, SlotValue::Child(superclass)),
                (Prop::Interfaces, SlotValue::List(interfaces)),
                (Prop::BodyDeclarations, SlotValue::List(body)),
            ],
        ))
    }

    fn enum_declaration(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        let modifiers = self.modifiers(node)?;
        let name = self.simple_name(required(node, "name")?)?;
        let interfaces = self.type_list(field(node, "interfaces"))?;
        let body = required(node, "body")?;
        let mut constants = Vec::new();
        let mut members = Vec::new();
        for item in named_children(body) {
            match item.kind() {
                "enum_constant" => constants.push(self.enum_constant(item)?),
                "enum_body_declarations" => members = self.member_declarations(item)?,
                other => return Err(ParseError::at(item, format!("unexpected {} in enum body", other))),
            }
        }
        Ok(self.alloc(
            NodeKind::EnumDeclaration,
            node,
            vec![
                (Prop::Modifiers, SlotValue::List(modifiers)),
                (Prop::Name, SlotValue::Child(Some(name))),
                (Prop::Interfaces, SlotValue::List(interfaces)),
                (Prop::EnumConstants, SlotValue::List(constants)),
                (Prop::BodyDeclarations, SlotValue::List(members)),
            ],
        ))
    }

    fn enum_constant(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        if field(node, "body").is_some() {
            return Err(unsupported(node, "enum constant bodies"));
        }
        if child_of_kind(node, "modifiers").is_some() {
            return Err(unsupported(node, "annotated enum constants"));
        }
        let name = self.simple_name(required(node, "name")?)?;
        let arguments = self.arguments(field(node, "arguments"))?;
        Ok(self.alloc(
            NodeKind::EnumConstant,
            node,
            vec![
                (Prop::Name, SlotValue::Child(Some(name))),
                (Prop::Arguments, SlotValue::List(arguments)),
            ],
        ))
    }

    fn member_declarations(&mut self, body: CstNode<'_>) -> PResult<Vec<NodeId>> {
        let mut members = Vec::new();
        for item in named_children(body) {
            members.push(self.member_declaration(item)?);
        }
        Ok(members)
    }

    fn member_declaration(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        match node.kind() {
            "class_declaration" | "interface_declaration" | "enum_declaration" => self.type_declaration(node),
            "field_declaration" | "constant_declaration" => {
                let modifiers = self.modifiers(node)?;
                let ty = self.parse_type(required(node, "type")?)?;
                let fragments = self.fragments(node)?;
                Ok(self.alloc(
                    NodeKind::FieldDeclaration,
                    node,
                    vec![
                        (Prop::Modifiers, SlotValue::List(modifiers)),
                        (Prop::Type, SlotValue::Child(Some(ty))),
                        (Prop::Fragments, SlotValue::List(fragments)),
                    ],
                ))
            }
            "method_declaration" | "constructor_declaration" => self.method_declaration(node),
            "block" | "static_initializer" => Err(unsupported(node, "initializer blocks")),
            other => Err(ParseError::at(node, format!("unsupported member {}", other))),
        }
    }

    fn method_declaration(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        if field(node, "type_parameters").is_some() {
            return Err(unsupported(node, "generic methods"));
        }
        if field(node, "dimensions").is_some() {
            return Err(unsupported(node, "array dimensions after parameters"));
        }
        let modifiers = self.modifiers(node)?;
        let return_type = match field(node, "type") {
            Some(ty) => Some(self.parse_type(ty)?),
            None => None,
        };
        let name = self.simple_name(required(node, "name")?)?;
        let mut parameters = Vec::new();
        for parameter in named_children(required(node, "parameters")?) {
            parameters.push(self.parameter(parameter)?);
        }
        let mut thrown = Vec::new();
        if let Some(throws) = child_of_kind(node, "throws") {
            for ty in named_children(throws) {
                thrown.push(self.parse_type(ty)?);
            }
        }
        let body = match field(node, "body") {
            Some(body) => Some(self.block(body)?),
            None => None,
        };
        Ok(self.alloc(
            NodeKind::MethodDeclaration,
            node,
            vec![
                (Prop::Modifiers, SlotValue::List(modifiers)),
                (Prop::ReturnType, SlotValue::Child(return_type)),
                (Prop::Name, SlotValue::Child(Some(name))),
                (Prop::Parameters, SlotValue::List(parameters)),
                (Prop::ThrownExceptions, SlotValue::List(thrown)),
                (Prop::Body, SlotValue::Child(body)),
            ],
        ))
    }

    fn parameter(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        let modifiers = self.modifiers(node)?;
        let (ty, varargs, name) = match node.kind() {
            "formal_parameter" => {
                if field(node, "dimensions").is_some() {
                    return Err(unsupported(node, "array dimensions after parameter names"));
                }
                (required(node, "type")?, false, required(node, "name")?)
            }
            "spread_parameter" => {
                let parts = named_children(node);
                let ty = parts
                    .iter()
                    .find(|c| !matches!(c.kind(), "modifiers" | "variable_declarator"))
                    .copied()
                    .ok_or_else(|| ParseError::at(node, "varargs parameter without type"))?;
                let declarator = child_of_kind(node, "variable_declarator")
                    .ok_or_else(|| ParseError::at(node, "varargs parameter without name"))?;
                (ty, true, required(declarator, "name")?)
            }
            other => return Err(ParseError::at(node, format!("unsupported parameter {}", other))),
        };
        let ty = self.parse_type(ty)?;
        let name = self.simple_name(name)?;
        Ok(self.alloc(
            NodeKind::SingleVariableDeclaration,
            node,
            vec![
                (Prop::Modifiers, SlotValue::List(modifiers)),
                (Prop::Type, SlotValue::Child(Some(ty))),
                (Prop::Varargs, SlotValue::Flag(varargs)),
                (Prop::Name, SlotValue::Child(Some(name))),
            ],
        ))
    }

    fn fragments(&mut self, owner: CstNode<'_>) -> PResult<Vec<NodeId>> {
        fields(owner, "declarator").into_iter().map(|d| self.fragment(d)).collect()
    }

    fn fragment(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        if field(node, "dimensions").is_some() {
            return Err(unsupported(node, "array dimensions after variable names"));
        }
        let name = self.simple_name(required(node, "name")?)?;
        let initializer = match field(node, "value") {
            Some(value) if value.kind() == "array_initializer" => {
                return Err(unsupported(value, "array initializers"));
            }
            Some(value) => Some(self.expression(value)?),
            None => None,
        };
        Ok(self.alloc(
            NodeKind::VariableDeclarationFragment,
            node,
            vec![
                (Prop::Name, SlotValue::Child(Some(name))),
                (Prop::Initializer, SlotValue::Child(initializer)),
            ],
        ))
    }

    // --- statements ---

    /// `block` and `constructor_body` nodes
    fn block(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        let mut statements = Vec::new();
        for item in children(node) {
            match item.kind() {
                "{" | "}" => {}
                "explicit_constructor_invocation" => {
                    return Err(unsupported(item, "explicit constructor invocations"));
                }
                _ => statements.push(self.statement(item)?),
            }
        }
        Ok(self.alloc(NodeKind::Block, node, vec![(Prop::Statements, SlotValue::List(statements))]))
    }

    fn statement(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        match node.kind() {
            "block" => self.block(node),
            ";" => Ok(self.alloc(NodeKind::EmptyStatement, node, vec![])),
            "expression_statement" => {
                let expression = self.only_child(node)?;
                Ok(self.alloc(
                    NodeKind::ExpressionStatement,
                    node,
                    vec![(Prop::Expression, SlotValue::Child(Some(expression)))],
                ))
            }
            "return_statement" => {
                let expression = match named_children(node).first() {
                    Some(value) => Some(self.expression(*value)?),
                    None => None,
                };
                Ok(self.alloc(
                    NodeKind::ReturnStatement,
                    node,
                    vec![(Prop::Expression, SlotValue::Child(expression))],
                ))
            }
            "throw_statement" => {
                let expression = self.only_child(node)?;
                Ok(self.alloc(
                    NodeKind::ThrowStatement,
                    node,
                    vec![(Prop::Expression, SlotValue::Child(Some(expression)))],
                ))
            }
            "if_statement" => {
                let condition = self.condition(node)?;
                let then = self.statement(required(node, "consequence")?)?;
                let otherwise = match field(node, "alternative") {
                    Some(alternative) => Some(self.statement(alternative)?),
                    None => None,
                };
                Ok(self.alloc(
                    NodeKind::IfStatement,
                    node,
                    vec![
                        (Prop::Expression, SlotValue::Child(Some(condition))),
                        (Prop::ThenStatement, SlotValue::Child(Some(then))),
                        (Prop::ElseStatement, SlotValue::Child(otherwise)),
                    ],
                ))
            }
            "while_statement" => {
                let condition = self.condition(node)?;
                let body = self.statement(required(node, "body")?)?;
                Ok(self.alloc(
                    NodeKind::WhileStatement,
                    node,
                    vec![
                        (Prop::Expression, SlotValue::Child(Some(condition))),
                        (Prop::Body, SlotValue::Child(Some(body))),
                    ],
                ))
            }
            "local_variable_declaration" => {
                let modifiers = self.modifiers(node)?;
                let ty = self.parse_type(required(node, "type")?)?;
                let fragments = self.fragments(node)?;
                Ok(self.alloc(
                    NodeKind::VariableDeclarationStatement,
                    node,
                    vec![
                        (Prop::Modifiers, SlotValue::List(modifiers)),
                        (Prop::Type, SlotValue::Child(Some(ty))),
                        (Prop::Fragments, SlotValue::List(fragments)),
                    ],
                ))
            }
            other => Err(ParseError::at(node, format!("unsupported statement {}", other))),
        }
    }

    /// Condition of `if`/`while`, without its parentheses
    fn condition(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        let condition = required(node, "condition")?;
        if condition.kind() == "parenthesized_expression" {
            self.only_child(condition)
        } else {
            self.expression(condition)
        }
    }

    fn only_child(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        let inner = named_children(node)
            .into_iter()
            .next()
            .ok_or_else(|| ParseError::at(node, format!("empty {}", node.kind())))?;
        self.expression(inner)
    }

    // --- expressions ---

    fn arguments(&mut self, list: Option<CstNode<'_>>) -> PResult<Vec<NodeId>> {
        match list {
            Some(list) => named_children(list).into_iter().map(|a| self.expression(a)).collect(),
            None => Ok(Vec::new()),
        }
    }

    fn binary(&mut self, kind: NodeKind, node: CstNode<'_>) -> PResult<NodeId> {
        let left = self.expression(required(node, "left")?)?;
        let operator = self.text(required(node, "operator")?).to_string();
        let right = self.expression(required(node, "right")?)?;
        Ok(self.alloc(
            kind,
            node,
            vec![
                (Prop::Left, SlotValue::Child(Some(left))),
                (Prop::Operator, SlotValue::Text(operator)),
                (Prop::Right, SlotValue::Child(Some(right))),
            ],
        ))
    }

    fn literal(&mut self, kind: NodeKind, node: CstNode<'_>) -> NodeId {
        let token = self.text(node).to_string();
        self.alloc(kind, node, vec![(Prop::Token, SlotValue::Text(token))])
    }

    fn expression(&mut self, node: CstNode<'_>) -> PResult<NodeId> {
        match node.kind() {
            "assignment_expression" => self.binary(NodeKind::Assignment, node),
            "binary_expression" => self.binary(NodeKind::InfixExpression, node),
            "instanceof_expression" => {
                if field(node, "name").is_some() || field(node, "pattern").is_some() {
                    return Err(unsupported(node, "instanceof patterns"));
                }
                let left = self.expression(required(node, "left")?)?;
                let ty = self.parse_type(required(node, "right")?)?;
                Ok(self.alloc(
                    NodeKind::InstanceofExpression,
                    node,
                    vec![
                        (Prop::Left, SlotValue::Child(Some(left))),
                        (Prop::Type, SlotValue::Child(Some(ty))),
                    ],
                ))
            }
            "unary_expression" => {
                let operator = self.text(required(node, "operator")?).to_string();
                let operand = self.expression(required(node, "operand")?)?;
                Ok(self.alloc(
                    NodeKind::PrefixExpression,
                    node,
                    vec![
                        (Prop::Operator, SlotValue::Text(operator)),
                        (Prop::Operand, SlotValue::Child(Some(operand))),
                    ],
                ))
            }
            "update_expression" => {
                let parts = children(node);
                let (Some(first), Some(last)) = (parts.first(), parts.last()) else {
                    return Err(ParseError::at(node, "empty update expression"));
                };
                if first.is_named() {
                    let operand = self.expression(*first)?;
                    let operator = self.text(*last).to_string();
                    Ok(self.alloc(
                        NodeKind::PostfixExpression,
                        node,
                        vec![
                            (Prop::Operand, SlotValue::Child(Some(operand))),
                            (Prop::Operator, SlotValue::Text(operator)),
                        ],
                    ))
                } else {
                    let operator = self.text(*first).to_string();
                    let operand = self.expression(*last)?;
                    Ok(self.alloc(
                        NodeKind::PrefixExpression,
                        node,
                        vec![
                            (Prop::Operator, SlotValue::Text(operator)),
                            (Prop::Operand, SlotValue::Child(Some(operand))),
                        ],
                    ))
                }
            }
            "parenthesized_expression" => {
                let inner = self.only_child(node)?;
                Ok(self.alloc(
                    NodeKind::ParenthesizedExpression,
                    node,
                    vec![(Prop::Expression, SlotValue::Child(Some(inner)))],
                ))
            }
            "array_access" => {
                let array = self.expression(required(node, "array")?)?;
                let index = self.expression(required(node, "index")?)?;
                Ok(self.alloc(
                    NodeKind::ArrayAccess,
                    node,
                    vec![
                        (Prop::Array, SlotValue::Child(Some(array))),
                        (Prop::Index, SlotValue::Child(Some(index))),
                    ],
                ))
            }
            "field_access" => {
                if has_token(node, "super") {
                    return Err(unsupported(node, "super member accesses"));
                }
                let object = self.expression(required(node, "object")?)?;
                let name_node = required(node, "field")?;
                if name_node.kind() != "identifier" {
                    return Err(ParseError::at(
                        name_node,
                        format!("unsupported member access '.{}'", self.text(name_node)),
                    ));
                }
                let name = self.simple_name(name_node)?;
                // Name chains stay names; anything else is a field access
                if self.nodes[object.index()].kind.is_name() {
                    Ok(self.qualified(node, object, name))
                } else {
                    Ok(self.alloc(
                        NodeKind::FieldAccess,
                        node,
                        vec![
                            (Prop::Expression, SlotValue::Child(Some(object))),
                            (Prop::Name, SlotValue::Child(Some(name))),
                        ],
                    ))
                }
            }
            "method_invocation" => {
                if field(node, "type_arguments").is_some() || has_token(node, "super") {
                    return Err(unsupported(node, "explicit type arguments and super calls"));
                }
                let receiver = match field(node, "object") {
                    Some(object) => Some(self.expression(object)?),
                    None => None,
                };
                let name = self.simple_name(required(node, "name")?)?;
                let arguments = self.arguments(field(node, "arguments"))?;
                Ok(self.alloc(
                    NodeKind::MethodInvocation,
                    node,
                    vec![
                        (Prop::Expression, SlotValue::Child(receiver)),
                        (Prop::Name, SlotValue::Child(Some(name))),
                        (Prop::Arguments, SlotValue::List(arguments)),
                    ],
                ))
            }
            "object_creation_expression" => {
                if child_of_kind(node, "class_body").is_some() {
                    return Err(unsupported(node, "anonymous classes"));
                }
                if field(node, "type_arguments").is_some() {
                    return Err(unsupported(node, "explicit type arguments"));
                }
                let ty = self.parse_type(required(node, "type")?)?;
                let arguments = self.arguments(field(node, "arguments"))?;
                Ok(self.alloc(
                    NodeKind::ClassInstanceCreation,
                    node,
                    vec![
                        (Prop::Type, SlotValue::Child(Some(ty))),
                        (Prop::Arguments, SlotValue::List(arguments)),
                    ],
                ))
            }
            "array_creation_expression" => Err(unsupported(node, "array creations")),
            "cast_expression" => {
                let type_nodes = fields(node, "type");
                let ty = match type_nodes.as_slice() {
                    [] => return Err(ParseError::at(node, "cast without type")),
                    [single] => self.parse_type(*single)?,
                    [first, .., last] => {
                        let mut types = Vec::new();
                        for ty in &type_nodes {
                            types.push(self.parse_type(*ty)?);
                        }
                        self.alloc_span(
                            NodeKind::IntersectionType,
                            Span::new(first.start_byte(), last.end_byte()),
                            vec![(Prop::Types, SlotValue::List(types))],
                        )
                    }
                };
                let expression = self.expression(required(node, "value")?)?;
                Ok(self.alloc(
                    NodeKind::CastExpression,
                    node,
                    vec![
                        (Prop::Type, SlotValue::Child(Some(ty))),
                        (Prop::Expression, SlotValue::Child(Some(expression))),
                    ],
                ))
            }
            "ternary_expression" => {
                let condition = self.expression(required(node, "condition")?)?;
                let then = self.expression(required(node, "consequence")?)?;
                let otherwise = self.expression(required(node, "alternative")?)?;
                Ok(self.alloc(
                    NodeKind::ConditionalExpression,
                    node,
                    vec![
                        (Prop::Expression, SlotValue::Child(Some(condition))),
                        (Prop::ThenExpression, SlotValue::Child(Some(then))),
                        (Prop::ElseExpression, SlotValue::Child(Some(otherwise))),
                    ],
                ))
            }
            "identifier" => self.simple_name(node),
            "decimal_integer_literal"
            | "hex_integer_literal"
            | "octal_integer_literal"
            | "binary_integer_literal"
            | "decimal_floating_point_literal"
            | "hex_floating_point_literal" => Ok(self.literal(NodeKind::NumberLiteral, node)),
            "string_literal" => Ok(self.literal(NodeKind::StringLiteral, node)),
            "character_literal" => Ok(self.literal(NodeKind::CharacterLiteral, node)),
            "true" | "false" => {
                let value = node.kind() == "true";
                Ok(self.alloc(NodeKind::BooleanLiteral, node, vec![(Prop::Value, SlotValue::Flag(value))]))
            }
            "null_literal" => Ok(self.alloc(NodeKind::NullLiteral, node, vec![])),
            "this" => Ok(self.alloc(NodeKind::ThisExpression, node, vec![])),
            other => Err(ParseError::at(node, format!("unsupported expression {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse_body(body: &str) -> Ast {
        parse(&format!("class A {{\n    void f() {{\n        {}\n    }}\n}}\n", body)).unwrap()
    }

    #[test]
    fn test_array_access_spans() {
        let ast = parse_body("o[3 /* comment*/ - 1]= this.o[3 - 1];");
        let accesses = ast.find_all(NodeKind::ArrayAccess);
        assert_eq!(accesses.len(), 2);
        let index = ast.child(accesses[0], Prop::Index).unwrap();
        assert_eq!(ast.kind(index), NodeKind::InfixExpression);
        assert_eq!(ast.text_of(index), "3 /* comment*/ - 1");
        let array = ast.child(accesses[1], Prop::Array).unwrap();
        assert_eq!(ast.kind(array), NodeKind::FieldAccess);
        assert_eq!(ast.text_of(array), "this.o");
    }

    #[test]
    fn test_assignment_operator_property() {
        let ast = parse_body("x += 1;");
        let assignment = ast.find_first(NodeKind::Assignment).unwrap();
        assert_eq!(ast.text_prop(assignment, Prop::Operator), Some("+="));
    }

    #[test]
    fn test_shift_operators() {
        let ast = parse_body("x = a >>> 2 >= b;");
        let infix = ast.find_all(NodeKind::InfixExpression);
        let ops: Vec<&str> = infix
            .iter()
            .map(|i| ast.text_prop(*i, Prop::Operator).unwrap())
            .collect();
        assert_eq!(ops, vec![">=", ">>>"]);
    }

    #[test]
    fn test_precedence() {
        let ast = parse_body("x = a + b * c;");
        let outer = ast.find_first(NodeKind::InfixExpression).unwrap();
        assert_eq!(ast.text_of(outer), "a + b * c");
        assert_eq!(ast.text_prop(outer, Prop::Operator), Some("+"));
        let right = ast.child(outer, Prop::Right).unwrap();
        assert_eq!(ast.text_of(right), "b * c");
    }

    #[test]
    fn test_local_variable_vs_expression() {
        let ast = parse_body("List<String> xs = make(); xs.add(y); int i = 0, j; i = j;");
        assert_eq!(ast.find_all(NodeKind::VariableDeclarationStatement).len(), 2);
        assert_eq!(ast.find_all(NodeKind::ExpressionStatement).len(), 2);
        let decl = ast.find_all(NodeKind::VariableDeclarationStatement)[1];
        assert_eq!(ast.list(decl, Prop::Fragments).len(), 2);
        let generic = ast.find_first(NodeKind::ParameterizedType).unwrap();
        assert_eq!(ast.text_of(generic), "List<String>");
    }

    #[test]
    fn test_cast_and_parenthesized() {
        let ast = parse_body("x = (String & Comparable) y; z = (a + b) * c; w = (int) -1;");
        assert_eq!(ast.find_all(NodeKind::CastExpression).len(), 2);
        let intersection = ast.find_first(NodeKind::IntersectionType).unwrap();
        assert_eq!(ast.text_of(intersection), "String & Comparable");
        assert_eq!(ast.list(intersection, Prop::Types).len(), 2);
        assert_eq!(ast.find_all(NodeKind::ParenthesizedExpression).len(), 1);
    }

    #[test]
    fn test_qualified_name_vs_method_call() {
        let ast = parse_body("a.b.c = a.b.d(1, 2);");
        let qualified = ast.find_all(NodeKind::QualifiedName);
        assert_eq!(ast.text_of(qualified[0]), "a.b.c");
        assert_eq!(ast.text_of(qualified[1]), "a.b");
        let call = ast.find_first(NodeKind::MethodInvocation).unwrap();
        assert_eq!(ast.list(call, Prop::Arguments).len(), 2);
        assert_eq!(ast.text_of(ast.child(call, Prop::Expression).unwrap()), "a.b");
    }

    #[test]
    fn test_if_condition_drops_parentheses() {
        let ast = parse_body("if (a) { b(); } else ;");
        let statement = ast.find_first(NodeKind::IfStatement).unwrap();
        let condition = ast.child(statement, Prop::Expression).unwrap();
        assert_eq!(ast.kind(condition), NodeKind::SimpleName);
        let otherwise = ast.child(statement, Prop::ElseStatement).unwrap();
        assert_eq!(ast.kind(otherwise), NodeKind::EmptyStatement);
    }

    #[test]
    fn test_compilation_unit_structure() {
        let source = "package p;\n\nimport java.util.*;\nimport static java.lang.Math.max;\n\npublic enum E { A, B, C }\n";
        let ast = parse(source).unwrap();
        let root = ast.root();
        assert_eq!(ast.kind(root), NodeKind::CompilationUnit);
        let imports = ast.list(root, Prop::Imports);
        assert_eq!(imports.len(), 2);
        assert!(ast.flag(imports[0], Prop::OnDemand));
        assert!(ast.flag(imports[1], Prop::Static));
        assert_eq!(ast.name_text(ast.child(imports[1], Prop::Name).unwrap()), "java.lang.Math.max");
        assert_eq!(ast.text_of(imports[1]), "import static java.lang.Math.max;");
        let e = ast.list(root, Prop::Types)[0];
        assert_eq!(ast.list(e, Prop::EnumConstants).len(), 3);
        assert_eq!(ast.parent(imports[0]), Some((root, Prop::Imports)));
    }

    #[test]
    fn test_members() {
        let source = "class A extends B implements C, D {\n    @Deprecated private int x = 1, y;\n    A(int a) { }\n    public <T> void g() {}\n}";
        let err = parse(source).unwrap_err();
        assert!(err.message.contains("generic methods"));

        let source = "class A extends B implements C, D {\n    @Deprecated private int x = 1, y;\n    A(int a) { }\n    abstract void g(String... rest) throws E;\n}";
        let ast = parse(source).unwrap();
        let ty = ast.find_first(NodeKind::TypeDeclaration).unwrap();
        assert_eq!(ast.list(ty, Prop::Interfaces).len(), 2);
        assert!(ast.child(ty, Prop::Superclass).is_some());
        let methods = ast.find_all(NodeKind::MethodDeclaration);
        assert!(ast.child(methods[0], Prop::ReturnType).is_none());
        assert!(ast.child(methods[1], Prop::Body).is_none());
        let rest = ast.list(methods[1], Prop::Parameters)[0];
        assert!(ast.flag(rest, Prop::Varargs));
        assert_eq!(ast.list(methods[1], Prop::ThrownExceptions).len(), 1);
        let field = ast.find_first(NodeKind::FieldDeclaration).unwrap();
        assert_eq!(ast.list(field, Prop::Modifiers).len(), 2);
    }

    #[test]
    fn test_array_type_nesting() {
        let ast = parse("class A { int[][] grid; }").unwrap();
        let arrays = ast.find_all(NodeKind::ArrayType);
        assert_eq!(arrays.len(), 2);
        assert_eq!(ast.text_of(arrays[0]), "int[][]");
        assert_eq!(ast.text_of(arrays[1]), "int[]");
    }

    #[test]
    fn test_syntax_error_reports_offset() {
        let source = "class A { void f() { x = ; } }";
        let err = parse(source).unwrap_err();
        assert!(err.offset >= source.find("x =").unwrap());
        assert!(err.offset <= source.find(';').unwrap());
    }

    #[test]
    fn test_unsupported_construct_is_rejected() {
        let err = parse("class A { Runnable r = new Runnable() { }; }").unwrap_err();
        assert!(err.message.contains("anonymous classes"));
    }
}

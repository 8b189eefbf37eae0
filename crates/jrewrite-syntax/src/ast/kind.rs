//! Node kinds and their child-slot descriptors
//!
//! Every node kind has a fixed, ordered set of slots. Generic code (event
//! bookkeeping, list rewriting, traversal) works over these descriptors and
//! never needs per-kind accessors.

use std::fmt;

/// Name of a slot on a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Prop {
    Package,
    Imports,
    Types,
    Name,
    Static,
    OnDemand,
    Modifiers,
    Interface,
    Superclass,
    Interfaces,
    EnumConstants,
    BodyDeclarations,
    Arguments,
    Type,
    Fragments,
    ReturnType,
    Parameters,
    ThrownExceptions,
    Body,
    Varargs,
    Initializer,
    Keyword,
    TypeName,
    Statements,
    Expression,
    ThenStatement,
    ElseStatement,
    Left,
    Operator,
    Right,
    Operand,
    Array,
    Index,
    ThenExpression,
    ElseExpression,
    Identifier,
    Qualifier,
    Token,
    Value,
    ComponentType,
    TypeArguments,
}

impl fmt::Display for Prop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How elements of a list slot are separated in source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `a, b, c`
    Comma,
    /// `public static final`
    Space,
    /// `A & B` in intersection types
    Ampersand,
    /// One element per line (statements, imports)
    Line,
    /// One element per line with configurable blank lines (members, types)
    Members,
}

/// Shape of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// A single child node
    Child { optional: bool },
    /// An ordered list of child nodes
    List(Separator),
    /// A textual attribute (identifier, operator, literal token)
    Text,
    /// A boolean attribute (`static`, `.*`, varargs)
    Flag,
}

impl SlotKind {
    pub fn is_node(&self) -> bool {
        matches!(self, SlotKind::Child { .. } | SlotKind::List(_))
    }
}

/// A slot on a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDescriptor {
    pub prop: Prop,
    pub kind: SlotKind,
}

const fn child(prop: Prop) -> SlotDescriptor {
    SlotDescriptor { prop, kind: SlotKind::Child { optional: false } }
}

const fn optional(prop: Prop) -> SlotDescriptor {
    SlotDescriptor { prop, kind: SlotKind::Child { optional: true } }
}

const fn list(prop: Prop, separator: Separator) -> SlotDescriptor {
    SlotDescriptor { prop, kind: SlotKind::List(separator) }
}

const fn text(prop: Prop) -> SlotDescriptor {
    SlotDescriptor { prop, kind: SlotKind::Text }
}

const fn flag(prop: Prop) -> SlotDescriptor {
    SlotDescriptor { prop, kind: SlotKind::Flag }
}

/// Syntactic category of a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Unit,
    Declaration,
    Statement,
    Expression,
    Type,
    Other,
}

/// Closed set of node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    CompilationUnit,
    PackageDeclaration,
    ImportDeclaration,
    TypeDeclaration,
    EnumDeclaration,
    EnumConstant,
    FieldDeclaration,
    MethodDeclaration,
    SingleVariableDeclaration,
    VariableDeclarationFragment,
    Modifier,
    Annotation,
    Block,
    ExpressionStatement,
    ReturnStatement,
    ThrowStatement,
    IfStatement,
    WhileStatement,
    VariableDeclarationStatement,
    EmptyStatement,
    Assignment,
    InfixExpression,
    PrefixExpression,
    PostfixExpression,
    InstanceofExpression,
    ParenthesizedExpression,
    ArrayAccess,
    FieldAccess,
    MethodInvocation,
    ClassInstanceCreation,
    CastExpression,
    ConditionalExpression,
    SimpleName,
    QualifiedName,
    NumberLiteral,
    StringLiteral,
    CharacterLiteral,
    BooleanLiteral,
    NullLiteral,
    ThisExpression,
    SimpleType,
    PrimitiveType,
    ArrayType,
    ParameterizedType,
    IntersectionType,
}

use Prop as P;
use Separator as S;

static COMPILATION_UNIT: [SlotDescriptor; 3] = [
    optional(P::Package),
    list(P::Imports, S::Line),
    list(P::Types, S::Members),
];
static PACKAGE_DECLARATION: [SlotDescriptor; 1] = [child(P::Name)];
static IMPORT_DECLARATION: [SlotDescriptor; 3] = [flag(P::Static), child(P::Name), flag(P::OnDemand)];
static TYPE_DECLARATION: [SlotDescriptor; 6] = [
    list(P::Modifiers, S::Space),
    flag(P::Interface),
    child(P::Name),
    optional(P::Superclass),
    list(P::Interfaces, S::Comma),
    list(P::BodyDeclarations, S::Members),
];
static ENUM_DECLARATION: [SlotDescriptor; 5] = [
    list(P::Modifiers, S::Space),
    child(P::Name),
    list(P::Interfaces, S::Comma),
    list(P::EnumConstants, S::Comma),
    list(P::BodyDeclarations, S::Members),
];
static ENUM_CONSTANT: [SlotDescriptor; 2] = [child(P::Name), list(P::Arguments, S::Comma)];
static FIELD_DECLARATION: [SlotDescriptor; 3] = [
    list(P::Modifiers, S::Space),
    child(P::Type),
    list(P::Fragments, S::Comma),
];
static METHOD_DECLARATION: [SlotDescriptor; 6] = [
    list(P::Modifiers, S::Space),
    optional(P::ReturnType),
    child(P::Name),
    list(P::Parameters, S::Comma),
    list(P::ThrownExceptions, S::Comma),
    optional(P::Body),
];
static SINGLE_VARIABLE_DECLARATION: [SlotDescriptor; 4] = [
    list(P::Modifiers, S::Space),
    child(P::Type),
    flag(P::Varargs),
    child(P::Name),
];
static VARIABLE_DECLARATION_FRAGMENT: [SlotDescriptor; 2] = [child(P::Name), optional(P::Initializer)];
static MODIFIER: [SlotDescriptor; 1] = [text(P::Keyword)];
static ANNOTATION: [SlotDescriptor; 2] = [child(P::TypeName), list(P::Arguments, S::Comma)];
static BLOCK: [SlotDescriptor; 1] = [list(P::Statements, S::Line)];
static EXPRESSION_STATEMENT: [SlotDescriptor; 1] = [child(P::Expression)];
static RETURN_STATEMENT: [SlotDescriptor; 1] = [optional(P::Expression)];
static THROW_STATEMENT: [SlotDescriptor; 1] = [child(P::Expression)];
static IF_STATEMENT: [SlotDescriptor; 3] = [
    child(P::Expression),
    child(P::ThenStatement),
    optional(P::ElseStatement),
];
static WHILE_STATEMENT: [SlotDescriptor; 2] = [child(P::Expression), child(P::Body)];
static VARIABLE_DECLARATION_STATEMENT: [SlotDescriptor; 3] = [
    list(P::Modifiers, S::Space),
    child(P::Type),
    list(P::Fragments, S::Comma),
];
static BINARY: [SlotDescriptor; 3] = [child(P::Left), text(P::Operator), child(P::Right)];
static PREFIX_EXPRESSION: [SlotDescriptor; 2] = [text(P::Operator), child(P::Operand)];
static POSTFIX_EXPRESSION: [SlotDescriptor; 2] = [child(P::Operand), text(P::Operator)];
static INSTANCEOF_EXPRESSION: [SlotDescriptor; 2] = [child(P::Left), child(P::Type)];
static PARENTHESIZED_EXPRESSION: [SlotDescriptor; 1] = [child(P::Expression)];
static ARRAY_ACCESS: [SlotDescriptor; 2] = [child(P::Array), child(P::Index)];
static FIELD_ACCESS: [SlotDescriptor; 2] = [child(P::Expression), child(P::Name)];
static METHOD_INVOCATION: [SlotDescriptor; 3] = [
    optional(P::Expression),
    child(P::Name),
    list(P::Arguments, S::Comma),
];
static CLASS_INSTANCE_CREATION: [SlotDescriptor; 2] = [child(P::Type), list(P::Arguments, S::Comma)];
static CAST_EXPRESSION: [SlotDescriptor; 2] = [child(P::Type), child(P::Expression)];
static CONDITIONAL_EXPRESSION: [SlotDescriptor; 3] = [
    child(P::Expression),
    child(P::ThenExpression),
    child(P::ElseExpression),
];
static SIMPLE_NAME: [SlotDescriptor; 1] = [text(P::Identifier)];
static QUALIFIED_NAME: [SlotDescriptor; 2] = [child(P::Qualifier), child(P::Name)];
static TOKEN_LITERAL: [SlotDescriptor; 1] = [text(P::Token)];
static BOOLEAN_LITERAL: [SlotDescriptor; 1] = [flag(P::Value)];
static NO_SLOTS: [SlotDescriptor; 0] = [];
static SIMPLE_TYPE: [SlotDescriptor; 1] = [child(P::Name)];
static PRIMITIVE_TYPE: [SlotDescriptor; 1] = [text(P::Keyword)];
static ARRAY_TYPE: [SlotDescriptor; 1] = [child(P::ComponentType)];
static PARAMETERIZED_TYPE: [SlotDescriptor; 2] = [child(P::Type), list(P::TypeArguments, S::Comma)];
static INTERSECTION_TYPE: [SlotDescriptor; 1] = [list(P::Types, S::Ampersand)];

impl NodeKind {
    /// Slots of this kind in source order
    pub fn slots(&self) -> &'static [SlotDescriptor] {
        match self {
            NodeKind::CompilationUnit => &COMPILATION_UNIT,
            NodeKind::PackageDeclaration => &PACKAGE_DECLARATION,
            NodeKind::ImportDeclaration => &IMPORT_DECLARATION,
            NodeKind::TypeDeclaration => &TYPE_DECLARATION,
            NodeKind::EnumDeclaration => &ENUM_DECLARATION,
            NodeKind::EnumConstant => &ENUM_CONSTANT,
            NodeKind::FieldDeclaration => &FIELD_DECLARATION,
            NodeKind::MethodDeclaration => &METHOD_DECLARATION,
            NodeKind::SingleVariableDeclaration => &SINGLE_VARIABLE_DECLARATION,
            NodeKind::VariableDeclarationFragment => &VARIABLE_DECLARATION_FRAGMENT,
            NodeKind::Modifier => &MODIFIER,
            NodeKind::Annotation => &ANNOTATION,
            NodeKind::Block => &BLOCK,
            NodeKind::ExpressionStatement => &EXPRESSION_STATEMENT,
            NodeKind::ReturnStatement => &RETURN_STATEMENT,
            NodeKind::ThrowStatement => &THROW_STATEMENT,
            NodeKind::IfStatement => &IF_STATEMENT,
            NodeKind::WhileStatement => &WHILE_STATEMENT,
            NodeKind::VariableDeclarationStatement => &VARIABLE_DECLARATION_STATEMENT,
            NodeKind::EmptyStatement => &NO_SLOTS,
            NodeKind::Assignment | NodeKind::InfixExpression => &BINARY,
            NodeKind::PrefixExpression => &PREFIX_EXPRESSION,
            NodeKind::PostfixExpression => &POSTFIX_EXPRESSION,
            NodeKind::InstanceofExpression => &INSTANCEOF_EXPRESSION,
            NodeKind::ParenthesizedExpression => &PARENTHESIZED_EXPRESSION,
            NodeKind::ArrayAccess => &ARRAY_ACCESS,
            NodeKind::FieldAccess => &FIELD_ACCESS,
            NodeKind::MethodInvocation => &METHOD_INVOCATION,
            NodeKind::ClassInstanceCreation => &CLASS_INSTANCE_CREATION,
            NodeKind::CastExpression => &CAST_EXPRESSION,
            NodeKind::ConditionalExpression => &CONDITIONAL_EXPRESSION,
            NodeKind::SimpleName => &SIMPLE_NAME,
            NodeKind::QualifiedName => &QUALIFIED_NAME,
            NodeKind::NumberLiteral | NodeKind::StringLiteral | NodeKind::CharacterLiteral => {
                &TOKEN_LITERAL
            }
            NodeKind::BooleanLiteral => &BOOLEAN_LITERAL,
            NodeKind::NullLiteral | NodeKind::ThisExpression => &NO_SLOTS,
            NodeKind::SimpleType => &SIMPLE_TYPE,
            NodeKind::PrimitiveType => &PRIMITIVE_TYPE,
            NodeKind::ArrayType => &ARRAY_TYPE,
            NodeKind::ParameterizedType => &PARAMETERIZED_TYPE,
            NodeKind::IntersectionType => &INTERSECTION_TYPE,
        }
    }

    /// Descriptor of one slot, if this kind has it
    pub fn slot(&self, prop: Prop) -> Option<&'static SlotDescriptor> {
        self.slots().iter().find(|d| d.prop == prop)
    }

    pub fn category(&self) -> Category {
        use NodeKind::*;
        match self {
            CompilationUnit => Category::Unit,
            PackageDeclaration | ImportDeclaration | TypeDeclaration | EnumDeclaration
            | EnumConstant | FieldDeclaration | MethodDeclaration | SingleVariableDeclaration
            | VariableDeclarationFragment => Category::Declaration,
            Block | ExpressionStatement | ReturnStatement | ThrowStatement | IfStatement
            | WhileStatement | VariableDeclarationStatement | EmptyStatement => Category::Statement,
            Assignment | InfixExpression | PrefixExpression | PostfixExpression
            | InstanceofExpression | ParenthesizedExpression | ArrayAccess | FieldAccess
            | MethodInvocation | ClassInstanceCreation | CastExpression | ConditionalExpression
            | SimpleName | QualifiedName | NumberLiteral | StringLiteral | CharacterLiteral
            | BooleanLiteral | NullLiteral | ThisExpression => Category::Expression,
            SimpleType | PrimitiveType | ArrayType | ParameterizedType | IntersectionType => {
                Category::Type
            }
            Modifier | Annotation => Category::Other,
        }
    }

    pub fn is_statement(&self) -> bool {
        self.category() == Category::Statement
    }

    pub fn is_expression(&self) -> bool {
        self.category() == Category::Expression
    }

    /// Names are expressions that can also stand for types and packages
    pub fn is_name(&self) -> bool {
        matches!(self, NodeKind::SimpleName | NodeKind::QualifiedName)
    }
}

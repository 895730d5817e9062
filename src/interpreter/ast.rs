use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;
use crate::interpreter::lexer::TokenPos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl BinaryOperator {
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOperator::Add | BinaryOperator::Subtract => 1,
            BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => 2,
        }
    }
}

impl Display for BinaryOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Subtract => "-",
            BinaryOperator::Multiply => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Modulo => "%",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionOperator {
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    And,
    Or,
    /// Parses as a binary operator but is not defined for any pair of values.
    Not,
}

impl Display for ConditionOperator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ConditionOperator::Equal => "==",
            ConditionOperator::NotEqual => "!=",
            ConditionOperator::Greater => ">",
            ConditionOperator::GreaterEqual => ">=",
            ConditionOperator::Less => "<",
            ConditionOperator::LessEqual => "<=",
            ConditionOperator::And => "&&",
            ConditionOperator::Or => "||",
            ConditionOperator::Not => "!",
        })
    }
}

/// Comparison value of a switch clause.
#[derive(Clone, Debug, PartialEq)]
pub enum CaseTest {
    Default,
    Number(f64),
    String(String),
}

#[derive(Clone, Debug)]
pub struct SwitchCase {
    pub test: CaseTest,
    pub body: Vec<Node>,
    pub pos: TokenPos,
}

impl PartialEq for SwitchCase {
    fn eq(&self, other: &Self) -> bool {
        self.test == other.test && self.body == other.body
    }
}

#[derive(Clone, Debug)]
pub struct Property {
    pub key: String,
    /// `None` is the shorthand form, which reads the variable named `key`.
    pub value: Option<Node>,
    pub pos: TokenPos,
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value == other.value
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Program(Vec<Node>),

    VariableDeclaration {
        name: String,
        constant: bool,
        value: Option<Box<Node>>,
    },
    FunctionDeclaration {
        name: String,
        parameters: Vec<String>,
        body: Rc<Vec<Node>>,
    },
    IfExpression {
        condition: Option<Box<Node>>,
        body: Vec<Node>,
        otherwise: Option<Box<Node>>,
    },
    ForExpression {
        init: Option<Box<Node>>,
        condition: Option<Box<Node>>,
        increment: Option<Box<Node>>,
        post_condition: Option<Box<Node>>,
        body: Vec<Node>,
    },
    SwitchExpression {
        value: Box<Node>,
        cases: Vec<SwitchCase>,
    },
    BreakExpression,
    ContinueExpression,

    BinaryExpression {
        left: Box<Node>,
        operator: BinaryOperator,
        right: Box<Node>,
    },
    ConditionExpression {
        left: Box<Node>,
        operator: ConditionOperator,
        right: Box<Node>,
    },
    AssignmentExpression {
        assignee: Box<Node>,
        value: Box<Node>,
    },
    CallExpression {
        callee: Box<Node>,
        args: Vec<Node>,
    },
    MemberExpression {
        object: Box<Node>,
        property: Box<Node>,
        computed: bool,
    },
    ObjectLiteral(Vec<Property>),

    Identifier(String),
    NumericLiteral(f64),
    StringLiteral(String),
}

#[derive(Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub pos: TokenPos,
}

impl Node {
    pub fn new(kind: NodeKind, pos: TokenPos) -> Node {
        Node { kind, pos }
    }

    /// Whether this node is an expression rather than a statement form.
    pub fn is_expression(&self) -> bool {
        !matches!(self.kind, NodeKind::Program(_)
            | NodeKind::VariableDeclaration { .. }
            | NodeKind::FunctionDeclaration { .. }
            | NodeKind::IfExpression { .. }
            | NodeKind::ForExpression { .. }
            | NodeKind::SwitchExpression { .. }
            | NodeKind::BreakExpression
            | NodeKind::ContinueExpression)
    }
}

// Positions only feed error traces, so they don't take part in structural equality
impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

fn format_statement(stmt: &Node) -> String {
    // Statement-level expressions drop their outer parentheses, which keeps a
    // statement after a `for` body from reading back as its post-condition
    match &stmt.kind {
        NodeKind::BinaryExpression { .. } => format!("{};", format_binary_chain(stmt)),
        NodeKind::ConditionExpression { left, operator, right } => {
            // A leading `(` would read back as the post-condition of a preceding `for`
            let left = match &left.kind {
                NodeKind::ObjectLiteral(properties) => format_object(properties),
                NodeKind::AssignmentExpression { assignee, value } => format!("{:?} = {:?}", assignee, value),
                _ => format_binary_chain(left),
            };

            format!("{} {} {:?};", left, operator, right)
        },
        NodeKind::AssignmentExpression { assignee, value } => format!("{:?} = {:?};", assignee, value),
        NodeKind::ObjectLiteral(properties) => format!("{};", format_object(properties)),
        _ if stmt.is_expression() => format!("{:?};", stmt),
        _ => format!("{:?}", stmt),
    }
}

/// Prints a left-associative operator chain without redundant parentheses around its left operands.
fn format_binary_chain(node: &Node) -> String {
    match &node.kind {
        NodeKind::BinaryExpression { left, operator, right } => {
            let left = match &left.kind {
                NodeKind::BinaryExpression { operator: left_operator, .. }
                if left_operator.precedence() >= operator.precedence() => format_binary_chain(left),
                _ => format!("{:?}", left),
            };

            format!("{} {} {:?}", left, operator, right)
        },
        _ => format!("{:?}", node),
    }
}

fn format_statements(statements: &[Node]) -> String {
    statements.iter().map(format_statement).collect::<Vec<String>>().join(" ")
}

fn format_block(statements: &[Node]) -> String {
    if statements.is_empty() {
        String::from("{}")
    } else {
        format!("{{ {} }}", format_statements(statements))
    }
}

fn format_object(properties: &[Property]) -> String {
    format!("{{{}}}", properties.iter()
        .map(|property| match &property.value {
            Some(value) => format!("{}: {:?}", property.key, value),
            None => property.key.clone(),
        })
        .collect::<Vec<String>>().join(", "))
}

fn format_string(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Prints nodes back as source text that parses to a structurally equal tree.
impl Debug for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            NodeKind::Program(statements) => write!(f, "{}", statements.iter()
                .map(format_statement)
                .collect::<Vec<String>>().join("\n")),

            NodeKind::VariableDeclaration { name, constant, value } => {
                let keyword = if *constant { "const" } else { "let" };

                match value {
                    Some(value) => write!(f, "{} {} = {:?};", keyword, name, value),
                    None => write!(f, "{} {};", keyword, name),
                }
            },
            NodeKind::FunctionDeclaration { name, parameters, body } =>
                write!(f, "fn {}({}) {}", name, parameters.join(", "), format_block(body)),
            NodeKind::IfExpression { condition, body, otherwise } => {
                match condition {
                    Some(condition) => write!(f, "if ({:?}) {}", condition, format_block(body))?,
                    None => write!(f, "{}", format_block(body))?,
                }

                match otherwise {
                    // `else` followed by `if (...)` reads back as `elseif (...)`
                    Some(otherwise) => match &otherwise.kind {
                        NodeKind::IfExpression { condition: Some(_), .. } => write!(f, " else{:?}", otherwise),
                        _ => write!(f, " else {:?}", otherwise),
                    },
                    None => Ok(()),
                }
            },
            NodeKind::ForExpression { init, condition, increment, post_condition, body } => {
                match (init, condition, increment) {
                    (None, None, None) => write!(f, "for ")?,
                    (None, Some(condition), None) => write!(f, "for ({:?}) ", condition)?,
                    _ => write!(f, "for ({} {}; {}) ",
                                init.as_ref().map(|init| format!("{:?}", init)).unwrap_or_else(|| String::from(";")),
                                condition.as_ref().map(|condition| format!("{:?}", condition)).unwrap_or_default(),
                                increment.as_ref().map(|increment| format!("{:?}", increment)).unwrap_or_default())?,
                }

                write!(f, "{}", format_block(body))?;

                match post_condition {
                    Some(post_condition) => write!(f, " ({:?})", post_condition),
                    None => Ok(()),
                }
            },
            NodeKind::SwitchExpression { value, cases } => {
                write!(f, "switch ({:?}) {{", value)?;

                for case in cases {
                    match &case.test {
                        CaseTest::Default => write!(f, " default:")?,
                        CaseTest::Number(number) => write!(f, " case {}:", number)?,
                        CaseTest::String(string) => write!(f, " case {}:", format_string(string))?,
                    }

                    if !case.body.is_empty() {
                        write!(f, " {}", format_statements(&case.body))?;
                    }
                }

                write!(f, " }}")
            },
            NodeKind::BreakExpression => write!(f, "break;"),
            NodeKind::ContinueExpression => write!(f, "continue;"),

            NodeKind::BinaryExpression { left, operator, right } => write!(f, "({:?} {} {:?})", left, operator, right),
            NodeKind::ConditionExpression { left, operator, right } => write!(f, "({:?} {} {:?})", left, operator, right),
            NodeKind::AssignmentExpression { assignee, value } => write!(f, "({:?} = {:?})", assignee, value),
            NodeKind::CallExpression { callee, args } => write!(f, "{:?}({})", callee, args.iter()
                .map(|arg| format!("{:?}", arg))
                .collect::<Vec<String>>().join(", ")),
            NodeKind::MemberExpression { object, property, computed } => if *computed {
                write!(f, "{:?}[{:?}]", object, property)
            } else {
                write!(f, "{:?}.{:?}", object, property)
            },
            // Parenthesized so that a literal can stand anywhere a primary expression can
            NodeKind::ObjectLiteral(properties) => write!(f, "({})", format_object(properties)),

            NodeKind::Identifier(name) => write!(f, "{}", name),
            NodeKind::NumericLiteral(value) => write!(f, "{}", value),
            NodeKind::StringLiteral(value) => write!(f, "{}", format_string(value)),
        }
    }
}

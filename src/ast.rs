use std::rc::Rc;

use crate::interpreter::parser::scope::ScopeId;

/// A base type named in a declaration such as `var integer x = 3`.
///
/// Declared types are recorded in the AST but never checked; they document
/// intent only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    /// `integer`
    Integer,
    /// `decimal`
    Decimal,
    /// `uinteger`
    UInteger,
}

/// An ordered sequence of statements.
///
/// Used for whole programs, function bodies, loop bodies and `{ ... }` blocks.
/// Evaluating a sequence yields the value of its last statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statements {
    /// The statements, in source order.
    pub statements: Vec<Expr>,
    /// Line number of the first token of the sequence.
    pub line:       usize,
}

impl Statements {
    #[must_use]
    pub const fn new(statements: Vec<Expr>, line: usize) -> Self {
        Self { statements, line }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// A user-defined function, as written by `fn` or `fnrec`.
///
/// The definition owns the static scope opened for its body. At call time the
/// evaluator seeds a fresh runtime frame from that scope, with the frame's
/// parent set to the environment captured when the definition was evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// The name of the function.
    pub name:      String,
    /// The parameter names, in order.
    pub params:    Vec<String>,
    /// The body evaluated when the function is called.
    pub body:      Statements,
    /// The static scope of the body; parameters are declared in it.
    pub scope:     ScopeId,
    /// `true` for `fnrec`: the body may refer to the function by name.
    pub recursive: bool,
    /// Line number in the source code.
    pub line:      usize,
}

/// The header and body of a `for (init; condition; step) { body }` loop.
#[derive(Debug, Clone, PartialEq)]
pub struct ForLoop {
    /// The `var` binding run once when the loop is entered.
    pub init:      Expr,
    /// Checked before every iteration.
    pub condition: Expr,
    /// Evaluated after every iteration of the body.
    pub step:      Expr,
    /// The loop body.
    pub body:      Statements,
    /// Static scope shared by the init binding and the body.
    pub scope:     ScopeId,
}

/// An abstract syntax tree node.
///
/// Statements and expressions share one enum: every construct evaluates to a
/// value, and constructs that have nothing to yield (bindings, assignments,
/// loops, output) evaluate to unit.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal kept as source text; `.` selects a float.
    Number {
        /// Digits, optionally signed and with a fractional part.
        text: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A quoted string literal.
    String {
        /// The contents between the quotes.
        value: String,
        /// Line number in the source code.
        line:  usize,
    },
    /// `True` or `False`.
    Boolean {
        /// The literal value.
        value: bool,
        /// Line number in the source code.
        line:  usize,
    },
    /// `[a, b, c]`
    ArrayLiteral {
        /// Element expressions, in order.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Reference to a variable or function by name.
    Variable {
        /// Name being referenced.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// `var [type] name = value`
    VarBind {
        /// The name introduced into the current scope.
        name:          String,
        /// Optional declared base type.
        declared_type: Option<BaseType>,
        /// Initializer expression.
        value:         Box<Self>,
        /// Line number in the source code.
        line:          usize,
    },
    /// `name = value`
    AssignToVar {
        /// Name of an existing binding.
        name:  String,
        /// New value.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `name op= value`
    CompoundAssignment {
        /// Name of an existing binding.
        name:  String,
        /// The non-compound operator (`+` for `+=`).
        op:    BinaryOperator,
        /// Right-hand side.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `array[index] = value`
    IndexAssign {
        /// Expression yielding the array.
        array: Box<Self>,
        /// Index expression.
        index: Box<Self>,
        /// Value to store.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A binary operation.
    BinOp {
        /// The operator.
        op:    BinaryOperator,
        /// Left operand.
        left:  Box<Self>,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// A unary operation, including the `char(...)` and `ascii(...)`
    /// conversions.
    UnaryOp {
        /// The operator.
        op:      UnaryOperator,
        /// The operand.
        operand: Box<Self>,
        /// Line number in the source code.
        line:    usize,
    },
    /// `if condition then ... [else ...] end`
    If {
        /// Must evaluate to a boolean.
        condition:   Box<Self>,
        /// Evaluated when the condition holds.
        then_branch: Box<Self>,
        /// Evaluated otherwise; a missing branch yields unit.
        else_branch: Option<Box<Self>>,
        /// Line number in the source code.
        line:        usize,
    },
    /// `while condition { body }`
    WhileLoop {
        /// Checked before every iteration, in the enclosing frame.
        condition: Box<Self>,
        /// The loop body.
        body:      Statements,
        /// Static scope of the body.
        scope:     ScopeId,
        /// Line number in the source code.
        line:      usize,
    },
    /// `for (var i = ...; condition; step) { body }`
    ForLoop {
        /// Header and body.
        context: Box<ForLoop>,
        /// Line number in the source code.
        line:    usize,
    },
    /// `display value`: writes the value without a newline.
    Display {
        /// The value to write.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `displayl value`: writes the value followed by a newline.
    DisplayLine {
        /// The value to write.
        value: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `fn name(params) { body }` or `fnrec ...`
    FuncDef(Rc<FunctionDef>),
    /// `name(arguments)`
    FuncCall {
        /// Name of the function.
        name:      String,
        /// Argument expressions.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A `{ ... }` block. Blocks do not open a scope of their own.
    Statements(Statements),
    /// `array[index]`
    Index {
        /// Expression yielding the array.
        array: Box<Self>,
        /// Index expression.
        index: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// `array.Method` or `array.Method(arguments)`
    MethodCall {
        /// Expression yielding the array.
        array:     Box<Self>,
        /// The method being called.
        method:    ArrayMethod,
        /// Argument expressions.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use calci::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub fn line_number(&self) -> usize {
        match self {
            Self::Number { line, .. }
            | Self::String { line, .. }
            | Self::Boolean { line, .. }
            | Self::ArrayLiteral { line, .. }
            | Self::Variable { line, .. }
            | Self::VarBind { line, .. }
            | Self::AssignToVar { line, .. }
            | Self::CompoundAssignment { line, .. }
            | Self::IndexAssign { line, .. }
            | Self::BinOp { line, .. }
            | Self::UnaryOp { line, .. }
            | Self::If { line, .. }
            | Self::WhileLoop { line, .. }
            | Self::ForLoop { line, .. }
            | Self::Display { line, .. }
            | Self::DisplayLine { line, .. }
            | Self::FuncCall { line, .. }
            | Self::Index { line, .. }
            | Self::MethodCall { line, .. } => *line,
            Self::FuncDef(def) => def.line,
            Self::Statements(block) => block.line,
        }
    }

    /// A short description of the node for error messages.
    #[must_use]
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Number { .. } => "a number",
            Self::String { .. } => "a string",
            Self::Boolean { .. } => "a boolean",
            Self::ArrayLiteral { .. } => "an array literal",
            Self::Variable { .. } => "a variable",
            Self::VarBind { .. } => "a declaration",
            Self::AssignToVar { .. } | Self::CompoundAssignment { .. } | Self::IndexAssign { .. } => {
                "an assignment"
            },
            Self::BinOp { .. } | Self::UnaryOp { .. } => "an operator expression",
            Self::If { .. } => "an if expression",
            Self::WhileLoop { .. } | Self::ForLoop { .. } => "a loop",
            Self::Display { .. } | Self::DisplayLine { .. } => "a display statement",
            Self::FuncDef(_) => "a function definition",
            Self::FuncCall { .. } => "a function call",
            Self::Statements(_) => "a block",
            Self::Index { .. } => "an index expression",
            Self::MethodCall { .. } => "a method call",
        }
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`), floored for two integers
    Div,
    /// Real division (`÷`), always yields a float
    RealDiv,
    /// Floored modulo (`%`)
    Mod,
    /// Bitwise and, or logical and on booleans (`&`)
    BitAnd,
    /// Bitwise or, or logical or on booleans (`|`)
    BitOr,
    /// Bitwise xor on integers, exponentiation otherwise (`^`)
    Caret,
    /// Left shift (`<<`)
    Shl,
    /// Right shift (`>>`)
    Shr,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Logical and (`and`), both operands always evaluated
    And,
    /// Logical or (`or`), both operands always evaluated
    Or,
}

impl std::fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOperator::{
            Add, And, BitAnd, BitOr, Caret, Div, Equal, Greater, GreaterEqual, Less, LessEqual,
            Mod, Mul, NotEqual, Or, RealDiv, Shl, Shr, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            RealDiv => "÷",
            Mod => "%",
            BitAnd => "&",
            BitOr => "|",
            Caret => "^",
            Shl => "<<",
            Shr => ">>",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            Equal => "==",
            NotEqual => "!=",
            And => "and",
            Or => "or",
        };
        write!(f, "{operator}")
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Logical not (`not x`).
    Not,
    /// Integer code point to one-character string (`char(66)`).
    Char,
    /// One-character string to integer code point (`ascii("A")`).
    Ascii,
}

impl std::fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let operator = match self {
            Self::Negate => "-",
            Self::Not => "not",
            Self::Char => "char",
            Self::Ascii => "ascii",
        };
        write!(f, "{operator}")
    }
}

/// A method of the array engine, called with `array.Method(...)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArrayMethod {
    /// Insert an element at the front.
    PushFront,
    /// Insert an element at the back.
    PushBack,
    /// Remove and return the first element.
    PopFront,
    /// Remove and return the last element.
    PopBack,
    /// `Insert(index, value)`: insert before position `index`.
    Insert,
    /// `Remove(index)`: remove and return the element at `index`.
    Remove,
    /// Remove every element.
    Clear,
    /// Number of elements.
    Length,
}

impl ArrayMethod {
    /// Resolves a method by its source name.
    ///
    /// # Example
    /// ```
    /// use calci::ast::ArrayMethod;
    ///
    /// assert_eq!(ArrayMethod::from_name("PushBack"), Some(ArrayMethod::PushBack));
    /// assert_eq!(ArrayMethod::from_name("push_back"), None);
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "PushFront" => Self::PushFront,
            "PushBack" => Self::PushBack,
            "PopFront" => Self::PopFront,
            "PopBack" => Self::PopBack,
            "Insert" => Self::Insert,
            "Remove" => Self::Remove,
            "Clear" => Self::Clear,
            "Length" => Self::Length,
            _ => return None,
        })
    }

    /// Number of arguments the method takes.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::PopFront | Self::PopBack | Self::Clear | Self::Length => 0,
            Self::PushFront | Self::PushBack | Self::Remove => 1,
            Self::Insert => 2,
        }
    }
}

impl std::fmt::Display for ArrayMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::PushFront => "PushFront",
            Self::PushBack => "PushBack",
            Self::PopFront => "PopFront",
            Self::PopBack => "PopBack",
            Self::Insert => "Insert",
            Self::Remove => "Remove",
            Self::Clear => "Clear",
            Self::Length => "Length",
        };
        write!(f, "{name}")
    }
}

//! Predicate AST and builder combinators.
//!
//! Predicates are assembled from [`col`] (a property of the entity) and
//! [`capture`] (a named value captured from the caller's scope), combined
//! with [`Predicate::and`] / [`Predicate::or`]:
//!
//! ```
//! use tidemap::expr::{capture, col};
//!
//! let license: Option<String> = Some("12345".to_string());
//! let predicate = capture("license_number", license.clone())
//!     .is_null()
//!     .or(col("license_number").eq_capture("license_number", license));
//! ```

use sea_query::Value;

/// Comparison operator set supported by the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// SQL operator text, padded the way the compiler emits it.
    pub(crate) fn sql(self) -> &'static str {
        match self {
            CompareOp::Eq => " = ",
            CompareOp::Ne => " <> ",
            CompareOp::Gt => " > ",
            CompareOp::Gte => " >= ",
            CompareOp::Lt => " < ",
            CompareOp::Lte => " <= ",
        }
    }
}

/// One side of a comparison.
#[derive(Debug, Clone)]
pub enum Operand {
    /// A property of the entity, resolved to a column through metadata.
    Property(String),
    /// A named captured value; compiles to a reusable `p_`-prefixed
    /// parameter named after the capture, not the column.
    Binding { name: String, value: Value },
    /// An anonymous literal; compiles to a column-derived parameter.
    Value(Value),
}

/// Boolean predicate over a single entity type.
#[derive(Debug, Clone)]
pub enum Predicate {
    Compare {
        op: CompareOp,
        left: Operand,
        right: Operand,
    },
    IsNull(Operand),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// General comparison over explicit operands.
    pub fn compare(op: CompareOp, left: Operand, right: Operand) -> Predicate {
        Predicate::Compare { op, left, right }
    }
}

/// Property operand builder: `col("license_number").eq("12345")`.
pub fn col(name: impl Into<String>) -> Col {
    Col(name.into())
}

/// Named captured value, usable on either side of a comparison:
/// `capture("license_number", license).is_null()`.
pub fn capture(name: impl Into<String>, value: impl Into<Value>) -> Capture {
    Capture {
        name: name.into(),
        value: value.into(),
    }
}

/// A property reference under construction. See [`col`].
#[derive(Debug, Clone)]
pub struct Col(String);

macro_rules! col_compare {
    ($method:ident, $capture_method:ident, $op:ident) => {
        #[doc = concat!("`property ", stringify!($op), " literal` comparison.")]
        pub fn $method(self, value: impl Into<Value>) -> Predicate {
            self.compare(CompareOp::$op, Operand::Value(value.into()))
        }

        #[doc = concat!("`property ", stringify!($op), " capture` comparison against a named captured value.")]
        pub fn $capture_method(
            self,
            name: impl Into<String>,
            value: impl Into<Value>,
        ) -> Predicate {
            self.compare(
                CompareOp::$op,
                Operand::Binding {
                    name: name.into(),
                    value: value.into(),
                },
            )
        }
    };
}

impl Col {
    col_compare!(eq, eq_capture, Eq);
    col_compare!(ne, ne_capture, Ne);
    col_compare!(gt, gt_capture, Gt);
    col_compare!(gte, gte_capture, Gte);
    col_compare!(lt, lt_capture, Lt);
    col_compare!(lte, lte_capture, Lte);

    /// `property IS NULL`.
    pub fn is_null(self) -> Predicate {
        Predicate::IsNull(self.into_operand())
    }

    /// General comparison against an explicit right operand, e.g. another
    /// column: `col("updated_at").compare(CompareOp::Gt, col("created_at").into_operand())`.
    pub fn compare(self, op: CompareOp, right: Operand) -> Predicate {
        Predicate::Compare {
            op,
            left: self.into_operand(),
            right,
        }
    }

    pub fn into_operand(self) -> Operand {
        Operand::Property(self.0)
    }
}

/// A named captured value under construction. See [`capture`].
#[derive(Debug, Clone)]
pub struct Capture {
    name: String,
    value: Value,
}

impl Capture {
    /// `@p_name IS NULL`: a parameterized null check on the captured value.
    pub fn is_null(self) -> Predicate {
        Predicate::IsNull(self.into_operand())
    }

    /// General comparison with the capture on the left.
    pub fn compare(self, op: CompareOp, right: Operand) -> Predicate {
        Predicate::Compare {
            op,
            left: self.into_operand(),
            right,
        }
    }

    pub fn into_operand(self) -> Operand {
        Operand::Binding {
            name: self.name,
            value: self.value,
        }
    }
}

impl From<Col> for Operand {
    fn from(col: Col) -> Self {
        col.into_operand()
    }
}

impl From<Capture> for Operand {
    fn from(capture: Capture) -> Self {
        capture.into_operand()
    }
}

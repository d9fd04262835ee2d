//! Tree-walking compilation of predicates into parameterized SQL text.

use super::ast::{CompareOp, Operand, Predicate};
use super::clause::WhereClause;
use crate::entity::{metadata, Entity, EntityMetadata, PropertyMetadata};
use crate::error::MapError;
use crate::value::{self, ParamValue, Parameters};
use sea_query::Value;
use std::collections::HashMap;

/// Compile `predicate` against `T`'s metadata into a WHERE clause.
///
/// Compilation is deterministic: the same predicate always yields the same
/// text and the same parameter names.
pub fn compile_where<T: Entity>(predicate: &Predicate) -> Result<WhereClause, MapError> {
    compile_with(metadata::<T>()?, predicate)
}

/// Compile against explicit metadata. Used by the statement generators, which
/// have already resolved it.
pub(crate) fn compile_with(
    meta: &EntityMetadata,
    predicate: &Predicate,
) -> Result<WhereClause, MapError> {
    let mut compiler = WhereCompiler::new(meta);
    compiler.visit(predicate)?;
    Ok(compiler.finish())
}

/// Per-call compiler state: output buffer, bound parameters, a usage counter
/// for collision-safe column-derived names, and the column context
/// established by the most recently visited property.
struct WhereCompiler<'m> {
    meta: &'m EntityMetadata,
    sql: String,
    parameters: Parameters,
    name_index: HashMap<String, usize>,
    current: Option<&'m PropertyMetadata>,
}

impl<'m> WhereCompiler<'m> {
    fn new(meta: &'m EntityMetadata) -> Self {
        Self {
            meta,
            sql: String::new(),
            parameters: Parameters::new(),
            name_index: HashMap::new(),
            current: None,
        }
    }

    fn finish(self) -> WhereClause {
        let mut sql = self.sql;
        // logical nodes always parenthesize themselves, leaving one redundant
        // outer pair on the finished clause
        if sql.starts_with('(') && sql.ends_with(')') {
            sql = sql[1..sql.len() - 1].to_string();
        }
        WhereClause::new(sql, self.parameters)
    }

    fn visit(&mut self, predicate: &Predicate) -> Result<(), MapError> {
        match predicate {
            Predicate::And(left, right) => self.visit_logical(" AND ", left, right),
            Predicate::Or(left, right) => self.visit_logical(" OR ", left, right),
            Predicate::Compare { op, left, right } => self.visit_compare(*op, left, right),
            Predicate::IsNull(operand) => self.visit_is_null(operand),
        }
    }

    fn visit_logical(
        &mut self,
        op: &str,
        left: &Predicate,
        right: &Predicate,
    ) -> Result<(), MapError> {
        self.sql.push('(');
        self.visit(left)?;
        self.sql.push_str(op);
        self.visit(right)?;
        self.sql.push(')');
        Ok(())
    }

    fn visit_compare(
        &mut self,
        op: CompareOp,
        left: &Operand,
        right: &Operand,
    ) -> Result<(), MapError> {
        self.visit_left(left)?;

        match right {
            // a plain null literal degrades the comparison to IS NULL
            Operand::Value(v) if value::is_null(v) => {
                self.sql.push_str(" IS NULL");
            }
            Operand::Binding { name, value } if value::is_null(value) => {
                // a null capture named after the current property stays a
                // parameterized check; any other null capture degrades to a
                // literal IS NULL with nothing bound
                if self.matches_current(name) {
                    let param = self.binding_name(name);
                    self.sql.push_str(op.sql());
                    self.push_placeholder(&param);
                    self.bind_raw(param, value.clone());
                } else {
                    self.sql.push_str(" IS NULL");
                }
            }
            Operand::Binding { name, value } => {
                let param = self.binding_name(name);
                self.sql.push_str(op.sql());
                self.push_placeholder(&param);
                self.bind_contextual(param, value.clone());
            }
            Operand::Value(v) => {
                self.sql.push_str(op.sql());
                let column = self.current_column()?;
                let param = self.numbered(&format!("p_{column}"));
                self.push_placeholder(&param);
                self.bind_contextual(param, v.clone());
            }
            Operand::Property(name) => {
                self.sql.push_str(op.sql());
                let property = self.resolve(name)?;
                let column = property.column().to_string();
                self.sql.push_str(&column);
                self.current = Some(property);
            }
        }
        Ok(())
    }

    fn visit_is_null(&mut self, operand: &Operand) -> Result<(), MapError> {
        match operand {
            Operand::Property(name) => {
                let property = self.resolve(name)?;
                let column = property.column().to_string();
                self.sql.push_str(&column);
                self.current = Some(property);
            }
            Operand::Binding { name, value } => {
                let param = self.binding_name(name);
                self.push_placeholder(&param);
                self.bind_raw(param, value.clone());
            }
            Operand::Value(_) => {
                return Err(MapError::Unsupported(
                    "IS NULL requires a property or a named capture".to_string(),
                ));
            }
        }
        self.sql.push_str(" IS NULL");
        Ok(())
    }

    /// Left operands establish the column context used by right-hand
    /// literals.
    fn visit_left(&mut self, operand: &Operand) -> Result<(), MapError> {
        match operand {
            Operand::Property(name) => {
                let property = self.resolve(name)?;
                let column = property.column().to_string();
                self.sql.push_str(&column);
                self.current = Some(property);
            }
            Operand::Binding { name, value } => {
                let param = self.binding_name(name);
                self.push_placeholder(&param);
                self.bind_raw(param, value.clone());
            }
            Operand::Value(v) => {
                let column = self.current_column()?;
                let param = self.numbered(&format!("p_{column}"));
                self.push_placeholder(&param);
                self.bind_contextual(param, v.clone());
            }
        }
        Ok(())
    }

    fn resolve(&self, name: &str) -> Result<&'m PropertyMetadata, MapError> {
        self.meta
            .properties()
            .get(name)
            .ok_or_else(|| MapError::UnresolvedColumn(name.to_string()))
    }

    fn current_column(&self) -> Result<String, MapError> {
        self.current
            .map(|property| property.column().to_string())
            .ok_or_else(|| {
                MapError::UnresolvedColumn(
                    "literal value with no preceding property".to_string(),
                )
            })
    }

    fn matches_current(&self, name: &str) -> bool {
        self.current
            .is_some_and(|property| property.name().eq_ignore_ascii_case(name))
    }

    /// Capture-derived parameter name. Not deduplicated, so later references
    /// to the same capture reuse the slot.
    fn binding_name(&self, name: &str) -> String {
        format!("p_{}", self.meta.naming().convert(name))
    }

    /// Column-derived parameter name with a numeric suffix when the base name
    /// was already used.
    fn numbered(&mut self, base: &str) -> String {
        let index = self
            .name_index
            .entry(base.to_string())
            .and_modify(|i| *i += 1)
            .or_insert(0);
        if *index > 0 {
            format!("{base}_{index}")
        } else {
            base.to_string()
        }
    }

    fn push_placeholder(&mut self, param: &str) {
        self.sql.push('@');
        self.sql.push_str(param);
    }

    /// Bind a value, wrapped in the current property's converter when one is
    /// declared.
    fn bind_contextual(&mut self, name: String, value: Value) {
        let mut param = ParamValue::new(value);
        if let Some(converter) = self.current.and_then(PropertyMetadata::converter) {
            param = param.with_converter(converter);
        }
        self.parameters.insert(name, param);
    }

    /// Bind a value as-is, outside any column context.
    fn bind_raw(&mut self, name: String, value: Value) {
        self.parameters.insert(name, ParamValue::new(value));
    }
}

//! Runtime scope chain
//!
//! Mirrors the analyzer's scope nesting but holds name -> value
//! bindings and procedure declarations instead of symbols. Frames live
//! in an arena indexed by parent links; entering and leaving a scope
//! only moves the cursor.

use crate::frontend::ast::ProcedureDecl;
use std::collections::HashMap;

struct Frame<'a> {
    #[allow(dead_code)]
    name: String,
    level: usize,
    enclosing: Option<usize>,
    values: HashMap<String, f64>,
    procedures: HashMap<String, &'a ProcedureDecl>,
}

/// The interpreter's chain of runtime scopes
pub struct ScopedNameSpace<'a> {
    frames: Vec<Frame<'a>>,
    current: usize,
}

impl<'a> ScopedNameSpace<'a> {
    /// Create the chain with a base frame at level 0
    pub fn new(name: &str) -> Self {
        Self {
            frames: vec![Frame {
                name: name.to_string(),
                level: 0,
                enclosing: None,
                values: HashMap::new(),
                procedures: HashMap::new(),
            }],
            current: 0,
        }
    }

    /// Push a frame one level below the current one
    pub fn enter_scope(&mut self, name: &str) {
        let level = self.frames[self.current].level + 1;
        let id = self.frames.len();
        self.frames.push(Frame {
            name: name.to_string(),
            level,
            enclosing: Some(self.current),
            values: HashMap::new(),
            procedures: HashMap::new(),
        });
        self.current = id;
    }

    /// Move back to the enclosing frame
    pub fn exit_scope(&mut self) {
        if let Some(enclosing) = self.frames[self.current].enclosing {
            self.current = enclosing;
        }
    }

    /// Bind a value in the innermost scope
    pub fn insert_value(&mut self, name: &str, value: f64) {
        self.frames[self.current]
            .values
            .insert(name.to_string(), value);
    }

    /// Register a procedure declaration in the innermost scope
    pub fn insert_procedure(&mut self, procedure: &'a ProcedureDecl) {
        self.frames[self.current]
            .procedures
            .insert(procedure.name.clone(), procedure);
    }

    /// Look up a value, searching from the current scope outward
    pub fn look_up_value(&self, name: &str) -> Option<f64> {
        let mut frame = Some(self.current);
        while let Some(id) = frame {
            if let Some(value) = self.frames[id].values.get(name) {
                return Some(*value);
            }
            frame = self.frames[id].enclosing;
        }
        None
    }

    /// Look up a procedure, searching from the current scope outward
    pub fn look_up_procedure(&self, name: &str) -> Option<&'a ProcedureDecl> {
        let mut frame = Some(self.current);
        while let Some(id) = frame {
            if let Some(procedure) = self.frames[id].procedures.get(name) {
                return Some(procedure);
            }
            frame = self.frames[id].enclosing;
        }
        None
    }
}

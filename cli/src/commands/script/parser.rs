//! # runcap Script Parser
//!
//! File: cli/src/commands/script/parser.rs
//!
//! ## Overview
//!
//! Turns the text of a runcap script into [`Statement`]s. One non-blank,
//! non-comment line is one statement:
//!
//! ```text
//! # Comments start with '#'.
//! files = ls(ls, -1)
//! % = printf(printf, %s, {files})
//! ```
//!
//! - The left-hand side is `%` (print the capture) or a variable name.
//! - The text before `(` is the program; the comma-separated list inside
//!   the parentheses is the full argument vector, `argv[0]` first.
//! - `()` is a single empty argument, so `% = ls()` runs `ls` with `argv[0]`
//!   set to the empty string.
//! - `{name}` anywhere in the program or an argument is replaced by the
//!   capture stored in `name`.
//!
//! Variables must be assigned before they are used; [`validate`] checks that
//! across the whole program before anything runs.
//!
use crate::core::error::{Result, RuncapError};
use std::collections::{HashMap, HashSet};

/// Where a statement's capture goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Printed to runcap's stdout followed by a newline.
    Stdout,
    /// Stored for later `{name}` substitution.
    Variable(String),
}

/// One piece of a [`Template`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Literal(String),
    Variable(String),
}

/// Text with `{name}` substitutions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parses `text`, returning a message describing the first problem.
    pub fn parse(text: &str) -> std::result::Result<Self, String> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            match c {
                '{' => {
                    let mut name = String::new();
                    let mut closed = false;
                    for c in chars.by_ref() {
                        if c == '}' {
                            closed = true;
                            break;
                        }
                        name.push(c);
                    }
                    if !closed {
                        return Err(format!("unterminated '{{' in {:?}", text));
                    }
                    if !is_identifier(&name) {
                        return Err(format!("invalid variable reference {{{}}}", name));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(name));
                }
                '}' => return Err(format!("unmatched '}}' in {:?}", text)),
                _ => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Names of all variables referenced, in order of appearance.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Variable(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Expands the template. Returns the first missing variable on failure.
    pub fn render(&self, vars: &HashMap<String, String>) -> std::result::Result<String, String> {
        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Variable(name) => match vars.get(name) {
                    Some(value) => rendered.push_str(value),
                    None => return Err(name.clone()),
                },
            }
        }
        Ok(rendered)
    }
}

/// A parsed `DEST = PROGRAM(ARGS)` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub dest: Destination,
    pub program: Template,
    pub argv: Vec<Template>,
    pub file: String,
    pub line: usize,
}

impl Statement {
    fn variables(&self) -> impl Iterator<Item = &str> {
        self.argv
            .iter()
            .chain(std::iter::once(&self.program))
            .flat_map(Template::variables)
    }

    /// Builds a script error pointing at this statement.
    pub fn error(&self, message: impl Into<String>) -> RuncapError {
        RuncapError::Script {
            file: self.file.clone(),
            line: self.line,
            message: message.into(),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {
            chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        _ => false,
    }
}

/// Parses every statement in `source`. `file` is only used in error messages.
pub fn parse_script(file: &str, source: &str) -> Result<Vec<Statement>> {
    let mut statements = Vec::new();
    for (index, raw_line) in source.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let statement = parse_statement(file, index + 1, line).map_err(|message| {
            RuncapError::Script {
                file: file.to_string(),
                line: index + 1,
                message,
            }
        })?;
        statements.push(statement);
    }
    Ok(statements)
}

fn parse_statement(file: &str, line: usize, text: &str) -> std::result::Result<Statement, String> {
    let (dest, call) = text
        .split_once('=')
        .ok_or_else(|| "missing '=' between destination and call".to_string())?;
    let dest = match dest.trim() {
        "%" => Destination::Stdout,
        name if is_identifier(name) => Destination::Variable(name.to_string()),
        name => return Err(format!("invalid destination {:?}", name)),
    };

    let (program, rest) = call
        .split_once('(')
        .ok_or_else(|| "missing '(' after program name".to_string())?;
    let program = program.trim();
    if program.is_empty() {
        return Err("missing program name".to_string());
    }
    let close = rest
        .rfind(')')
        .ok_or_else(|| "missing ')' at end of argument list".to_string())?;
    let trailing = rest[close + 1..].trim();
    if !trailing.is_empty() {
        return Err(format!("unexpected text after ')': {:?}", trailing));
    }

    let argv = rest[..close]
        .split(',')
        .map(|arg| Template::parse(arg.trim()))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(Statement {
        dest,
        program: Template::parse(program)?,
        argv,
        file: file.to_string(),
        line,
    })
}

/// Checks that every variable is assigned before it is referenced.
pub fn validate(statements: &[Statement]) -> Result<()> {
    let mut assigned = HashSet::new();
    for statement in statements {
        if let Some(name) = statement
            .variables()
            .find(|name| !assigned.contains(*name))
        {
            return Err(statement
                .error(format!("variable '{}' is used before it is assigned", name))
                .into());
        }
        if let Destination::Variable(name) = &statement.dest {
            assigned.insert(name.clone());
        }
    }
    Ok(())
}

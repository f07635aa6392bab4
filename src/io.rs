//! Read and write formulas in external formats.
//!
//! Formats only work on streams: opening files is left to the caller.

use crate::*;

use itertools::Itertools;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::io::{BufRead, BufReader, Read, Write};

static RE_PROBLEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^p\s+cnf\s+(\d+)\s+(\d+)\s*$").unwrap());
static RE_VARIABLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^c\s+(\d+)\s+(\S.*?)\s*$").unwrap());

/// A serialization format for objects of type T
pub trait Format<T> {
    /// Unique identifier of the format
    fn identifier(&self) -> &str;

    /// Human readable name
    fn name(&self) -> &str;

    fn file_extension(&self) -> &str;

    fn supports_parse(&self) -> bool {
        false
    }

    fn supports_serialize(&self) -> bool {
        false
    }

    fn parse(&self, _input: &mut dyn Read) -> Result<T, FokitError> {
        Err(FokitError::UnsupportedNode(format!("parsing {}", self.name())))
    }

    fn serialize(&self, _object: &T, _output: &mut dyn Write) -> Result<(), FokitError> {
        Err(FokitError::UnsupportedNode(format!("writing {}", self.name())))
    }
}

/// The DIMACS CNF format, with variable names stored in comments.
///
/// ```text
/// c 1 A
/// c 2 B
/// p cnf 2 2
/// 1 -2 0
/// 2 0
/// ```
///
/// Variables without a name comment receive their index as name.
#[derive(Clone, Copy, Debug, Default)]
pub struct DimacsFormat;

impl Format<Cnf> for DimacsFormat {
    fn identifier(&self) -> &str {
        "fokit.io.dimacs"
    }

    fn name(&self) -> &str {
        "DIMACS"
    }

    fn file_extension(&self) -> &str {
        "dimacs"
    }

    fn supports_parse(&self) -> bool {
        true
    }

    fn supports_serialize(&self) -> bool {
        true
    }

    fn parse(&self, input: &mut dyn Read) -> Result<Cnf, FokitError> {
        let mut names: BTreeMap<usize, String> = BTreeMap::new();
        let mut problem: Option<(usize, usize)> = None;
        let mut clauses = vec![];
        let mut current = vec![];

        for (n, line) in BufReader::new(input).lines().enumerate() {
            let line = line?;
            let line = line.trim();
            let error = |message: String| FokitError::Parse { line: n + 1, message };
            if line.is_empty() || line.starts_with('%') {
                continue;
            }
            if line.starts_with('c') {
                if let Some(cap) = RE_VARIABLE.captures(line) {
                    let index: usize = cap[1].parse().map_err(|_| error(format!("invalid index '{}'", &cap[1])))?;
                    if index > 0 {
                        names.insert(index, cap[2].to_string());
                    }
                }
                continue;
            }
            if line.starts_with('p') {
                let cap = RE_PROBLEM
                    .captures(line)
                    .ok_or_else(|| error("malformed problem line".into()))?;
                if problem.is_some() {
                    return Err(error("duplicated problem line".into()));
                }
                let parse = |s: &str| s.parse::<usize>().map_err(|_| error(format!("invalid number '{}'", s)));
                problem = Some((parse(&cap[1])?, parse(&cap[2])?));
                continue;
            }

            let (count, _) = problem.ok_or_else(|| error("clause before the problem line".into()))?;
            for token in line.split_whitespace() {
                let literal: i32 = token
                    .parse()
                    .map_err(|_| error(format!("invalid literal '{}'", token)))?;
                if literal == 0 {
                    clauses.push(LiteralList::new(std::mem::take(&mut current), Order::Natural)?);
                    continue;
                }
                if literal.unsigned_abs() as usize > count {
                    return Err(error(format!("literal {} beyond {} variables", literal, count)));
                }
                current.push(literal);
            }
        }

        let (count, expected) = problem.ok_or(FokitError::Parse {
            line: 0,
            message: "missing problem line".into(),
        })?;
        if !current.is_empty() {
            clauses.push(LiteralList::new(current, Order::Natural)?);
        }
        if clauses.len() != expected {
            debug!("DIMACS header announces {} clauses, found {}", expected, clauses.len());
        }

        if let Some((index, _)) = names.range(count + 1..).next() {
            debug!("Ignoring the names of variables beyond {}, such as {}", count, index);
        }
        let taken: HashSet<&str> = names.values().map(|n| n.as_str()).collect();
        let mut variables = VariableMap::new();
        for index in 1..=count {
            let name = match names.get(&index) {
                Some(name) => name.clone(),
                None => default_name(index, &taken, &variables),
            };
            variables.add_boolean_variable(Some(&name))?;
        }
        Cnf::new(variables, clauses)
    }

    fn serialize(&self, cnf: &Cnf, output: &mut dyn Write) -> Result<(), FokitError> {
        for var in cnf.variables() {
            if let Some(name) = cnf.variables().name(var.index()) {
                writeln!(output, "c {} {}", var.index(), name)?;
            }
        }
        writeln!(output, "p cnf {} {}", cnf.variables().len(), cnf.len())?;
        for clause in cnf.clauses() {
            match clause.is_empty() {
                true => writeln!(output, "0")?,
                false => writeln!(output, "{} 0", clause.iter().join(" "))?,
            }
        }
        Ok(())
    }
}

/// The index of the variable, with a suffix if a variable of the file already uses it
fn default_name(index: usize, taken: &HashSet<&str>, variables: &VariableMap) -> String {
    let mut name = index.to_string();
    let mut suffix = 0;
    while taken.contains(name.as_str()) || variables.contains_name(&name) {
        suffix += 1;
        name = format!("{}_{}", index, suffix);
    }
    name
}

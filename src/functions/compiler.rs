//! # Source Compiler
//!
//! Turns authored function source into the executable text the runtime
//! consumes. Compilation is deterministic and pure: a structural validity
//! check (balanced delimiters, terminated strings and comments) followed by
//! a stable module header. Type-level mistakes are not caught here; anything
//! structurally sound compiles and fails, if at all, at run time.

use super::errors::{FunctionError, FunctionResult};

/// Header prepended to every compiled module
pub const MODULE_HEADER: &str = "\"use strict\";";

/// Compile authored source into executable module text.
///
/// Fails with [`FunctionError::Compile`] on structurally invalid source.
pub fn compile(source: &str) -> FunctionResult<String> {
    check_structure(source)?;

    if source.trim_start().starts_with(MODULE_HEADER) {
        Ok(source.to_string())
    } else {
        Ok(format!("{}\n{}", MODULE_HEADER, source))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    LineComment,
    BlockComment,
    SingleQuote,
    DoubleQuote,
    Template,
}

// Marker pushed on the delimiter stack when a template expression opens.
const TEMPLATE_EXPR: char = '$';

fn check_structure(source: &str) -> FunctionResult<()> {
    let chars: Vec<char> = source.chars().collect();
    let mut modes = vec![Mode::Normal];
    let mut delims: Vec<(char, usize)> = Vec::new();
    let mut line = 1usize;
    let mut i = 0usize;

    while i < chars.len() {
        let c = chars[i];
        let next = chars.get(i + 1).copied();
        if c == '\n' {
            line += 1;
        }

        let mode = *modes.last().unwrap_or(&Mode::Normal);
        match mode {
            Mode::Normal => match c {
                '/' if next == Some('/') => {
                    modes.push(Mode::LineComment);
                    i += 1;
                }
                '/' if next == Some('*') => {
                    modes.push(Mode::BlockComment);
                    i += 1;
                }
                '\'' => modes.push(Mode::SingleQuote),
                '"' => modes.push(Mode::DoubleQuote),
                '`' => modes.push(Mode::Template),
                '(' | '[' | '{' => delims.push((c, line)),
                ')' | ']' | '}' => {
                    if c == '}' && delims.last().map(|(d, _)| *d) == Some(TEMPLATE_EXPR) {
                        delims.pop();
                        modes.pop();
                    } else {
                        let expected = match c {
                            ')' => '(',
                            ']' => '[',
                            _ => '{',
                        };
                        match delims.pop() {
                            Some((open, _)) if open == expected => {}
                            Some((open, open_line)) => {
                                return Err(FunctionError::Compile(format!(
                                    "mismatched '{}' at line {} (opened '{}' at line {})",
                                    c, line, open, open_line
                                )));
                            }
                            None => {
                                return Err(FunctionError::Compile(format!(
                                    "unexpected '{}' at line {}",
                                    c, line
                                )));
                            }
                        }
                    }
                }
                _ => {}
            },
            Mode::LineComment => {
                if c == '\n' {
                    modes.pop();
                }
            }
            Mode::BlockComment => {
                if c == '*' && next == Some('/') {
                    modes.pop();
                    i += 1;
                }
            }
            Mode::SingleQuote | Mode::DoubleQuote => match c {
                '\\' => i += 1,
                '\n' => {
                    return Err(FunctionError::Compile(format!(
                        "unterminated string literal at line {}",
                        line - 1
                    )));
                }
                '\'' if mode == Mode::SingleQuote => {
                    modes.pop();
                }
                '"' if mode == Mode::DoubleQuote => {
                    modes.pop();
                }
                _ => {}
            },
            Mode::Template => match c {
                '\\' => i += 1,
                '`' => {
                    modes.pop();
                }
                '$' if next == Some('{') => {
                    delims.push((TEMPLATE_EXPR, line));
                    modes.push(Mode::Normal);
                    i += 1;
                }
                _ => {}
            },
        }

        i += 1;
    }

    match modes.last() {
        Some(Mode::BlockComment) => {
            return Err(FunctionError::Compile("unterminated block comment".into()));
        }
        Some(Mode::SingleQuote) | Some(Mode::DoubleQuote) | Some(Mode::Template) => {
            return Err(FunctionError::Compile("unterminated string literal".into()));
        }
        _ => {}
    }

    if let Some((open, open_line)) = delims.pop() {
        return Err(FunctionError::Compile(format!(
            "unclosed '{}' opened at line {}",
            open, open_line
        )));
    }

    Ok(())
}

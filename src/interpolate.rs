//! Value interpolation.
//!
//! [`EnvInterpolation`] understands these forms inside a raw value:
//!
//! | Syntax | Meaning |
//! |--------|---------|
//! | `${name}` | environment variable `name`, else option `name` of the same section |
//! | `${section:name}` | option `name` of `section` |
//! | `$NAME` | environment variable, left untouched when unset |
//! | `$$` | a literal `$` |
//!
//! Unqualified references check the environment *before* the section, so
//! `${HOME}` always means the user's home even if the section has a `home`
//! option.
//!
//! Referenced values that contain `$` are resolved recursively in the context
//! of the section they came from. Chains deeper than
//! [`MAX_INTERPOLATION_DEPTH`] fail, which also stops reference cycles.
//!
//! Writing never resolves anything: [`Interpolation::before_write`] returns
//! the raw value, so `${Section:option}` survives a load/save cycle unchanged.

use std::fmt;
use std::sync::Arc;

use crate::document::{Document, normalize_option};
use crate::env::{EnvProvider, ProcessEnv};
use crate::error::IniformError;

pub const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Strategy applied to raw values on read and on write.
pub trait Interpolation: fmt::Debug + Send + Sync {
    /// Turn the raw value of `section`/`option` into the value handed to callers.
    fn before_get(
        &self,
        doc: &Document,
        section: &str,
        option: &str,
        raw: &str,
    ) -> Result<String, IniformError>;

    /// Turn a stored raw value into the text written to the file.
    fn before_write(&self, _doc: &Document, _section: &str, _option: &str, raw: &str) -> String {
        raw.to_string()
    }
}

/// Values are returned exactly as stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterpolation;

impl Interpolation for NoInterpolation {
    fn before_get(
        &self,
        _doc: &Document,
        _section: &str,
        _option: &str,
        raw: &str,
    ) -> Result<String, IniformError> {
        Ok(raw.to_string())
    }
}

/// `${section:option}` references plus environment variables.
#[derive(Debug, Clone)]
pub struct EnvInterpolation {
    env: Arc<dyn EnvProvider>,
    permissive: bool,
}

impl Default for EnvInterpolation {
    fn default() -> Self {
        Self::new()
    }
}

impl EnvInterpolation {
    pub fn new() -> Self {
        Self {
            env: Arc::new(ProcessEnv),
            permissive: false,
        }
    }

    /// In permissive mode unresolvable references are kept verbatim instead
    /// of failing, and a stray `$` is copied through.
    pub fn permissive(mut self, permissive: bool) -> Self {
        self.permissive = permissive;
        self
    }

    /// Use `env` instead of the process environment.
    pub fn with_env(mut self, env: impl EnvProvider + 'static) -> Self {
        self.env = Arc::new(env);
        self
    }

    pub fn is_permissive(&self) -> bool {
        self.permissive
    }

    fn interpolate_some(
        &self,
        doc: &Document,
        scope: Scope<'_>,
        value: &str,
        out: &mut String,
    ) -> Result<(), IniformError> {
        let Scope {
            section,
            option,
            depth,
        } = scope;
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(IniformError::InterpolationDepth {
                option: option.to_string(),
                section: section.to_string(),
                raw: raw_or(doc, section, option, value),
                limit: MAX_INTERPOLATION_DEPTH,
            });
        }

        let mut rest = value;
        while let Some(p) = rest.find('$') {
            out.push_str(&rest[..p]);
            rest = &rest[p..];
            let after = &rest[1..];

            match after.chars().next() {
                Some('$') => {
                    out.push('$');
                    rest = &rest[2..];
                }
                Some('{') => {
                    let Some(close) = after.find('}') else {
                        if self.permissive {
                            out.push_str(rest);
                            return Ok(());
                        }
                        return Err(IniformError::InterpolationSyntax {
                            option: option.to_string(),
                            section: section.to_string(),
                            reason: format!("bad interpolation variable reference {rest:?}"),
                        });
                    };
                    let token = &rest[..close + 2];
                    let reference = &after[1..close];
                    rest = &rest[close + 2..];
                    self.substitute(doc, scope, reference, token, out)?;
                }
                Some(c) if c == '_' || c.is_ascii_alphabetic() => {
                    let len = after
                        .find(|c: char| !(c == '_' || c.is_ascii_alphanumeric()))
                        .unwrap_or(after.len());
                    let name = &after[..len];
                    match self.env.var(name) {
                        Some(v) => out.push_str(&v),
                        None => out.push_str(&rest[..len + 1]),
                    }
                    rest = &rest[len + 1..];
                }
                _ if self.permissive => {
                    out.push('$');
                    rest = &rest[1..];
                }
                _ => {
                    return Err(IniformError::InterpolationSyntax {
                        option: option.to_string(),
                        section: section.to_string(),
                        reason: format!(
                            "'$' must be followed by '$', '{{' or a variable name, found: {rest:?}"
                        ),
                    });
                }
            }
        }
        out.push_str(rest);
        Ok(())
    }

    /// Resolve a single `${reference}` and append the result to `out`.
    fn substitute(
        &self,
        doc: &Document,
        scope: Scope<'_>,
        reference: &str,
        token: &str,
        out: &mut String,
    ) -> Result<(), IniformError> {
        let Scope {
            section,
            option,
            depth,
        } = scope;
        let path: Vec<&str> = reference.split(':').collect();

        let found = match path.as_slice() {
            [name] => match self.env.var(name) {
                Some(v) => Some((section.to_string(), option.to_string(), v)),
                None => {
                    let opt = normalize_option(name);
                    doc.lookup_raw(section, &opt)
                        .map(|v| (section.to_string(), opt, v.to_string()))
                }
            },
            [sect, name] => {
                let opt = normalize_option(name);
                doc.lookup_raw(sect, &opt)
                    .map(|v| (sect.to_string(), opt, v.to_string()))
            }
            _ => {
                return Err(IniformError::InterpolationSyntax {
                    option: option.to_string(),
                    section: section.to_string(),
                    reason: format!("more than one ':' found: {token:?}"),
                });
            }
        };

        let Some((sect, opt, value)) = found else {
            if self.permissive {
                out.push_str(token);
                return Ok(());
            }
            return Err(IniformError::InterpolationMissing {
                option: option.to_string(),
                section: section.to_string(),
                raw: raw_or(doc, section, option, token),
                reference: reference.to_string(),
            });
        };

        if value.contains('$') {
            let inner = Scope {
                section: &sect,
                option: &opt,
                depth: depth + 1,
            };
            self.interpolate_some(doc, inner, &value, out)
        } else {
            out.push_str(&value);
            Ok(())
        }
    }
}

impl Interpolation for EnvInterpolation {
    fn before_get(
        &self,
        doc: &Document,
        section: &str,
        option: &str,
        raw: &str,
    ) -> Result<String, IniformError> {
        let mut out = String::with_capacity(raw.len());
        let scope = Scope {
            section,
            option,
            depth: 1,
        };
        self.interpolate_some(doc, scope, raw, &mut out)?;
        Ok(out)
    }
}

/// The option being resolved and how deep the reference chain is.
#[derive(Debug, Clone, Copy)]
struct Scope<'a> {
    section: &'a str,
    option: &'a str,
    depth: usize,
}

fn raw_or(doc: &Document, section: &str, option: &str, fallback: &str) -> String {
    doc.lookup_raw(section, option)
        .unwrap_or(fallback)
        .to_string()
}

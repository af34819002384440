//! Vendor header check.
//!
//! Reads the `#define`s out of an installed `libbladeRF.h`, evaluates the
//! ones the shim re-exports, and compares them with the pinned table in
//! [`crate::consts`]. The evaluator understands the subset of C constant
//! expressions the bladeRF header uses: integer literals, casts, unary and
//! binary integer operators, `NULL`, and calls of function-like macros.

use std::collections::HashMap;
use std::path::Path;

use crate::channel::{BLADERF_RX, BLADERF_TX};
use crate::consts::{LIBBLADERF_API_VERSION, MACROS, MacroDef};
use crate::error::{Error, Result};

/// Maximum macro expansion depth before giving up (guards against cycles).
const MAX_DEPTH: usize = 32;

/// One `#define` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    pub name: String,
    /// Parameter names for function-like macros
    pub params: Option<Vec<String>>,
    pub body: String,
    /// 1-based line of the `#define`
    pub line: usize,
}

/// All defines found in a header.
#[derive(Debug, Clone, Default)]
pub struct HeaderDefines {
    defines: HashMap<String, Define>,
}

impl HeaderDefines {
    /// Parse header source text.
    ///
    /// Comments are stripped and backslash continuations joined. Only the
    /// first definition of a name is kept, matching the unconditional
    /// branch of the vendor header's `#ifdef` blocks.
    pub fn parse(source: &str) -> Result<Self> {
        let stripped = strip_comments(source);
        let mut defines = HashMap::new();

        let mut logical = String::new();
        let mut start_line = 0;
        for (idx, raw) in stripped.lines().enumerate() {
            if logical.is_empty() {
                start_line = idx + 1;
            }
            if let Some(head) = raw.strip_suffix('\\') {
                logical.push_str(head);
                logical.push(' ');
                continue;
            }
            logical.push_str(raw);

            if let Some(define) = parse_directive(&logical, start_line)? {
                if defines.contains_key(&define.name) {
                    tracing::trace!(
                        "ignoring redefinition of {} at line {}",
                        define.name,
                        define.line
                    );
                } else {
                    defines.insert(define.name.clone(), define);
                }
            }
            logical.clear();
        }

        tracing::debug!("parsed {} defines from header", defines.len());
        Ok(HeaderDefines { defines })
    }

    /// Read and parse a header file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&source)
    }

    /// Number of defines.
    pub fn len(&self) -> usize {
        self.defines.len()
    }

    /// True if the header has no defines at all.
    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    /// True if `name` is defined, object-like or function-like.
    pub fn contains(&self, name: &str) -> bool {
        self.defines.contains_key(name)
    }

    /// The definition of `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Define> {
        self.defines.get(name)
    }

    /// Evaluate an object-like define to an integer.
    ///
    /// The body is macro-expanded as text first, then evaluated with C's
    /// integer types on an LP64 target: an unsuffixed literal that fits is a
    /// 32-bit `int`, so `<<` wraps at 32 bits and `>>` on a negative `int`
    /// sign-extends. The result is the value's bit pattern widened to `i64`.
    pub fn eval(&self, name: &str) -> Result<i64> {
        let define = self
            .defines
            .get(name)
            .ok_or_else(|| Error::MissingMacro(name.to_string()))?;
        if define.params.is_some() {
            return Err(Error::eval(name, "function-like macro needs arguments"));
        }
        let body = tokenize(&define.body).map_err(|msg| Error::eval(name, msg))?;
        let mut active = vec![name.to_string()];
        let tokens = self.expand(name, body, &mut active)?;
        tracing::trace!("{} expands to {:?}", name, tokens);

        let mut parser = Parser {
            name,
            tokens,
            pos: 0,
        };
        let value = parser.expr()?;
        if let Some(tok) = parser.peek() {
            return Err(parser.error(format!("unexpected token {:?}", tok)));
        }
        Ok(value.raw)
    }

    /// `LIBBLADERF_API_VERSION`, if the header defines it.
    pub fn api_version(&self) -> Result<Option<u32>> {
        if !self.contains("LIBBLADERF_API_VERSION") {
            return Ok(None);
        }
        Ok(Some(self.eval("LIBBLADERF_API_VERSION")? as u32))
    }

    /// Substitute macros in `tokens` and rescan each replacement.
    ///
    /// `active` holds the macros being expanded. A name found there is left
    /// as a plain identifier, the way the preprocessor treats self-reference.
    fn expand(
        &self,
        name: &str,
        tokens: Vec<Token>,
        active: &mut Vec<String>,
    ) -> Result<Vec<Token>> {
        if active.len() > MAX_DEPTH {
            return Err(Error::eval(name, "macro expansion too deep"));
        }

        let mut out = Vec::with_capacity(tokens.len());
        let mut rest = tokens.into_iter().peekable();
        while let Some(tok) = rest.next() {
            let ident = match &tok {
                Token::Ident(ident) if !active.contains(ident) => ident.clone(),
                _ => {
                    out.push(tok);
                    continue;
                }
            };
            let Some(define) = self.defines.get(&ident) else {
                out.push(tok);
                continue;
            };

            let body = tokenize(&define.body).map_err(|msg| Error::eval(name, msg))?;
            let replacement = match &define.params {
                None => body,
                // A function-like name without a call stays an identifier
                Some(_) if rest.peek() != Some(&Token::Punct("(")) => {
                    out.push(tok);
                    continue;
                }
                Some(params) => {
                    rest.next();
                    let args = arguments(&mut rest).map_err(|msg| Error::eval(name, msg))?;
                    if args.len() != params.len() {
                        return Err(Error::eval(
                            name,
                            format!(
                                "{} expects {} arguments, got {}",
                                ident,
                                params.len(),
                                args.len()
                            ),
                        ));
                    }
                    substitute(body, params, &args)
                }
            };

            active.push(ident);
            let expanded = self.expand(name, replacement, active);
            active.pop();
            out.extend(expanded?);
        }
        Ok(out)
    }
}

/// Outcome of comparing a header with the pinned table.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// `LIBBLADERF_API_VERSION` of the checked header
    pub header_version: Option<u32>,
    pub matched: Vec<&'static MacroDef>,
    pub missing: Vec<&'static MacroDef>,
    /// Rows whose header value differs, with the header's bit pattern
    pub drifted: Vec<(&'static MacroDef, u64)>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.drifted.is_empty()
    }

    pub fn version_matches(&self) -> bool {
        self.header_version == Some(LIBBLADERF_API_VERSION)
    }

    /// Fail on the first drifted or missing macro.
    pub fn ensure_clean(&self) -> Result<()> {
        if let Some((def, found)) = self.drifted.first() {
            return Err(Error::Drift {
                name: def.macro_name.to_string(),
                expected: def.value,
                found: *found,
            });
        }
        if let Some(def) = self.missing.first() {
            return Err(Error::MissingMacro(def.macro_name.to_string()));
        }
        Ok(())
    }
}

/// Compare every pinned macro against a parsed header.
pub fn verify(defines: &HeaderDefines) -> Result<Report> {
    let mut report = Report {
        header_version: defines.api_version()?,
        ..Default::default()
    };

    if !report.version_matches() {
        tracing::warn!(
            "header API version {:?} differs from pinned {:#010x}",
            report.header_version,
            LIBBLADERF_API_VERSION
        );
    }

    for def in MACROS {
        if !defines.contains(def.macro_name) {
            tracing::warn!("{} missing from header", def.macro_name);
            report.missing.push(def);
            continue;
        }
        let evaluated = defines.eval(def.macro_name)?;
        let found = def.ty.truncate(evaluated);
        if def.matches(evaluated) {
            tracing::debug!("{} = {:#x} ok", def.macro_name, found);
            report.matched.push(def);
        } else {
            tracing::warn!(
                "{} drifted: pinned {:#x}, header {:#x}",
                def.macro_name,
                def.value,
                found
            );
            report.drifted.push((def, found));
        }
    }

    tracing::info!(
        "checked {} macros: {} matched, {} missing, {} drifted",
        MACROS.len(),
        report.matched.len(),
        report.missing.len(),
        report.drifted.len()
    );
    Ok(report)
}

/// Parse and verify a header file in one step.
pub fn verify_file<P: AsRef<Path>>(path: P) -> Result<Report> {
    verify(&HeaderDefines::from_file(path)?)
}

/// Replace comments with spaces, keeping newlines so line numbers survive.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' | '\n' => in_string = false,
                _ => {}
            }
            continue;
        }
        let next = chars.peek().copied();
        match (c, next) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = ' ';
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                    }
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }
    out
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_ident_char(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

fn parse_directive(line: &str, line_no: usize) -> Result<Option<Define>> {
    let Some(rest) = line.trim_start().strip_prefix('#') else {
        return Ok(None);
    };
    let rest = rest.trim_start();
    let Some(rest) = rest.strip_prefix("define") else {
        return Ok(None);
    };
    if !rest.starts_with(|c: char| c.is_whitespace()) {
        return Ok(None);
    }
    let rest = rest.trim_start();

    let name_len = rest
        .char_indices()
        .find(|&(i, c)| if i == 0 { !is_ident_start(c) } else { !is_ident_char(c) })
        .map_or(rest.len(), |(i, _)| i);
    if name_len == 0 {
        return Err(Error::parse(line_no, "#define without a macro name"));
    }
    let name = rest[..name_len].to_string();
    let after = &rest[name_len..];

    // Function-like only when '(' follows the name with no whitespace
    let (params, body) = match after.strip_prefix('(') {
        Some(inner) => {
            let close = inner.find(')').ok_or_else(|| {
                Error::parse(line_no, format!("unterminated parameter list for {}", name))
            })?;
            let params = inner[..close]
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            (Some(params), inner[close + 1..].trim())
        }
        None => (None, after.trim()),
    };

    Ok(Some(Define {
        name,
        params,
        body: body.to_string(),
        line: line_no,
    }))
}

/// C integer type of a constant-expression value on an LP64 target.
///
/// Narrower types never appear: they promote to `Int` as soon as they are
/// produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CType {
    Int,
    UInt,
    Long,
    ULong,
}

impl CType {
    fn bits(self) -> u32 {
        match self {
            CType::Int | CType::UInt => 32,
            CType::Long | CType::ULong => 64,
        }
    }

    fn is_unsigned(self) -> bool {
        matches!(self, CType::UInt | CType::ULong)
    }

    fn max(self) -> u64 {
        match self {
            CType::Int => i32::MAX as u64,
            CType::UInt => u32::MAX as u64,
            CType::Long => i64::MAX as u64,
            CType::ULong => u64::MAX,
        }
    }

    /// Usual arithmetic conversions.
    fn common(self, other: CType) -> CType {
        if self.bits() == 64 || other.bits() == 64 {
            // long holds every unsigned int, so only unsigned long wins over it
            if self == CType::ULong || other == CType::ULong {
                CType::ULong
            } else {
                CType::Long
            }
        } else if self.is_unsigned() || other.is_unsigned() {
            CType::UInt
        } else {
            CType::Int
        }
    }
}

/// Bit pattern of a value, normalized to its type's width, plus the type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Value {
    raw: i64,
    ty: CType,
}

impl Value {
    fn new(raw: i64, ty: CType) -> Self {
        let raw = match ty {
            CType::Int => raw as i32 as i64,
            CType::UInt => raw as u32 as i64,
            CType::Long | CType::ULong => raw,
        };
        Value { raw, ty }
    }

    fn int(raw: i64) -> Self {
        Value::new(raw, CType::Int)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Num(Value),
    Ident(String),
    Punct(&'static str),
}

const PUNCTS: &[&str] = &[
    "<<", ">>", "(", ")", ",", "+", "-", "*", "/", "%", "&", "^", "|", "~", "!",
];

fn tokenize(body: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let bytes = body.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() {
            let start = i;
            while i < bytes.len() && (bytes[i] as char).is_ascii_alphanumeric() {
                i += 1;
            }
            tokens.push(Token::Num(parse_int(&body[start..i])?));
        } else if is_ident_start(c) {
            let start = i;
            while i < bytes.len() && is_ident_char(bytes[i] as char) {
                i += 1;
            }
            tokens.push(Token::Ident(body[start..i].to_string()));
        } else if c == '\'' {
            // Plain character literal such as 'T'
            match (bytes.get(i + 1), bytes.get(i + 2)) {
                (Some(&ch), Some(&b'\'')) if ch != b'\\' => {
                    tokens.push(Token::Num(Value::int(ch as i64)));
                    i += 3;
                }
                _ => return Err(format!("unsupported character literal in `{}`", body)),
            }
        } else if let Some(p) = PUNCTS.iter().find(|p| body[i..].starts_with(**p)) {
            tokens.push(Token::Punct(*p));
            i += p.len();
        } else {
            return Err(format!("unexpected character {:?}", c));
        }
    }
    Ok(tokens)
}

/// Parse an integer literal and give it the first C type that holds it.
fn parse_int(literal: &str) -> std::result::Result<Value, String> {
    let digits = literal.trim_end_matches(['u', 'U', 'l', 'L']);
    let suffix = literal[digits.len()..].to_ascii_lowercase();
    let (parsed, decimal) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (u64::from_str_radix(hex, 16), false)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (u64::from_str_radix(&digits[1..], 8), false)
    } else {
        (digits.parse::<u64>(), true)
    };
    let value = parsed.map_err(|_| format!("invalid integer literal {}", literal))?;

    let candidates: &[CType] = match (suffix.contains('u'), suffix.contains('l')) {
        (false, false) if decimal => &[CType::Int, CType::Long, CType::ULong],
        (false, false) => &[CType::Int, CType::UInt, CType::Long, CType::ULong],
        (true, false) => &[CType::UInt, CType::ULong],
        (false, true) => &[CType::Long, CType::ULong],
        (true, true) => &[CType::ULong],
    };
    let ty = candidates
        .iter()
        .copied()
        .find(|ty| value <= ty.max())
        .unwrap_or(CType::ULong);
    Ok(Value::new(value as i64, ty))
}

/// Raw token lists of a call's arguments, consuming the closing `)`.
fn arguments<I>(tokens: &mut I) -> std::result::Result<Vec<Vec<Token>>, String>
where
    I: Iterator<Item = Token>,
{
    let mut args = Vec::new();
    let mut current = Vec::new();
    let mut nesting = 0usize;
    loop {
        let tok = tokens.next().ok_or("unterminated macro call")?;
        match tok {
            Token::Punct(")") if nesting == 0 => {
                if !current.is_empty() || !args.is_empty() {
                    args.push(current);
                }
                return Ok(args);
            }
            Token::Punct(",") if nesting == 0 => args.push(std::mem::take(&mut current)),
            Token::Punct("(") => {
                nesting += 1;
                current.push(tok);
            }
            Token::Punct(")") => {
                nesting -= 1;
                current.push(tok);
            }
            _ => current.push(tok),
        }
    }
}

/// Put each argument's tokens, unparenthesized, where its parameter appears.
fn substitute(body: Vec<Token>, params: &[String], args: &[Vec<Token>]) -> Vec<Token> {
    let mut out = Vec::with_capacity(body.len());
    for tok in body {
        match &tok {
            Token::Ident(id) => match params.iter().position(|p| p == id) {
                Some(idx) => out.extend(args[idx].iter().cloned()),
                None => out.push(tok),
            },
            _ => out.push(tok),
        }
    }
    out
}

/// Integer conversion applied by a cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cast {
    U8,
    I8,
    U16,
    I16,
    /// Conversion to an `int`-sized or wider type, pointers included
    To(CType),
}

impl Cast {
    fn from_words(words: &[String], pointer: bool) -> Option<Self> {
        if pointer {
            return Some(Cast::To(CType::ULong));
        }
        let ty = words
            .iter()
            .map(String::as_str)
            .filter(|w| *w != "const")
            .collect::<Vec<_>>()
            .join(" ");
        let cast = match ty.as_str() {
            "uint8_t" | "unsigned char" => Cast::U8,
            "int8_t" | "char" | "signed char" => Cast::I8,
            "uint16_t" => Cast::U16,
            "int16_t" => Cast::I16,
            "uint32_t" | "unsigned" | "unsigned int" => Cast::To(CType::UInt),
            "int32_t" | "int" | "signed" | "signed int" | "bladerf_channel" => {
                Cast::To(CType::Int)
            }
            "int64_t" | "long" | "long int" | "long long" => Cast::To(CType::Long),
            "uint64_t" | "bladerf_timestamp" | "size_t" | "unsigned long"
            | "unsigned long long" => Cast::To(CType::ULong),
            _ => return None,
        };
        Some(cast)
    }

    /// Narrow types promote straight back to `int`.
    fn apply(self, v: Value) -> Value {
        match self {
            Cast::U8 => Value::int(v.raw as u8 as i64),
            Cast::I8 => Value::int(v.raw as i8 as i64),
            Cast::U16 => Value::int(v.raw as u16 as i64),
            Cast::I16 => Value::int(v.raw as i16 as i64),
            Cast::To(ty) => Value::new(v.raw, ty),
        }
    }
}

const TYPE_WORDS: &[&str] = &[
    "const",
    "unsigned",
    "signed",
    "char",
    "int",
    "long",
    "void",
    "size_t",
    "uint8_t",
    "int8_t",
    "uint16_t",
    "int16_t",
    "uint32_t",
    "int32_t",
    "uint64_t",
    "int64_t",
    "bladerf_channel",
    "bladerf_timestamp",
];

/// Values of enumerators the header's macros refer to.
fn enumerator(name: &str) -> Option<i64> {
    match name {
        "NULL" => Some(0),
        "BLADERF_RX" => Some(BLADERF_RX as i64),
        "BLADERF_TX" => Some(BLADERF_TX as i64),
        _ => None,
    }
}

/// Evaluator over a fully macro-expanded token list.
struct Parser<'a> {
    name: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn error<S: Into<String>>(&self, msg: S) -> Error {
        Error::eval(self.name, msg)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, punct: &str) -> bool {
        if matches!(self.peek(), Some(Token::Punct(p)) if *p == punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: &str) -> Result<()> {
        if self.eat(punct) {
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", punct)))
        }
    }

    fn expr(&mut self) -> Result<Value> {
        self.binary(0)
    }

    /// Precedence climbing over C's binary operators, loosest first.
    fn binary(&mut self, level: usize) -> Result<Value> {
        const LEVELS: &[&[&str]] = &[
            &["|"],
            &["^"],
            &["&"],
            &["<<", ">>"],
            &["+", "-"],
            &["*", "/", "%"],
        ];

        if level == LEVELS.len() {
            return self.unary();
        }
        let mut lhs = self.binary(level + 1)?;
        loop {
            let Some(&op) = LEVELS[level]
                .iter()
                .find(|op| matches!(self.peek(), Some(Token::Punct(p)) if p == *op))
            else {
                return Ok(lhs);
            };
            self.pos += 1;
            let rhs = self.binary(level + 1)?;
            lhs = self.apply(op, lhs, rhs)?;
        }
    }

    fn apply(&self, op: &str, lhs: Value, rhs: Value) -> Result<Value> {
        if op == "<<" || op == ">>" {
            return self.shift(op, lhs, rhs);
        }
        let ty = lhs.ty.common(rhs.ty);
        let a = Value::new(lhs.raw, ty).raw;
        let b = Value::new(rhs.raw, ty).raw;
        let raw = match op {
            "|" => a | b,
            "^" => a ^ b,
            "&" => a & b,
            "+" => a.wrapping_add(b),
            "-" => a.wrapping_sub(b),
            "*" => a.wrapping_mul(b),
            "/" | "%" if b == 0 => return Err(self.error("division by zero")),
            "/" if ty.is_unsigned() => ((a as u64) / (b as u64)) as i64,
            "%" if ty.is_unsigned() => ((a as u64) % (b as u64)) as i64,
            "/" => a.wrapping_div(b),
            "%" => a.wrapping_rem(b),
            other => return Err(self.error(format!("unknown operator {}", other))),
        };
        Ok(Value::new(raw, ty))
    }

    /// The result has the left operand's type; the amount must be below its width.
    fn shift(&self, op: &str, lhs: Value, rhs: Value) -> Result<Value> {
        let amount = u32::try_from(rhs.raw)
            .ok()
            .filter(|s| *s < lhs.ty.bits())
            .ok_or_else(|| self.error(format!("shift amount {} out of range", rhs.raw)))?;
        let raw = match op {
            "<<" => lhs.raw.wrapping_shl(amount),
            _ if lhs.ty.is_unsigned() => ((lhs.raw as u64) >> amount) as i64,
            _ => lhs.raw >> amount,
        };
        Ok(Value::new(raw, lhs.ty))
    }

    fn unary(&mut self) -> Result<Value> {
        if self.eat("-") {
            let v = self.unary()?;
            return Ok(Value::new(v.raw.wrapping_neg(), v.ty));
        }
        if self.eat("+") {
            return self.unary();
        }
        if self.eat("~") {
            let v = self.unary()?;
            return Ok(Value::new(!v.raw, v.ty));
        }
        if self.eat("!") {
            return Ok(Value::int((self.unary()?.raw == 0) as i64));
        }
        if let Some(cast) = self.cast()? {
            return Ok(cast.apply(self.unary()?));
        }
        self.primary()
    }

    /// Consume `( type-name )` if present and return its conversion.
    fn cast(&mut self) -> Result<Option<Cast>> {
        if !matches!(self.peek(), Some(Token::Punct("("))) {
            return Ok(None);
        }
        let mut words = Vec::new();
        let mut pointer = false;
        let mut i = self.pos + 1;
        loop {
            match self.tokens.get(i) {
                Some(Token::Ident(w)) if !pointer && TYPE_WORDS.contains(&w.as_str()) => {
                    words.push(w.clone())
                }
                Some(Token::Punct("*")) if !words.is_empty() => pointer = true,
                Some(Token::Punct(")")) if !words.is_empty() => break,
                _ => return Ok(None),
            }
            i += 1;
        }
        let cast = Cast::from_words(&words, pointer)
            .ok_or_else(|| self.error(format!("unsupported cast to {}", words.join(" "))))?;
        self.pos = i + 1;
        Ok(Some(cast))
    }

    fn primary(&mut self) -> Result<Value> {
        match self.peek().cloned() {
            Some(Token::Num(v)) => {
                self.pos += 1;
                Ok(v)
            }
            Some(Token::Punct("(")) => {
                self.pos += 1;
                let v = self.expr()?;
                self.expect(")")?;
                Ok(v)
            }
            Some(Token::Ident(ident)) => {
                self.pos += 1;
                enumerator(&ident)
                    .map(Value::int)
                    .ok_or_else(|| self.error(format!("unknown identifier {}", ident)))
            }
            Some(tok) => Err(self.error(format!("unexpected token {:?}", tok))),
            None => Err(self.error("unexpected end of expression")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defines(src: &str) -> HeaderDefines {
        HeaderDefines::parse(src).expect("parse")
    }

    #[test]
    fn test_object_and_function_like() {
        let h = defines(
            "#define A (1 << 3)\n#define F(x, y) ((x) + (y))\n#define B F(A, 2)\n",
        );
        assert_eq!(h.len(), 3);
        assert_eq!(h.get("F").unwrap().params, Some(vec!["x".to_string(), "y".to_string()]));
        assert_eq!(h.eval("A").unwrap(), 8);
        assert_eq!(h.eval("B").unwrap(), 10);
        assert!(h.eval("F").is_err());
    }

    #[test]
    fn test_space_before_paren_is_object_like() {
        let h = defines("#define X (2)\n");
        assert_eq!(h.get("X").unwrap().params, None);
        assert_eq!(h.eval("X").unwrap(), 2);
    }

    #[test]
    fn test_comments_and_continuations() {
        let h = defines(concat!(
            "/* block\n comment */\n",
            "#define A \\\n    (0x10 | /* inline */ 0x01) // trailing\n",
            "#define B 3\n",
        ));
        assert_eq!(h.eval("A").unwrap(), 0x11);
        assert_eq!(h.get("A").unwrap().line, 3);
        assert_eq!(h.get("B").unwrap().line, 5);
    }

    #[test]
    fn test_first_definition_wins() {
        let h = defines("#define A 1\n#define A 2\n");
        assert_eq!(h.eval("A").unwrap(), 1);
    }

    #[test]
    fn test_casts() {
        let h = defines(concat!(
            "#define U8 ((uint8_t)(0x1ff))\n",
            "#define I ((int)0xffffffff)\n",
            "#define P ((void *)(-1))\n",
            "#define N (NULL)\n",
        ));
        assert_eq!(h.eval("U8").unwrap(), 0xff);
        assert_eq!(h.eval("I").unwrap(), -1);
        assert_eq!(h.eval("P").unwrap(), -1);
        assert_eq!(h.eval("N").unwrap(), 0);
    }

    #[test]
    fn test_literals() {
        let h = defines("#define H 0x02050000UL\n#define O 010\n#define C 'T'\n#define Z 0\n");
        assert_eq!(h.eval("H").unwrap(), 0x0205_0000);
        assert_eq!(h.eval("O").unwrap(), 8);
        assert_eq!(h.eval("C").unwrap(), 'T' as i64);
        assert_eq!(h.eval("Z").unwrap(), 0);
    }

    #[test]
    fn test_precedence() {
        let h = defines(concat!(
            "#define A (1 | 2 << 2 & 0xf)\n",
            "#define B (-2 + 3 * 4)\n",
            "#define C (~0 ^ 1)\n",
        ));
        assert_eq!(h.eval("A").unwrap(), 1 | ((2 << 2) & 0xf));
        assert_eq!(h.eval("B").unwrap(), 10);
        assert_eq!(h.eval("C").unwrap(), !0 ^ 1);
    }

    #[test]
    fn test_enumerator_reference() {
        let h = defines("#define IS_TX(ch) (ch & BLADERF_TX)\n#define T IS_TX(3)\n");
        assert_eq!(h.eval("T").unwrap(), 1);
    }

    #[test]
    fn test_cycle_is_error() {
        let h = defines("#define A B\n#define B A\n");
        assert!(matches!(h.eval("A"), Err(Error::Eval { .. })));
    }

    #[test]
    fn test_unknown_identifier() {
        let h = defines("#define A (FOO + 1)\n");
        let err = h.eval("A").unwrap_err();
        assert!(err.to_string().contains("unknown identifier FOO"));
    }

    #[test]
    fn test_bad_shift_and_division() {
        let h = defines("#define S (1 << 70)\n#define W (1 << 32)\n#define D (1 / 0)\n");
        assert!(h.eval("S").is_err());
        assert!(h.eval("W").is_err());
        assert!(h.eval("D").is_err());
    }

    #[test]
    fn test_object_macro_substituted_as_text() {
        let h = defines("#define BASE 1 + 2\n#define X (BASE * 3)\n");
        assert_eq!(h.eval("X").unwrap(), 7);
    }

    #[test]
    fn test_function_macro_arguments_not_parenthesized() {
        let h = defines("#define SQ(x) (x * x)\n#define Y SQ(1 + 1)\n");
        assert_eq!(h.eval("Y").unwrap(), 3);
    }

    #[test]
    fn test_int_width_shift() {
        let h = defines(concat!(
            "#define M ((uint32_t)((1 << 31) >> 31))\n",
            "#define N ((1 << 31) >> 31)\n",
            "#define U (0x80000000 >> 31)\n",
            "#define L (1UL << 40)\n",
        ));
        assert_eq!(h.eval("M").unwrap(), 0xffff_ffff);
        assert_eq!(h.eval("N").unwrap(), -1);
        assert_eq!(h.eval("U").unwrap(), 1);
        assert_eq!(h.eval("L").unwrap(), 1 << 40);
    }

    #[test]
    fn test_mixed_signedness_converts_to_unsigned() {
        let h = defines("#define A (-1 + 0u)\n#define B (-2 / 2u)\n");
        assert_eq!(h.eval("A").unwrap(), 0xffff_ffff);
        assert_eq!(h.eval("B").unwrap(), 0x7fff_ffff);
    }

    #[test]
    fn test_self_reference_left_unexpanded() {
        let h = defines("#define A (A + 1)\n");
        let err = h.eval("A").unwrap_err();
        assert!(err.to_string().contains("unknown identifier A"));
    }

    #[test]
    fn test_missing_name_is_parse_error() {
        let err = HeaderDefines::parse("int x;\n#define \n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn test_non_define_directives_ignored() {
        let h = defines("#include <stdint.h>\n#ifdef __cplusplus\n#endif\n#defined X\n");
        assert!(h.is_empty());
    }

    #[test]
    fn test_report_clean() {
        let report = Report::default();
        assert!(report.is_clean());
        assert!(report.ensure_clean().is_ok());
        assert!(!report.version_matches());
    }
}

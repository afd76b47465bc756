use std::borrow::Cow;
use std::fmt::Display;

use crate::error::ParseError;

mod lexer;
mod parser;

/// A node of an s-expression tree.
///
/// Parsed trees borrow from their input where they can; strings that needed
/// unescaping, and trees built for export, own their text.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum SExpr<'a> {
    SExpr(&'a str, Box<[SExpr<'a>]>),
    String(Cow<'a, str>),
}

const INDENT: &str = "  ";

fn write_quoted(f: &mut impl std::fmt::Write, s: &str) -> std::fmt::Result {
    f.write_char('"')?;
    for c in s.chars() {
        match c {
            '"' | '\\' => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            '\n' => f.write_str("\\n")?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}

impl<'a> Display for SExpr<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SExpr::SExpr(label, children) => {
                write!(f, "({}", label)?;
                for child in children.iter() {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
            SExpr::String(s) => write_quoted(f, s),
        }
    }
}

impl<'a> SExpr<'a> {
    pub fn list(label: &'a str, children: impl IntoIterator<Item = SExpr<'a>>) -> Self {
        SExpr::SExpr(label, children.into_iter().collect())
    }

    pub fn string(s: impl Into<Cow<'a, str>>) -> Self {
        SExpr::String(s.into())
    }

    /// A `(label "value")` pair
    pub fn pair(label: &'a str, value: impl Into<Cow<'a, str>>) -> Self {
        SExpr::list(label, [SExpr::string(value)])
    }

    pub fn label(&self) -> Option<&'a str> {
        match self {
            SExpr::SExpr(label, _) => Some(*label),
            SExpr::String(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SExpr::String(s) => Some(s),
            SExpr::SExpr(_, _) => None,
        }
    }

    /// First string child of the first child labelled `label`
    pub fn value(&self, label: &str) -> Result<&str, ParseError> {
        self.child(label)?
            .first_string()
            .ok_or(ParseError::MissingValue())
    }

    pub fn optional_value(&self, label: &str) -> Result<Option<&str>, ParseError> {
        match self.children(label).next() {
            None => Ok(None),
            Some(child) => child
                .first_string()
                .map(Some)
                .ok_or(ParseError::MissingValue()),
        }
    }

    pub fn first_string(&self) -> Option<&str> {
        match self {
            SExpr::SExpr(_, children) => children.first().and_then(SExpr::as_str),
            SExpr::String(_) => None,
        }
    }

    pub fn children<'b, 'c>(&'b self, label: &'c str) -> LabeledChildIterator<'a, 'b, 'c> {
        let iter = match self {
            SExpr::String(_) => None,
            SExpr::SExpr(_, children) => Some(children.iter()),
        };
        LabeledChildIterator { iter, label }
    }

    pub fn child<'b>(&self, label: &'b str) -> Result<&SExpr<'a>, ParseError> {
        let mut iter = self.children(label);
        iter.next()
            .ok_or(ParseError::MissingChild(label.to_owned()))
    }

    fn depth(&self) -> usize {
        match self {
            SExpr::String(_) => 0,
            SExpr::SExpr(_, children) => {
                1 + children.iter().map(SExpr::depth).max().unwrap_or(0)
            }
        }
    }

    /// Writes the tree over several lines, two spaces per level.
    ///
    /// Lists nested at most two deep stay on one line. Deeper lists keep
    /// their leading atoms and flat lists on the opening line and put
    /// every later child on its own line.
    pub fn write_pretty(&self, out: &mut impl std::fmt::Write) -> std::fmt::Result {
        self.write_pretty_at(out, 0)?;
        out.write_char('\n')
    }

    fn write_pretty_at(&self, out: &mut impl std::fmt::Write, level: usize) -> std::fmt::Result {
        let SExpr::SExpr(label, children) = self else {
            return write!(out, "{}", self);
        };
        if self.depth() <= 2 {
            return write!(out, "{}", self);
        }
        write!(out, "({}", label)?;
        let mut broken = false;
        for child in children.iter() {
            if !broken && child.depth() <= 1 {
                write!(out, " {}", child)?;
                continue;
            }
            broken = true;
            out.write_char('\n')?;
            for _ in 0..=level {
                out.write_str(INDENT)?;
            }
            child.write_pretty_at(out, level + 1)?;
        }
        out.write_char(')')
    }

    pub fn to_pretty_string(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_pretty(&mut out);
        out
    }
}

#[derive(Debug)]
pub struct LabeledChildIterator<'a, 'b, 'c> {
    iter: Option<std::slice::Iter<'b, SExpr<'a>>>,
    label: &'c str,
}

impl<'a, 'b, 'c> Iterator for LabeledChildIterator<'a, 'b, 'c> {
    type Item = &'b SExpr<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let iter = self.iter.as_mut()?;
        loop {
            let item = iter.next();
            match &item {
                None => return None,
                Some(SExpr::String(_)) => continue,
                Some(SExpr::SExpr(label, _)) => {
                    if *label == self.label {
                        return item;
                    }
                }
            }
        }
    }
}

impl<'a> TryFrom<&'a String> for SExpr<'a> {
    type Error = ParseError;

    fn try_from(input: &'a String) -> Result<Self, Self::Error> {
        SExpr::try_from(input.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_data {
        ($fname:expr) => {
            std::fs::read_to_string(concat!(
                env!("CARGO_MANIFEST_DIR"),
                "/resources/test/",
                $fname
            ))
            .unwrap()
        };
    }

    #[test]
    fn sexpr_can_parse_full_file() {
        let i = &test_data!("adapter.net");
        let root = SExpr::try_from(i).unwrap();
        assert_eq!(root.label(), Some("export"));
    }

    #[test]
    fn sexpr_children_by_name_works() {
        let root = SExpr::try_from(r#"(a (b "1") (c "2") (b "3"))"#).unwrap();

        let mut iter = root.children("b");
        assert!(iter.next().is_some());
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert_eq!(root.value("c"), Ok("2"));
        assert_eq!(root.optional_value("d"), Ok(None));
        assert_eq!(
            root.child("d"),
            Err(ParseError::MissingChild("d".to_owned()))
        );
    }

    #[test]
    fn display_escapes_quotes() {
        let sexpr = SExpr::pair("name", r#"a "b" \c"#);
        assert_eq!(sexpr.to_string(), r#"(name "a \"b\" \\c")"#);
    }

    #[test]
    fn pretty_printer_keeps_shallow_lists_inline() {
        let tree = SExpr::list(
            "export",
            [
                SExpr::pair("version", "D"),
                SExpr::list(
                    "nets",
                    [SExpr::list(
                        "net",
                        [
                            SExpr::pair("code", "1"),
                            SExpr::pair("name", "GND"),
                            SExpr::list(
                                "node",
                                [SExpr::pair("ref", "R1"), SExpr::pair("pin", "2")],
                            ),
                        ],
                    )],
                ),
            ],
        );
        let expected = "(export (version \"D\")\n  (nets\n    (net (code \"1\") (name \"GND\")\n      (node (ref \"R1\") (pin \"2\")))))\n";
        assert_eq!(tree.to_pretty_string(), expected);
    }

    #[test]
    fn pretty_output_parses_back_to_the_same_tree() {
        let i = &test_data!("adapter.net");
        let root = SExpr::try_from(i).unwrap();
        let pretty = root.to_pretty_string();
        assert_eq!(SExpr::try_from(pretty.as_str()).unwrap(), root);
    }
}

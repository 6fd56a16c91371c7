//! Recursive-descent parser from a query string to an [`Evaluator`].
//!
//! A query is a run of simple selectors joined by combinators. Simple
//! selectors written together (`div.a[href]`) collect into an `And`; each
//! combinator wraps everything parsed so far as the left-hand side of a
//! structural evaluator, and the sub-query up to the next combinator as the
//! right-hand side.
//!
//! [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping): the
//! comma binds loosest. When the left-hand side is already an `Or`, the other
//! combinators apply to its last branch only, so `a, b c` reads as
//! `a, (b c)`.

use log::trace;
use regex::Regex;

use crate::error::SelectorParseError;
use crate::evaluator::{Evaluator, Nth};
use crate::token_queue::TokenQueue;

/// Characters that separate compound selectors.
const COMBINATORS: [char; 5] = [',', '>', '+', '~', ' '];

/// Attribute operators that end an attribute key.
const ATTRIBUTE_EVALS: [&str; 6] = ["=", "!=", "^=", "$=", "*=", "~="];

/// Parser state for one query (or sub-query).
pub struct QueryParser {
    tq: TokenQueue,
    query: String,
    evals: Vec<Evaluator>,
}

impl QueryParser {
    fn new(query: &str) -> Self {
        let query = query.trim();
        Self {
            tq: TokenQueue::new(query),
            query: query.to_string(),
            evals: Vec::new(),
        }
    }

    /// Parse a selector query.
    ///
    /// # Errors
    ///
    /// Returns a [`SelectorParseError`] describing the first part of the
    /// query that could not be read.
    pub fn parse(query: &str) -> Result<Evaluator, SelectorParseError> {
        let evaluator = Self::new(query).parse_query()?;
        trace!(target: "wren::select", "parsed '{query}' as '{evaluator}'");
        Ok(evaluator)
    }

    fn parse_query(mut self) -> Result<Evaluator, SelectorParseError> {
        let _ = self.tq.consume_whitespace();
        if self.tq.is_empty() {
            return Err(SelectorParseError::Empty);
        }

        if self.tq.matches_any_char(&COMBINATORS) {
            // A leading combinator applies to the query root: "> p".
            self.evals.push(Evaluator::Root);
            let combinator = self.consume_combinator();
            self.combinator(combinator)?;
        } else {
            self.find_elements()?;
        }

        while !self.tq.is_empty() {
            let seen_white = self.tq.consume_whitespace();
            if self.tq.matches_any_char(&COMBINATORS) {
                let combinator = self.consume_combinator();
                self.combinator(combinator)?;
            } else if seen_white {
                self.combinator(' ')?;
            } else {
                self.find_elements()?;
            }
        }

        if self.evals.len() == 1 {
            Ok(self.evals.remove(0))
        } else {
            Ok(Evaluator::And(self.evals))
        }
    }

    fn consume_combinator(&mut self) -> char {
        self.tq.consume().unwrap_or(' ')
    }

    // ===== Combinators =====

    /// Apply `combinator` between everything parsed so far and the next
    /// sub-query.
    fn combinator(&mut self, combinator: char) -> Result<(), SelectorParseError> {
        let _ = self.tq.consume_whitespace();
        let sub_query = self.consume_sub_query()?;
        let new_eval = Self::parse(&sub_query)?;

        // STEP 1: Take the left-hand side. If it is an Or and this is not
        //         another comma, only its last branch is combined.
        let left = if self.evals.len() == 1 {
            self.evals.remove(0)
        } else {
            Evaluator::And(std::mem::take(&mut self.evals))
        };
        let (enclosing_or, current) = if matches!(left, Evaluator::Or(_)) && combinator != ',' {
            let right_most = left.right_most().clone();
            (Some(left), right_most)
        } else {
            (None, left)
        };

        // STEP 2: Combine it with the right-hand side.
        let combined = match combinator {
            '>' => Evaluator::And(vec![new_eval, Evaluator::ImmediateParent(Box::new(current))]),
            ' ' => Evaluator::And(vec![new_eval, Evaluator::Parent(Box::new(current))]),
            '+' => Evaluator::And(vec![
                new_eval,
                Evaluator::ImmediatePreviousSibling(Box::new(current)),
            ]),
            '~' => Evaluator::And(vec![new_eval, Evaluator::PreviousSibling(Box::new(current))]),
            ',' => match current {
                Evaluator::Or(mut branches) => {
                    branches.push(new_eval);
                    Evaluator::Or(branches)
                }
                other => Evaluator::Or(vec![other, new_eval]),
            },
            other => {
                return Err(SelectorParseError::UnexpectedToken {
                    query: self.query.clone(),
                    remainder: other.to_string(),
                });
            }
        };

        // STEP 3: Put the result back where the left-hand side was.
        let result = match enclosing_or {
            Some(mut or) => {
                or.replace_right_most(combined);
                or
            }
            None => combined,
        };
        self.evals.push(result);
        Ok(())
    }

    /// Consume up to the next combinator outside any `(...)` or `[...]`.
    fn consume_sub_query(&mut self) -> Result<String, SelectorParseError> {
        let mut sub_query = String::new();
        while !self.tq.is_empty() {
            if self.tq.matches("(") {
                sub_query.push('(');
                sub_query.push_str(&self.tq.chomp_balanced('(', ')')?);
                sub_query.push(')');
            } else if self.tq.matches("[") {
                sub_query.push('[');
                sub_query.push_str(&self.tq.chomp_balanced('[', ']')?);
                sub_query.push(']');
            } else if self.tq.matches_any_char(&COMBINATORS) {
                break;
            } else if let Some(c) = self.tq.consume() {
                sub_query.push(c);
            }
        }
        if sub_query.is_empty() {
            return Err(SelectorParseError::Empty);
        }
        Ok(sub_query)
    }

    // ===== Simple selectors =====

    fn find_elements(&mut self) -> Result<(), SelectorParseError> {
        let tq = &mut self.tq;
        if tq.match_chomp("#") {
            self.by_id()
        } else if tq.match_chomp(".") {
            self.by_class()
        } else if tq.matches_word() || tq.matches("*|") {
            self.by_tag()
        } else if tq.matches("[") {
            self.by_attribute()
        } else if tq.match_chomp("*") {
            self.evals.push(Evaluator::AllElements);
            Ok(())
        } else if tq.match_chomp(":lt(") {
            let index = self.consume_index()?;
            self.evals.push(Evaluator::IndexLessThan(index));
            Ok(())
        } else if tq.match_chomp(":gt(") {
            let index = self.consume_index()?;
            self.evals.push(Evaluator::IndexGreaterThan(index));
            Ok(())
        } else if tq.match_chomp(":eq(") {
            let index = self.consume_index()?;
            self.evals.push(Evaluator::IndexEquals(index));
            Ok(())
        } else if tq.matches(":has(") {
            self.has()
        } else if tq.matches(":containsOwn(") {
            self.contains(true)
        } else if tq.matches(":contains(") {
            self.contains(false)
        } else if tq.matches(":containsData(") {
            self.contains_data()
        } else if tq.matches(":matchesOwn(") {
            self.matches(true)
        } else if tq.matches(":matches(") {
            self.matches(false)
        } else if tq.matches(":not(") {
            self.not()
        } else if tq.match_chomp(":nth-child(") {
            self.css_nth_child(Evaluator::IsNthChild)
        } else if tq.match_chomp(":nth-last-child(") {
            self.css_nth_child(Evaluator::IsNthLastChild)
        } else if tq.match_chomp(":nth-of-type(") {
            self.css_nth_child(Evaluator::IsNthOfType)
        } else if tq.match_chomp(":nth-last-of-type(") {
            self.css_nth_child(Evaluator::IsNthLastOfType)
        } else {
            let evaluator = if tq.match_chomp(":first-child") {
                Evaluator::IsFirstChild
            } else if tq.match_chomp(":last-child") {
                Evaluator::IsLastChild
            } else if tq.match_chomp(":first-of-type") {
                Evaluator::IsFirstOfType
            } else if tq.match_chomp(":last-of-type") {
                Evaluator::IsLastOfType
            } else if tq.match_chomp(":only-child") {
                Evaluator::IsOnlyChild
            } else if tq.match_chomp(":only-of-type") {
                Evaluator::IsOnlyOfType
            } else if tq.match_chomp(":empty") {
                Evaluator::IsEmpty
            } else if tq.match_chomp(":root") {
                Evaluator::IsRoot
            } else {
                return Err(SelectorParseError::UnexpectedToken {
                    query: self.query.clone(),
                    remainder: tq.rest(),
                });
            };
            self.evals.push(evaluator);
            Ok(())
        }
    }

    fn by_id(&mut self) -> Result<(), SelectorParseError> {
        let id = self.tq.consume_css_identifier();
        if id.is_empty() {
            return Err(SelectorParseError::EmptyArgument("id selector"));
        }
        self.evals.push(Evaluator::Id(id));
        Ok(())
    }

    fn by_class(&mut self) -> Result<(), SelectorParseError> {
        let class_name = self.tq.consume_css_identifier();
        if class_name.is_empty() {
            return Err(SelectorParseError::EmptyArgument("class selector"));
        }
        self.evals.push(Evaluator::Class(class_name.trim().to_string()));
        Ok(())
    }

    fn by_tag(&mut self) -> Result<(), SelectorParseError> {
        let tag_name = self.tq.consume_element_selector();
        if tag_name.is_empty() {
            return Err(SelectorParseError::EmptyArgument("tag name"));
        }
        let tag_name = tag_name.trim().to_lowercase();

        let evaluator = if let Some(local) = tag_name.strip_prefix("*|") {
            // Any namespace, or none.
            Evaluator::Or(vec![
                Evaluator::Tag(local.to_string()),
                Evaluator::TagEndsWith(format!(":{local}")),
            ])
        } else {
            Evaluator::Tag(tag_name.replace('|', ":"))
        };
        self.evals.push(evaluator);
        Ok(())
    }

    fn by_attribute(&mut self) -> Result<(), SelectorParseError> {
        let mut cq = TokenQueue::new(&self.tq.chomp_balanced('[', ']')?);
        let key = cq.consume_to_any(&ATTRIBUTE_EVALS);
        let key = key.trim();
        if key.is_empty() {
            return Err(SelectorParseError::EmptyArgument("attribute key"));
        }
        let _ = cq.consume_whitespace();

        if cq.is_empty() {
            let evaluator = match key.strip_prefix('^') {
                Some(prefix) => Evaluator::AttributeStarting(prefix.to_lowercase()),
                None => Evaluator::Attribute(key.to_string()),
            };
            self.evals.push(evaluator);
            return Ok(());
        }

        let key = key.to_lowercase();
        let evaluator = if cq.match_chomp("=") {
            Evaluator::AttributeWithValue(key, attribute_value(&cq.remainder())?)
        } else if cq.match_chomp("!=") {
            Evaluator::AttributeWithValueNot(key, attribute_value(&cq.remainder())?)
        } else if cq.match_chomp("^=") {
            Evaluator::AttributeWithValueStarting(key, attribute_value(&cq.remainder())?)
        } else if cq.match_chomp("$=") {
            Evaluator::AttributeWithValueEnding(key, attribute_value(&cq.remainder())?)
        } else if cq.match_chomp("*=") {
            Evaluator::AttributeWithValueContaining(key, attribute_value(&cq.remainder())?)
        } else if cq.match_chomp("~=") {
            Evaluator::AttributeWithValueMatching(key, compile(&cq.remainder())?)
        } else {
            return Err(SelectorParseError::InvalidAttribute {
                query: self.query.clone(),
                remainder: cq.remainder(),
            });
        };
        self.evals.push(evaluator);
        Ok(())
    }

    // ===== Pseudo-classes =====

    fn consume_index(&mut self) -> Result<usize, SelectorParseError> {
        let index = self.tq.chomp_to(")");
        let index = index.trim();
        index
            .parse()
            .map_err(|_| SelectorParseError::InvalidIndex(index.to_string()))
    }

    /// The text of a `:name(...)` group, the name already matched.
    fn pseudo_argument(&mut self, name: &str, what: &'static str) -> Result<String, SelectorParseError> {
        self.tq.consume_seq(name)?;
        let argument = self.tq.chomp_balanced('(', ')')?;
        if argument.trim().is_empty() {
            return Err(SelectorParseError::EmptyArgument(what));
        }
        Ok(argument)
    }

    fn has(&mut self) -> Result<(), SelectorParseError> {
        let sub_query = self.pseudo_argument(":has", ":has(selector) subselect")?;
        self.evals.push(Evaluator::Has(Box::new(Self::parse(&sub_query)?)));
        Ok(())
    }

    fn not(&mut self) -> Result<(), SelectorParseError> {
        let sub_query = self.pseudo_argument(":not", ":not(selector) subselect")?;
        self.evals.push(Evaluator::Not(Box::new(Self::parse(&sub_query)?)));
        Ok(())
    }

    fn contains(&mut self, own: bool) -> Result<(), SelectorParseError> {
        let name = if own { ":containsOwn" } else { ":contains" };
        let search = TokenQueue::unescape(&self.pseudo_argument(name, ":contains(text) query")?);
        let search = search.to_lowercase();
        self.evals.push(if own {
            Evaluator::ContainsOwnText(search)
        } else {
            Evaluator::ContainsText(search)
        });
        Ok(())
    }

    fn contains_data(&mut self) -> Result<(), SelectorParseError> {
        let search = self.pseudo_argument(":containsData", ":containsData(text) query")?;
        let search = TokenQueue::unescape(&search).to_lowercase();
        self.evals.push(Evaluator::ContainsData(search));
        Ok(())
    }

    fn matches(&mut self, own: bool) -> Result<(), SelectorParseError> {
        let name = if own { ":matchesOwn" } else { ":matches" };
        let pattern = compile(&self.pseudo_argument(name, ":matches(regex) query")?)?;
        self.evals.push(if own {
            Evaluator::MatchesOwn(pattern)
        } else {
            Evaluator::Matches(pattern)
        });
        Ok(())
    }

    /// [§ 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
    ///
    /// Accepts `odd`, `even`, `an+b` (with optional signs, an omitted `a`
    /// meaning 1 and spaces around the `b` sign) and a plain integer `b`.
    fn css_nth_child(&mut self, evaluator: fn(Nth) -> Evaluator) -> Result<(), SelectorParseError> {
        let argument = self.tq.chomp_to(")").trim().to_lowercase();
        let nth = parse_nth(&argument).ok_or(SelectorParseError::InvalidNth(argument))?;
        self.evals.push(evaluator(nth));
        Ok(())
    }
}

fn parse_nth(argument: &str) -> Option<Nth> {
    match argument {
        "odd" => return Some(Nth { a: 2, b: 1 }),
        "even" => return Some(Nth { a: 2, b: 0 }),
        _ => {}
    }

    let compact: String = argument.chars().filter(|c| !c.is_whitespace()).collect();
    match compact.split_once('n') {
        Some((a, b)) => {
            let a = match a {
                "" | "+" => 1,
                "-" => -1,
                digits => parse_signed(digits)?,
            };
            let b = if b.is_empty() {
                0
            } else {
                if !b.starts_with(['+', '-']) {
                    return None;
                }
                parse_signed(b)?
            };
            Some(Nth { a, b })
        }
        None => Some(Nth { a: 0, b: parse_signed(&compact)? }),
    }
}

fn parse_signed(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.strip_prefix('+').unwrap_or(text).parse().ok()
}

/// Strip one pair of surrounding quotes, trim and lower-case.
fn attribute_value(raw: &str) -> Result<String, SelectorParseError> {
    let raw = raw.trim();
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|&q| raw.strip_prefix(q).and_then(|r| r.strip_suffix(q)))
        .unwrap_or(raw);
    let value = unquoted.trim().to_lowercase();
    if value.is_empty() {
        return Err(SelectorParseError::EmptyArgument("attribute value"));
    }
    Ok(value)
}

fn compile(pattern: &str) -> Result<Regex, SelectorParseError> {
    Regex::new(pattern).map_err(|e| SelectorParseError::InvalidRegex {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(query: &str) -> String {
        QueryParser::parse(query).unwrap().to_string()
    }

    #[test]
    fn test_compound_selector_is_an_and() {
        let evaluator = QueryParser::parse("div.a#b[href]").unwrap();
        let Evaluator::And(parts) = evaluator else {
            panic!("Expected And, got {evaluator:?}");
        };
        assert_eq!(parts.len(), 4);
        assert_eq!(render("div.a#b[href]"), "div.a#b[href]");
    }

    #[test]
    fn test_comma_binds_loosest() {
        let evaluator = QueryParser::parse("a, b c").unwrap();
        let Evaluator::Or(branches) = &evaluator else {
            panic!("Expected Or, got {evaluator:?}");
        };
        assert_eq!(branches.len(), 2);
        assert!(matches!(&branches[0], Evaluator::Tag(t) if t == "a"));
        assert!(matches!(&branches[1], Evaluator::And(_)));
        assert_eq!(evaluator.to_string(), "a, cb ");
    }

    #[test]
    fn test_commas_extend_one_or() {
        let evaluator = QueryParser::parse("a,b,c").unwrap();
        assert!(matches!(&evaluator, Evaluator::Or(branches) if branches.len() == 3));
    }

    #[test]
    fn test_leading_combinator_uses_root() {
        assert_eq!(render("> p"), "p:root > ");
    }

    #[test]
    fn test_tag_names_fold_and_namespaces() {
        assert_eq!(render("DIV"), "div");
        assert_eq!(render("svg|path"), "svg:path");
        assert_eq!(render("*|path"), "path, *:path");
    }

    #[test]
    fn test_attribute_forms() {
        assert_eq!(render("[^data-]"), "[^data-]");
        assert_eq!(render("[TITLE = 'Hello World']"), "[title=hello world]");
        assert_eq!(render("[href!=x]"), "[href!=x]");
        assert_eq!(render("[href^=HTTP]"), "[href^=http]");
        assert_eq!(render("[src$=.png]"), "[src$=.png]");
        assert_eq!(render("[class*=nav]"), "[class*=nav]");
        assert_eq!(render("[id~=^a\\d+$]"), "[id~=^a\\d+$]");
    }

    #[test]
    fn test_nth_arguments() {
        assert_eq!(parse_nth("odd"), Some(Nth { a: 2, b: 1 }));
        assert_eq!(parse_nth("even"), Some(Nth { a: 2, b: 0 }));
        assert_eq!(parse_nth("3"), Some(Nth { a: 0, b: 3 }));
        assert_eq!(parse_nth("+5"), Some(Nth { a: 0, b: 5 }));
        assert_eq!(parse_nth("2n+1"), Some(Nth { a: 2, b: 1 }));
        assert_eq!(parse_nth("-n+3"), Some(Nth { a: -1, b: 3 }));
        assert_eq!(parse_nth("n"), Some(Nth { a: 1, b: 0 }));
        assert_eq!(parse_nth("3n - 2"), Some(Nth { a: 3, b: -2 }));
        assert_eq!(parse_nth("2n3"), None);
        assert_eq!(parse_nth("x"), None);
    }

    #[test]
    fn test_pseudo_arguments_keep_nesting() {
        assert_eq!(render("div:has(p:contains(a (b)))"), "div:has(p:contains(a (b)))");
        assert_eq!(render("p:not(.x)"), "p:not(.x)");
        assert_eq!(render("div:has( p )"), "div:has(p)");
    }

    #[test]
    fn test_errors() {
        assert!(matches!(QueryParser::parse("   "), Err(SelectorParseError::Empty)));
        assert!(matches!(
            QueryParser::parse("div %"),
            Err(SelectorParseError::UnexpectedToken { remainder, .. }) if remainder == "%"
        ));
        assert!(matches!(
            QueryParser::parse("p:has()"),
            Err(SelectorParseError::EmptyArgument(_))
        ));
        assert!(matches!(
            QueryParser::parse("li:lt(x)"),
            Err(SelectorParseError::InvalidIndex(i)) if i == "x"
        ));
        assert!(matches!(
            QueryParser::parse("li:nth-child(foo)"),
            Err(SelectorParseError::InvalidNth(_))
        ));
        assert!(matches!(
            QueryParser::parse("p:matches(()"),
            Err(SelectorParseError::Unbalanced(_))
        ));
        assert!(matches!(
            QueryParser::parse("p:matches([)"),
            Err(SelectorParseError::InvalidRegex { .. })
        ));
        assert!(matches!(
            QueryParser::parse("div["),
            Err(SelectorParseError::Unbalanced(_))
        ));
        assert!(matches!(QueryParser::parse("a,"), Err(SelectorParseError::Empty)));
    }
}

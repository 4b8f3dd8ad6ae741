// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Serialize filter clauses and totals options into Redmine's issue-list query string
// role: wire/encoding
// inputs: Base URL, ordered FilterClause slice, ordered totals fields
// outputs: ASCII URL string
// invariants:
// - Output is byte-identical for identical input order (no maps, no randomness)
// - Operators, and values of text-match operators, go through the symbol substitution table
// - Every value is a single query component: no raw & # + = survives outside a %XX escape
// - Only substituted text keeps its %XX escapes and + spaces through the second pass
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::fmt::Write;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::catalog::TEXT_MATCH_OPERATORS;
use crate::model::FilterClause;

/// Sort newest first and mark the filters as applied. `%E2%9C%93` is the `utf8=✓` marker.
pub const ISSUES_QUERY_PREFIX: &str = "issues?utf8=%E2%9C%93&set_filter=1&sort=id%3Adesc";

/// Symbols the tracker's router mangles unless escaped by hand.
const SYMBOL_SUBSTITUTIONS: &[(char, &str)] = &[
  ('%', "%25"),
  ('=', "%3D"),
  ('!', "%21"),
  ('+', "%2B"),
  ('&', "%26"),
  ('#', "%23"),
  (' ', "+"),
];

/// First pass: replace routing-sensitive symbols.
pub fn substitute_symbols(word: &str) -> String {
  let mut out = String::with_capacity(word.len());

  for ch in word.chars() {
    match SYMBOL_SUBSTITUTIONS.iter().find(|(c, _)| *c == ch) {
      Some((_, replacement)) => out.push_str(replacement),
      None => out.push(ch),
    }
  }

  out
}

/// Query keys and totals fields: only unreserved characters survive.
const KEY: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Plain values: one query component, so `&#+=%` and space are all escaped.
const VALUE: &AsciiSet = &KEY.remove(b'*');

/// Output of `substitute_symbols`: its `%XX` escapes and `+` spaces are kept.
const SUBSTITUTED: &AsciiSet = &VALUE.remove(b'%').remove(b'+');

/// Second pass over substituted text: percent-encode everything else outside the safe set.
pub fn requote(s: &str) -> String {
  utf8_percent_encode(s, SUBSTITUTED).to_string()
}

fn encode_value(operator: &str, value: &str) -> String {
  if TEXT_MATCH_OPERATORS.contains(&operator) {
    requote(&substitute_symbols(value))
  } else {
    utf8_percent_encode(value, VALUE).to_string()
  }
}

pub fn build(base_url: &str, clauses: &[FilterClause], totals_fields: &[&str]) -> String {
  let mut url = format!("{}/{}", base_url.trim_end_matches('/'), ISSUES_QUERY_PREFIX);

  for clause in clauses {
    let key = utf8_percent_encode(&clause.filter, KEY).to_string();
    let op = requote(&substitute_symbols(&clause.operator));

    let _ = write!(url, "&f%5B%5D={}", key);
    let _ = write!(url, "&op%5B{}%5D={}", key, op);

    for value in &clause.values {
      let _ = write!(url, "&v%5B{}%5D%5B%5D={}", key, encode_value(&clause.operator, value));
    }
  }

  for field in totals_fields {
    let _ = write!(url, "&t%5B%5D={}", utf8_percent_encode(field, KEY));
  }

  url
}

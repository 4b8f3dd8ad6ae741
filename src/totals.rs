// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Scrape the query-totals block of a rendered issue list into numeric totals
// role: extraction/html
// inputs: Issue-list HTML; requested (caller name, TotalsOption) pairs
// outputs: Totals map keyed by caller name, in request order
// side_effects: None (warn logs for values that do not parse)
// invariants:
// - Every requested name is present in the output; absent or unparseable totals are None
// - A span matches on the exact class token total-for-<field with _ as ->
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::catalog::TotalsOption;
use crate::model::Totals;

static TOTALS_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("p.query-totals").expect("valid totals selector"));
static TOTAL_SPAN_SELECTOR: Lazy<Selector> =
  Lazy::new(|| Selector::parse(r#"span[class*="total-for-"]"#).expect("valid total span selector"));
static VALUE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("span.value").expect("valid value selector"));
static TIME_SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+):([0-5]\d)$").expect("valid time span regex"));

fn total_class(field: &str) -> String {
  format!("total-for-{}", field.replace('_', "-"))
}

fn collect_text(el: ElementRef<'_>) -> String {
  el.text().collect::<String>().trim().to_string()
}

/// Parse a rendered total: `12.50`, `12,50`, `1 234,50` or `12:30` (hours:minutes).
pub fn parse_value(text: &str) -> Option<f64> {
  let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();

  if compact.is_empty() {
    return None;
  }

  if let Some(caps) = TIME_SPAN_RE.captures(&compact) {
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    return Some(hours + minutes / 60.0);
  }

  compact.replace(',', ".").parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn extract(html: &str, requested: &[(String, &TotalsOption)]) -> Totals {
  let mut totals: Totals = requested.iter().map(|(name, _)| (name.clone(), None)).collect();
  let doc = Html::parse_document(html);

  for region in doc.select(&TOTALS_SELECTOR) {
    for span in region.select(&TOTAL_SPAN_SELECTOR) {
      let classes: Vec<&str> = span.value().classes().collect();

      for (name, option) in requested {
        if !classes.contains(&total_class(option.field).as_str()) {
          continue;
        }

        let Some(value_el) = span.select(&VALUE_SELECTOR).next() else {
          continue;
        };
        let text = collect_text(value_el);

        match parse_value(&text) {
          Some(v) => {
            totals.insert(name.clone(), Some(v));
          }
          None => tracing::warn!(option = %name, value = %text, "unparseable total"),
        }
      }
    }
  }

  totals
}

// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Ordered accumulation of resolved filter clauses with the no-value merge rule
// role: state/accumulator
// inputs: FilterClause values from the resolver
// outputs: Read-only ordered view of clauses for the URL builder
// invariants:
// - Insertion order is preserved; it is the order filters appear in the query string
// - A clause without values merges into an existing clause with the same filter+operator
// - A clause with values is always appended as a new entry
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::model::FilterClause;

#[derive(Debug, Default, Clone)]
pub struct FilterSet {
  clauses: Vec<FilterClause>,
}

impl FilterSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add(&mut self, clause: FilterClause) {
    if clause.values.is_empty() {
      if let Some(existing) = self
        .clauses
        .iter_mut()
        .find(|c| c.filter == clause.filter && c.operator == clause.operator)
      {
        for v in clause.values {
          if !existing.values.contains(&v) {
            existing.values.push(v);
          }
        }
        return;
      }
    }

    self.clauses.push(clause);
  }

  pub fn all(&self) -> &[FilterClause] {
    &self.clauses
  }

  pub fn clear(&mut self) {
    self.clauses.clear();
  }
}

// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Static Redmine filter/operator/totals tables with bilingual labels and build-once reverse indexes
// role: catalog/lookup
// inputs: Human-readable filter names, operator labels, value labels, totals option names
// outputs: Catalog entries and wire-level identifiers
// side_effects: None; indexes are built lazily once and never mutated
// invariants:
// - Every filter key has exactly one ValueType; the ValueType fixes the legal operator set
// - Operator keys are unique; labels are matched case-insensitively in any language
// - No normalized label maps to two different keys within one table
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Lang {
  Ru,
  En,
}

/// A display label tagged with its language.
#[derive(Copy, Clone, Debug)]
pub struct Label {
  pub lang: Lang,
  pub text: &'static str,
}

const fn ru(text: &'static str) -> Label {
  Label { lang: Lang::Ru, text }
}

const fn en(text: &'static str) -> Label {
  Label { lang: Lang::En, text }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ValueType {
  List,
  OptionalList,
  StatusList,
  SubprojectsList,
  Date,
  DatePast,
  String,
  Text,
  Integer,
  Float,
  Relation,
  Tree,
  Hierarchical,
}

/// Where the wire value of a filter comes from once enum labels are applied.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ValueSource {
  Literal,
  User,
  Version,
  Project,
  Group,
  Role,
}

/// How many values an operator consumes.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Arity {
  None,
  One,
  Two,
}

#[derive(Debug)]
pub struct EnumValue {
  pub id: &'static str,
  pub labels: &'static [Label],
}

#[derive(Debug)]
pub struct FilterEntry {
  pub key: &'static str,
  pub value_type: ValueType,
  pub labels: &'static [Label],
  pub values: &'static [EnumValue],
  pub source: ValueSource,
}

#[derive(Debug)]
pub struct OperatorEntry {
  pub key: &'static str,
  pub labels: &'static [Label],
  pub arity: Arity,
}

#[derive(Debug)]
pub struct TotalsOption {
  pub field: &'static str,
  pub labels: &'static [Label],
}

impl FilterEntry {
  pub fn allows(&self, operator: &str) -> bool {
    legal_operators_for(self.value_type).contains(&operator)
  }

  /// First label in `lang`, if the filter has one.
  pub fn label(&self, lang: Lang) -> Option<&'static str> {
    self.labels.iter().find(|l| l.lang == lang).map(|l| l.text)
  }
}

/// Operators whose values are free text and get the symbol substitution pass.
pub const TEXT_MATCH_OPERATORS: &[&str] = &["~", "!~", "^", "$"];

macro_rules! op {
  ($key:expr, $arity:ident, [$($label:expr),+ $(,)?]) => {
    OperatorEntry { key: $key, arity: Arity::$arity, labels: &[$($label),+] }
  };
}

pub static OPERATORS: &[OperatorEntry] = &[
  op!("=", One, [ru("соответствует"), en("is")]),
  op!("!", One, [ru("не соответствует"), en("is not")]),
  op!("o", None, [ru("открыто"), en("open")]),
  op!("c", None, [ru("закрыто"), en("closed")]),
  op!("!*", None, [ru("отсутствует"), en("none"), en("is not set")]),
  op!("*", None, [ru("все"), en("any"), en("all"), en("is set")]),
  op!(">=", One, [ru(">="), en(">=")]),
  op!("<=", One, [ru("<="), en("<=")]),
  op!("><", Two, [ru("между"), en("between")]),
  op!("<t+", One, [ru("менее чем"), en("in less than")]),
  op!(">t+", One, [ru("более чем"), en("in more than")]),
  op!("><t+", One, [ru("в следующие дни"), en("in the next")]),
  op!("t+", One, [ru("в"), en("in")]),
  op!("nd", None, [ru("завтра"), en("tomorrow")]),
  op!("t", None, [ru("сегодня"), en("today")]),
  op!("ld", None, [ru("вчера"), en("yesterday")]),
  op!("nw", None, [ru("следующая неделя"), en("next week")]),
  op!("w", None, [ru("на этой неделе"), en("this week")]),
  op!("lw", None, [ru("прошлая неделя"), en("last week")]),
  op!("l2w", None, [ru("прошлые 2 недели"), en("last 2 weeks")]),
  op!("nm", None, [ru("следующий месяц"), en("next month")]),
  op!("m", None, [ru("этот месяц"), en("this month")]),
  op!("lm", None, [ru("прошлый месяц"), en("last month")]),
  op!("y", None, [ru("этот год"), en("this year")]),
  op!(">t-", One, [ru("менее, чем дней(я) назад"), en("less than days ago")]),
  op!("<t-", One, [ru("более, чем дней(я) назад"), en("more than days ago")]),
  op!("><t-", One, [ru("в прошлые дни"), en("in the past")]),
  op!("t-", One, [ru("дней(я) назад"), en("days ago")]),
  op!("~", One, [ru("содержит"), en("contains")]),
  op!("!~", One, [ru("не содержит"), en("doesn't contain"), en("does not contain")]),
  op!("^", One, [ru("начинается с"), en("starts with")]),
  op!("$", One, [ru("заканчивается на"), en("ends with")]),
  op!("=p", One, [ru("любые задачи в проекте"), en("any issues in project")]),
  op!("=!p", One, [ru("любые задачи не в проекте"), en("any issues not in project")]),
  op!("!p", One, [ru("нет задач в проекте"), en("no issues in project")]),
  op!("*o", None, [ru("любые открытые задачи"), en("any open issues")]),
  op!("!o", None, [ru("нет открытых задач"), en("no open issues")]),
];

/// Legal operator keys for a value type, in Redmine's menu order.
pub fn legal_operators_for(value_type: ValueType) -> &'static [&'static str] {
  match value_type {
    ValueType::List => &["=", "!"],
    ValueType::StatusList => &["o", "=", "!", "c", "*"],
    ValueType::OptionalList => &["=", "!", "!*", "*"],
    ValueType::SubprojectsList => &["*", "!*", "=", "!"],
    ValueType::Date => &[
      "=", ">=", "<=", "><", "<t+", ">t+", "><t+", "t+", "nd", "t", "ld", "nw", "w", "lw", "l2w", "nm", "m", "lm",
      "y", ">t-", "<t-", "><t-", "t-", "!*", "*",
    ],
    ValueType::DatePast => &[
      "=", ">=", "<=", "><", ">t-", "<t-", "><t-", "t-", "t", "ld", "w", "lw", "l2w", "m", "lm", "y", "!*", "*",
    ],
    ValueType::String => &["~", "=", "!~", "!", "^", "$", "!*", "*"],
    ValueType::Text => &["~", "!~", "^", "$", "!*", "*"],
    ValueType::Integer | ValueType::Float => &["=", ">=", "<=", "><", "!*", "*"],
    ValueType::Relation => &["=", "!", "=p", "=!p", "!p", "*o", "!o", "!*", "*"],
    ValueType::Tree | ValueType::Hierarchical => &["=", "~", "!*", "*"],
  }
}

macro_rules! filter {
  ($key:expr, $vt:ident, $src:ident, [$($label:expr),+ $(,)?]) => {
    FilterEntry {
      key: $key,
      value_type: ValueType::$vt,
      labels: &[$($label),+],
      values: &[],
      source: ValueSource::$src,
    }
  };
  ($key:expr, $vt:ident, $src:ident, [$($label:expr),+ $(,)?], values: [$($id:expr => [$($vl:expr),+]),+ $(,)?]) => {
    FilterEntry {
      key: $key,
      value_type: ValueType::$vt,
      labels: &[$($label),+],
      values: &[$(EnumValue { id: $id, labels: &[$($vl),+] }),+],
      source: ValueSource::$src,
    }
  };
}

pub static FILTERS: &[FilterEntry] = &[
  filter!("status_id", StatusList, Literal, [ru("Статус"), en("Status")], values: [
    "1" => [en("New"), ru("Новая")],
    "2" => [en("Assigned"), ru("Назначена")],
    "3" => [en("Resolved"), ru("Решена")],
    "4" => [en("Feedback"), ru("Обратная связь")],
    "5" => [en("Closed"), ru("Закрыта")],
    "6" => [en("Rejected"), ru("Отклонена")],
  ]),
  filter!("project_id", List, Project, [ru("Проект"), en("Project")]),
  filter!("tracker_id", List, Literal, [ru("Трекер"), en("Tracker")], values: [
    "1" => [en("Bug"), ru("Ошибка")],
    "2" => [en("Feature"), ru("Улучшение")],
    "3" => [en("Support"), ru("Поддержка")],
    "4" => [en("Payment"), ru("Платёж")],
  ]),
  filter!("priority_id", List, Literal, [ru("Приоритет"), en("Priority")], values: [
    "12" => [en("Background"), ru("Фоновый")],
    "3" => [en("Low"), ru("Низкий")],
    "4" => [en("Normal"), ru("Нормальный")],
    "5" => [en("High"), ru("Высокий")],
    "6" => [en("Urgent"), ru("Срочный")],
    "7" => [en("Immediate"), ru("Немедленный")],
  ]),
  filter!("author_id", List, User, [ru("Автор"), en("Author")]),
  filter!("assigned_to_id", OptionalList, User, [ru("Назначена"), en("Assignee")]),
  filter!("member_of_group", OptionalList, Group, [ru("Группа назначенного"), en("Assignee's group")]),
  filter!("assigned_to_role", OptionalList, Role, [ru("Роль назначенного"), en("Assignee's role")]),
  filter!("fixed_version_id", OptionalList, Version, [ru("Версия"), en("Target version")]),
  filter!("fixed_version.due_date", Date, Literal, [ru("Версия Дата"), en("Target version's Due date")]),
  filter!("fixed_version.status", List, Literal, [ru("Версия Статус"), en("Target version's Status")], values: [
    "open" => [ru("открыт"), en("open")],
    "locked" => [ru("заблокирован"), en("locked")],
    "closed" => [ru("закрыт"), en("closed")],
  ]),
  filter!("subject", Text, Literal, [ru("Тема"), en("Subject")]),
  filter!("description", Text, Literal, [ru("Описание"), en("Description")]),
  filter!("created_on", DatePast, Literal, [ru("Создано"), en("Created")]),
  filter!("updated_on", DatePast, Literal, [ru("Обновлено"), en("Updated")]),
  filter!("closed_on", DatePast, Literal, [ru("Закрыта"), en("Closed")]),
  filter!("start_date", Date, Literal, [ru("Дата начала"), en("Start date")]),
  filter!("due_date", Date, Literal, [ru("Срок завершения"), en("Due date")]),
  filter!("estimated_hours", Float, Literal, [ru("Оценка временных затрат"), en("Estimated time")]),
  filter!("spent_time", Float, Literal, [ru("Трудозатраты"), en("Spent time")]),
  filter!("done_ratio", Integer, Literal, [ru("Готовность"), en("% Done")]),
  filter!("is_private", List, Literal, [ru("Частная"), en("Private")], values: [
    "1" => [ru("да"), en("yes")],
    "0" => [ru("нет"), en("no")],
  ]),
  filter!("attachment", Text, Literal, [ru("Файл"), en("File")]),
  filter!("updated_by", List, User, [ru("Кем изменено"), en("Updated by")]),
  filter!("last_updated_by", List, User, [ru("Последний изменивший"), en("Last updated by")]),
  filter!("project.status", List, Literal, [ru("Проект Статус"), en("Project's Status")], values: [
    "1" => [ru("активный"), en("active")],
    "5" => [ru("закрытый"), en("closed")],
  ]),
  filter!("subproject_id", SubprojectsList, Literal, [ru("Подпроект"), en("Subproject")]),
  filter!("cf_28", OptionalList, Literal, [en("Payment category")]),
  filter!("cf_29", Integer, Literal, [en("Payment cash")]),
  filter!("cf_30", Integer, Literal, [en("Payment cashless")]),
  filter!("cf_38", Integer, Literal, [en("Rate")]),
  filter!("cf_39", Integer, Literal, [en("Payment tail")]),
  filter!("cf_41", OptionalList, Literal, [en("Company")]),
  filter!("cf_42", OptionalList, Literal, [ru("Валюта"), en("Currency")]),
  filter!("fixed_version.cf_32", OptionalList, Literal, [ru("Версия Supervisor"), en("Target version's Supervisor")]),
  filter!("fixed_version.cf_36", OptionalList, Literal, [ru("Версия Mature"), en("Target version's Mature")]),
  filter!("relates", Relation, Literal, [ru("связана с"), en("Related to")]),
  filter!("duplicates", Relation, Literal, [ru("дублирует"), en("Is duplicate of")]),
  filter!("duplicated", Relation, Literal, [ru("дублируется"), en("Has duplicate")]),
  filter!("blocks", Relation, Literal, [ru("блокирует"), en("Blocks")]),
  filter!("blocked", Relation, Literal, [ru("блокируется"), en("Blocked by")]),
  filter!("precedes", Relation, Literal, [ru("следующая"), en("Precedes")]),
  filter!("follows", Relation, Literal, [ru("предыдущая"), en("Follows")]),
  filter!("copied_to", Relation, Literal, [ru("скопирована в"), en("Copied to")]),
  filter!("copied_from", Relation, Literal, [ru("скопирована с"), en("Copied from")]),
  filter!("start_to_start", Relation, Literal, [ru("Старт --> Старт"), en("Start to start")]),
  filter!("finish_to_finish", Relation, Literal, [ru("Финиш --> Финиш"), en("Finish to finish")]),
  filter!("start_to_finish", Relation, Literal, [ru("Начало-Окончание"), en("Start to finish")]),
  filter!("parent_id", Tree, Literal, [ru("Родительская задача"), en("Parent task")]),
  filter!("child_id", Tree, Literal, [ru("Подзадачи"), en("Subtasks")]),
  filter!("issue_id", Integer, Literal, [ru("Задача"), en("Issue")]),
  filter!("last_spent_on", DatePast, Literal, [ru("Последняя запись времени"), en("Last time entry")]),
  filter!("watcher_id", List, User, [ru("Наблюдатель"), en("Watcher")]),
  filter!("issue_tags", OptionalList, Literal, [ru("Метки"), en("Tags")]),
];

pub static TOTALS_OPTIONS: &[TotalsOption] = &[
  TotalsOption { field: "estimated_hours", labels: &[ru("Оценка временных затрат"), en("Estimated time")] },
  TotalsOption { field: "spent_hours", labels: &[ru("Трудозатраты"), en("Spent time")] },
  TotalsOption { field: "cf_29", labels: &[en("Payment cash")] },
  TotalsOption { field: "cf_30", labels: &[en("Payment cashless")] },
  TotalsOption { field: "cf_38", labels: &[en("Rate")] },
  TotalsOption { field: "cf_39", labels: &[en("Payment tail")] },
];

/// Normalize a label for lookup: trim, lowercase, collapse inner whitespace.
pub fn normalize_label(s: &str) -> String {
  s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn index_labels<T>(items: &'static [T], labels: impl Fn(&'static T) -> &'static [Label]) -> HashMap<String, &'static T> {
  let mut map = HashMap::new();

  for item in items {
    for label in labels(item) {
      map.entry(normalize_label(label.text)).or_insert(item);
    }
  }

  map
}

/// Reverse indexes over the static tables, built on first use.
pub struct Catalog {
  filters: HashMap<String, &'static FilterEntry>,
  operators: HashMap<String, &'static OperatorEntry>,
  values: HashMap<&'static str, HashMap<String, &'static str>>,
  totals: HashMap<String, &'static TotalsOption>,
}

static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::build);

impl Catalog {
  pub fn global() -> &'static Catalog {
    &CATALOG
  }

  fn build() -> Self {
    let mut values = HashMap::new();

    for entry in FILTERS.iter().filter(|f| !f.values.is_empty()) {
      let mut by_label = HashMap::new();
      for value in entry.values {
        for label in value.labels {
          by_label.entry(normalize_label(label.text)).or_insert(value.id);
        }
      }
      values.insert(entry.key, by_label);
    }

    Self {
      filters: index_labels(FILTERS, |f| f.labels),
      operators: index_labels(OPERATORS, |o| o.labels),
      values,
      totals: index_labels(TOTALS_OPTIONS, |t| t.labels),
    }
  }

  pub fn lookup_filter(&self, display_name: &str) -> Option<&'static FilterEntry> {
    self.filters.get(&normalize_label(display_name)).copied()
  }

  pub fn lookup_operator(&self, label: &str) -> Option<&'static OperatorEntry> {
    self.operators.get(&normalize_label(label)).copied()
  }

  /// Map an enum label to its wire id; anything unknown passes through untouched.
  pub fn resolve_value_label<'a>(&self, filter_key: &str, label: &'a str) -> Cow<'a, str> {
    match self.values.get(filter_key).and_then(|m| m.get(&normalize_label(label))) {
      Some(id) => Cow::Borrowed(*id),
      None => Cow::Borrowed(label),
    }
  }

  pub fn lookup_totals_option(&self, name: &str) -> Option<&'static TotalsOption> {
    self.totals.get(&normalize_label(name)).copied()
  }
}

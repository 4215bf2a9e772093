//! Translation of filters and changes into SQL fragments with bound
//! parameters. Values are never interpolated into the SQL text.

use harga_core::observation::{Condition, ObservationChanges, ResolvedFilter};
use rusqlite::types::Value;

use crate::encode::{encode_commodity, encode_date, encode_region};

/// A SQL fragment plus the positional parameters it references, in order.
#[derive(Debug, Default, PartialEq)]
pub struct Fragment {
  pub sql:    String,
  pub params: Vec<Value>,
}

fn push_condition<T: Copy>(
  conds: &mut Vec<String>,
  params: &mut Vec<Value>,
  column: &str,
  cond: &Condition<T>,
  encode: impl Fn(T) -> i64,
) {
  match cond {
    Condition::Eq(v) => {
      params.push(Value::Integer(encode(*v)));
      conds.push(format!("{column} = ?{}", params.len()));
    }
    Condition::In(vs) => {
      let placeholders: Vec<String> = vs
        .iter()
        .map(|v| {
          params.push(Value::Integer(encode(*v)));
          format!("?{}", params.len())
        })
        .collect();
      conds.push(format!("{column} IN ({})", placeholders.join(", ")));
    }
  }
}

/// `WHERE …` for `filter`, or an empty fragment when nothing is filtered.
pub fn where_clause(filter: &ResolvedFilter) -> Fragment {
  let mut conds = Vec::new();
  let mut params = Vec::new();

  if let Some(c) = &filter.regions {
    push_condition(&mut conds, &mut params, "region_id", c, encode_region);
  }
  if let Some(c) = &filter.commodities {
    push_condition(&mut conds, &mut params, "commodity_id", c, encode_commodity);
  }
  if let Some(d) = filter.start_date {
    params.push(Value::Text(encode_date(d)));
    conds.push(format!("date >= ?{}", params.len()));
  }
  if let Some(d) = filter.end_date {
    params.push(Value::Text(encode_date(d)));
    conds.push(format!("date <= ?{}", params.len()));
  }

  let sql = if conds.is_empty() {
    String::new()
  } else {
    format!("WHERE {}", conds.join(" AND "))
  };
  Fragment { sql, params }
}

/// `col = ?n, …` for every present change. Empty if `changes` is empty.
pub fn set_clause(changes: &ObservationChanges) -> Fragment {
  let mut sets = Vec::new();
  let mut params = Vec::new();

  let mut set = |column: &str, value: Value| {
    params.push(value);
    sets.push(format!("{column} = ?{}", params.len()));
  };

  if let Some(id) = changes.region_id {
    set("region_id", Value::Integer(encode_region(id)));
  }
  if let Some(id) = changes.commodity_id {
    set("commodity_id", Value::Integer(encode_commodity(id)));
  }
  if let Some(d) = changes.date {
    set("date", Value::Text(encode_date(d)));
  }
  if let Some(p) = changes.price {
    set("price", Value::Real(p));
  }
  if let Some(by) = &changes.created_by {
    set("created_by", Value::Text(by.clone()));
  }

  Fragment { sql: sets.join(", "), params }
}

use crate::error::ExecutionError;
use crate::expr::eval_scalar;
use ast::{Operator, Plan, Source};
use data::{DataType, Datum, Session, SortOrder};
use std::cmp::Ordering;
use std::collections::HashSet;

pub type Schema = Vec<(String, DataType)>;
pub type Row = Vec<Datum>;

/// One of the tables a source reads from, as actually stored - schema plus
/// rows, independent of `catalog::Table` so this crate stays free of a
/// `catalog` dependency outside tests.
#[derive(Debug, Clone)]
pub struct SourceTable {
    pub schema: Schema,
    pub rows: Vec<Row>,
}

/// Runs `plan` bulk, operator by operator, over `sources` (one entry per
/// table named in `plan.source`, in the same order). `stage_schemas` is
/// the planner's per-stage column-name list, used to resolve the bare
/// column names `summarize ... by`/`distinct` carry. `max_rows`, if set,
/// is checked after the source is assembled and after every operator.
pub fn execute_plan(
    plan: &Plan,
    stage_schemas: &[Schema],
    sources: Vec<SourceTable>,
    session: &Session,
    max_rows: Option<usize>,
) -> Result<(Schema, Vec<Row>), ExecutionError> {
    let (mut schema, mut rows) = assemble_source(&plan.source, sources);
    check_limit(rows.len(), max_rows)?;
    for (operator, stage_schema) in plan.operators.iter().zip(stage_schemas) {
        let (new_schema, new_rows) = apply_operator(operator, stage_schema, schema, rows, session)?;
        check_limit(new_rows.len(), max_rows)?;
        schema = new_schema;
        rows = new_rows;
    }
    Ok((schema, rows))
}

fn check_limit(actual: usize, max_rows: Option<usize>) -> Result<(), ExecutionError> {
    match max_rows {
        Some(limit) if actual > limit => Err(ExecutionError::ResourceLimit { limit, actual }),
        _ => Ok(()),
    }
}

/// Builds the initial row-set. A plain table source passes rows through
/// unchanged; a `union` merges every listed table's rows into one column
/// order keyed by name, filling a row with `Null` wherever its source
/// table lacked that column and promoting `int` into `real` where the
/// two disagree - the physical-layer counterpart of the planner's own
/// union type-unification, re-derived here from the actual source
/// schemas rather than threaded through as planner state.
fn assemble_source(source: &Source, sources: Vec<SourceTable>) -> (Schema, Vec<Row>) {
    match source {
        Source::Table(_) => {
            let only = sources.into_iter().next().expect("table source needs exactly one SourceTable");
            (only.schema, only.rows)
        }
        Source::Union(_) => {
            let mut union_schema: Schema = Vec::new();
            for source_table in &sources {
                for (name, ty) in &source_table.schema {
                    match union_schema.iter_mut().find(|(n, _)| n == name) {
                        Some((_, existing)) if *existing != *ty && existing.is_numeric() && ty.is_numeric() => {
                            *existing = DataType::Real;
                        }
                        Some(_) => {}
                        None => union_schema.push((name.clone(), *ty)),
                    }
                }
            }
            let mut rows = Vec::new();
            for source_table in &sources {
                for row in &source_table.rows {
                    let mut out = Vec::with_capacity(union_schema.len());
                    for (name, _) in &union_schema {
                        match source_table.schema.iter().position(|(n, _)| n == name) {
                            Some(index) => out.push(row[index].clone()),
                            None => out.push(Datum::Null),
                        }
                    }
                    rows.push(out);
                }
            }
            (union_schema, rows)
        }
    }
}

fn column_offset(schema: &Schema, name: &str) -> usize {
    schema
        .iter()
        .position(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("planner left unresolved column '{}' for the executor", name))
}

fn apply_operator(
    operator: &Operator,
    schema: &Schema,
    _old_schema: Schema,
    rows: Vec<Row>,
    session: &Session,
) -> Result<(Schema, Vec<Row>), ExecutionError> {
    match operator {
        Operator::Where(predicate) => {
            let filtered = rows
                .into_iter()
                .filter(|row| matches!(eval_scalar(predicate, session, row), Datum::Bool(true)))
                .collect();
            Ok((schema.clone(), filtered))
        }
        Operator::Project(items) => {
            let new_schema = schema_for_named(items);
            let new_rows = rows
                .into_iter()
                .map(|row| items.iter().map(|item| eval_scalar(&item.expression, session, &row)).collect())
                .collect();
            Ok((new_schema, new_rows))
        }
        Operator::Extend(items) => {
            // Same incremental schema growth as the planner (src/planner/src/plan.rs):
            // an item can overwrite a column a prior item in this same `extend` just
            // added, so the offset each item writes to is resolved against the
            // schema as it stands after the items before it, not the pre-extend
            // `schema` parameter.
            let mut new_schema = schema.clone();
            let mut item_offsets = Vec::with_capacity(items.len());
            for item in items {
                let ty = expression_type(&item.expression);
                match new_schema.iter().position(|(n, _)| n == &item.name) {
                    Some(index) => {
                        new_schema[index].1 = ty;
                        item_offsets.push(index);
                    }
                    None => {
                        item_offsets.push(new_schema.len());
                        new_schema.push((item.name.clone(), ty));
                    }
                }
            }
            let new_rows = rows
                .into_iter()
                .map(|mut row| {
                    for (item, &offset) in items.iter().zip(&item_offsets) {
                        let value = eval_scalar(&item.expression, session, &row);
                        if offset < row.len() {
                            row[offset] = value;
                        } else {
                            row.push(value);
                        }
                    }
                    row
                })
                .collect();
            Ok((new_schema, new_rows))
        }
        Operator::Summarize { aggregates, by } => {
            let by_offsets: Vec<usize> = by.iter().map(|name| column_offset(schema, name)).collect();
            let mut groups: Vec<(Vec<Datum>, Vec<Row>)> = Vec::new();
            for row in rows {
                let key: Vec<Datum> = by_offsets.iter().map(|&offset| row[offset].clone()).collect();
                match groups.iter_mut().find(|(existing_key, _)| existing_key == &key) {
                    Some((_, members)) => members.push(row),
                    None => groups.push((key, vec![row])),
                }
            }
            let mut new_schema: Schema = by
                .iter()
                .map(|name| (name.clone(), schema[column_offset(schema, name)].1))
                .collect();
            for item in aggregates {
                if let ast::Expression::CompiledAggregate(call) = &item.expression {
                    new_schema.push((item.name.clone(), call.ret_type));
                }
            }
            let mut new_rows = Vec::with_capacity(groups.len());
            for (key, members) in groups {
                let mut out_row = key;
                for item in aggregates {
                    let call = match &item.expression {
                        ast::Expression::CompiledAggregate(call) => call,
                        _ => unreachable!("summarize items are compiled to CompiledAggregate by the planner"),
                    };
                    let mut state = call.function.init_state();
                    for member in &members {
                        let arg = call
                            .arg
                            .as_ref()
                            .map(|expr| eval_scalar(expr, session, member));
                        state.update(arg.as_ref());
                    }
                    let signature = functions::FunctionSignature {
                        name: call.name,
                        args: Vec::new(),
                        ret: call.ret_type,
                    };
                    out_row.push(state.finalize(&signature));
                }
                new_rows.push(out_row);
            }
            Ok((new_schema, new_rows))
        }
        Operator::OrderBy(keys) => {
            let offsets: Vec<(usize, SortOrder)> = keys
                .iter()
                .map(|key| (column_offset(schema, &key.column), key.order))
                .collect();
            let mut rows = rows;
            sort_rows(&mut rows, &offsets);
            Ok((schema.clone(), rows))
        }
        Operator::Take(count) => {
            let mut rows = rows;
            rows.truncate((*count).max(0) as usize);
            Ok((schema.clone(), rows))
        }
        Operator::Top { count, by } => {
            let offsets = vec![(column_offset(schema, &by.column), by.order)];
            let mut rows = rows;
            sort_rows(&mut rows, &offsets);
            rows.truncate((*count).max(0) as usize);
            Ok((schema.clone(), rows))
        }
        Operator::Count => {
            let new_schema = vec![("Count".to_string(), DataType::Int)];
            Ok((new_schema, vec![vec![Datum::from(rows.len() as i64)]]))
        }
        Operator::Distinct(columns) => {
            let offsets: Vec<usize> = columns.iter().map(|name| column_offset(schema, name)).collect();
            let new_schema: Schema = columns
                .iter()
                .map(|name| (name.clone(), schema[column_offset(schema, name)].1))
                .collect();
            let mut seen: HashSet<Vec<Datum>> = HashSet::new();
            let mut new_rows = Vec::new();
            for row in rows {
                let key: Vec<Datum> = offsets.iter().map(|&offset| row[offset].clone()).collect();
                if seen.insert(key.clone()) {
                    new_rows.push(key);
                }
            }
            Ok((new_schema, new_rows))
        }
    }
}

/// Nulls sort last regardless of direction: greater than any non-null in
/// ascending order, smaller in descending. `Datum`'s own `Ord` puts `Null`
/// least always, so that ordering can't be reused directly for `desc` -
/// reversing it would put nulls first instead of last.
fn compare_key(a: &Datum, b: &Datum, order: SortOrder) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let cmp = a.cmp(b);
            if order == SortOrder::Desc {
                cmp.reverse()
            } else {
                cmp
            }
        }
    }
}

fn sort_rows(rows: &mut [Row], keys: &[(usize, SortOrder)]) {
    rows.sort_by(|a, b| {
        for (offset, order) in keys {
            let cmp = compare_key(&a[*offset], &b[*offset], *order);
            if cmp != Ordering::Equal {
                return cmp;
            }
        }
        Ordering::Equal
    });
}

fn schema_for_named(items: &[ast::NamedExpression]) -> Schema {
    items
        .iter()
        .map(|item| (item.name.clone(), expression_type(&item.expression)))
        .collect()
}

fn expression_type(expr: &ast::Expression) -> DataType {
    match expr {
        ast::Expression::Literal(_, t) => *t,
        ast::Expression::ResolvedColumn(c) => c.datatype,
        ast::Expression::CompiledFunctionCall(c) => c.signature.ret,
        ast::Expression::CompiledAggregate(c) => c.ret_type,
        _ => DataType::Null,
    }
}

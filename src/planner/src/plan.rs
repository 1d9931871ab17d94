use crate::error::PlannerError;
use crate::expr::{compile_aggregate, compile_expr, Schema};
use ast::{NamedExpression, Operator, Plan, Source};
use catalog::Catalog;
use data::DataType;
use functions::Registry;

/// The result of planning: the original pipeline rewritten with every
/// expression resolved/compiled in place, the concrete list of source
/// tables it reads (a `Union` source expands to more than one), and the
/// schema the final operator produces.
///
/// `stage_schemas[i]` is the schema in effect immediately *before*
/// `plan.operators[i]` runs (`stage_schemas[0]` is the post-source,
/// pre-pipeline schema). Column offsets inside expressions are already
/// baked in by this point, but operators like `summarize ... by` and
/// `distinct` carry their key columns as bare names, so the executor
/// needs this to find their position in the row at that pipeline stage
/// without re-deriving the planner's own type-resolution rules.
#[derive(Debug, Clone)]
pub struct CompiledPlan {
    pub source_tables: Vec<String>,
    pub plan: Plan,
    pub stage_schemas: Vec<Schema>,
    pub schema: Schema,
}

pub fn compile_plan(plan: Plan, catalog: &Catalog, registry: &Registry) -> Result<CompiledPlan, PlannerError> {
    let (source_tables, mut schema) = compile_source(&plan.source, catalog)?;
    let mut operators = Vec::with_capacity(plan.operators.len());
    let mut stage_schemas = Vec::with_capacity(plan.operators.len());
    for operator in plan.operators {
        stage_schemas.push(schema.clone());
        let (compiled, new_schema) = compile_operator(operator, schema, registry)?;
        operators.push(compiled);
        schema = new_schema;
    }
    Ok(CompiledPlan {
        source_tables,
        plan: Plan {
            source: plan.source,
            operators,
        },
        stage_schemas,
        schema,
    })
}

fn unknown_table(name: &str, catalog: &Catalog) -> PlannerError {
    PlannerError::UnknownTable {
        name: name.to_string(),
        available: catalog.list().into_iter().map(str::to_string).collect(),
    }
}

/// Resolves the query's source into the concrete list of tables it reads
/// plus the schema rows will carry from that point on. A plain table
/// source passes its own schema through unchanged; a `union` merges
/// schemas by column NAME across every listed table (first-seen order),
/// promoting int/real pairs and rejecting any other type clash. A column
/// present in some but not all members is kept and filled with null for
/// rows sourced from tables that lack it, which the executor applies at
/// row-construction time rather than here.
fn compile_source(source: &Source, catalog: &Catalog) -> Result<(Vec<String>, Schema), PlannerError> {
    match source {
        Source::Table(name) => {
            let table = catalog.get(name).ok_or_else(|| unknown_table(name, catalog))?;
            Ok((vec![name.clone()], table.columns().to_vec()))
        }
        Source::Union(names) => {
            let mut schema: Schema = Vec::new();
            for name in names {
                let table = catalog.get(name).ok_or_else(|| unknown_table(name, catalog))?;
                for (col_name, col_type) in table.columns() {
                    match schema.iter_mut().find(|(n, _)| n == col_name) {
                        Some((_, existing_type)) => {
                            *existing_type = unify_union_type(*existing_type, *col_type, col_name)?;
                        }
                        None => schema.push((col_name.clone(), *col_type)),
                    }
                }
            }
            Ok((names.clone(), schema))
        }
    }
}

fn unify_union_type(a: DataType, b: DataType, column: &str) -> Result<DataType, PlannerError> {
    if a == b {
        return Ok(a);
    }
    if a.is_numeric() && b.is_numeric() {
        return Ok(DataType::Real);
    }
    Err(PlannerError::SemanticError(format!(
        "union column '{}' has incompatible types {} and {}",
        column, a, b
    )))
}

fn compile_operator(
    operator: Operator,
    schema: Schema,
    registry: &Registry,
) -> Result<(Operator, Schema), PlannerError> {
    match operator {
        Operator::Where(expr) => {
            let (compiled, ty) = compile_expr(expr, &schema, registry)?;
            if ty != DataType::Bool && ty != DataType::Null {
                return Err(PlannerError::SemanticError(format!(
                    "where clause must be bool, found {}",
                    ty
                )));
            }
            Ok((Operator::Where(compiled), schema))
        }
        Operator::Project(items) => {
            let mut compiled_items = Vec::with_capacity(items.len());
            let mut new_schema = Vec::with_capacity(items.len());
            for item in items {
                let (compiled_expr, ty) = compile_expr(item.expression, &schema, registry)?;
                reject_duplicate(&new_schema, &item.name)?;
                new_schema.push((item.name.clone(), ty));
                compiled_items.push(NamedExpression {
                    name: item.name,
                    expression: compiled_expr,
                });
            }
            Ok((Operator::Project(compiled_items), new_schema))
        }
        Operator::Extend(items) => {
            let mut compiled_items = Vec::with_capacity(items.len());
            let mut new_schema = schema;
            for item in items {
                let (compiled_expr, ty) = compile_expr(item.expression, &new_schema, registry)?;
                match new_schema.iter_mut().find(|(n, _)| n == &item.name) {
                    Some((_, existing_type)) => *existing_type = ty,
                    None => new_schema.push((item.name.clone(), ty)),
                }
                compiled_items.push(NamedExpression {
                    name: item.name,
                    expression: compiled_expr,
                });
            }
            Ok((Operator::Extend(compiled_items), new_schema))
        }
        Operator::Summarize { aggregates, by } => {
            for column in &by {
                require_column(&schema, column)?;
            }
            let mut compiled_aggregates = Vec::with_capacity(aggregates.len());
            let mut new_schema: Schema = by
                .iter()
                .map(|name| {
                    let ty = schema.iter().find(|(n, _)| n == name).unwrap().1;
                    (name.clone(), ty)
                })
                .collect();
            for item in aggregates {
                let call = match item.expression {
                    ast::Expression::Aggregate(call) => call,
                    other => {
                        return Err(PlannerError::SemanticError(format!(
                            "summarize item '{}' must be an aggregation, found {:?}",
                            item.name, other
                        )))
                    }
                };
                let compiled = compile_aggregate(call, &schema, registry)?;
                let ret_type = compiled.ret_type;
                reject_duplicate(&new_schema, &item.name)?;
                new_schema.push((item.name.clone(), ret_type));
                compiled_aggregates.push(NamedExpression {
                    name: item.name,
                    expression: ast::Expression::CompiledAggregate(compiled),
                });
            }
            Ok((
                Operator::Summarize {
                    aggregates: compiled_aggregates,
                    by,
                },
                new_schema,
            ))
        }
        Operator::OrderBy(keys) => {
            for key in &keys {
                require_column(&schema, &key.column)?;
            }
            Ok((Operator::OrderBy(keys), schema))
        }
        Operator::Take(count) => {
            validate_count(count)?;
            Ok((Operator::Take(count), schema))
        }
        Operator::Top { count, by } => {
            validate_count(count)?;
            require_column(&schema, &by.column)?;
            Ok((Operator::Top { count, by }, schema))
        }
        Operator::Count => Ok((Operator::Count, vec![("Count".to_string(), DataType::Int)])),
        Operator::Distinct(columns) => {
            for column in &columns {
                require_column(&schema, column)?;
            }
            let new_schema = columns
                .iter()
                .map(|name| {
                    let ty = schema.iter().find(|(n, _)| n == name).unwrap().1;
                    (name.clone(), ty)
                })
                .collect();
            Ok((Operator::Distinct(columns), new_schema))
        }
    }
}

fn require_column(schema: &Schema, name: &str) -> Result<(), PlannerError> {
    if schema.iter().any(|(n, _)| n == name) {
        Ok(())
    } else {
        Err(PlannerError::SemanticError(format!(
            "unknown column '{}' (available: {})",
            name,
            schema
                .iter()
                .map(|(n, _)| n.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

fn reject_duplicate(schema: &Schema, name: &str) -> Result<(), PlannerError> {
    if schema.iter().any(|(n, _)| n == name) {
        Err(PlannerError::SemanticError(format!(
            "duplicate column name '{}'",
            name
        )))
    } else {
        Ok(())
    }
}

fn validate_count(count: i64) -> Result<(), PlannerError> {
    if count < 0 {
        Err(PlannerError::SemanticError(format!(
            "row count must be non-negative, found {}",
            count
        )))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{ColumnRef, Expression};
    use catalog::Table;

    fn catalog_with_events() -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .register(
                "Events",
                Table::new(vec![
                    ("id".to_string(), DataType::Int),
                    ("name".to_string(), DataType::String),
                ]),
            )
            .unwrap();
        catalog
    }

    #[test]
    fn test_compile_plan_table_source_passes_through_schema() {
        let catalog = catalog_with_events();
        let registry = Registry::new();
        let plan = Plan::new(Source::Table("Events".to_string()));
        let compiled = compile_plan(plan, &catalog, &registry).unwrap();
        assert_eq!(compiled.source_tables, vec!["Events".to_string()]);
        assert_eq!(compiled.schema.len(), 2);
    }

    #[test]
    fn test_compile_plan_unknown_table_is_rejected() {
        let catalog = catalog_with_events();
        let registry = Registry::new();
        let plan = Plan::new(Source::Table("Missing".to_string()));
        assert!(matches!(
            compile_plan(plan, &catalog, &registry),
            Err(PlannerError::UnknownTable { .. })
        ));
    }

    #[test]
    fn test_compile_where_requires_bool() {
        let catalog = catalog_with_events();
        let registry = Registry::new();
        let mut plan = Plan::new(Source::Table("Events".to_string()));
        plan.operators.push(Operator::Where(Expression::from(1_i64)));
        assert!(compile_plan(plan, &catalog, &registry).is_err());
    }

    #[test]
    fn test_compile_project_rejects_duplicate_names() {
        let catalog = catalog_with_events();
        let registry = Registry::new();
        let mut plan = Plan::new(Source::Table("Events".to_string()));
        plan.operators.push(Operator::Project(vec![
            NamedExpression {
                name: "x".to_string(),
                expression: Expression::Column(ColumnRef { name: "id".to_string() }),
            },
            NamedExpression {
                name: "x".to_string(),
                expression: Expression::Column(ColumnRef { name: "name".to_string() }),
            },
        ]));
        assert!(compile_plan(plan, &catalog, &registry).is_err());
    }

    #[test]
    fn test_compile_count_produces_single_int_column() {
        let catalog = catalog_with_events();
        let registry = Registry::new();
        let mut plan = Plan::new(Source::Table("Events".to_string()));
        plan.operators.push(Operator::Count);
        let compiled = compile_plan(plan, &catalog, &registry).unwrap();
        assert_eq!(compiled.schema, vec![("Count".to_string(), DataType::Int)]);
    }

    #[test]
    fn test_union_promotes_int_and_real_columns() {
        let mut catalog = Catalog::new();
        catalog
            .register("A", Table::new(vec![("v".to_string(), DataType::Int)]))
            .unwrap();
        catalog
            .register("B", Table::new(vec![("v".to_string(), DataType::Real)]))
            .unwrap();
        let registry = Registry::new();
        let plan = Plan::new(Source::Union(vec!["A".to_string(), "B".to_string()]));
        let compiled = compile_plan(plan, &catalog, &registry).unwrap();
        assert_eq!(compiled.schema, vec![("v".to_string(), DataType::Real)]);
    }

    #[test]
    fn test_union_rejects_incompatible_types() {
        let mut catalog = Catalog::new();
        catalog
            .register("A", Table::new(vec![("v".to_string(), DataType::Int)]))
            .unwrap();
        catalog
            .register("B", Table::new(vec![("v".to_string(), DataType::String)]))
            .unwrap();
        let registry = Registry::new();
        let plan = Plan::new(Source::Union(vec!["A".to_string(), "B".to_string()]));
        assert!(compile_plan(plan, &catalog, &registry).is_err());
    }

    #[test]
    fn test_union_keeps_columns_not_shared_by_every_member() {
        let mut catalog = Catalog::new();
        catalog
            .register(
                "A",
                Table::new(vec![
                    ("v".to_string(), DataType::Int),
                    ("extra".to_string(), DataType::String),
                ]),
            )
            .unwrap();
        catalog
            .register("B", Table::new(vec![("v".to_string(), DataType::Int)]))
            .unwrap();
        let registry = Registry::new();
        let plan = Plan::new(Source::Union(vec!["A".to_string(), "B".to_string()]));
        let compiled = compile_plan(plan, &catalog, &registry).unwrap();
        assert!(compiled.schema.iter().any(|(n, _)| n == "extra"));
    }
}

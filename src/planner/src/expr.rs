use crate::error::PlannerError;
use ast::{
    AggregateCall, BinaryOpExpr, ColumnRef, CompiledAggregateCall, CompiledFunctionCall,
    Expression, FunctionCall, ResolvedColumnRef, UnaryOpExpr,
};
use data::DataType;
use functions::{FunctionType, Registry};

pub type Schema = Vec<(String, DataType)>;

fn schema_lookup(schema: &[(String, DataType)], name: &str) -> Option<(usize, DataType)> {
    schema
        .iter()
        .position(|(n, _)| n == name)
        .map(|offset| (offset, schema[offset].1))
}

/// Resolves every `Column`/`FunctionCall`/binary-or-unary-op node in
/// `expr` against `schema`/`registry`, rewriting them into their
/// `Resolved*`/`Compiled*` counterparts. Rejects any `Aggregate` node -
/// aggregates are only legal as the top-level expression of a
/// `summarize` item, handled separately by `compile_aggregate`.
pub fn compile_expr(
    expr: Expression,
    schema: &Schema,
    registry: &Registry,
) -> Result<(Expression, DataType), PlannerError> {
    match expr {
        Expression::Literal(datum, datatype) => Ok((Expression::Literal(datum, datatype), datatype)),
        Expression::Column(ColumnRef { name }) => {
            let (offset, datatype) = schema_lookup(schema, &name).ok_or_else(|| {
                PlannerError::SemanticError(format!(
                    "unknown column '{}' (available: {})",
                    name,
                    schema
                        .iter()
                        .map(|(n, _)| n.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;
            Ok((
                Expression::ResolvedColumn(ResolvedColumnRef {
                    name,
                    offset,
                    datatype,
                }),
                datatype,
            ))
        }
        Expression::BinaryOp(BinaryOpExpr { op, left, right }) => {
            let (left, left_type) = compile_expr(*left, schema, registry)?;
            let (right, right_type) = compile_expr(*right, schema, registry)?;
            let name = op.function_name();
            let def = registry.resolve(name, &[left_type, right_type]).ok_or_else(|| {
                PlannerError::SemanticError(format!(
                    "no overload of '{}' accepts ({}, {})",
                    name, left_type, right_type
                ))
            })?;
            Ok((
                Expression::CompiledFunctionCall(CompiledFunctionCall {
                    function: def.function.as_scalar(),
                    args: vec![left, right].into_boxed_slice(),
                    signature: def.signature.clone(),
                }),
                def.signature.ret,
            ))
        }
        Expression::UnaryOp(UnaryOpExpr { op, expr }) => {
            let (inner, inner_type) = compile_expr(*expr, schema, registry)?;
            let name = op.function_name();
            let def = registry.resolve(name, &[inner_type]).ok_or_else(|| {
                PlannerError::SemanticError(format!(
                    "no overload of unary '{}' accepts ({})",
                    name, inner_type
                ))
            })?;
            Ok((
                Expression::CompiledFunctionCall(CompiledFunctionCall {
                    function: def.function.as_scalar(),
                    args: vec![inner].into_boxed_slice(),
                    signature: def.signature.clone(),
                }),
                def.signature.ret,
            ))
        }
        Expression::FunctionCall(FunctionCall { function_name, args }) if function_name == "case" => {
            compile_case(args, schema, registry)
        }
        Expression::FunctionCall(FunctionCall { function_name, args }) => {
            let mut compiled_args = Vec::with_capacity(args.len());
            let mut arg_types = Vec::with_capacity(args.len());
            for arg in args {
                let (compiled, ty) = compile_expr(arg, schema, registry)?;
                arg_types.push(ty);
                compiled_args.push(compiled);
            }
            let def = registry.resolve(&function_name, &arg_types).ok_or_else(|| {
                PlannerError::SemanticError(format!(
                    "no overload of '{}' accepts ({})",
                    function_name,
                    arg_types
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?;
            if !matches!(def.function, FunctionType::Scalar(_)) {
                return Err(PlannerError::SemanticError(format!(
                    "'{}' is an aggregation function and can only be used inside summarize",
                    function_name
                )));
            }
            Ok((
                Expression::CompiledFunctionCall(CompiledFunctionCall {
                    function: def.function.as_scalar(),
                    args: compiled_args.into_boxed_slice(),
                    signature: def.signature.clone(),
                }),
                def.signature.ret,
            ))
        }
        Expression::Aggregate(AggregateCall { func, .. }) => Err(PlannerError::SemanticError(format!(
            "aggregation function '{}' is only allowed inside summarize",
            func
        ))),
        already_compiled @ (Expression::ResolvedColumn(_)
        | Expression::CompiledFunctionCall(_)
        | Expression::CompiledAggregate(_)) => {
            // Only reachable if a caller re-plans an already-compiled
            // plan; treated as a no-op rather than re-resolving.
            let ty = expression_type(&already_compiled);
            Ok((already_compiled, ty))
        }
    }
}

/// `case(c1, v1, c2, v2, ..., default)`: arity must be odd and >= 3; even
/// positions (save the last) are conditions and must be `bool`; odd
/// positions plus the trailing default must share one type (`Null`
/// unifies with anything). Variable arity doesn't fit `Registry`'s
/// fixed-arity overload matching, so `case` is resolved here directly
/// rather than through `Registry::resolve`.
fn compile_case(
    args: Vec<Expression>,
    schema: &Schema,
    registry: &Registry,
) -> Result<(Expression, DataType), PlannerError> {
    if args.len() < 3 || args.len() % 2 == 0 {
        return Err(PlannerError::SemanticError(format!(
            "case() requires an odd number of arguments >= 3, found {}",
            args.len()
        )));
    }
    let last_index = args.len() - 1;
    let mut compiled = Vec::with_capacity(args.len());
    let mut ret_type = DataType::Null;
    for (i, arg) in args.into_iter().enumerate() {
        let (compiled_arg, ty) = compile_expr(arg, schema, registry)?;
        let is_condition = i % 2 == 0 && i != last_index;
        if is_condition {
            if ty != DataType::Bool && ty != DataType::Null {
                return Err(PlannerError::SemanticError(format!(
                    "case() condition {} must be bool, found {}",
                    i / 2 + 1,
                    ty
                )));
            }
        } else if ty != DataType::Null {
            if ret_type == DataType::Null {
                ret_type = ty;
            } else if ret_type != ty {
                return Err(PlannerError::SemanticError(format!(
                    "case() values must share one type: expected {}, found {}",
                    ret_type, ty
                )));
            }
        }
        compiled.push(compiled_arg);
    }
    let signature = functions::FunctionSignature {
        name: "case",
        args: Vec::new(),
        ret: ret_type,
    };
    Ok((
        Expression::CompiledFunctionCall(CompiledFunctionCall {
            function: functions::case_function(),
            args: compiled.into_boxed_slice(),
            signature,
        }),
        ret_type,
    ))
}

fn expression_type(expr: &Expression) -> DataType {
    match expr {
        Expression::Literal(_, t) => *t,
        Expression::ResolvedColumn(c) => c.datatype,
        Expression::CompiledFunctionCall(c) => c.signature.ret,
        Expression::CompiledAggregate(c) => c.ret_type,
        _ => DataType::Null,
    }
}

/// Compiles a `summarize` aggregation item - the only place `Aggregate`
/// nodes are legal.
pub fn compile_aggregate(
    call: AggregateCall,
    schema: &Schema,
    registry: &Registry,
) -> Result<CompiledAggregateCall, PlannerError> {
    let (compiled_arg, arg_type) = match call.arg {
        Some(arg) => {
            let (compiled, ty) = compile_expr(*arg, schema, registry)?;
            (Some(Box::new(compiled)), Some(ty))
        }
        None => (None, None),
    };
    let arg_types: Vec<DataType> = arg_type.into_iter().collect();
    let name = call.func.name();
    let def = registry.resolve(name, &arg_types).ok_or_else(|| {
        PlannerError::SemanticError(format!(
            "no overload of aggregation '{}' accepts ({})",
            name,
            arg_types
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ))
    })?;
    let function = match def.function {
        FunctionType::Aggregate(f) => f,
        _ => {
            return Err(PlannerError::SemanticError(format!(
                "'{}' is a scalar function, not an aggregation",
                name
            )))
        }
    };
    Ok(CompiledAggregateCall {
        function,
        arg: compiled_arg,
        name: def.signature.name,
        ret_type: def.signature.ret,
    })
}

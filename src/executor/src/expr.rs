use ast::Expression;
use data::{Datum, Session};

/// Evaluates a fully-compiled expression tree against one row. Only the
/// `Resolved*`/`Compiled*` variants the planner produces are legal here -
/// a bare `Column`/`FunctionCall`/`Aggregate` reaching the executor means
/// planning was skipped, which is a programming error, not a data error.
pub fn eval_scalar(expr: &Expression, session: &Session, row: &[Datum]) -> Datum {
    match expr {
        Expression::Literal(datum, _) => datum.clone(),
        Expression::ResolvedColumn(column) => row[column.offset].clone(),
        Expression::CompiledFunctionCall(call) => {
            let args: Vec<Datum> = call
                .args
                .iter()
                .map(|arg| eval_scalar(arg, session, row))
                .collect();
            call.function.execute(session, &call.signature, &args)
        }
        Expression::Column(_) | Expression::FunctionCall(_) | Expression::Aggregate(_) => {
            panic!("unresolved expression reached the executor: {:?}", expr)
        }
        Expression::CompiledAggregate(_) => {
            panic!("aggregate expression reached scalar evaluation outside summarize")
        }
        Expression::BinaryOp(_) | Expression::UnaryOp(_) => {
            panic!("unresolved operator reached the executor: {:?}", expr)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::{CompiledFunctionCall, ResolvedColumnRef};
    use data::DataType;
    use functions::Registry;

    #[test]
    fn test_eval_scalar_literal() {
        let session = Session::new_for_test();
        let expr = Expression::Literal(Datum::from(42_i64), DataType::Int);
        assert_eq!(eval_scalar(&expr, &session, &[]), Datum::from(42_i64));
    }

    #[test]
    fn test_eval_scalar_resolved_column() {
        let session = Session::new_for_test();
        let expr = Expression::ResolvedColumn(ResolvedColumnRef {
            name: "a".to_string(),
            offset: 1,
            datatype: DataType::String,
        });
        let row = vec![Datum::from(1_i64), Datum::from("hi")];
        assert_eq!(eval_scalar(&expr, &session, &row), Datum::from("hi"));
    }

    #[test]
    fn test_eval_scalar_compiled_function_call() {
        let session = Session::new_for_test();
        let registry = Registry::new();
        let def = registry.resolve("+", &[DataType::Int, DataType::Int]).unwrap();
        let expr = Expression::CompiledFunctionCall(CompiledFunctionCall {
            function: def.function.as_scalar(),
            args: vec![Expression::from(1_i64), Expression::from(2_i64)].into_boxed_slice(),
            signature: def.signature.clone(),
        });
        assert_eq!(eval_scalar(&expr, &session, &[]), Datum::from(3_i64));
    }

    #[test]
    #[should_panic]
    fn test_eval_scalar_panics_on_unresolved_column() {
        let session = Session::new_for_test();
        let expr = Expression::Column(ast::ColumnRef { name: "x".to_string() });
        eval_scalar(&expr, &session, &[]);
    }
}

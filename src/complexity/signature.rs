use crate::ast::{Field, FuncDecl, TypeExpr};
use crate::core::FunctionSignatureFacts;

/// Extract signature facts from a function declaration.
///
/// Grouped names (`a, b int`) count once per name and unnamed fields count
/// once each. The receiver is not a parameter.
pub fn extract_signature(func: &FuncDecl) -> FunctionSignatureFacts {
    FunctionSignatureFacts {
        parameter_count: count_entries(&func.params),
        return_count: count_entries(&func.results),
        interface_param_count: func
            .params
            .iter()
            .filter(|field| is_interface_param(&field.ty))
            .map(Field::arity)
            .sum(),
        is_variadic: func
            .params
            .last()
            .is_some_and(|field| matches!(field.ty, TypeExpr::Ellipsis(_))),
        generic_param_count: count_entries(&func.type_params),
    }
}

fn count_entries(fields: &[Field]) -> usize {
    fields.iter().map(Field::arity).sum()
}

fn is_interface_param(ty: &TypeExpr) -> bool {
    match ty {
        TypeExpr::Ellipsis(inner) => inner.is_interface(),
        other => other.is_interface(),
    }
}

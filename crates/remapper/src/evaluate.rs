//! The `evaluate` entry points and operation dispatch.

use crate::context::Context;
use crate::error::Result;
use crate::eval_ctx::EvalCtx;
use crate::operators::{
    ambient, array, branching, calendar, comparison, date, debug, history, input as input_ops, logical,
    object, random, string, type_ops,
};
use crate::remapper::{Operation, OperationKind, Remapper};
use crate::types::Value;
use tracing::trace;

/// Evaluates `remapper` against `input`.
///
/// `input` also becomes the `root` value for every nested evaluation.
///
/// # Examples
///
/// ```
/// use remapper::{evaluate, Context, Remapper, Value};
/// use serde_json::json;
///
/// let remapper = Remapper::parse(&json!({ "prop": "name" })).unwrap();
/// let input = Value::from(json!({ "name": "Spongebob" }));
/// let result = evaluate(&remapper, &input, &Context::default()).unwrap();
/// assert_eq!(result, Value::from("Spongebob"));
/// ```
pub fn evaluate(remapper: &Remapper, input: &Value, context: &Context) -> Result<Value> {
    eval(remapper, input, EvalCtx::new(context, input))
}

/// Parses a raw remapper tree and evaluates it.
pub fn remap(remapper: &serde_json::Value, input: &Value, context: &Context) -> Result<Value> {
    let remapper = Remapper::parse(remapper)?;
    evaluate(&remapper, input, context)
}

/// Evaluates `remapper` within an existing scope.
pub(crate) fn eval(remapper: &Remapper, input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    match remapper {
        Remapper::Literal(value) => Ok(value.clone()),
        Remapper::Operation(op) => apply(op, input, ctx),
        Remapper::Pipeline(stages) => {
            let mut current = input.clone();
            for op in stages {
                current = apply(op, &current, ctx)?;
            }
            Ok(current)
        }
    }
}

fn apply(op: &Operation, input: &Value, ctx: EvalCtx<'_>) -> Result<Value> {
    trace!(operation = op.kind.name(), "remap");
    match &op.kind {
        OperationKind::App(field) => Ok(ambient::app_eval(*field, ctx)),
        OperationKind::Page(field) => Ok(ambient::page_eval(*field, ctx)),
        OperationKind::Context(path) => Ok(ambient::context_eval(path, ctx)),
        OperationKind::User(property) => Ok(ambient::user_eval(property, ctx)),

        OperationKind::Equals(operands) => comparison::equals_eval(operands, input, ctx),
        OperationKind::Gt(left, right) => comparison::gt_eval(left, right, input, ctx),
        OperationKind::Lt(left, right) => comparison::lt_eval(left, right, input, ctx),
        OperationKind::Not(operands) => logical::not_eval(operands, input, ctx),
        OperationKind::And(operands) => logical::and_eval(operands, input, ctx),
        OperationKind::Or(operands) => logical::or_eval(operands, input, ctx),

        OperationKind::If {
            condition,
            then,
            otherwise,
        } => branching::if_eval(condition, then, otherwise, input, ctx),
        OperationKind::Match(cases) => branching::match_eval(cases, input, ctx),

        OperationKind::ObjectFrom(props) => object::from_eval(props, input, ctx),
        OperationKind::ObjectAssign(props) => object::assign_eval(props, input, ctx),
        OperationKind::ObjectOmit(keys) => Ok(object::omit_eval(keys, input)),

        OperationKind::ArrayMap(remapper) => array::map_eval(remapper, input, ctx),
        OperationKind::ArrayUnique(key) => array::unique_eval(key.as_ref(), input, ctx),
        OperationKind::ArrayFrom(items) => array::from_eval(items, input, ctx),
        OperationKind::ArrayAppend(items) => array::append_eval(items, input, ctx),
        OperationKind::ArrayOmit(indices) => array::omit_eval(indices, input, ctx),
        OperationKind::Array(field) => Ok(input_ops::array_eval(*field, ctx)),

        OperationKind::Root => Ok(input_ops::root_eval(ctx)),
        OperationKind::Prior(index) => Ok(input_ops::prior_eval(*index, ctx)),
        OperationKind::Static(value) => Ok(value.clone()),
        OperationKind::Prop(path) => Ok(input_ops::prop_eval(path, input)),

        OperationKind::FromHistory { index, props } => history::from_history_eval(*index, props, ctx),
        OperationKind::AssignHistory { index, props } => {
            history::assign_history_eval(*index, props, input, ctx)
        }
        OperationKind::OmitHistory { index, keys } => Ok(history::omit_history_eval(*index, keys, input, ctx)),

        OperationKind::DateNow => Ok(date::now_eval(ctx)),
        OperationKind::DateAdd(millis) => Ok(date::add_eval(*millis, input)),
        OperationKind::DateParse(format) => Ok(date::parse_eval(format.as_ref(), input)),
        OperationKind::DateFormat(format) => Ok(date::format_eval(format.as_ref(), input)),

        OperationKind::RandomChoice => Ok(random::choice_eval(input, ctx)),
        OperationKind::RandomInteger { min, max } => Ok(random::integer_eval(*min, *max, ctx)),
        OperationKind::RandomFloat { min, max } => Ok(random::float_eval(*min, *max, ctx)),
        OperationKind::RandomString { choice, length } => Ok(random::string_eval(choice, *length, ctx)),

        OperationKind::StringCase(case) => Ok(string::case_eval(*case, input)),
        OperationKind::StringFormat(args) => Ok(string::format_eval(args, input, ctx)),
        OperationKind::StringReplace {
            pattern,
            replacement,
        } => Ok(string::replace_eval(pattern, replacement, input)),
        OperationKind::Translate(id) => Ok(string::translate_eval(id, ctx)),

        OperationKind::NullStrip { depth } => Ok(type_ops::null_strip_eval(*depth, input)),
        OperationKind::Type => Ok(type_ops::type_eval(input)),
        OperationKind::Len => Ok(type_ops::len_eval(input)),

        OperationKind::Ics(args) => calendar::ics_eval(args, input, ctx, &op.source),
        OperationKind::Log(level) => Ok(debug::log_eval(*level, input, ctx)),
    }
}

//! The `ics` operator.

use crate::error::{RemapperError, Result};
use crate::eval_ctx::EvalCtx;
use crate::evaluate::eval;
use crate::ics::{self, CalendarError, CalendarEvent, EventEnd};
use crate::remapper::{IcsArgs, Remapper};
use crate::types::Value;
use crate::util;

/// Builds an iCalendar document. Unlike most operators, invalid event data is
/// an error.
pub fn ics_eval(args: &IcsArgs, input: &Value, ctx: EvalCtx<'_>, source: &serde_json::Value) -> Result<Value> {
    let calendar_error = |source_error: CalendarError| RemapperError::Calendar {
        source: source_error,
        remapper: source.clone(),
    };
    let field = |remapper: Option<&Remapper>| -> Result<Option<Value>> {
        match remapper {
            Some(remapper) => Ok(Some(eval(remapper, input, ctx)?).filter(|v| !v.is_nullish())),
            None => Ok(None),
        }
    };
    let text = |remapper: Option<&Remapper>| -> Result<Option<String>> {
        Ok(field(remapper)?.map(|v| util::str_val(&v)))
    };

    let start = ics::event_date("start", &eval(&args.start, input, ctx)?).map_err(calendar_error)?;
    let end = match (field(args.end.as_ref())?, field(args.duration.as_ref())?) {
        (Some(end), _) => Some(EventEnd::At(ics::event_date("end", &end).map_err(calendar_error)?)),
        (None, Some(duration)) => Some(EventEnd::After(
            ics::event_duration(&duration).map_err(calendar_error)?,
        )),
        (None, None) => None,
    };
    let geo = field(args.coordinates.as_ref())?
        .map(|coordinates| ics::event_geo(&coordinates))
        .transpose()
        .map_err(calendar_error)?;

    let context = ctx.context;
    let event = CalendarEvent {
        uid: uuid::Builder::from_random_bytes(context.rng.bytes::<16>())
            .into_uuid()
            .to_string(),
        product_id: context.app_url.clone(),
        stamp: context.now(),
        start,
        end,
        title: text(args.title.as_ref())?,
        description: text(args.description.as_ref())?,
        url: text(args.url.as_ref())?,
        location: text(args.location.as_ref())?,
        geo,
    };
    Ok(Value::String(event.to_ics()))
}

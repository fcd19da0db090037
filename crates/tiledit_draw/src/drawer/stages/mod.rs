//! Pipeline stages, grouped by concern.

mod annotations;
mod color;
mod line;
mod paint;
mod query;
mod reader;

pub(crate) use annotations::{Annotations, AnnotationsIndexOf};
pub(crate) use color::{BgFill, Colorize, CurColorsReset};
pub(crate) use line::{Indent, Line, LineWrap};
pub(crate) use paint::{CursorPaint, DrawRune};
pub(crate) use query::{IndexOf, Measure, PointOf};
pub(crate) use reader::{EarlyExit, RuneOffset, RuneReader};

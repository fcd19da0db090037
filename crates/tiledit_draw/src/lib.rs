//! Text layout and painting for tiledit views.
//!
//! [`Drawer`] walks a [`tiledit_core::Reader`] and either measures it,
//! paints it into a [`Canvas`], or answers position queries, all from the
//! same layout rules (tab stops, soft wrap with indented continuations,
//! annotations).

pub mod canvas;
pub mod drawer;
pub mod error;
pub mod face;
pub mod geom;
pub mod options;

pub use canvas::{rgb, Canvas, Color};
pub use drawer::Drawer;
pub use error::DrawError;
pub use face::{FaceCache, FaceRunes, Glyph, GlyphSource, Mask, Metrics, MonoFace, SharedFaceCache};
pub use geom::{Fixed, FixedPoint, FixedRect, Point, Rect};
pub use options::{
    Annotation, AnnotationsOpt, ColorizeGroup, ColorizeOp, CursorOpt, HighlightColors, Options,
};

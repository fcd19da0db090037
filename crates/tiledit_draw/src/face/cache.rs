//! Memoizing wrappers around a [`Face`].

use super::{dot_offset, Face, Glyph, GlyphSource, Metrics, Mask};
use crate::geom::{Fixed, FixedPoint, FixedRect, Point, Rect};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

/// Glyph rasterized at the origin; translated on lookup.
#[derive(Clone, Debug)]
struct CachedGlyph {
    dest: Rect,
    mask: Arc<Mask>,
    mask_pt: Point,
    advance: Fixed,
}

impl CachedGlyph {
    fn at(&self, dot: FixedPoint) -> Glyph {
        Glyph {
            dest: self.dest.translate(dot_offset(dot)),
            mask: self.mask.clone(),
            mask_pt: self.mask_pt,
            advance: self.advance,
        }
    }
}

/// Rasterize at the origin and copy the mask out of the face's buffer.
fn rasterize<F: Face + ?Sized>(face: &mut F, ru: char) -> Option<CachedGlyph> {
    let raw = face.glyph(FixedPoint::default(), ru)?;
    Some(CachedGlyph {
        dest: raw.dest,
        mask: Arc::new(raw.mask.clone()),
        mask_pt: raw.mask_pt,
        advance: raw.advance,
    })
}

/// Single-threaded cache. Keys are runes (pairs for kerning).
#[derive(Debug)]
pub struct FaceCache<F> {
    face: F,
    glyphs: HashMap<char, Option<CachedGlyph>>,
    advances: HashMap<char, Option<Fixed>>,
    bounds: HashMap<char, Option<(FixedRect, Fixed)>>,
    kerns: HashMap<(char, char), Fixed>,
}

impl<F: Face> FaceCache<F> {
    pub fn new(face: F) -> Self {
        Self {
            face,
            glyphs: HashMap::new(),
            advances: HashMap::new(),
            bounds: HashMap::new(),
            kerns: HashMap::new(),
        }
    }

    /// Cached glyph count, for diagnostics.
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn into_inner(self) -> F {
        self.face
    }
}

impl<F: Face> GlyphSource for FaceCache<F> {
    fn glyph(&mut self, dot: FixedPoint, ru: char) -> Option<Glyph> {
        let face = &mut self.face;
        self.glyphs
            .entry(ru)
            .or_insert_with(|| rasterize(face, ru))
            .as_ref()
            .map(|g| g.at(dot))
    }

    fn glyph_advance(&mut self, ru: char) -> Option<Fixed> {
        let face = &mut self.face;
        *self
            .advances
            .entry(ru)
            .or_insert_with(|| face.glyph_advance(ru))
    }

    fn glyph_bounds(&mut self, ru: char) -> Option<(FixedRect, Fixed)> {
        let face = &mut self.face;
        *self
            .bounds
            .entry(ru)
            .or_insert_with(|| face.glyph_bounds(ru))
    }

    fn kern(&mut self, a: char, b: char) -> Fixed {
        let face = &mut self.face;
        *self.kerns.entry((a, b)).or_insert_with(|| face.kern(a, b))
    }

    fn metrics(&self) -> Metrics {
        self.face.metrics()
    }
}

struct Shared<F> {
    face: Mutex<F>,
    metrics: Metrics,
    glyphs: RwLock<HashMap<char, Option<CachedGlyph>>>,
    advances: RwLock<HashMap<char, Option<Fixed>>>,
    bounds: RwLock<HashMap<char, Option<(FixedRect, Fixed)>>>,
    kerns: RwLock<HashMap<(char, char), Fixed>>,
}

/// Cache shareable across threads. Warm lookups take a read lock; fills
/// serialize on the face and publish under the write lock.
pub struct SharedFaceCache<F> {
    inner: Arc<Shared<F>>,
}

impl<F> Clone for SharedFaceCache<F> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<F> std::fmt::Debug for SharedFaceCache<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedFaceCache")
            .field("glyphs", &self.inner.glyphs.read().len())
            .finish()
    }
}

/// Warm hit under the read lock; a miss fills while holding the face, so
/// each key reaches the face at most once.
fn lookup_or_fill<F, K, V, Fill>(face: &Mutex<F>, map: &RwLock<HashMap<K, V>>, key: K, fill: Fill) -> V
where
    K: Eq + Hash,
    V: Clone,
    Fill: FnOnce(&mut F) -> V,
{
    if let Some(v) = map.read().get(&key) {
        return v.clone();
    }
    let mut face = face.lock();
    // filled by another thread while we waited on the face
    if let Some(v) = map.read().get(&key) {
        return v.clone();
    }
    let value = fill(&mut *face);
    map.write().insert(key, value.clone());
    value
}

impl<F: Face> SharedFaceCache<F> {
    pub fn new(face: F) -> Self {
        let metrics = face.metrics();
        Self {
            inner: Arc::new(Shared {
                face: Mutex::new(face),
                metrics,
                glyphs: RwLock::new(HashMap::new()),
                advances: RwLock::new(HashMap::new()),
                bounds: RwLock::new(HashMap::new()),
                kerns: RwLock::new(HashMap::new()),
            }),
        }
    }
}

impl<F: Face> GlyphSource for SharedFaceCache<F> {
    fn glyph(&mut self, dot: FixedPoint, ru: char) -> Option<Glyph> {
        let inner = &*self.inner;
        lookup_or_fill(&inner.face, &inner.glyphs, ru, |face| rasterize(face, ru)).map(|g| g.at(dot))
    }

    fn glyph_advance(&mut self, ru: char) -> Option<Fixed> {
        let inner = &*self.inner;
        lookup_or_fill(&inner.face, &inner.advances, ru, |face| face.glyph_advance(ru))
    }

    fn glyph_bounds(&mut self, ru: char) -> Option<(FixedRect, Fixed)> {
        let inner = &*self.inner;
        lookup_or_fill(&inner.face, &inner.bounds, ru, |face| face.glyph_bounds(ru))
    }

    fn kern(&mut self, a: char, b: char) -> Fixed {
        let inner = &*self.inner;
        lookup_or_fill(&inner.face, &inner.kerns, (a, b), |face| face.kern(a, b))
    }

    fn metrics(&self) -> Metrics {
        self.inner.metrics
    }
}

use crate::drawer::chain::{Chain, Stage};
use crate::drawer::state::State;
use crate::drawer::view_start;
use crate::geom::Fixed;
use tiledit_core::RwError;

/// Reads one content rune per loop iteration and moves the pen past it.
/// After the last rune it emits the end-of-content sentinel once and stops.
pub(crate) struct RuneReader;

impl Stage for RuneReader {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        let (ru, size) = if st.ri >= st.reader.max() {
            (None, 0)
        } else {
            match st.reader.read_rune_at(st.ri) {
                Ok((ru, size)) => (Some(ru), size),
                Err(RwError::EndOfRange) => (None, 0),
                Err(err) => {
                    st.err = Some(err);
                    st.stop = true;
                    return;
                }
            }
        };

        st.ru = ru;
        st.kern = match (st.prev_ru, ru) {
            (Some(a), Some(b)) => st.face.kern(a, b),
            _ => Fixed::ZERO,
        };
        st.pen.x += st.kern;
        st.advance = st.advance_for(ru);

        chain.next(st);

        if ru.is_none() {
            st.stop = true;
            return;
        }
        st.ri += size;
        st.pen.x += st.advance;
        st.prev_ru = ru;
    }
}

/// Starts the walk at the visual row holding the scroll offset.
pub(crate) struct RuneOffset;

impl Stage for RuneOffset {
    fn init(&mut self, st: &mut State<'_>) {
        if !st.opts.rune_offset.on {
            return;
        }
        let (start, header) = view_start(st);
        st.ri = start;
        st.start_ri = start;
        st.pen.y = -header;
    }

    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        chain.next(st);
    }
}

/// Stops once the pen drops below the viewport.
pub(crate) struct EarlyExit;

impl Stage for EarlyExit {
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>) {
        if st.pen.y >= Fixed::from_int(st.bounds.dy()) {
            st.stop = true;
            return;
        }
        chain.next(st);
    }
}

use super::state::State;

/// One step of the per-rune pipeline.
///
/// `iter` decides whether the rest of the chain sees the current rune by
/// calling [`Chain::next`]; it may call it more than once to push extra
/// runes through the downstream stages.
pub(crate) trait Stage {
    fn init(&mut self, _st: &mut State<'_>) {}
    fn iter(&mut self, st: &mut State<'_>, chain: &mut Chain<'_>);
    fn end(&mut self, _st: &mut State<'_>) {}
}

/// The stages after the one currently running.
pub(crate) struct Chain<'c> {
    rest: &'c mut [Box<dyn Stage>],
}

impl<'c> Chain<'c> {
    pub(crate) fn new(stages: &'c mut [Box<dyn Stage>]) -> Self {
        Self { rest: stages }
    }

    /// Run the downstream stages on the current rune.
    pub(crate) fn next(&mut self, st: &mut State<'_>) {
        if let Some((head, rest)) = self.rest.split_first_mut() {
            head.iter(st, &mut Chain { rest });
        }
    }
}

/// Drive `stages` until one of them stops the loop.
pub(crate) fn run(st: &mut State<'_>, stages: &mut [Box<dyn Stage>]) {
    for stage in stages.iter_mut() {
        stage.init(st);
    }
    while !st.stop {
        Chain::new(stages).next(st);
    }
    for stage in stages.iter_mut() {
        stage.end(st);
    }
}

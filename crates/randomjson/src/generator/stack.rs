#[derive(Debug, Clone, Copy)]
struct Frame {
    closer: u8,
    needs_comma: bool,
}

/// Open containers, innermost last.
///
/// Each frame pairs the byte that will close the container with whether the
/// next entry inside it must be preceded by a comma, so the closer stack and
/// the comma stack can never disagree on depth.
#[derive(Debug, Default)]
pub(crate) struct ContainerStack {
    frames: Vec<Frame>,
}

impl ContainerStack {
    pub(crate) fn depth(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn innermost(&self) -> Option<u8> {
        self.frames.last().map(|frame| frame.closer)
    }

    /// Pushes a freshly opened container; its first entry takes no comma.
    pub(crate) fn push(&mut self, opener: u8) {
        let closer = match opener {
            b'{' => b'}',
            _ => b']',
        };
        self.frames.push(Frame {
            closer,
            needs_comma: false,
        });
    }

    pub(crate) fn pop(&mut self) -> Option<u8> {
        self.frames.pop().map(|frame| frame.closer)
    }

    pub(crate) fn needs_comma(&self) -> bool {
        self.frames.last().is_some_and(|frame| frame.needs_comma)
    }

    /// Records a completed entry in the innermost container.
    pub(crate) fn mark_entry(&mut self) {
        if let Some(frame) = self.frames.last_mut() {
            frame.needs_comma = true;
        }
    }
}

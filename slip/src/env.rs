use object::SymbolId;

/// Lexical environment: frames of parameter names, innermost first.
///
/// Each frame borrows the parameter list of the lambda being compiled and
/// points at the environment it was created in, so extending never copies
/// or mutates anything; the new environment lives exactly as long as the
/// body compile that needs it.
#[derive(Debug, Clone, Copy)]
pub enum Environment<'a> {
    Empty,
    Frame {
        vars: &'a [SymbolId],
        parent: &'a Environment<'a>,
    },
}

impl<'a> Environment<'a> {
    /// New environment with `vars` as the innermost frame.
    pub fn extend<'b>(&'b self, vars: &'b [SymbolId]) -> Environment<'b> {
        Environment::Frame { vars, parent: self }
    }

    /// `(frame, slot)` of the innermost binding of `name`.
    pub fn lookup(&self, name: SymbolId) -> Option<(usize, usize)> {
        self.frames()
            .enumerate()
            .find_map(|(i, vars)| vars.iter().position(|&v| v == name).map(|j| (i, j)))
    }

    pub fn depth(&self) -> usize {
        self.frames().count()
    }

    pub fn frames(&self) -> Frames<'_> {
        Frames { env: self }
    }
}

pub struct Frames<'e> {
    env: &'e Environment<'e>,
}

impl<'e> Iterator for Frames<'e> {
    type Item = &'e [SymbolId];

    fn next(&mut self) -> Option<Self::Item> {
        match *self.env {
            Environment::Empty => None,
            Environment::Frame { vars, parent } => {
                self.env = parent;
                Some(vars)
            }
        }
    }
}

/// Pair of buffers used in a ping-pong fashion: one is read from while the
/// other gets written into, and then they switch roles.
#[derive(Debug)]
pub struct DoubleBuffered<T> {
    a: T,
    b: T,
}

impl<T> DoubleBuffered<T> {
    pub fn new(a: T, b: T) -> Self {
        Self { a, b }
    }

    /// Returns the buffer holding the latest data.
    pub fn get(&self, alternate: bool) -> &T {
        if alternate {
            &self.b
        } else {
            &self.a
        }
    }

    pub fn get_mut(&mut self, alternate: bool) -> &mut T {
        if alternate {
            &mut self.b
        } else {
            &mut self.a
        }
    }

    /// Returns the buffer holding the latest data, and the other one, to be
    /// written into.
    pub fn split_mut(&mut self, alternate: bool) -> (&T, &mut T) {
        if alternate {
            (&self.b, &mut self.a)
        } else {
            (&self.a, &mut self.b)
        }
    }

    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut T)) {
        f(&mut self.a);
        f(&mut self.b);
    }
}

/// Cell count of the reference machine's tape.
pub const DEFAULT_TAPE_SIZE: usize = 10;

/// What happens when the cursor leaves `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundsPolicy {
    /// Moving right past the last cell appends a zero cell. Moving left of
    /// cell 0 is still an error.
    #[default]
    Grow,
    /// The tape never changes length; any move off it is an error.
    Fixed,
}

/// A cursor move the policy refused. Carries the cell that was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub cell: isize,
    pub len: usize,
}

/// Zero-initialized byte tape with a cursor.
///
/// Cell arithmetic wraps modulo 256.
pub struct Tape {
    cells: Vec<u8>,
    cursor: usize,
    policy: BoundsPolicy,
}

impl Tape {
    pub fn new(size: usize, policy: BoundsPolicy) -> Self {
        Self {
            cells: vec![0u8; size],
            cursor: 0,
            policy,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Value under the cursor.
    ///
    /// Reading a zero-length tape follows the same policy as writing it:
    /// `Grow` allocates the cell, `Fixed` refuses.
    #[inline(always)]
    pub fn get(&mut self) -> Result<u8, OutOfBounds> {
        self.current_mut().map(|cell| *cell)
    }

    #[inline(always)]
    pub fn increment(&mut self) -> Result<(), OutOfBounds> {
        let cell = self.current_mut()?;
        *cell = cell.wrapping_add(1);
        Ok(())
    }

    #[inline(always)]
    pub fn decrement(&mut self) -> Result<(), OutOfBounds> {
        let cell = self.current_mut()?;
        *cell = cell.wrapping_sub(1);
        Ok(())
    }

    pub fn move_right(&mut self) -> Result<(), OutOfBounds> {
        let next = self.cursor + 1;
        if next >= self.cells.len() {
            match self.policy {
                BoundsPolicy::Grow => self.cells.resize(next + 1, 0),
                BoundsPolicy::Fixed => {
                    return Err(OutOfBounds {
                        cell: next as isize,
                        len: self.cells.len(),
                    });
                }
            }
        }
        self.cursor = next;
        Ok(())
    }

    pub fn move_left(&mut self) -> Result<(), OutOfBounds> {
        if self.cursor == 0 {
            return Err(OutOfBounds {
                cell: -1,
                len: self.cells.len(),
            });
        }
        self.cursor -= 1;
        Ok(())
    }

    fn current_mut(&mut self) -> Result<&mut u8, OutOfBounds> {
        if self.cursor >= self.cells.len() {
            // Only reachable with a zero-length tape.
            match self.policy {
                BoundsPolicy::Grow => self.cells.resize(self.cursor + 1, 0),
                BoundsPolicy::Fixed => {
                    return Err(OutOfBounds {
                        cell: self.cursor as isize,
                        len: self.cells.len(),
                    });
                }
            }
        }
        Ok(&mut self.cells[self.cursor])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_zeroed() {
        let tape = Tape::new(DEFAULT_TAPE_SIZE, BoundsPolicy::Grow);
        assert_eq!(tape.cells(), &[0u8; 10]);
        assert_eq!(tape.cursor(), 0);
    }

    #[test]
    fn test_increment_wraps() {
        let mut tape = Tape::new(1, BoundsPolicy::Fixed);
        for _ in 0..255 {
            tape.increment().unwrap();
        }
        assert_eq!(tape.get(), Ok(255));
        tape.increment().unwrap();
        assert_eq!(tape.get(), Ok(0));
    }

    #[test]
    fn test_decrement_wraps() {
        let mut tape = Tape::new(1, BoundsPolicy::Fixed);
        tape.decrement().unwrap();
        assert_eq!(tape.get(), Ok(255));
    }

    #[test]
    fn test_grow_extends_right() {
        let mut tape = Tape::new(2, BoundsPolicy::Grow);
        tape.move_right().unwrap();
        tape.move_right().unwrap();
        tape.move_right().unwrap();
        assert_eq!(tape.cursor(), 3);
        assert_eq!(tape.len(), 4);
        assert_eq!(tape.get(), Ok(0));
    }

    #[test]
    fn test_grow_still_rejects_left_of_zero() {
        let mut tape = Tape::new(2, BoundsPolicy::Grow);
        assert_eq!(tape.move_left(), Err(OutOfBounds { cell: -1, len: 2 }));
        assert_eq!(tape.cursor(), 0);
    }

    #[test]
    fn test_fixed_rejects_right_of_end() {
        let mut tape = Tape::new(2, BoundsPolicy::Fixed);
        tape.move_right().unwrap();
        assert_eq!(tape.move_right(), Err(OutOfBounds { cell: 2, len: 2 }));
        assert_eq!(tape.cursor(), 1);
        assert_eq!(tape.len(), 2);
    }

    #[test]
    fn test_zero_length_tape() {
        let mut grow = Tape::new(0, BoundsPolicy::Grow);
        assert_eq!(grow.get(), Ok(0));
        assert_eq!(grow.len(), 1);
        grow.increment().unwrap();
        assert_eq!(grow.cells(), &[1]);

        let mut fixed = Tape::new(0, BoundsPolicy::Fixed);
        assert_eq!(fixed.get(), Err(OutOfBounds { cell: 0, len: 0 }));
        assert_eq!(fixed.increment(), Err(OutOfBounds { cell: 0, len: 0 }));
        assert_eq!(fixed.move_right(), Err(OutOfBounds { cell: 1, len: 0 }));
    }
}

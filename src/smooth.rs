use heapless::HistoryBuffer;

/// Moving average over the last `N` samples, e.g. for jittery ADC readings.
///
/// ```
/// use shift_chain::Smooth;
/// let mut pot = Smooth::<4>::new();
/// assert_eq!(pot.push(100), 100);
/// assert_eq!(pot.push(200), 150);
/// for _ in 0..4 {
///     pot.push(40);
/// }
/// assert_eq!(pot.value(), 40);
/// ```
pub struct Smooth<const N: usize> {
    samples: HistoryBuffer<u16, N>,
}

impl<const N: usize> Smooth<N> {
    const NON_EMPTY: () = assert!(N > 0, "Smooth needs room for at least one sample");

    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::NON_EMPTY;
        Self {
            samples: HistoryBuffer::new(),
        }
    }

    /// Store a sample and return the new average.
    ///
    /// Until `N` samples have been seen the average covers only those held.
    pub fn push(&mut self, sample: u16) -> u32 {
        self.samples.write(sample);
        self.value()
    }

    /// Average of the samples held, truncated.  `0` when empty.
    pub fn value(&self) -> u32 {
        let held = self.samples.as_slice();
        if held.is_empty() {
            return 0;
        }
        let sum: u64 = held.iter().map(|s| u64::from(*s)).sum();
        // the mean of u16 samples always fits
        (sum / held.len() as u64) as u32
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.len() == 0
    }

    /// Whether `N` samples have been seen since creation or the last [`Smooth::clear`].
    pub fn is_full(&self) -> bool {
        self.samples.len() == N
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for Smooth<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::Smooth;

    #[test]
    fn average_while_filling() {
        let mut s = Smooth::<3>::new();
        assert!(s.is_empty());
        assert_eq!(s.value(), 0);

        assert_eq!(s.push(10), 10);
        assert_eq!(s.push(11), 10);
        assert!(!s.is_full());
        assert_eq!(s.push(30), 17);
        assert!(s.is_full());
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn oldest_sample_drops_out() {
        let mut s = Smooth::<2>::default();
        s.push(100);
        s.push(200);
        assert_eq!(s.push(400), 300);
        assert_eq!(s.len(), 2);
        assert_eq!(s.capacity(), 2);

        assert!(s.is_full());

        s.clear();
        assert!(s.is_empty());
        assert!(!s.is_full());
        assert_eq!(s.push(7), 7);
    }

    #[test]
    fn full_scale_does_not_overflow() {
        let mut s = Smooth::<64>::new();
        for _ in 0..100 {
            s.push(u16::MAX);
        }
        assert_eq!(s.value(), u32::from(u16::MAX));
    }
}

// Store combination enumeration in a reproducible order

/// Iterates over every subset of `0..n` with sizes `1..=max_size`.
///
/// Subsets are yielded by increasing size, and within a size in lexicographic
/// order of indices, so `[0]`, `[1]`, ..., `[0, 1]`, `[0, 2]`, ...
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    max_size: usize,
    current: Vec<usize>,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, max_size: usize) -> Self {
        let max_size = max_size.min(n);
        Self {
            n,
            max_size,
            current: Vec::new(),
            done: max_size == 0,
        }
    }

    /// Moves `current` to the next subset of the same size, returning false when exhausted
    fn advance_within_size(&mut self) -> bool {
        let k = self.current.len();
        let mut i = k;
        while i > 0 {
            i -= 1;
            if self.current[i] < self.n - k + i {
                self.current[i] += 1;
                for j in (i + 1)..k {
                    self.current[j] = self.current[j - 1] + 1;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if self.current.is_empty() {
            self.current = vec![0];
        } else if !self.advance_within_size() {
            let size = self.current.len() + 1;
            if size > self.max_size {
                self.done = true;
                return None;
            }
            self.current = (0..size).collect();
        }

        Some(self.current.clone())
    }
}

/// Binomial coefficient C(n, k), saturating at `u128::MAX`
pub fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // result * (n - i) / (i + 1) stays integral at every step
        result = match result.checked_mul((n - i) as u128) {
            Some(product) => product / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    result
}

/// Number of subsets [`Combinations::new(n, max_size)`] yields
pub fn count_combinations(n: usize, max_size: usize) -> u128 {
    (1..=max_size.min(n)).fold(0u128, |total, k| total.saturating_add(binomial(n, k)))
}

use rand::Rng;

/// Picks one reply out of a fixed candidate list.
pub trait Selector: Send + Sync {
    /// Index in `0..len`. Only called with `len > 0`.
    fn pick(&self, len: usize) -> usize;
}

/// Uniform random choice.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSelector;

impl Selector for RandomSelector {
    fn pick(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len.max(1))
    }
}

/// Always the same index (wrapped to the list length). For reproducible tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSelector(pub usize);

impl Selector for FixedSelector {
    fn pick(&self, len: usize) -> usize {
        self.0 % len.max(1)
    }
}

pub fn choose<'a>(selector: &dyn Selector, items: &[&'a str]) -> &'a str {
    if items.is_empty() {
        return "";
    }
    let idx = selector.pick(items.len()).min(items.len() - 1);
    items[idx]
}

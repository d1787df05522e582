//! Generic helpers over in-memory slices.
//!
//! These never mutate their input and never fail: "no match" is reported
//! through the return value, not as an error.

/// Return the first element matching `predicate`, scanning from the front.
pub fn find<T, P>(items: &[T], mut predicate: P) -> Option<&T>
where
    P: FnMut(&T) -> bool,
{
    items.iter().find(|item| predicate(*item))
}

/// Like [`find`], but returns an owned value and a found flag.
///
/// When nothing matches the result is `(T::default(), false)`.
pub fn find_or_default<T, P>(items: &[T], predicate: P) -> (T, bool)
where
    T: Clone + Default,
    P: FnMut(&T) -> bool,
{
    match find(items, predicate) {
        Some(item) => (item.clone(), true),
        None => (T::default(), false),
    }
}

/// Keep the elements matching `predicate`, preserving their relative order.
pub fn filter<T, P>(items: &[T], mut predicate: P) -> Vec<T>
where
    T: Clone,
    P: FnMut(&T) -> bool,
{
    items.iter().filter(|item| predicate(*item)).cloned().collect()
}

/// Apply `transform` to every element; output has the input's length and order.
pub fn map<T, K, F>(items: &[T], transform: F) -> Vec<K>
where
    F: FnMut(&T) -> K,
{
    items.iter().map(transform).collect()
}

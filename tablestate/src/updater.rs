//! Setter argument: a new value, or a function of the previous value
//!
//! Table components hand their change callbacks either form, and several
//! callbacks may fire in one event turn (changing grouping also reorders
//! columns). Each function form is applied to the value left by the previous
//! call, so no update is lost.
//!

/// New value, or transform of the current value.
pub enum Updater<'a, T> {
    Value(T),
    Update(Box<dyn FnOnce(&T) -> T + 'a>),
}

impl<'a, T> Updater<'a, T> {
    /// Wraps a function of the previous value.
    pub fn from_fn(update: impl FnOnce(&T) -> T + 'a) -> Self {
        Updater::Update(Box::new(update))
    }

    /// Produces the new value, given the current (effective) value.
    pub fn resolve(self, previous: &T) -> T {
        match self {
            Updater::Value(value) => value,
            Updater::Update(update) => update(previous),
        }
    }
}

impl<T> From<T> for Updater<'_, T> {
    fn from(value: T) -> Self {
        Updater::Value(value)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Updater<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Updater::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Updater::Update(_) => f.write_str("Update(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_ignores_previous() {
        let updater: Updater<'_, Vec<String>> = vec!["name".to_string()].into();
        assert_eq!(updater.resolve(&vec!["cost".to_string()]), vec!["name"]);
    }

    #[test]
    fn test_function_sees_previous() {
        let updater = Updater::from_fn(|prev: &usize| prev + 1);
        assert_eq!(updater.resolve(&41), 42);
    }

    #[test]
    fn test_function_may_borrow() {
        let suffix = String::from("_copy");
        let updater = Updater::from_fn(|prev: &String| format!("{prev}{suffix}"));
        assert_eq!(updater.resolve(&"name".to_string()), "name_copy");
        assert_eq!(format!("{:?}", Updater::<u8>::Value(3)), "Value(3)");
    }
}

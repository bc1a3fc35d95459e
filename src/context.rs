use smol_str::SmolStr;
use std::{
    collections::{hash_map, HashMap},
    iter::FromIterator,
};

/// The values bound to each known variable.
///
/// A [`Context`] is only ever borrowed immutably while evaluating or solving,
/// so callers are free to update it between calls.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Context {
    variables: HashMap<SmolStr, f64>,
}

impl Context {
    pub fn new() -> Self { Context::default() }

    /// Bind a variable, replacing any previous value.
    pub fn set<S: Into<SmolStr>>(&mut self, name: S, value: f64) {
        self.variables.insert(name.into(), value);
    }

    pub fn with<S: Into<SmolStr>>(mut self, name: S, value: f64) -> Self {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.variables.get(name).copied()
    }

    pub fn has(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.variables.remove(name)
    }

    pub fn get_all(&self) -> &HashMap<SmolStr, f64> { &self.variables }

    pub fn iter(&self) -> hash_map::Iter<'_, SmolStr, f64> {
        self.variables.iter()
    }

    pub fn clear(&mut self) { self.variables.clear(); }

    pub fn len(&self) -> usize { self.variables.len() }

    pub fn is_empty(&self) -> bool { self.variables.is_empty() }
}

impl<S: Into<SmolStr>> FromIterator<(S, f64)> for Context {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Context {
            variables: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

impl<S: Into<SmolStr>> Extend<(S, f64)> for Context {
    fn extend<T: IntoIterator<Item = (S, f64)>>(&mut self, iter: T) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}

impl<'a> IntoIterator for &'a Context {
    type IntoIter = hash_map::Iter<'a, SmolStr, f64>;
    type Item = (&'a SmolStr, &'a f64);

    fn into_iter(self) -> Self::IntoIter { self.variables.iter() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_and_clear() {
        let mut ctx = Context::new();
        assert!(ctx.is_empty());
        assert_eq!(ctx.get("x"), None);

        ctx.set("x", 1.0);
        ctx.set("y", 2.0);
        ctx.set("x", 3.0);

        assert_eq!(ctx.len(), 2);
        assert!(ctx.has("x"));
        assert_eq!(ctx.get("x"), Some(3.0));
        assert_eq!(ctx.get_all().get("y"), Some(&2.0));

        ctx.clear();
        assert_eq!(ctx.len(), 0);
        assert!(!ctx.has("x"));
    }

    #[test]
    fn build_from_pairs() {
        let ctx: Context = vec![("a", 1.0), ("b", 2.0)].into_iter().collect();

        let mut names: Vec<_> = ctx.iter().map(|(name, _)| name.as_str()).collect();
        names.sort();

        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(ctx, Context::new().with("b", 2.0).with("a", 1.0));
    }

    #[test]
    fn removing_a_variable() {
        let mut ctx = Context::new().with("x", 5.0);

        assert_eq!(ctx.remove("x"), Some(5.0));
        assert_eq!(ctx.remove("x"), None);
        assert!(ctx.is_empty());
    }
}

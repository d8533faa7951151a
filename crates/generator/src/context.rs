//! Per-call generation state
//!
//! A fresh [`GenerationContext`] is created for every top-level call
//! (one property, one class or one selection) and threaded through all
//! nested expansion. Nothing here outlives the call.

use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct GenerationContext {
    /// Next value `$incint$` hands out
    next_integer: usize,
    /// Most recent `$incint$` value
    last_integer: Option<usize>,
    /// Generated element names already handed out
    claimed_names: HashSet<String>,
    /// Generated name of the previous member in the current group
    previous_xname: Option<String>,
    /// Types currently being expanded on this branch, outermost first
    expanding: Vec<String>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value for `$incint$`: the current counter, which then advances
    pub fn next_incrementing(&mut self) -> usize {
        let value = self.next_integer;
        self.next_integer += 1;
        self.last_integer = Some(value);
        value
    }

    /// Value for `$repint$`: the last `$incint$` value, or 0 before any
    pub fn repeating(&self) -> usize {
        self.last_integer.unwrap_or(0)
    }

    /// How many `$incint$` values were handed out, i.e. grid rows used
    pub fn rows_used(&self) -> usize {
        self.next_integer
    }

    /// Reserve a unique element name derived from `base`
    ///
    /// The first request gets `base` itself, later ones `base1`, `base2`...
    pub fn claim_name(&mut self, base: &str) -> String {
        if self.claimed_names.insert(base.to_string()) {
            return base.to_string();
        }
        let mut suffix = 1usize;
        loop {
            let candidate = format!("{base}{suffix}");
            if self.claimed_names.insert(candidate.clone()) {
                return candidate;
            }
            suffix += 1;
        }
    }

    pub fn previous_xname(&self) -> Option<&str> {
        self.previous_xname.as_deref()
    }

    pub fn set_previous_xname(&mut self, name: String) {
        self.previous_xname = Some(name);
    }

    /// Start a nested group; the returned chain state goes back to [`Self::end_group`]
    pub fn begin_group(&mut self) -> Option<String> {
        self.previous_xname.take()
    }

    pub fn end_group(&mut self, saved: Option<String>) {
        self.previous_xname = saved;
    }

    /// Enter sub-property expansion of `type_name`
    ///
    /// Refused when the type is already being expanded further up the
    /// branch or when `max_depth` levels are already open.
    pub fn enter_type(&mut self, type_name: &str, max_depth: usize) -> bool {
        if self.expanding.len() >= max_depth || self.expanding.iter().any(|t| t == type_name) {
            return false;
        }
        self.expanding.push(type_name.to_string());
        true
    }

    pub fn leave_type(&mut self) {
        self.expanding.pop();
    }

    /// Current nesting depth of sub-property expansion
    pub fn depth(&self) -> usize {
        self.expanding.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_counter_sequence() {
        let mut ctx = GenerationContext::new();
        assert_eq!(ctx.repeating(), 0);
        assert_eq!(ctx.next_incrementing(), 0);
        assert_eq!(ctx.repeating(), 0);
        assert_eq!(ctx.next_incrementing(), 1);
        assert_eq!(ctx.repeating(), 1);
        assert_eq!(ctx.repeating(), 1);
        assert_eq!(ctx.next_incrementing(), 2);
        assert_eq!(ctx.rows_used(), 3);
    }

    #[test]
    fn test_claim_name_is_collision_free() {
        let mut ctx = GenerationContext::new();
        assert_eq!(ctx.claim_name("TitleTextBlock"), "TitleTextBlock");
        assert_eq!(ctx.claim_name("TitleTextBlock"), "TitleTextBlock1");
        assert_eq!(ctx.claim_name("TitleTextBlock"), "TitleTextBlock2");
        assert_eq!(ctx.claim_name("TitleTextBlock1"), "TitleTextBlock11");
    }

    #[test]
    fn test_group_scoping_restores_chain() {
        let mut ctx = GenerationContext::new();
        ctx.set_previous_xname("OuterTextBlock".to_string());

        let saved = ctx.begin_group();
        assert_eq!(ctx.previous_xname(), None);
        ctx.set_previous_xname("InnerTextBlock".to_string());
        ctx.end_group(saved);

        assert_eq!(ctx.previous_xname(), Some("OuterTextBlock"));
    }

    #[test]
    fn test_type_guard() {
        let mut ctx = GenerationContext::new();
        assert!(ctx.enter_type("Node", 5));
        assert!(!ctx.enter_type("Node", 5));
        assert!(ctx.enter_type("Leaf", 5));
        assert_eq!(ctx.depth(), 2);
        ctx.leave_type();
        ctx.leave_type();
        assert!(ctx.enter_type("Node", 5));

        let mut shallow = GenerationContext::new();
        assert!(shallow.enter_type("A", 1));
        assert!(!shallow.enter_type("B", 1));
    }
}
